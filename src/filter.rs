//! Search and filter composition for the project list and the
//! verification queues.
//!
//! All filters run over the full in-memory list and combine with AND.
//! [`ProjectList`] memoizes the last result until either the filter or the
//! underlying data changes; [`Debouncer`] defers search-term updates until
//! typing pauses.

use crate::status::{
    get_project_risk, get_project_status, ProjectStatus, RiskStatus, VerificationStatus,
};
use crate::types::{Project, Submission, SubmissionKind};
use std::time::{Duration, Instant};

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

/// `needle_lower` is matched as typed, surrounding spaces included; only an
/// empty needle matches everything.
fn contains_ci(haystack: &str, needle_lower: &str) -> bool {
    needle_lower.is_empty() || haystack.to_lowercase().contains(needle_lower)
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectFilter {
    pub search_term: String,
    pub status: Option<ProjectStatus>,
    pub risk: Option<RiskStatus>,
}

impl ProjectFilter {
    pub fn matches(&self, project: &Project) -> bool {
        let term = self.search_term.to_lowercase();
        let text = contains_ci(&project.name, &term) || contains_ci(&project.client, &term);
        let status = self
            .status
            .map_or(true, |s| get_project_status(project.progress) == s);
        let risk = self
            .risk
            .map_or(true, |r| get_project_risk(project.risk_capture_score) == r);
        text && status && risk
    }
}

pub fn filter_projects<'a>(projects: &'a [Project], filter: &ProjectFilter) -> Vec<&'a Project> {
    projects.iter().filter(|p| filter.matches(p)).collect()
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmissionFilter {
    pub search_term: String,
    pub status: Option<VerificationStatus>,
    pub kind: Option<SubmissionKind>,
}

impl SubmissionFilter {
    pub fn matches(&self, submission: &Submission) -> bool {
        let term = self.search_term.to_lowercase();
        let text = contains_ci(&submission.project_name, &term)
            || contains_ci(&submission.submitted_by, &term);
        text && self.status.map_or(true, |s| submission.status == s)
            && self.kind.map_or(true, |k| submission.kind == k)
    }
}

pub fn filter_submissions<'a>(
    submissions: &'a [Submission],
    filter: &SubmissionFilter,
) -> Vec<&'a Submission> {
    submissions.iter().filter(|s| filter.matches(s)).collect()
}

/// Single-slot cache: recomputes only when the key differs from the last one.
#[derive(Debug)]
pub struct Memo<K, V> {
    key: Option<K>,
    value: Option<V>,
    recomputations: usize,
}

impl<K, V> Default for Memo<K, V> {
    fn default() -> Self {
        Memo {
            key: None,
            value: None,
            recomputations: 0,
        }
    }
}

impl<K: PartialEq + Clone, V> Memo<K, V> {
    pub fn get_or_compute<F>(&mut self, key: &K, compute: F) -> &V
    where
        F: FnOnce() -> V,
    {
        if self.key.as_ref() != Some(key) {
            self.key = Some(key.clone());
            self.value = None;
        }
        if self.value.is_none() {
            self.recomputations += 1;
        }
        self.value.get_or_insert_with(compute)
    }

    pub fn recomputations(&self) -> usize {
        self.recomputations
    }
}

/// The project list page: owned data plus a memoized filtered view.
#[derive(Debug, Default)]
pub struct ProjectList {
    projects: Vec<Project>,
    generation: u64,
    memo: Memo<(u64, ProjectFilter), Vec<usize>>,
}

impl ProjectList {
    pub fn new(projects: Vec<Project>) -> Self {
        ProjectList {
            projects,
            ..Default::default()
        }
    }

    pub fn set_projects(&mut self, projects: Vec<Project>) {
        self.projects = projects;
        self.generation += 1;
    }

    pub fn all(&self) -> &[Project] {
        &self.projects
    }

    pub fn filtered(&mut self, filter: &ProjectFilter) -> Vec<&Project> {
        let projects = &self.projects;
        let key = (self.generation, filter.clone());
        let indices = self.memo.get_or_compute(&key, || {
            projects
                .iter()
                .enumerate()
                .filter(|(_, p)| filter.matches(p))
                .map(|(i, _)| i)
                .collect()
        });
        indices.iter().map(|&i| &projects[i]).collect()
    }

    pub fn recomputations(&self) -> usize {
        self.memo.recomputations()
    }
}

/// Holds back a value until `delay` has passed without a newer one.
#[derive(Debug)]
pub struct Debouncer<T> {
    delay: Duration,
    pending: Option<(T, Instant)>,
}

impl<T> Debouncer<T> {
    pub fn new(delay: Duration) -> Self {
        Debouncer {
            delay,
            pending: None,
        }
    }

    pub fn push(&mut self, value: T, now: Instant) {
        self.pending = Some((value, now + self.delay));
    }

    /// Releases the pending value once its deadline has passed.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        match &self.pending {
            Some((_, deadline)) if *deadline <= now => self.pending.take().map(|(v, _)| v),
            _ => None,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Drops any pending value, as when the search box goes away.
    pub fn cancel(&mut self) {
        self.pending = None;
    }
}

impl<T> Default for Debouncer<T> {
    fn default() -> Self {
        Debouncer::new(DEFAULT_DEBOUNCE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime};

    fn project(name: &str, client: &str, progress: f64, score: Option<f64>) -> Project {
        let d = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        Project {
            id: name.to_lowercase(),
            name: name.to_string(),
            client: client.to_string(),
            budget: 1000.0,
            spent: 100.0,
            progress,
            start_date: d,
            end_date: d,
            province: "Bali".into(),
            category: "Infrastruktur".into(),
            readiness_status: None,
            readiness_score: None,
            risk_capture_status: None,
            risk_capture_score: score,
        }
    }

    fn sample() -> Vec<Project> {
        vec![
            project("Jalan Tol Trans", "PT Jasa Marga", 45.0, Some(85.0)),
            project("Bendungan Utara", "Kementerian PUPR", 100.0, Some(65.0)),
            project("Gedung Arsip", "Pemprov Bali", 0.0, None),
        ]
    }

    #[test]
    fn test_search_matches_name_or_client_case_insensitive() {
        let data = sample();
        let filter = ProjectFilter {
            search_term: "JASA".into(),
            ..Default::default()
        };
        let out = filter_projects(&data, &filter);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].name, "Jalan Tol Trans");

        let filter = ProjectFilter {
            search_term: "bendungan".into(),
            ..Default::default()
        };
        assert_eq!(filter_projects(&data, &filter)[0].client, "Kementerian PUPR");
    }

    #[test]
    fn test_search_term_is_not_trimmed() {
        let data = sample();
        let filter = ProjectFilter {
            search_term: "a ".into(),
            ..Default::default()
        };
        let names: Vec<&str> = filter_projects(&data, &filter)
            .into_iter()
            .map(|p| p.name.as_str())
            .collect();
        assert_eq!(names, vec!["Jalan Tol Trans"]);

        let filter = ProjectFilter {
            search_term: "   ".into(),
            ..Default::default()
        };
        assert!(filter_projects(&data, &filter).is_empty());

        let filter = ProjectFilter::default();
        assert_eq!(filter_projects(&data, &filter).len(), 3);
    }

    #[test]
    fn test_filters_combine_with_and() {
        let data = sample();
        let filter = ProjectFilter {
            search_term: String::new(),
            status: Some(ProjectStatus::Completed),
            risk: Some(RiskStatus::Medium),
        };
        assert_eq!(filter_projects(&data, &filter).len(), 1);
        let filter = ProjectFilter {
            risk: Some(RiskStatus::Low),
            status: Some(ProjectStatus::Planning),
            ..Default::default()
        };
        assert!(filter_projects(&data, &filter).is_empty());
        let filter = ProjectFilter {
            risk: Some(RiskStatus::NotAssessed),
            ..Default::default()
        };
        assert_eq!(filter_projects(&data, &filter)[0].name, "Gedung Arsip");
    }

    #[test]
    fn test_project_list_memoizes_until_inputs_change() {
        let mut list = ProjectList::new(sample());
        let filter = ProjectFilter {
            search_term: "a".into(),
            ..Default::default()
        };
        assert_eq!(list.filtered(&filter).len(), 3);
        assert_eq!(list.filtered(&filter).len(), 3);
        assert_eq!(list.recomputations(), 1);

        let narrower = ProjectFilter {
            search_term: "arsip".into(),
            ..Default::default()
        };
        assert_eq!(list.filtered(&narrower).len(), 1);
        assert_eq!(list.recomputations(), 2);

        list.set_projects(sample().into_iter().take(1).collect());
        assert!(list.filtered(&narrower).is_empty());
        assert_eq!(list.recomputations(), 3);
    }

    #[test]
    fn test_submission_filter() {
        let at =
            NaiveDateTime::parse_from_str("2024-05-01 09:00:00", "%Y-%m-%d %H:%M:%S").unwrap();
        let sub = |name: &str, status| Submission {
            id: name.into(),
            project_id: "p".into(),
            project_name: name.into(),
            kind: SubmissionKind::Readiness,
            submitted_by: "Sari".into(),
            submitted_at: at,
            status,
            readiness_items: vec![],
            risk_items: vec![],
            verifier: None,
        };
        let subs = vec![
            sub("Jalan Tol", VerificationStatus::Submitted),
            sub("Bendungan", VerificationStatus::Verified),
        ];
        let filter = SubmissionFilter {
            status: Some(VerificationStatus::Verified),
            ..Default::default()
        };
        assert_eq!(filter_submissions(&subs, &filter)[0].project_name, "Bendungan");
        let filter = SubmissionFilter {
            search_term: "sari".into(),
            ..Default::default()
        };
        assert_eq!(filter_submissions(&subs, &filter).len(), 2);
        let filter = SubmissionFilter {
            search_term: "sari ".into(),
            ..Default::default()
        };
        assert!(filter_submissions(&subs, &filter).is_empty());
        let filter = SubmissionFilter {
            kind: Some(SubmissionKind::RiskCapture),
            ..Default::default()
        };
        assert!(filter_submissions(&subs, &filter).is_empty());
    }

    #[test]
    fn test_debouncer_releases_after_quiet_period() {
        let start = Instant::now();
        let mut d = Debouncer::default();
        d.push("ja".to_string(), start);
        d.push("jal".to_string(), start + Duration::from_millis(200));
        assert_eq!(d.poll(start + Duration::from_millis(400)), None);
        assert_eq!(d.poll(start + Duration::from_millis(500)), Some("jal".to_string()));
        assert!(!d.is_pending());
    }

    #[test]
    fn test_debouncer_cancel_drops_pending() {
        let start = Instant::now();
        let mut d = Debouncer::new(Duration::from_millis(50));
        d.push(1, start);
        d.cancel();
        assert_eq!(d.poll(start + Duration::from_secs(1)), None);
    }
}
