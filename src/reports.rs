use crate::status::{get_project_risk, get_project_status, ReadinessStatus};
use crate::types::{Project, ProjectRow, Submission, SubmissionRow};
use crate::util::{format_currency, format_number};

pub fn generate_project_rows(projects: &[&Project]) -> Vec<ProjectRow> {
    projects
        .iter()
        .map(|p| ProjectRow {
            name: p.name.clone(),
            client: p.client.clone(),
            province: p.province.clone(),
            budget: format_currency(p.budget),
            progress: format!("{}%", format_number(p.progress, 0)),
            status: get_project_status(p.progress).badge().label.to_string(),
            risk: get_project_risk(p.risk_capture_score).badge().label.to_string(),
        })
        .collect()
}

pub fn generate_submission_rows(submissions: &[&Submission]) -> Vec<SubmissionRow> {
    submissions
        .iter()
        .map(|s| SubmissionRow {
            project: s.project_name.clone(),
            kind: s.kind.label().to_string(),
            submitted_by: s.submitted_by.clone(),
            status: s.status.badge().label.to_string(),
            highest_risk: s
                .highest_risk()
                .map(|l| l.label().to_string())
                .unwrap_or_else(|| "-".to_string()),
        })
        .collect()
}

/// Readiness label for every project, in input order.
pub fn readiness_labels(projects: &[Project]) -> Vec<(&str, &'static str)> {
    projects
        .iter()
        .map(|p| {
            (
                p.name.as_str(),
                ReadinessStatus::resolve(p.readiness_status).badge().label,
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_project_row_labels() {
        let d = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let p = Project {
            id: "p1".into(),
            name: "Bendungan".into(),
            client: "PUPR".into(),
            budget: 2_000_000.0,
            spent: 0.0,
            progress: 100.0,
            start_date: d,
            end_date: d,
            province: "Bali".into(),
            category: "Air".into(),
            readiness_status: None,
            readiness_score: None,
            risk_capture_status: None,
            risk_capture_score: Some(82.0),
        };
        let rows = generate_project_rows(&[&p]);
        assert_eq!(rows[0].status, "Selesai");
        assert_eq!(rows[0].risk, "Risiko Rendah");
        assert_eq!(rows[0].budget, "Rp 2,000,000");
        assert_eq!(readiness_labels(&[p])[0].1, "Belum Diisi");
    }
}
