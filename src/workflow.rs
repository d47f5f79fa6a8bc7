//! Verification workflow for readiness and risk-capture submissions.
//!
//! Status changes are not validated: a verifier may move a submission from
//! any status to any other.

use crate::status::VerificationStatus;
use crate::types::{Submission, VerifierInfo};
use chrono::NaiveDateTime;
use std::collections::BTreeMap;

impl Submission {
    pub fn set_status(&mut self, status: VerificationStatus) {
        log::info!(
            "submission {}: {} -> {}",
            self.id,
            self.status.as_str(),
            status.as_str()
        );
        self.status = status;
    }

    pub fn start_review(&mut self) {
        self.set_status(VerificationStatus::UnderReview);
    }

    pub fn verify(&mut self, verifier: &str, comment: Option<&str>, at: NaiveDateTime) {
        self.set_status(VerificationStatus::Verified);
        self.verifier = Some(VerifierInfo {
            name: verifier.to_string(),
            comment: comment.map(str::to_string),
            verified_at: at,
        });
    }

    pub fn request_revision(&mut self, verifier: &str, comment: &str, at: NaiveDateTime) {
        self.set_status(VerificationStatus::NeedsRevision);
        self.verifier = Some(VerifierInfo {
            name: verifier.to_string(),
            comment: Some(comment.to_string()),
            verified_at: at,
        });
    }
}

/// Queue size per status; statuses with no submissions are reported as zero.
pub fn status_counts(submissions: &[Submission]) -> BTreeMap<&'static str, usize> {
    let mut counts: BTreeMap<&'static str, usize> = VerificationStatus::ALL
        .iter()
        .map(|s| (s.as_str(), 0))
        .collect();
    for s in submissions {
        *counts.entry(s.status.as_str()).or_insert(0) += 1;
    }
    counts
}

/// Submissions a verifier still has to act on, oldest first.
pub fn pending_queue(submissions: &[Submission]) -> Vec<&Submission> {
    let mut queue: Vec<&Submission> = submissions
        .iter()
        .filter(|s| {
            matches!(
                s.status,
                VerificationStatus::Submitted | VerificationStatus::UnderReview
            )
        })
        .collect();
    queue.sort_by_key(|s| s.submitted_at);
    queue
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SubmissionKind;

    fn at(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M").unwrap()
    }

    fn submission(id: &str, status: VerificationStatus, submitted: &str) -> Submission {
        Submission {
            id: id.into(),
            project_id: "p-1".into(),
            project_name: "Jalan Tol".into(),
            kind: SubmissionKind::RiskCapture,
            submitted_by: "Budi".into(),
            submitted_at: at(submitted),
            status,
            readiness_items: vec![],
            risk_items: vec![],
            verifier: None,
        }
    }

    #[test]
    fn test_verify_records_verifier() {
        let mut s = submission("s1", VerificationStatus::UnderReview, "2024-05-01 08:00");
        s.verify("Risk Officer", Some("Lengkap"), at("2024-05-02 10:30"));
        assert_eq!(s.status, VerificationStatus::Verified);
        let v = s.verifier.unwrap();
        assert_eq!(v.name, "Risk Officer");
        assert_eq!(v.comment.as_deref(), Some("Lengkap"));
    }

    #[test]
    fn test_any_transition_is_allowed() {
        let mut s = submission("s1", VerificationStatus::Verified, "2024-05-01 08:00");
        s.set_status(VerificationStatus::Submitted);
        assert_eq!(s.status, VerificationStatus::Submitted);
        s.start_review();
        assert_eq!(s.status, VerificationStatus::UnderReview);
        s.request_revision("Risk Officer", "Lampiran kurang", at("2024-05-03 09:00"));
        assert_eq!(s.status, VerificationStatus::NeedsRevision);
    }

    #[test]
    fn test_queue_counts_and_order() {
        let subs = vec![
            submission("late", VerificationStatus::Submitted, "2024-06-01 08:00"),
            submission("done", VerificationStatus::Verified, "2024-01-01 08:00"),
            submission("early", VerificationStatus::UnderReview, "2024-02-01 08:00"),
        ];
        let counts = status_counts(&subs);
        assert_eq!(counts["submitted"], 1);
        assert_eq!(counts["needs_revision"], 0);
        let ids: Vec<&str> = pending_queue(&subs).into_iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["early", "late"]);
    }
}
