//! End-to-end checks against the bundled fixtures.

use risk_dashboard::aggregates::{DashboardSummary, ProjectSummary};
use risk_dashboard::filter::{filter_projects, filter_submissions, ProjectFilter, SubmissionFilter};
use risk_dashboard::period::{MetricDomain, PeriodSelection};
use risk_dashboard::repository::{load_all, DashboardData, FixtureRepository, InMemoryRepository};
use risk_dashboard::status::{ProjectStatus, RiskLevel, VerificationStatus};
use risk_dashboard::workflow::pending_queue;
use risk_dashboard::DashboardRepository;
use std::path::Path;

fn fixtures() -> DashboardData {
    let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures");
    load_all(&FixtureRepository::new(dir)).unwrap()
}

#[test]
fn test_fixtures_load_completely() {
    let data = fixtures();
    assert_eq!(data.projects.len(), 5);
    assert_eq!(data.submissions.len(), 3);
    assert_eq!(data.master.provinces.len(), 5);
    assert_eq!(data.catalog.performance.len(), 5);
    assert_eq!(
        data.master.province("bali").and_then(|p| p.capital.as_deref()),
        Some("Denpasar")
    );
    assert_eq!(data.master.taxonomy_children(Some("R")).len(), 3);
    assert_eq!(data.master.taxonomy_children(None).len(), 2);
    assert_eq!(
        data.master.client("pt pelindo").and_then(|c| c.email.as_deref()),
        Some("cs@pelindo.co.id")
    );
}

#[test]
fn test_complete_year_selected() {
    let data = fixtures();
    let best = data.catalog.detect_best_performance_period(2024).unwrap();
    assert_eq!(best.id, "2024");
    assert_eq!(best.label, "Tahun 2024");
}

#[test]
fn test_selection_for_partial_year() {
    let data = fixtures();
    let selection = PeriodSelection::detect(&data.catalog, 2025);
    assert_eq!(selection.get(MetricDomain::Performance), Some("q2-2025"));
    assert_eq!(selection.get(MetricDomain::Risk), Some("q2-2025"));
    assert_eq!(selection.get(MetricDomain::Geographic), Some("2024"));
    assert_eq!(selection.get(MetricDomain::Invoicing), Some("2024"));

    let later = PeriodSelection::detect(&data.catalog, 2026);
    assert_eq!(later.get(MetricDomain::Performance), Some("2025"));
    assert_eq!(later.get(MetricDomain::RiskCapture), Some("2024"));
}

#[test]
fn test_summary_for_2024() {
    let data = fixtures();
    let selection = PeriodSelection::detect(&data.catalog, 2024);
    let summary = DashboardSummary::build(&data.catalog, &selection);

    assert_eq!(summary.projects.total, 100);
    assert_eq!(summary.projects.running, 65);
    assert_eq!(summary.projects.completed, 35);
    assert_eq!(summary.risk.total, 40);
    assert!((summary.risk.overdue_pct - 20.0).abs() < 1e-9);
    assert!((summary.invoices.paid_pct - 75.0).abs() < 1e-9);
    assert!((summary.risk_capture.verified_pct - 75.0).abs() < 1e-9);
    assert_eq!(summary.aging.total_invoices, 25);
    assert_eq!(summary.geographic.total_projects, 30);
    assert_eq!(summary.geographic.provinces[0].province, "Jawa Barat");
    assert!(summary
        .insights
        .iter()
        .any(|line| line.contains("Keuangan") && line.contains("5 item")));
}

#[test]
fn test_period_override_changes_summary() {
    let data = fixtures();
    let mut selection = PeriodSelection::detect(&data.catalog, 2024);
    assert!(selection.select(&data.catalog, MetricDomain::Invoicing, "q4-2024"));
    let summary = DashboardSummary::build(&data.catalog, &selection);
    assert!((summary.invoices.total - 3_000_000_000.0).abs() < 1.0);
}

#[test]
fn test_actual_project_status_counts() {
    let data = fixtures();
    let summary = ProjectSummary::from_projects(&data.projects);
    assert_eq!((summary.running, summary.completed, summary.planning), (3, 1, 1));
}

#[test]
fn test_project_search_and_status_filter() {
    let data = fixtures();
    let filter = ProjectFilter {
        search_term: "pupr".into(),
        ..Default::default()
    };
    let names: Vec<&str> = filter_projects(&data.projects, &filter)
        .into_iter()
        .map(|p| p.name.as_str())
        .collect();
    assert_eq!(names, vec!["Bendungan Karian", "Jembatan Suramadu II"]);

    let filter = ProjectFilter {
        search_term: "pupr".into(),
        status: Some(ProjectStatus::Completed),
        ..Default::default()
    };
    assert_eq!(filter_projects(&data.projects, &filter).len(), 1);
}

#[test]
fn test_verification_queue() {
    let data = fixtures();
    let sub = &data.submissions[0];
    assert_eq!(sub.risk_items[0].current_level().label(), "Sedang");
    assert_eq!(sub.highest_risk(), Some(RiskLevel::High));
    assert_eq!(data.submissions[1].highest_risk(), Some(RiskLevel::Low));

    let queue: Vec<&str> = pending_queue(&data.submissions)
        .into_iter()
        .map(|s| s.id.as_str())
        .collect();
    assert_eq!(queue, vec!["SUB-002", "SUB-001"]);

    let filter = SubmissionFilter {
        status: Some(VerificationStatus::Verified),
        ..Default::default()
    };
    let verified = filter_submissions(&data.submissions, &filter);
    assert_eq!(verified.len(), 1);
    assert_eq!(verified[0].verifier.as_ref().map(|v| v.name.as_str()), Some("Rina Kusuma"));
}

#[test]
fn test_in_memory_repository_matches_fixtures() {
    let data = fixtures();
    let repo = InMemoryRepository { data: data.clone() };
    assert_eq!(repo.projects().unwrap(), data.projects);
    assert_eq!(repo.period_catalog().unwrap(), data.catalog);
}
