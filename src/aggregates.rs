use crate::period::{MetricDomain, PeriodCatalog, PeriodSelection};
use crate::status::{get_project_status, ProjectStatus};
use crate::types::{
    AgingBucket, AgingRow, InvoiceStatus, MonthlyPerformance, Period, Project, ProvinceRow,
    ProvinceStat, RiskCaptureStat, RiskCategoryStat,
};
use crate::util::{format_currency, format_number};
use serde::Serialize;
use std::collections::BTreeMap;

/// Share of projects reported as running when only monthly totals are known.
pub const RUNNING_RATIO: f64 = 0.65;

/// `part / whole` as a percentage; zero when there is nothing to divide by.
pub fn percentage(part: f64, whole: f64) -> f64 {
    if whole == 0.0 || !whole.is_finite() {
        return 0.0;
    }
    part / whole * 100.0
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProjectSummary {
    pub total: u32,
    pub running: u32,
    pub completed: u32,
    pub planning: u32,
}

impl ProjectSummary {
    /// Monthly performance only carries totals, so the running/completed split
    /// is the fixed [`RUNNING_RATIO`] estimate.
    pub fn from_performance(data: &[MonthlyPerformance]) -> Self {
        let total: u32 = data.iter().map(|m| m.total_projects).sum();
        let running = ((total as f64) * RUNNING_RATIO).round() as u32;
        ProjectSummary {
            total,
            running,
            completed: total - running,
            planning: 0,
        }
    }

    /// Exact counts derived from each project's progress.
    pub fn from_projects(projects: &[Project]) -> Self {
        let mut summary = ProjectSummary::default();
        for p in projects {
            summary.total += 1;
            match get_project_status(p.progress) {
                ProjectStatus::Running => summary.running += 1,
                ProjectStatus::Completed => summary.completed += 1,
                ProjectStatus::Planning => summary.planning += 1,
            }
        }
        summary
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BudgetSummary {
    pub target: f64,
    pub realized: f64,
    pub absorption_pct: f64,
}

impl BudgetSummary {
    pub fn from_performance(data: &[MonthlyPerformance]) -> Self {
        let target: f64 = data.iter().map(|m| m.target_budget).sum();
        let realized: f64 = data.iter().map(|m| m.realized_budget).sum();
        BudgetSummary {
            target,
            realized,
            absorption_pct: percentage(realized, target),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RiskSummary {
    pub total: u32,
    pub overdue: u32,
    pub closed: u32,
    pub open: u32,
    pub overdue_pct: f64,
    pub closed_pct: f64,
}

impl RiskSummary {
    pub fn from_categories(data: &[RiskCategoryStat]) -> Self {
        let (total, overdue, closed) = data.iter().fold((0u32, 0u32, 0u32), |acc, c| {
            (acc.0 + c.total, acc.1 + c.overdue, acc.2 + c.closed)
        });
        RiskSummary {
            total,
            overdue,
            closed,
            open: total.saturating_sub(closed),
            overdue_pct: percentage(overdue as f64, total as f64),
            closed_pct: percentage(closed as f64, total as f64),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RiskCaptureSummary {
    pub captured: u32,
    pub verified: u32,
    pub pending: u32,
    pub verified_pct: f64,
}

impl RiskCaptureSummary {
    pub fn from_units(data: &[RiskCaptureStat]) -> Self {
        let mut s = RiskCaptureSummary::default();
        for u in data {
            s.captured += u.captured;
            s.verified += u.verified;
            s.pending += u.pending;
        }
        s.verified_pct = percentage(s.verified as f64, s.captured as f64);
        s
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct InvoiceSummary {
    pub total: f64,
    pub paid_pct: f64,
    pub unpaid_pct: f64,
    pub overdue_pct: f64,
}

impl InvoiceSummary {
    pub fn from_status(status: &InvoiceStatus) -> Self {
        let total = status.paid + status.unpaid + status.overdue;
        InvoiceSummary {
            total,
            paid_pct: percentage(status.paid, total),
            unpaid_pct: percentage(status.unpaid, total),
            overdue_pct: percentage(status.overdue, total),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AgingSummary {
    pub total_amount: f64,
    pub total_invoices: u32,
    pub buckets: Vec<AgingBucket>,
}

impl AgingSummary {
    pub fn from_buckets(data: &[AgingBucket]) -> Self {
        AgingSummary {
            total_amount: data.iter().map(|b| b.amount).sum(),
            total_invoices: data.iter().map(|b| b.invoices).sum(),
            buckets: data.to_vec(),
        }
    }

    pub fn share(&self, bucket: &AgingBucket) -> f64 {
        percentage(bucket.amount, self.total_amount)
    }

    pub fn rows(&self) -> Vec<AgingRow> {
        self.buckets
            .iter()
            .map(|b| AgingRow {
                range: b.range.clone(),
                invoices: b.invoices,
                amount: format_currency(b.amount),
                share: format!("{}%", format_number(self.share(b), 1)),
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProvinceTotals {
    pub province: String,
    pub projects: u32,
    pub budget: f64,
    pub avg_budget: f64,
    pub avg_progress: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GeographicSummary {
    pub total_projects: u32,
    pub total_budget: f64,
    pub avg_progress: f64,
    /// Sorted by budget, largest first.
    pub provinces: Vec<ProvinceTotals>,
}

impl GeographicSummary {
    pub fn from_provinces(data: &[ProvinceStat]) -> Self {
        #[derive(Default)]
        struct Acc {
            projects: u32,
            budget: f64,
            weighted_progress: f64,
        }

        let mut map: BTreeMap<&str, Acc> = BTreeMap::new();
        for s in data {
            let e = map.entry(s.province.as_str()).or_default();
            e.projects += s.projects;
            e.budget += s.budget;
            e.weighted_progress += s.average_progress * s.projects as f64;
        }

        let mut provinces: Vec<ProvinceTotals> = map
            .into_iter()
            .map(|(province, acc)| ProvinceTotals {
                province: province.to_string(),
                projects: acc.projects,
                budget: acc.budget,
                avg_budget: ratio(acc.budget, acc.projects as f64),
                avg_progress: ratio(acc.weighted_progress, acc.projects as f64),
            })
            .collect();
        provinces.sort_by(|a, b| {
            b.budget
                .partial_cmp(&a.budget)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        let total_projects: u32 = provinces.iter().map(|p| p.projects).sum();
        let total_budget: f64 = provinces.iter().map(|p| p.budget).sum();
        let weighted: f64 = provinces
            .iter()
            .map(|p| p.avg_progress * p.projects as f64)
            .sum();
        GeographicSummary {
            total_projects,
            total_budget,
            avg_progress: ratio(weighted, total_projects as f64),
            provinces,
        }
    }

    pub fn rows(&self) -> Vec<ProvinceRow> {
        self.provinces
            .iter()
            .map(|p| ProvinceRow {
                province: p.province.clone(),
                projects: p.projects,
                total_budget: format_currency(p.budget),
                avg_budget: format_currency(p.avg_budget),
                avg_progress: format!("{}%", format_number(p.avg_progress, 1)),
            })
            .collect()
    }
}

fn ratio(num: f64, den: f64) -> f64 {
    if den == 0.0 {
        0.0
    } else {
        num / den
    }
}

/// Everything the dashboard landing page shows for one period selection.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DashboardSummary {
    pub periods: BTreeMap<MetricDomain, String>,
    pub projects: ProjectSummary,
    pub budget: BudgetSummary,
    pub risk: RiskSummary,
    pub risk_capture: RiskCaptureSummary,
    pub invoices: InvoiceSummary,
    pub aging: AgingSummary,
    pub geographic: GeographicSummary,
    pub insights: Vec<String>,
}

fn find<'a, T>(periods: &'a [Period<T>], id: Option<&str>) -> Option<&'a Period<T>> {
    id.and_then(|id| periods.iter().find(|p| p.id == id))
}

impl DashboardSummary {
    pub fn build(catalog: &PeriodCatalog, selection: &PeriodSelection) -> Self {
        let mut summary = DashboardSummary::default();

        if let Some(p) = find(&catalog.performance, selection.get(MetricDomain::Performance)) {
            summary.projects = ProjectSummary::from_performance(&p.data);
            summary.budget = BudgetSummary::from_performance(&p.data);
        }
        if let Some(p) = find(&catalog.risk, selection.get(MetricDomain::Risk)) {
            summary.risk = RiskSummary::from_categories(&p.data);
        }
        if let Some(p) = find(&catalog.risk_capture, selection.get(MetricDomain::RiskCapture)) {
            summary.risk_capture = RiskCaptureSummary::from_units(&p.data);
        }
        if let Some(p) = find(&catalog.invoicing, selection.get(MetricDomain::Invoicing)) {
            summary.invoices = InvoiceSummary::from_status(&p.data);
        }
        if let Some(p) = find(&catalog.aging, selection.get(MetricDomain::Aging)) {
            summary.aging = AgingSummary::from_buckets(&p.data);
        }
        if let Some(p) = find(&catalog.geographic, selection.get(MetricDomain::Geographic)) {
            summary.geographic = GeographicSummary::from_provinces(&p.data);
        }

        summary.periods = MetricDomain::ALL
            .into_iter()
            .filter_map(|d| selection.get(d).map(|id| (d, id.to_string())))
            .collect();

        let risk_data = find(&catalog.risk, selection.get(MetricDomain::Risk))
            .map(|p| p.data.as_slice())
            .unwrap_or(&[]);
        summary.insights = insights(&summary, risk_data);
        summary
    }
}

/// Short highlights shown under the dashboard charts.
pub fn insights(summary: &DashboardSummary, risk: &[RiskCategoryStat]) -> Vec<String> {
    let mut out = Vec::new();

    if let Some(top) = summary.geographic.provinces.first() {
        out.push(format!(
            "{} memiliki anggaran terbesar ({}, {}% dari total)",
            top.province,
            format_currency(top.budget),
            format_number(percentage(top.budget, summary.geographic.total_budget), 1)
        ));
    }

    if let Some(worst) = risk
        .iter()
        .filter(|c| c.overdue > 0)
        .max_by_key(|c| c.overdue)
    {
        out.push(format!(
            "Kategori risiko {} memiliki {} item terlambat",
            worst.category, worst.overdue
        ));
    }

    if let Some(oldest) = summary.aging.buckets.last() {
        let share = summary.aging.share(oldest);
        if share > 0.0 {
            out.push(format!(
                "Piutang {} mencakup {}% dari total piutang",
                oldest.range,
                format_number(share, 1)
            ));
        }
    }

    if summary.budget.target > 0.0 {
        out.push(format!(
            "Penyerapan anggaran {}%",
            format_number(summary.budget.absorption_pct, 1)
        ));
    }

    out
}
