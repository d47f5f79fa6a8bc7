//! Reporting period catalog and the "best period" selector used to pick the
//! initial period of every dashboard chart.

use crate::types::{
    AgingBucket, InvoiceStatus, MonthlyPerformance, Period, PeriodKind, ProvinceStat,
    RiskCaptureStat, RiskCategoryStat,
};
use chrono::{Datelike, Local};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MetricDomain {
    Performance,
    Risk,
    Geographic,
    RiskCapture,
    Invoicing,
    Aging,
}

impl MetricDomain {
    pub const ALL: [MetricDomain; 6] = [
        MetricDomain::Performance,
        MetricDomain::Risk,
        MetricDomain::Geographic,
        MetricDomain::RiskCapture,
        MetricDomain::Invoicing,
        MetricDomain::Aging,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MetricDomain::Performance => "performance",
            MetricDomain::Risk => "risk",
            MetricDomain::Geographic => "geographic",
            MetricDomain::RiskCapture => "risk-capture",
            MetricDomain::Invoicing => "invoicing",
            MetricDomain::Aging => "aging",
        }
    }
}

impl fmt::Display for MetricDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for MetricDomain {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MetricDomain::ALL
            .into_iter()
            .find(|d| d.as_str() == s.trim().to_ascii_lowercase())
            .ok_or_else(|| format!("unknown metric domain '{}'", s))
    }
}

/// Every period list the dashboard reads from, one per metric domain.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PeriodCatalog {
    pub performance: Vec<Period<Vec<MonthlyPerformance>>>,
    pub risk: Vec<Period<Vec<RiskCategoryStat>>>,
    pub geographic: Vec<Period<Vec<ProvinceStat>>>,
    pub risk_capture: Vec<Period<Vec<RiskCaptureStat>>>,
    pub invoicing: Vec<Period<InvoiceStatus>>,
    pub aging: Vec<Period<Vec<AgingBucket>>>,
}

/// Quarter number embedded in ids such as `q4-2024` or `2024-Q4`.
fn quarter_number(id: &str) -> Option<u8> {
    let lower = id.to_ascii_lowercase();
    let pos = lower.find('q')?;
    lower[pos + 1..]
        .chars()
        .next()
        .and_then(|c| c.to_digit(10))
        .map(|d| d as u8)
}

/// Picks the most relevant period for `current_year`:
///
/// 1. the complete yearly period for the current year,
/// 2. else the latest quarter whose id mentions the current year,
/// 3. else the yearly period of the previous year,
/// 4. else the first entry.
///
/// Returns `None` only for an empty catalog.
pub fn detect_best_period<T>(catalog: &[Period<T>], current_year: i32) -> Option<&Period<T>> {
    let year = current_year.to_string();

    if let Some(p) = catalog
        .iter()
        .find(|p| p.kind == PeriodKind::Yearly && p.id == year && p.is_complete)
    {
        return Some(p);
    }

    let latest_quarter = catalog
        .iter()
        .filter(|p| p.kind == PeriodKind::Quarterly && p.id.contains(&year))
        .max_by(|a, b| {
            quarter_number(&a.id)
                .cmp(&quarter_number(&b.id))
                .then_with(|| a.id.cmp(&b.id))
        });
    if latest_quarter.is_some() {
        return latest_quarter;
    }

    let previous = (current_year - 1).to_string();
    if let Some(p) = catalog
        .iter()
        .find(|p| p.kind == PeriodKind::Yearly && p.id == previous)
    {
        return Some(p);
    }

    catalog.first()
}

pub fn current_year() -> i32 {
    Local::now().year()
}

/// [`detect_best_period`] for the year on the local clock.
pub fn detect_best_period_now<T>(catalog: &[Period<T>]) -> Option<&Period<T>> {
    detect_best_period(catalog, current_year())
}

/// Explicit choice when the id exists, otherwise the detected default.
pub fn select_period<'a, T>(
    catalog: &'a [Period<T>],
    id: Option<&str>,
    current_year: i32,
) -> Option<&'a Period<T>> {
    id.and_then(|id| catalog.iter().find(|p| p.id == id))
        .or_else(|| detect_best_period(catalog, current_year))
}

impl PeriodCatalog {
    pub fn detect_best_performance_period(
        &self,
        year: i32,
    ) -> Option<&Period<Vec<MonthlyPerformance>>> {
        detect_best_period(&self.performance, year)
    }

    pub fn detect_best_risk_period(&self, year: i32) -> Option<&Period<Vec<RiskCategoryStat>>> {
        detect_best_period(&self.risk, year)
    }

    pub fn detect_best_geographic_period(&self, year: i32) -> Option<&Period<Vec<ProvinceStat>>> {
        detect_best_period(&self.geographic, year)
    }

    pub fn detect_best_risk_capture_period(
        &self,
        year: i32,
    ) -> Option<&Period<Vec<RiskCaptureStat>>> {
        detect_best_period(&self.risk_capture, year)
    }

    pub fn detect_best_invoicing_period(&self, year: i32) -> Option<&Period<InvoiceStatus>> {
        detect_best_period(&self.invoicing, year)
    }

    pub fn detect_best_aging_period(&self, year: i32) -> Option<&Period<Vec<AgingBucket>>> {
        detect_best_period(&self.aging, year)
    }

    /// `(id, label)` pairs of a domain, in catalog order, for dropdowns.
    pub fn options(&self, domain: MetricDomain) -> Vec<(&str, &str)> {
        fn pairs<T>(periods: &[Period<T>]) -> Vec<(&str, &str)> {
            periods
                .iter()
                .map(|p| (p.id.as_str(), p.label.as_str()))
                .collect()
        }
        match domain {
            MetricDomain::Performance => pairs(&self.performance),
            MetricDomain::Risk => pairs(&self.risk),
            MetricDomain::Geographic => pairs(&self.geographic),
            MetricDomain::RiskCapture => pairs(&self.risk_capture),
            MetricDomain::Invoicing => pairs(&self.invoicing),
            MetricDomain::Aging => pairs(&self.aging),
        }
    }

    fn detected_id(&self, domain: MetricDomain, year: i32) -> Option<String> {
        fn id_of<T>(p: Option<&Period<T>>) -> Option<String> {
            p.map(|p| p.id.clone())
        }
        match domain {
            MetricDomain::Performance => id_of(self.detect_best_performance_period(year)),
            MetricDomain::Risk => id_of(self.detect_best_risk_period(year)),
            MetricDomain::Geographic => id_of(self.detect_best_geographic_period(year)),
            MetricDomain::RiskCapture => id_of(self.detect_best_risk_capture_period(year)),
            MetricDomain::Invoicing => id_of(self.detect_best_invoicing_period(year)),
            MetricDomain::Aging => id_of(self.detect_best_aging_period(year)),
        }
    }
}

/// The period id currently shown for each domain.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PeriodSelection {
    year: i32,
    ids: BTreeMap<MetricDomain, String>,
}

impl PeriodSelection {
    /// Initial selection, as computed once when the dashboard mounts.
    pub fn detect(catalog: &PeriodCatalog, year: i32) -> Self {
        let ids = MetricDomain::ALL
            .into_iter()
            .filter_map(|d| catalog.detected_id(d, year).map(|id| (d, id)))
            .collect();
        PeriodSelection { year, ids }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn get(&self, domain: MetricDomain) -> Option<&str> {
        self.ids.get(&domain).map(String::as_str)
    }

    /// User override. Unknown ids leave the current selection untouched and
    /// return `false`.
    pub fn select(&mut self, catalog: &PeriodCatalog, domain: MetricDomain, id: &str) -> bool {
        let known = catalog.options(domain).iter().any(|(pid, _)| *pid == id);
        if known {
            log::debug!("period override: {} -> {}", domain, id);
            self.ids.insert(domain, id.to_string());
        } else {
            log::warn!("ignoring unknown {} period '{}'", domain, id);
        }
        known
    }
}
