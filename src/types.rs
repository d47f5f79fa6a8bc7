use crate::status::{ReadinessStatus, VerificationStatus};
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use tabled::Tabled;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PeriodKind {
    Yearly,
    Quarterly,
}

/// A named reporting window with its metrics payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Period<T> {
    pub id: String,
    pub label: String,
    #[serde(rename = "type")]
    pub kind: PeriodKind,
    pub data: T,
    pub is_complete: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyPerformance {
    pub month: String,
    pub total_projects: u32,
    pub target_budget: f64,
    pub realized_budget: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskCategoryStat {
    pub category: String,
    pub total: u32,
    pub overdue: u32,
    pub closed: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProvinceStat {
    pub province: String,
    pub projects: u32,
    pub budget: f64,
    pub average_progress: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskCaptureStat {
    pub unit: String,
    pub captured: u32,
    pub verified: u32,
    pub pending: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceStatus {
    pub paid: f64,
    pub unpaid: f64,
    pub overdue: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgingBucket {
    pub range: String,
    pub invoices: u32,
    pub amount: f64,
}

/// A tracked project. Its lifecycle status is never stored; it is derived
/// from `progress` every time it is needed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub name: String,
    pub client: String,
    pub budget: f64,
    pub spent: f64,
    pub progress: f64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub province: String,
    pub category: String,
    #[serde(default)]
    pub readiness_status: Option<ReadinessStatus>,
    #[serde(default)]
    pub readiness_score: Option<f64>,
    #[serde(default)]
    pub risk_capture_status: Option<ReadinessStatus>,
    #[serde(default)]
    pub risk_capture_score: Option<f64>,
}

/// Probability and impact on a 1..=5 scale; `level` is their product when
/// the form has already computed it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskAssessment {
    #[serde(rename = "probabilitas")]
    pub probability: u8,
    #[serde(rename = "dampak")]
    pub impact: u8,
    #[serde(default)]
    pub level: Option<u8>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskItem {
    pub id: String,
    #[serde(rename = "sumberRisiko")]
    pub source: String,
    #[serde(rename = "dampakKualitatif", default)]
    pub qualitative_impact: String,
    #[serde(rename = "dampakKuantitatif", default)]
    pub quantitative_impact: Option<f64>,
    #[serde(rename = "kontrolEksisting", default)]
    pub existing_controls: String,
    #[serde(rename = "risikoSaatIni")]
    pub current_risk: RiskAssessment,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadinessCategory {
    Dokumen,
    Data,
    Personel,
    Legal,
    Keuangan,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadinessItem {
    pub id: String,
    pub category: ReadinessCategory,
    pub description: String,
    #[serde(default)]
    pub fulfilled: bool,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default)]
    pub risk: Option<RiskItem>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionKind {
    Readiness,
    RiskCapture,
}

impl SubmissionKind {
    pub fn label(&self) -> &'static str {
        match self {
            SubmissionKind::Readiness => "Kesiapan",
            SubmissionKind::RiskCapture => "Risk Capture",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifierInfo {
    pub name: String,
    #[serde(default)]
    pub comment: Option<String>,
    pub verified_at: NaiveDateTime,
}

/// A readiness or risk-capture submission awaiting (or past) verification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    pub id: String,
    pub project_id: String,
    pub project_name: String,
    pub kind: SubmissionKind,
    pub submitted_by: String,
    pub submitted_at: NaiveDateTime,
    pub status: VerificationStatus,
    #[serde(default)]
    pub readiness_items: Vec<ReadinessItem>,
    #[serde(default)]
    pub risk_items: Vec<RiskItem>,
    #[serde(default)]
    pub verifier: Option<VerifierInfo>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Province {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub capital: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Client {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxonomyEntry {
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub parent: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MasterData {
    pub provinces: Vec<Province>,
    pub categories: Vec<Category>,
    pub clients: Vec<Client>,
    pub taxonomy: Vec<TaxonomyEntry>,
}

impl MasterData {
    pub fn province(&self, name: &str) -> Option<&Province> {
        self.provinces
            .iter()
            .find(|p| p.name.eq_ignore_ascii_case(name) || p.id == name)
    }

    pub fn client(&self, name: &str) -> Option<&Client> {
        self.clients
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(name) || c.id == name)
    }

    /// Direct children of a taxonomy node; `None` lists the roots.
    pub fn taxonomy_children(&self, parent: Option<&str>) -> Vec<&TaxonomyEntry> {
        self.taxonomy
            .iter()
            .filter(|t| t.parent.as_deref() == parent)
            .collect()
    }
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct ProjectRow {
    #[serde(rename = "Project")]
    #[tabled(rename = "Project")]
    pub name: String,
    #[serde(rename = "Client")]
    #[tabled(rename = "Client")]
    pub client: String,
    #[serde(rename = "Province")]
    #[tabled(rename = "Province")]
    pub province: String,
    #[serde(rename = "Budget")]
    #[tabled(rename = "Budget")]
    pub budget: String,
    #[serde(rename = "Progress")]
    #[tabled(rename = "Progress")]
    pub progress: String,
    #[serde(rename = "Status")]
    #[tabled(rename = "Status")]
    pub status: String,
    #[serde(rename = "Risk")]
    #[tabled(rename = "Risk")]
    pub risk: String,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct ProvinceRow {
    #[serde(rename = "Province")]
    #[tabled(rename = "Province")]
    pub province: String,
    #[serde(rename = "Projects")]
    #[tabled(rename = "Projects")]
    pub projects: u32,
    #[serde(rename = "TotalBudget")]
    #[tabled(rename = "TotalBudget")]
    pub total_budget: String,
    #[serde(rename = "AvgBudget")]
    #[tabled(rename = "AvgBudget")]
    pub avg_budget: String,
    #[serde(rename = "AvgProgress")]
    #[tabled(rename = "AvgProgress")]
    pub avg_progress: String,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct SubmissionRow {
    #[serde(rename = "Project")]
    #[tabled(rename = "Project")]
    pub project: String,
    #[serde(rename = "Type")]
    #[tabled(rename = "Type")]
    pub kind: String,
    #[serde(rename = "SubmittedBy")]
    #[tabled(rename = "SubmittedBy")]
    pub submitted_by: String,
    #[serde(rename = "Status")]
    #[tabled(rename = "Status")]
    pub status: String,
    #[serde(rename = "HighestRisk")]
    #[tabled(rename = "HighestRisk")]
    pub highest_risk: String,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct AgingRow {
    #[serde(rename = "Range")]
    #[tabled(rename = "Range")]
    pub range: String,
    #[serde(rename = "Invoices")]
    #[tabled(rename = "Invoices")]
    pub invoices: u32,
    #[serde(rename = "Amount")]
    #[tabled(rename = "Amount")]
    pub amount: String,
    #[serde(rename = "Share")]
    #[tabled(rename = "Share")]
    pub share: String,
}
