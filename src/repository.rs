//! Data access for the dashboard.
//!
//! Consumers only see [`DashboardRepository`]; the bundled JSON fixtures are
//! one implementation ([`FixtureRepository`]) and tests use
//! [`InMemoryRepository`]. A fixture that is missing or malformed is logged
//! and replaced by an empty collection, never surfaced as a failure.

use crate::error::{DashboardError, Result};
use crate::period::PeriodCatalog;
use crate::types::{MasterData, Project, Submission};
use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};

pub const PERFORMANCE_FILE: &str = "performance.json";
pub const RISK_CATEGORIES_FILE: &str = "risk-categories.json";
pub const GEOGRAPHIC_FILE: &str = "geographic.json";
pub const RISK_CAPTURE_FILE: &str = "risk-capture.json";
pub const INVOICE_STATUS_FILE: &str = "invoice-status.json";
pub const AGING_RECEIVABLES_FILE: &str = "aging-receivables.json";
pub const PROJECTS_FILE: &str = "projects.json";
pub const SUBMISSIONS_FILE: &str = "submissions.json";
pub const PROVINCES_FILE: &str = "provinces.json";
pub const CATEGORIES_FILE: &str = "project-categories.json";
pub const CLIENTS_FILE: &str = "clients.json";
pub const TAXONOMY_FILE: &str = "taksonomi.json";

/// Routes of the planned backend. Declared for documentation; nothing in
/// this crate talks to a server.
pub const API_ENDPOINTS: &[(&str, &str)] = &[
    ("projects", "/api/projects"),
    ("project_detail", "/api/projects/:id"),
    ("readiness", "/api/projects/:id/readiness"),
    ("risk_capture", "/api/projects/:id/risk-capture"),
    ("verification", "/api/verification"),
    ("invoices", "/api/invoices"),
    ("provinces", "/api/master/provinces"),
    ("categories", "/api/master/categories"),
    ("clients", "/api/master/clients"),
];

pub trait DashboardRepository {
    fn projects(&self) -> Result<Vec<Project>>;
    fn submissions(&self) -> Result<Vec<Submission>>;
    fn master_data(&self) -> Result<MasterData>;
    fn period_catalog(&self) -> Result<PeriodCatalog>;
}

/// Everything a dashboard session reads, loaded once.
#[derive(Debug, Clone, Default)]
pub struct DashboardData {
    pub projects: Vec<Project>,
    pub submissions: Vec<Submission>,
    pub master: MasterData,
    pub catalog: PeriodCatalog,
}

pub fn load_all<R: DashboardRepository + ?Sized>(repo: &R) -> Result<DashboardData> {
    let data = DashboardData {
        projects: repo.projects()?,
        submissions: repo.submissions()?,
        master: repo.master_data()?,
        catalog: repo.period_catalog()?,
    };
    log::info!(
        "loaded {} projects, {} submissions, {} provinces",
        data.projects.len(),
        data.submissions.len(),
        data.master.provinces.len()
    );
    Ok(data)
}

/// Lifecycle of an asynchronous load as seen by a page: the pending flag
/// is what drives the spinner.
#[derive(Debug, Clone, Default)]
pub enum LoadState<T> {
    #[default]
    Idle,
    Pending,
    Ready(T),
    Failed(String),
}

impl<T> LoadState<T> {
    pub fn from_result(result: Result<T>) -> Self {
        match result {
            Ok(v) => LoadState::Ready(v),
            Err(e) => LoadState::Failed(e.to_string()),
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, LoadState::Pending)
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            LoadState::Ready(v) => Some(v),
            _ => None,
        }
    }

    /// Abandons an in-flight load; completed or failed loads are kept.
    pub fn cancel(&mut self) {
        if self.is_pending() {
            *self = LoadState::Idle;
        }
    }
}

pub fn read_fixture<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = fs::read_to_string(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => DashboardError::FixtureNotFound(path.to_path_buf()),
        _ => DashboardError::from(e),
    })?;
    serde_json::from_str(&content).map_err(|e| DashboardError::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Reads the JSON fixtures from a directory.
#[derive(Debug, Clone)]
pub struct FixtureRepository {
    dir: PathBuf,
}

impl FixtureRepository {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        FixtureRepository { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn load_or_default<T: DeserializeOwned + Default>(&self, name: &str) -> Result<T> {
        let path = self.dir.join(name);
        match read_fixture(&path) {
            Ok(v) => {
                log::debug!("loaded fixture {}", path.display());
                Ok(v)
            }
            Err(e) if e.is_recoverable() => {
                log::warn!("{}; using empty data", e);
                Ok(T::default())
            }
            Err(e) => Err(e),
        }
    }
}

impl DashboardRepository for FixtureRepository {
    fn projects(&self) -> Result<Vec<Project>> {
        self.load_or_default(PROJECTS_FILE)
    }

    fn submissions(&self) -> Result<Vec<Submission>> {
        self.load_or_default(SUBMISSIONS_FILE)
    }

    fn master_data(&self) -> Result<MasterData> {
        Ok(MasterData {
            provinces: self.load_or_default(PROVINCES_FILE)?,
            categories: self.load_or_default(CATEGORIES_FILE)?,
            clients: self.load_or_default(CLIENTS_FILE)?,
            taxonomy: self.load_or_default(TAXONOMY_FILE)?,
        })
    }

    fn period_catalog(&self) -> Result<PeriodCatalog> {
        Ok(PeriodCatalog {
            performance: self.load_or_default(PERFORMANCE_FILE)?,
            risk: self.load_or_default(RISK_CATEGORIES_FILE)?,
            geographic: self.load_or_default(GEOGRAPHIC_FILE)?,
            risk_capture: self.load_or_default(RISK_CAPTURE_FILE)?,
            invoicing: self.load_or_default(INVOICE_STATUS_FILE)?,
            aging: self.load_or_default(AGING_RECEIVABLES_FILE)?,
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryRepository {
    pub data: DashboardData,
}

impl DashboardRepository for InMemoryRepository {
    fn projects(&self) -> Result<Vec<Project>> {
        Ok(self.data.projects.clone())
    }

    fn submissions(&self) -> Result<Vec<Submission>> {
        Ok(self.data.submissions.clone())
    }

    fn master_data(&self) -> Result<MasterData> {
        Ok(self.data.master.clone())
    }

    fn period_catalog(&self) -> Result<PeriodCatalog> {
        Ok(self.data.catalog.clone())
    }
}
