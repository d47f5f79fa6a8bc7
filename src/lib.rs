//! Derived-metric engine for the project and risk management dashboard.
//!
//! - [`period`]: reporting period catalog and best-period detection
//! - [`status`]: status and badge resolution
//! - [`risk`]: probability x impact scoring
//! - [`aggregates`]: dashboard summary numbers
//! - [`filter`]: search/filter composition for lists and queues
//! - [`repository`]: data access behind a trait, backed by JSON fixtures

pub mod aggregates;
pub mod config;
pub mod error;
pub mod filter;
pub mod output;
pub mod period;
pub mod preferences;
pub mod reports;
pub mod repository;
pub mod risk;
pub mod status;
pub mod types;
pub mod util;
pub mod validation;
pub mod workflow;

pub use error::{DashboardError, Result};
pub use period::{detect_best_period, MetricDomain, PeriodCatalog, PeriodSelection};
pub use repository::{DashboardRepository, FixtureRepository, InMemoryRepository};
pub use status::{get_project_risk, get_project_status, get_risk_level};
