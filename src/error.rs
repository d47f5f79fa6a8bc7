//! Error types for loading and exporting dashboard data.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("Fixture not found: {}", .0.display())]
    FixtureNotFound(PathBuf),

    #[error("Failed to parse {}: {}", .path.display(), .message)]
    Parse { path: PathBuf, message: String },

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Export failed: {0}")]
    Export(String),

    #[error("IO error: {0}")]
    Io(String),
}

impl DashboardError {
    /// Fixture problems are absorbed by the repository with an empty fallback;
    /// everything else is surfaced to the caller.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            DashboardError::FixtureNotFound(_) | DashboardError::Parse { .. }
        )
    }
}

impl From<std::io::Error> for DashboardError {
    fn from(err: std::io::Error) -> Self {
        DashboardError::Io(err.to_string())
    }
}

impl From<csv::Error> for DashboardError {
    fn from(err: csv::Error) -> Self {
        DashboardError::Export(err.to_string())
    }
}

impl From<serde_json::Error> for DashboardError {
    fn from(err: serde_json::Error) -> Self {
        DashboardError::Export(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, DashboardError>;
