//! Configuration file support.
//!
//! Search order:
//! 1. Explicit path (`--config` flag)
//! 2. `riskdash.config.json` in the working directory
//!
//! All fields are optional. CLI flags take precedence over config values.

use crate::error::{DashboardError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_FILE: &str = "riskdash.config.json";
const DEFAULT_DATA_DIR: &str = "fixtures";
const DEFAULT_OUTPUT_DIR: &str = "output";
const DEFAULT_PREFERENCES: &str = ".riskdash/preferences.json";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DashboardConfig {
    /// Directory holding the JSON fixtures (default: `fixtures`)
    #[serde(default)]
    pub data_dir: Option<PathBuf>,

    /// Where CSV/JSON exports are written (default: `output`)
    #[serde(default)]
    pub output_dir: Option<PathBuf>,

    /// Preference store location (default: `.riskdash/preferences.json`)
    #[serde(default)]
    pub preferences_path: Option<PathBuf>,

    /// Reporting year used for period detection (default: current year)
    #[serde(default)]
    pub year: Option<i32>,
}

/// Config with every default filled in.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConfig {
    pub data_dir: PathBuf,
    pub output_dir: PathBuf,
    pub preferences_path: PathBuf,
    pub year: Option<i32>,
}

impl DashboardConfig {
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            DashboardError::Configuration(format!("failed to read {}: {}", path.display(), e))
        })?;
        serde_json::from_str(&content).map_err(|e| {
            DashboardError::Configuration(format!("failed to parse {}: {}", path.display(), e))
        })
    }

    /// An explicit path must exist; the default file is optional.
    pub fn discover(explicit: Option<&Path>, cwd: &Path) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load_from_file(path);
        }
        let candidate = cwd.join(DEFAULT_CONFIG_FILE);
        if candidate.exists() {
            log::debug!("using config {}", candidate.display());
            return Self::load_from_file(&candidate);
        }
        Ok(DashboardConfig::default())
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(year) = self.year {
            if !(2000..=2100).contains(&year) {
                return Err(DashboardError::Configuration(format!(
                    "year must be between 2000 and 2100, got {}",
                    year
                )));
            }
        }
        Ok(())
    }

    pub fn resolve(self) -> ResolvedConfig {
        ResolvedConfig {
            data_dir: self.data_dir.unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR)),
            output_dir: self
                .output_dir
                .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR)),
            preferences_path: self
                .preferences_path
                .unwrap_or_else(|| PathBuf::from(DEFAULT_PREFERENCES)),
            year: self.year,
        }
    }
}
