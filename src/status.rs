//! Status and badge resolution.
//!
//! Every value shown as a badge in the dashboard goes through one of the
//! resolvers here. Resolvers never fail: missing or out-of-range input lands
//! in a defined default bucket.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Icons a badge can carry. Closed set, so an unknown icon name cannot
/// reach the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Icon {
    CheckCircle,
    PlayCircle,
    Clock,
    ShieldCheck,
    AlertTriangle,
    AlertOctagon,
    HelpCircle,
    FileText,
    Search,
    Edit,
}

impl Icon {
    pub fn name(&self) -> &'static str {
        match self {
            Icon::CheckCircle => "CheckCircle",
            Icon::PlayCircle => "PlayCircle",
            Icon::Clock => "Clock",
            Icon::ShieldCheck => "ShieldCheck",
            Icon::AlertTriangle => "AlertTriangle",
            Icon::AlertOctagon => "AlertOctagon",
            Icon::HelpCircle => "HelpCircle",
            Icon::FileText => "FileText",
            Icon::Search => "Search",
            Icon::Edit => "Edit",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Badge {
    pub label: &'static str,
    pub color_class: &'static str,
    pub icon: Icon,
}

impl Badge {
    const fn new(label: &'static str, color_class: &'static str, icon: Icon) -> Self {
        Badge {
            label,
            color_class,
            icon,
        }
    }
}

const GREEN: &str = "bg-green-100 text-green-800";
const BLUE: &str = "bg-blue-100 text-blue-800";
const YELLOW: &str = "bg-yellow-100 text-yellow-800";
const ORANGE: &str = "bg-orange-100 text-orange-800";
const RED: &str = "bg-red-100 text-red-800";
const GRAY: &str = "bg-gray-100 text-gray-800";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    Planning,
    Running,
    Completed,
}

impl ProjectStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectStatus::Planning => "planning",
            ProjectStatus::Running => "running",
            ProjectStatus::Completed => "completed",
        }
    }

    pub fn badge(&self) -> Badge {
        match self {
            ProjectStatus::Completed => Badge::new("Selesai", GREEN, Icon::CheckCircle),
            ProjectStatus::Running => Badge::new("Berjalan", BLUE, Icon::PlayCircle),
            ProjectStatus::Planning => Badge::new("Perencanaan", GRAY, Icon::Clock),
        }
    }
}

/// Project risk on the 0..=100 readiness scale, where higher is safer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskStatus {
    Low,
    Medium,
    High,
    NotAssessed,
}

impl RiskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskStatus::Low => "low",
            RiskStatus::Medium => "medium",
            RiskStatus::High => "high",
            RiskStatus::NotAssessed => "not_assessed",
        }
    }

    pub fn badge(&self) -> Badge {
        match self {
            RiskStatus::Low => Badge::new("Risiko Rendah", GREEN, Icon::ShieldCheck),
            RiskStatus::Medium => Badge::new("Risiko Sedang", YELLOW, Icon::AlertTriangle),
            RiskStatus::High => Badge::new("Risiko Tinggi", RED, Icon::AlertOctagon),
            RiskStatus::NotAssessed => Badge::new("Belum Dinilai", GRAY, Icon::HelpCircle),
        }
    }
}

/// Queue status of a submission. Status strings this build does not know
/// deserialize to `Unknown` instead of failing the whole fixture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationStatus {
    Submitted,
    UnderReview,
    Verified,
    NeedsRevision,
    #[serde(other)]
    Unknown,
}

impl VerificationStatus {
    pub const ALL: [VerificationStatus; 4] = [
        VerificationStatus::Submitted,
        VerificationStatus::UnderReview,
        VerificationStatus::Verified,
        VerificationStatus::NeedsRevision,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            VerificationStatus::Submitted => "submitted",
            VerificationStatus::UnderReview => "under_review",
            VerificationStatus::Verified => "verified",
            VerificationStatus::NeedsRevision => "needs_revision",
            VerificationStatus::Unknown => "unknown",
        }
    }

    pub fn badge(&self) -> Badge {
        match self {
            VerificationStatus::Submitted => Badge::new("Diajukan", BLUE, Icon::FileText),
            VerificationStatus::UnderReview => Badge::new("Sedang Ditinjau", YELLOW, Icon::Search),
            VerificationStatus::Verified => Badge::new("Terverifikasi", GREEN, Icon::CheckCircle),
            VerificationStatus::NeedsRevision => Badge::new("Perlu Revisi", RED, Icon::Edit),
            VerificationStatus::Unknown => Badge::new("Tidak Diketahui", GRAY, Icon::HelpCircle),
        }
    }
}

/// Readiness (and risk-capture) fill status of a project. Absent or
/// unrecognised means the form was never filled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadinessStatus {
    Submitted,
    UnderReview,
    Verified,
    NeedsRevision,
    #[default]
    #[serde(other)]
    NotFilled,
}

impl ReadinessStatus {
    pub fn resolve(status: Option<ReadinessStatus>) -> ReadinessStatus {
        status.unwrap_or_default()
    }

    pub fn badge(&self) -> Badge {
        match self {
            ReadinessStatus::NotFilled => Badge::new("Belum Diisi", GRAY, Icon::HelpCircle),
            ReadinessStatus::Submitted => VerificationStatus::Submitted.badge(),
            ReadinessStatus::UnderReview => VerificationStatus::UnderReview.badge(),
            ReadinessStatus::Verified => VerificationStatus::Verified.badge(),
            ReadinessStatus::NeedsRevision => VerificationStatus::NeedsRevision.badge(),
        }
    }
}

impl From<VerificationStatus> for ReadinessStatus {
    fn from(status: VerificationStatus) -> Self {
        match status {
            VerificationStatus::Submitted => ReadinessStatus::Submitted,
            VerificationStatus::UnderReview => ReadinessStatus::UnderReview,
            VerificationStatus::Verified => ReadinessStatus::Verified,
            VerificationStatus::NeedsRevision => ReadinessStatus::NeedsRevision,
            VerificationStatus::Unknown => ReadinessStatus::NotFilled,
        }
    }
}

/// Five qualitative bands of the 1..=25 probability x impact scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    VeryLow = 1,
    Low = 2,
    Medium = 3,
    High = 4,
    VeryHigh = 5,
}

impl RiskLevel {
    pub const ALL: [RiskLevel; 5] = [
        RiskLevel::VeryLow,
        RiskLevel::Low,
        RiskLevel::Medium,
        RiskLevel::High,
        RiskLevel::VeryHigh,
    ];

    pub fn bucket(&self) -> u8 {
        *self as u8
    }

    pub fn label(&self) -> &'static str {
        self.badge().label
    }

    pub fn badge(&self) -> Badge {
        match self {
            RiskLevel::VeryLow => Badge::new("Sangat Rendah", GREEN, Icon::ShieldCheck),
            RiskLevel::Low => Badge::new("Rendah", BLUE, Icon::ShieldCheck),
            RiskLevel::Medium => Badge::new("Sedang", YELLOW, Icon::AlertTriangle),
            RiskLevel::High => Badge::new("Tinggi", ORANGE, Icon::AlertTriangle),
            RiskLevel::VeryHigh => Badge::new("Sangat Tinggi", RED, Icon::AlertOctagon),
        }
    }
}

/// `100` is completed, anything above zero is running, the rest is planning.
pub fn get_project_status(progress: f64) -> ProjectStatus {
    if progress == 100.0 {
        ProjectStatus::Completed
    } else if progress > 0.0 {
        ProjectStatus::Running
    } else {
        ProjectStatus::Planning
    }
}

pub fn get_project_risk(score: Option<f64>) -> RiskStatus {
    match score {
        None => RiskStatus::NotAssessed,
        Some(s) if s == 0.0 || s.is_nan() => RiskStatus::NotAssessed,
        Some(s) if s >= 80.0 => RiskStatus::Low,
        Some(s) if s >= 60.0 => RiskStatus::Medium,
        Some(_) => RiskStatus::High,
    }
}

/// Buckets a 1..=25 risk level; anything outside the scale is `VeryLow`.
pub fn get_risk_level(level: i32) -> RiskLevel {
    match level {
        1..=5 => RiskLevel::VeryLow,
        6..=10 => RiskLevel::Low,
        11..=15 => RiskLevel::Medium,
        16..=20 => RiskLevel::High,
        21..=25 => RiskLevel::VeryHigh,
        _ => RiskLevel::VeryLow,
    }
}

macro_rules! impl_str_conversions {
    ($ty:ty, $($text:literal => $variant:expr),+ $(,)?) => {
        impl FromStr for $ty {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
                    $($text => Ok($variant),)+
                    other => Err(format!("unknown value '{}'", other)),
                }
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.badge().label)
            }
        }
    };
}

impl_str_conversions!(ProjectStatus,
    "planning" => ProjectStatus::Planning,
    "running" => ProjectStatus::Running,
    "completed" => ProjectStatus::Completed,
);

impl_str_conversions!(RiskStatus,
    "low" => RiskStatus::Low,
    "medium" => RiskStatus::Medium,
    "high" => RiskStatus::High,
    "not_assessed" => RiskStatus::NotAssessed,
);

impl_str_conversions!(VerificationStatus,
    "submitted" => VerificationStatus::Submitted,
    "under_review" => VerificationStatus::UnderReview,
    "verified" => VerificationStatus::Verified,
    "needs_revision" => VerificationStatus::NeedsRevision,
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_status_thresholds() {
        assert_eq!(get_project_status(100.0), ProjectStatus::Completed);
        assert_eq!(get_project_status(99.9), ProjectStatus::Running);
        assert_eq!(get_project_status(45.0), ProjectStatus::Running);
        assert_eq!(get_project_status(0.5), ProjectStatus::Running);
        assert_eq!(get_project_status(0.0), ProjectStatus::Planning);
        assert_eq!(get_project_status(-3.0), ProjectStatus::Planning);
    }

    #[test]
    fn test_project_status_badges() {
        assert_eq!(get_project_status(100.0).badge().label, "Selesai");
        assert_eq!(get_project_status(45.0).badge().label, "Berjalan");
        assert_eq!(get_project_status(0.0).badge().label, "Perencanaan");
    }

    #[test]
    fn test_project_risk_thresholds() {
        assert_eq!(get_project_risk(None), RiskStatus::NotAssessed);
        assert_eq!(get_project_risk(Some(0.0)), RiskStatus::NotAssessed);
        assert_eq!(get_project_risk(Some(f64::NAN)), RiskStatus::NotAssessed);
        assert_eq!(get_project_risk(Some(100.0)), RiskStatus::Low);
        assert_eq!(get_project_risk(Some(80.0)), RiskStatus::Low);
        assert_eq!(get_project_risk(Some(79.99)), RiskStatus::Medium);
        assert_eq!(get_project_risk(Some(60.0)), RiskStatus::Medium);
        assert_eq!(get_project_risk(Some(59.9)), RiskStatus::High);
        assert_eq!(get_project_risk(Some(1.0)), RiskStatus::High);
    }

    #[test]
    fn test_risk_level_buckets() {
        let expected = [
            (1, 1),
            (5, 1),
            (6, 2),
            (10, 2),
            (11, 3),
            (12, 3),
            (15, 3),
            (16, 4),
            (20, 4),
            (21, 5),
            (25, 5),
        ];
        for (level, bucket) in expected {
            assert_eq!(get_risk_level(level).bucket(), bucket, "level {}", level);
        }
        assert_eq!(get_risk_level(12).label(), "Sedang");
    }

    #[test]
    fn test_risk_level_out_of_range_defaults_to_first_bucket() {
        assert_eq!(get_risk_level(0), RiskLevel::VeryLow);
        assert_eq!(get_risk_level(-7), RiskLevel::VeryLow);
        assert_eq!(get_risk_level(26), RiskLevel::VeryLow);
    }

    #[test]
    fn test_readiness_defaults_to_not_filled() {
        let status = ReadinessStatus::resolve(None);
        assert_eq!(status, ReadinessStatus::NotFilled);
        assert_eq!(status.badge().label, "Belum Diisi");
        assert_eq!(
            ReadinessStatus::from(VerificationStatus::Verified).badge(),
            VerificationStatus::Verified.badge()
        );
    }

    #[test]
    fn test_parse_filters() {
        assert_eq!("Running".parse::<ProjectStatus>(), Ok(ProjectStatus::Running));
        assert_eq!("not-assessed".parse::<RiskStatus>(), Ok(RiskStatus::NotAssessed));
        assert_eq!(
            "under_review".parse::<VerificationStatus>(),
            Ok(VerificationStatus::UnderReview)
        );
        assert!("done".parse::<ProjectStatus>().is_err());
    }

    #[test]
    fn test_unrecognised_status_strings_deserialize_to_defaults() {
        let readiness: Vec<ReadinessStatus> =
            serde_json::from_str(r#"["draft", "verified", "not_filled"]"#).unwrap();
        assert_eq!(
            readiness,
            vec![
                ReadinessStatus::NotFilled,
                ReadinessStatus::Verified,
                ReadinessStatus::NotFilled,
            ]
        );

        let verification: VerificationStatus = serde_json::from_str(r#""archived""#).unwrap();
        assert_eq!(verification, VerificationStatus::Unknown);
        assert_eq!(verification.badge().label, "Tidak Diketahui");
        assert_eq!(ReadinessStatus::from(verification), ReadinessStatus::NotFilled);
        assert!("unknown".parse::<VerificationStatus>().is_err());
    }
}
