//! Probability x impact scoring for risk items.
//!
//! All risk-level bucketing funnels through [`crate::status::get_risk_level`].

use crate::status::{get_risk_level, RiskLevel};
use crate::types::{ReadinessItem, RiskAssessment, RiskItem, Submission};
use std::collections::BTreeMap;

/// Product of probability and impact, each clamped to 1..=5.
pub fn risk_score(probability: u8, impact: u8) -> u8 {
    probability.clamp(1, 5) * impact.clamp(1, 5)
}

impl RiskAssessment {
    pub fn new(probability: u8, impact: u8) -> Self {
        RiskAssessment {
            probability,
            impact,
            level: Some(risk_score(probability, impact)),
        }
    }

    /// The stored level wins; otherwise it is recomputed from the inputs.
    pub fn score(&self) -> u8 {
        self.level
            .unwrap_or_else(|| risk_score(self.probability, self.impact))
    }

    pub fn risk_level(&self) -> RiskLevel {
        get_risk_level(self.score() as i32)
    }
}

impl RiskItem {
    pub fn current_level(&self) -> RiskLevel {
        self.current_risk.risk_level()
    }
}

impl ReadinessItem {
    pub fn risk_level(&self) -> Option<RiskLevel> {
        self.risk.as_ref().map(RiskItem::current_level)
    }
}

impl Submission {
    /// Every risk attached to the submission, directly or via readiness items.
    pub fn all_risks(&self) -> impl Iterator<Item = &RiskItem> {
        self.risk_items
            .iter()
            .chain(self.readiness_items.iter().filter_map(|i| i.risk.as_ref()))
    }

    pub fn highest_risk(&self) -> Option<RiskLevel> {
        self.all_risks().map(RiskItem::current_level).max()
    }
}

/// Count of items per bucket; every bucket is present, empty ones as zero.
pub fn level_distribution<'a, I>(items: I) -> BTreeMap<RiskLevel, usize>
where
    I: IntoIterator<Item = &'a RiskItem>,
{
    let mut dist: BTreeMap<RiskLevel, usize> = RiskLevel::ALL.iter().map(|l| (*l, 0)).collect();
    for item in items {
        *dist.entry(item.current_level()).or_insert(0) += 1;
    }
    dist
}
