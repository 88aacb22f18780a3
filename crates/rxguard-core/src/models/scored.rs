//! Scoring output models.

use serde::{Deserialize, Serialize};

use super::record::PrescriptionRecord;

/// Risk tier assigned to a scored record.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum RiskTier {
    Low,
    Medium,
    High,
}

impl RiskTier {
    /// Decide the tier from the weighted score and the warning count.
    ///
    /// Either signal alone can escalate: a high score with no warnings and
    /// a pile of warnings with a modest score both land in `High`.
    pub fn from_signals(score: f64, warning_count: usize) -> Self {
        if score > 0.75 || warning_count > 4 {
            RiskTier::High
        } else if score > 0.25 || warning_count > 0 {
            RiskTier::Medium
        } else {
            RiskTier::Low
        }
    }

    /// Display name for dashboards and exports.
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskTier::Low => "Low",
            RiskTier::Medium => "Medium",
            RiskTier::High => "High",
        }
    }
}

/// Model output for one record: score, confidence, and the factors that fired.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ModelAssessment {
    /// Weighted risk score in [0, 1]
    pub score: f64,
    /// Confidence in the score, in [0.5, 1]
    pub confidence: f64,
    /// Labels of the scoring factors that fired, in evaluation order
    pub factors: Vec<String>,
}

/// A dispensing record together with its scoring results.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScoredRecord {
    /// The record that was scored
    pub record: PrescriptionRecord,
    /// Weighted risk score in [0, 1]
    pub risk_score: f64,
    /// Confidence in the score, in [0.5, 1]
    pub confidence: f64,
    /// Assigned risk tier
    pub risk_tier: RiskTier,
    /// Warning labels in detection order, each rule contributing at most one
    pub warnings: Vec<String>,
}
