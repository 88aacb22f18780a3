//! Risk engine.
//!
//! Pipeline: parsed records → weighted model assessment + warning flags → tier
//!
//! The weighted model and the warning rules are two independent reads of the
//! same record with different cut points; either signal alone can escalate
//! the tier. Records are scored independently of one another, in input order.

mod heuristic;
mod warnings;

pub use heuristic::*;
pub use warnings::*;

use tracing::debug;

use crate::models::{ModelAssessment, PrescriptionRecord, RiskTier, ScoredRecord};

/// Drug names treated as high-risk controlled substances.
pub const HIGH_RISK_DRUGS: [&str; 4] = ["Oxycodone", "Fentanyl", "Morphine", "Hydrocodone"];

/// Whether a drug name falls in the high-risk set (case-insensitive).
pub fn is_high_risk_drug(name: &str) -> bool {
    HIGH_RISK_DRUGS
        .iter()
        .any(|drug| drug.eq_ignore_ascii_case(name))
}

/// Capability interface for the scoring model.
///
/// [`HeuristicModel`] is the deterministic implementation; an external
/// classifier can be injected through the same seam without touching the
/// warning rules or the tier decision.
pub trait RiskModel {
    /// Assess one record. Implementations must not share mutable state
    /// between calls; records are scored independently.
    fn assess(&self, record: &PrescriptionRecord) -> ModelAssessment;
}

/// Applies the model and the warning rules to each record.
pub struct RiskEngine {
    model: Box<dyn RiskModel>,
}

impl RiskEngine {
    /// Engine with the heuristic model and seeded score smoothing.
    pub fn new(seed: u64) -> Self {
        Self {
            model: Box::new(HeuristicModel::new(seed)),
        }
    }

    /// Engine with the heuristic model and smoothing disabled.
    pub fn deterministic() -> Self {
        Self {
            model: Box::new(HeuristicModel::without_smoothing()),
        }
    }

    /// Engine with an injected model implementation.
    pub fn with_model(model: Box<dyn RiskModel>) -> Self {
        Self { model }
    }

    /// Score a batch. Output order matches input order.
    pub fn score(&self, records: &[PrescriptionRecord]) -> Vec<ScoredRecord> {
        let scored: Vec<ScoredRecord> = records
            .iter()
            .map(|record| self.score_record(record))
            .collect();
        debug!(records = scored.len(), "scored dispensing batch");
        scored
    }

    /// Score a single record.
    pub fn score_record(&self, record: &PrescriptionRecord) -> ScoredRecord {
        let assessment = self.model.assess(record);
        let warnings = warning_flags(record);
        let risk_tier = RiskTier::from_signals(assessment.score, warnings.len());

        ScoredRecord {
            record: record.clone(),
            risk_score: assessment.score,
            confidence: assessment.confidence,
            risk_tier,
            warnings,
        }
    }
}
