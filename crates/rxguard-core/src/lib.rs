//! RxGuard Core Library
//!
//! Prescription-dispensing risk scoring: CSV ingestion into typed records,
//! then a two-stage engine producing a weighted score, a confidence value,
//! rule-based warning flags, and a risk tier per record.
//!
//! # Architecture
//!
//! ```text
//! Raw CSV text → Record Parser → Vec<PrescriptionRecord>
//!                                         │
//!                          ┌──────────────▼──────────────┐
//!                          │         Risk Engine         │
//!                          │   weighted model ──┐        │
//!                          │   warning rules  ──┴→ tier  │
//!                          └──────────────┬──────────────┘
//!                                         │
//!                         Vec<ScoredRecord> → dashboard / export
//! ```
//!
//! # Core Principle
//!
//! The weighted model and the warning rules read the same fields through
//! different cut points on purpose: their disagreement is a signal, and
//! either one alone can escalate a record's tier.
//!
//! # Modules
//!
//! - [`models`]: domain types (PrescriptionRecord, ScoredRecord, RiskTier)
//! - [`parser`]: dispensing-export ingestion with parse-or-default fields
//! - [`engine`]: weighted model, warning rules, and the tier decision

pub mod engine;
pub mod models;
pub mod parser;

// Re-export commonly used types
pub use engine::{HeuristicModel, RiskEngine, RiskModel, Smoothing};
pub use models::{ModelAssessment, PrescriptionRecord, RiskTier, ScoredRecord};
pub use parser::{parse, FormatError};

/// Parse and score a raw dispensing export in one pass.
pub fn score_batch(raw_text: &str, seed: u64) -> Result<Vec<ScoredRecord>, FormatError> {
    let records = parser::parse(raw_text)?;
    Ok(RiskEngine::new(seed).score(&records))
}
