//! Weighted heuristic risk model.
//!
//! Additive factor weights over a 0.8 confidence baseline:
//! - dosage bands at 50/80/120 mg: +0.2 / +0.3 / +0.4 (highest band only)
//! - quantity, saturating at 180 units: up to +0.25
//! - supply duration deviating from 30 days by more than 50%: +0.15
//! - payment type: Cash +0.2 (confidence -0.05), Medicaid +0.05
//! - refill count over 3 / over 5: +0.08 / +0.15
//! - refill arriving before 80% / 70% of the supply ran out: +0.15 / +0.25
//! - overlapping prescriptions: +0.25 (confidence +0.1)
//! - PDMP: Unmatched +0.2; Not Available +0.1 (confidence -0.05)
//! - adherence under 50 / under 70 / over 95: +0.15 / +0.1 / +0.05
//! - pickup method: Third-party +0.1, Delivery +0.05
//! - high-risk drug name: +0.1
//! - patient age under 25 or over 75: +0.05
//!
//! More than 5 corroborating factors raise confidence by 0.1; fewer than 2
//! lower it by 0.1. A bounded perturbation (±0.04) emulates model variance.
//! The score clamps to [0, 1], confidence to [0.5, 1].

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use chrono::{Datelike, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::models::{ModelAssessment, PrescriptionRecord};

use super::{is_high_risk_drug, RiskModel};

/// Confidence baseline before adjustments.
const BASE_CONFIDENCE: f64 = 0.8;

/// Half-width of the uniform smoothing perturbation.
pub const SMOOTHING_RANGE: f64 = 0.04;

/// Quantity at which the quantity factor saturates.
const QUANTITY_CAP: f64 = 180.0;

/// Source of the score-smoothing perturbation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Smoothing {
    /// No perturbation; scores are exact factor sums.
    Disabled,
    /// Seeded perturbation; the same seed and record always draw the same value.
    Seeded(u64),
}

/// Deterministic weighted-factor model.
#[derive(Debug, Clone)]
pub struct HeuristicModel {
    smoothing: Smoothing,
    current_year: i32,
}

impl HeuristicModel {
    /// Model with seeded smoothing.
    pub fn new(seed: u64) -> Self {
        Self::with_smoothing(Smoothing::Seeded(seed))
    }

    /// Model with smoothing disabled, for exact factor sums.
    pub fn without_smoothing() -> Self {
        Self::with_smoothing(Smoothing::Disabled)
    }

    /// Model with an explicit smoothing source.
    pub fn with_smoothing(smoothing: Smoothing) -> Self {
        Self {
            smoothing,
            current_year: Utc::now().year(),
        }
    }

    /// Override the year the age factor compares against.
    pub fn with_current_year(mut self, year: i32) -> Self {
        self.current_year = year;
        self
    }

    fn perturbation(&self, record: &PrescriptionRecord) -> f64 {
        match self.smoothing {
            Smoothing::Disabled => 0.0,
            Smoothing::Seeded(seed) => {
                // Each record draws from its own generator so scoring stays
                // order-independent and repeatable.
                let mut rng = StdRng::seed_from_u64(seed ^ fingerprint(record));
                rng.gen_range(-SMOOTHING_RANGE..=SMOOTHING_RANGE)
            }
        }
    }
}

impl RiskModel for HeuristicModel {
    fn assess(&self, record: &PrescriptionRecord) -> ModelAssessment {
        let mut score: f64 = 0.0;
        let mut confidence = BASE_CONFIDENCE;
        let mut factors: Vec<&str> = Vec::new();

        // Dosage, highest band only
        if record.dosage_mg > 120.0 {
            score += 0.4;
            factors.push("extreme dosage");
        } else if record.dosage_mg > 80.0 {
            score += 0.3;
            factors.push("high dosage");
        } else if record.dosage_mg > 50.0 {
            score += 0.2;
            factors.push("elevated dosage");
        }

        // Quantity, saturating at the cap
        if record.quantity > 0 {
            score += (record.quantity as f64 / QUANTITY_CAP).min(1.0) * 0.25;
            factors.push("quantity volume");
        }

        // Supply duration deviating from the 30-day norm
        let deviation = (record.days_supplied - 30).abs() as f64 / 30.0;
        if deviation > 0.5 {
            score += 0.15;
            factors.push("unusual supply duration");
        }

        match record.payment_type.as_str() {
            "Cash" => {
                score += 0.2;
                confidence -= 0.05;
                factors.push("cash payment");
            }
            "Medicaid" => {
                score += 0.05;
                factors.push("medicaid payment");
            }
            _ => {}
        }

        if record.refill_number > 5 {
            score += 0.15;
            factors.push("very high refill count");
        } else if record.refill_number > 3 {
            score += 0.08;
            factors.push("high refill count");
        }

        // Early refill, when both dates are usable; days_supplied of zero
        // has no defined ratio and skips the rule
        if record.days_supplied != 0 {
            if let Some(days_between) = record.refill_interval_days() {
                let ratio = days_between as f64 / record.days_supplied as f64;
                if ratio < 0.7 {
                    score += 0.25;
                    factors.push("very early refill");
                } else if ratio < 0.8 {
                    score += 0.15;
                    factors.push("early refill");
                }
            }
        }

        // An explicit overlap flag corroborates the other signals
        if record.overlapping_prescriptions {
            score += 0.25;
            confidence += 0.1;
            factors.push("overlapping prescriptions");
        }

        match record.pdmp_status.as_str() {
            "Unmatched" => {
                score += 0.2;
                factors.push("pdmp unmatched");
            }
            "Not Available" => {
                score += 0.1;
                confidence -= 0.05;
                factors.push("pdmp unavailable");
            }
            _ => {}
        }

        // Both adherence extremes are suspicious
        if let Some(adherence) = record.adherence_score {
            if adherence < 50.0 {
                score += 0.15;
                factors.push("very low adherence");
            } else if adherence < 70.0 {
                score += 0.1;
                factors.push("low adherence");
            } else if adherence > 95.0 {
                score += 0.05;
                factors.push("implausibly high adherence");
            }
        }

        match record.pickup_method.as_str() {
            "Third-party" => {
                score += 0.1;
                factors.push("third-party pickup");
            }
            "Delivery" => {
                score += 0.05;
                factors.push("delivery pickup");
            }
            _ => {}
        }

        if is_high_risk_drug(&record.drug_name) {
            score += 0.1;
            factors.push("high-risk drug");
        }

        if let Some(birth_year) = record.birth_year() {
            let age = self.current_year - birth_year;
            if age < 25 || age > 75 {
                score += 0.05;
                factors.push("age bracket");
            }
        }

        // Many corroborating factors raise confidence; one or none lowers it
        if factors.len() > 5 {
            confidence += 0.1;
        } else if factors.len() < 2 {
            confidence -= 0.1;
        }

        score += self.perturbation(record);

        ModelAssessment {
            score: score.clamp(0.0, 1.0),
            confidence: confidence.clamp(0.5, 1.0),
            factors: factors.into_iter().map(String::from).collect(),
        }
    }
}

/// Stable fingerprint over identity fields, mixed into the smoothing seed.
fn fingerprint(record: &PrescriptionRecord) -> u64 {
    let mut hasher = DefaultHasher::new();
    record.patient_id.hash(&mut hasher);
    record.drug_code.hash(&mut hasher);
    record.prescription_date.hash(&mut hasher);
    record.dispense_date.hash(&mut hasher);
    hasher.finish()
}
