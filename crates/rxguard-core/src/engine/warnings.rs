//! Warning-flag rules.
//!
//! A second, independent read of the record: coarser cut points than the
//! weighted model (dosage 60/90/120, quantity 120/180, refills 4/6,
//! adherence 50/60/98) plus combination checks. Each rule appends at most
//! one label from the fixed catalog below, in detection order.

use crate::models::PrescriptionRecord;

use super::is_high_risk_drug;

// Fixed label catalog. Rules reference these, never inline strings.
pub const WARN_EXTREME_DOSAGE: &str = "Extreme dosage prescribed";
pub const WARN_VERY_HIGH_DOSAGE: &str = "Very high dosage prescribed";
pub const WARN_ELEVATED_DOSAGE: &str = "Elevated dosage prescribed";
pub const WARN_EXCESSIVE_QUANTITY: &str = "Excessive quantity dispensed";
pub const WARN_LARGE_QUANTITY: &str = "Large quantity dispensed";
pub const WARN_EXCESSIVE_REFILLS: &str = "Excessive refill count";
pub const WARN_MULTIPLE_REFILLS: &str = "Multiple refills on record";
pub const WARN_VERY_LOW_ADHERENCE: &str = "Very low adherence score";
pub const WARN_LOW_ADHERENCE: &str = "Low adherence score";
pub const WARN_PERFECT_ADHERENCE: &str = "Implausibly perfect adherence";
pub const WARN_PDMP_UNMATCHED: &str = "PDMP record unmatched";
pub const WARN_PDMP_UNAVAILABLE: &str = "PDMP data not available";
pub const WARN_OVERLAPPING: &str = "Overlapping prescriptions detected";
pub const WARN_CASH_LARGE_DISPENSE: &str = "Cash payment for large prescription";
pub const WARN_THIRD_PARTY_PICKUP: &str = "Third-party pickup of large or repeated prescription";
pub const WARN_SHORT_SUPPLY_HIGH_QUANTITY: &str = "High quantity for short supply period";
pub const WARN_LONG_SUPPLY: &str = "Unusually long supply duration";
pub const WARN_CONTROLLED_HIGH_DOSE: &str = "High-dose controlled substance";

/// Evaluate all warning rules against one record.
pub fn warning_flags(record: &PrescriptionRecord) -> Vec<String> {
    let mut warnings: Vec<&str> = Vec::new();

    // Dosage, highest band only
    if record.dosage_mg > 120.0 {
        warnings.push(WARN_EXTREME_DOSAGE);
    } else if record.dosage_mg > 90.0 {
        warnings.push(WARN_VERY_HIGH_DOSAGE);
    } else if record.dosage_mg > 60.0 {
        warnings.push(WARN_ELEVATED_DOSAGE);
    }

    if record.quantity > 180 {
        warnings.push(WARN_EXCESSIVE_QUANTITY);
    } else if record.quantity > 120 {
        warnings.push(WARN_LARGE_QUANTITY);
    }

    if record.refill_number > 6 {
        warnings.push(WARN_EXCESSIVE_REFILLS);
    } else if record.refill_number > 4 {
        warnings.push(WARN_MULTIPLE_REFILLS);
    }

    if let Some(adherence) = record.adherence_score {
        if adherence < 50.0 {
            warnings.push(WARN_VERY_LOW_ADHERENCE);
        } else if adherence < 60.0 {
            warnings.push(WARN_LOW_ADHERENCE);
        } else if adherence > 98.0 {
            warnings.push(WARN_PERFECT_ADHERENCE);
        }
    }

    match record.pdmp_status.as_str() {
        "Unmatched" => warnings.push(WARN_PDMP_UNMATCHED),
        "Not Available" => warnings.push(WARN_PDMP_UNAVAILABLE),
        _ => {}
    }

    if record.overlapping_prescriptions {
        warnings.push(WARN_OVERLAPPING);
    }

    // Cash combined with a large dispense
    if record.payment_type == "Cash" && (record.quantity > 120 || record.dosage_mg > 90.0) {
        warnings.push(WARN_CASH_LARGE_DISPENSE);
    }

    // Third-party pickup combined with volume or repeats
    if record.pickup_method == "Third-party"
        && (record.quantity > 120 || record.refill_number > 2)
    {
        warnings.push(WARN_THIRD_PARTY_PICKUP);
    }

    // Supply-duration shape checks
    if record.days_supplied > 0 && record.days_supplied < 15 && record.quantity > 90 {
        warnings.push(WARN_SHORT_SUPPLY_HIGH_QUANTITY);
    }
    if record.days_supplied > 90 {
        warnings.push(WARN_LONG_SUPPLY);
    }

    if is_high_risk_drug(&record.drug_name) && record.dosage_mg > 80.0 {
        warnings.push(WARN_CONTROLLED_HIGH_DOSE);
    }

    warnings.into_iter().map(String::from).collect()
}
