//! Prescription-dispensing record model.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Date format used throughout dispensing exports.
const DATE_FORMAT: &str = "%Y-%m-%d";

/// A single dispensing record, parsed from one data row.
///
/// Required fields fall back to the type's zero value when the source cell
/// is missing or malformed; a bad cell never rejects the record.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PrescriptionRecord {
    /// Patient identifier as given by the source system
    pub patient_id: String,
    /// Patient full name
    pub full_name: String,
    /// Date of birth (`YYYY-MM-DD`)
    pub date_of_birth: String,
    /// Patient gender
    pub gender: String,
    /// Prescriber identifier
    pub prescriber_id: String,
    /// Prescriber DEA number, when the export carries one
    pub prescriber_dea: Option<String>,
    /// Prescriber name
    pub prescriber_name: String,
    /// Dispensing pharmacy name
    pub pharmacy_name: String,
    /// Drug name as dispensed
    pub drug_name: String,
    /// Drug code (NDC or source-system code)
    pub drug_code: String,
    /// Prescription date (`YYYY-MM-DD`)
    pub prescription_date: String,
    /// Dispense date (`YYYY-MM-DD`)
    pub dispense_date: String,
    /// Refill date, absent when the row has none
    pub refill_date: Option<String>,
    /// Days of supply dispensed
    pub days_supplied: i64,
    /// Dosage strength in mg
    pub dosage_mg: f64,
    /// Quantity dispensed
    pub quantity: i64,
    /// Refill sequence number
    pub refill_number: i64,
    /// Payment type (e.g. "Cash", "Insurance", "Medicaid", "Medicare")
    pub payment_type: String,
    /// Pickup method (e.g. "In-person", "Delivery", "Third-party")
    pub pickup_method: String,
    /// State PDMP lookup status (e.g. "Matched", "Unmatched", "Not Available")
    pub pdmp_status: String,
    /// Whether the source flagged overlapping active prescriptions
    pub overlapping_prescriptions: bool,
    /// Adherence score (0-100), absent when missing or unparsable
    pub adherence_score: Option<f64>,
    /// Free-text notes, absent when blank
    pub notes: Option<String>,
}

impl PrescriptionRecord {
    /// Birth year extracted from `date_of_birth`, if it parses.
    pub fn birth_year(&self) -> Option<i32> {
        use chrono::Datelike;
        NaiveDate::parse_from_str(&self.date_of_birth, DATE_FORMAT)
            .ok()
            .map(|d| d.year())
    }

    /// Whole days between prescription date and refill date.
    ///
    /// `None` unless both dates are present and parse. Negative when the
    /// refill predates the prescription.
    pub fn refill_interval_days(&self) -> Option<i64> {
        let refill = self.refill_date.as_deref()?;
        let refill = NaiveDate::parse_from_str(refill, DATE_FORMAT).ok()?;
        let prescribed = NaiveDate::parse_from_str(&self.prescription_date, DATE_FORMAT).ok()?;
        Some(refill.signed_duration_since(prescribed).num_days())
    }
}
