//! Dispensing-export parser.
//!
//! Converts raw delimited text into [`PrescriptionRecord`]s:
//! - the first non-empty line is the header row; blank lines are skipped
//! - cells are matched to fields by exact header name; unknown headers are
//!   ignored, missing headers leave the field at its default
//! - numeric cells parse-or-default: required fields fall back to zero,
//!   `Adherence_Score` falls back to absent
//!
//! A malformed cell degrades that one field. The only hard failures are an
//! input with no data rows and an input over the size bound.

use std::collections::HashMap;

use thiserror::Error;
use tracing::{debug, warn};

use crate::models::PrescriptionRecord;

/// Upper bound on accepted input size; the whole export is materialized.
pub const MAX_INPUT_BYTES: usize = 64 * 1024 * 1024;

// Recognized header names, matched case-sensitively.
const H_PATIENT_ID: &str = "Patient_ID";
const H_FULL_NAME: &str = "Full_Name";
const H_DATE_OF_BIRTH: &str = "Date_Of_Birth";
const H_GENDER: &str = "Gender";
const H_PRESCRIBER_ID: &str = "Prescriber_ID";
const H_PRESCRIBER_DEA: &str = "Prescriber_DEA";
const H_PRESCRIBER_NAME: &str = "Prescriber_Name";
const H_PHARMACY_NAME: &str = "Pharmacy_Name";
const H_DRUG_NAME: &str = "Drug_Name";
const H_DRUG_CODE: &str = "Drug_Code";
const H_PRESCRIPTION_DATE: &str = "Prescription_Date";
const H_DISPENSE_DATE: &str = "Dispense_Date";
const H_REFILL_DATE: &str = "Refill_Date";
const H_DAYS_SUPPLIED: &str = "Days_Supplied";
const H_DOSAGE_MG: &str = "Dosage_mg";
const H_QUANTITY: &str = "Quantity";
const H_REFILL_NUMBER: &str = "Refill_Number";
const H_PAYMENT_TYPE: &str = "Payment_Type";
const H_PICKUP_METHOD: &str = "Pickup_Method";
const H_PDMP_STATUS: &str = "State_PDMP_Status";
const H_OVERLAPPING: &str = "Overlapping_Prescriptions";
const H_ADHERENCE_SCORE: &str = "Adherence_Score";
const H_NOTES: &str = "Notes";

/// Batch-level parse errors.
#[derive(Error, Debug)]
pub enum FormatError {
    #[error("input must contain a header row and at least one data row")]
    NoDataRows,

    #[error("input of {0} bytes exceeds the {MAX_INPUT_BYTES}-byte limit")]
    InputTooLarge(usize),
}

pub type ParseResult<T> = Result<T, FormatError>;

/// Parse a raw dispensing export into records, preserving input row order.
pub fn parse(raw_text: &str) -> ParseResult<Vec<PrescriptionRecord>> {
    if raw_text.len() > MAX_INPUT_BYTES {
        return Err(FormatError::InputTooLarge(raw_text.len()));
    }

    let mut lines = raw_text.lines().filter(|line| !line.trim().is_empty());
    let header = lines.next().ok_or(FormatError::NoDataRows)?;
    let columns = ColumnMap::from_header(header);

    let records: Vec<PrescriptionRecord> = lines.map(|line| parse_row(line, &columns)).collect();
    if records.is_empty() {
        return Err(FormatError::NoDataRows);
    }

    debug!(records = records.len(), "parsed dispensing batch");
    Ok(records)
}

/// Header-name → column-index map built from the header row.
struct ColumnMap(HashMap<String, usize>);

impl ColumnMap {
    fn from_header(line: &str) -> Self {
        let mut map = HashMap::new();
        for (index, raw) in line.split(',').enumerate() {
            // First occurrence wins on duplicate headers
            map.entry(clean_cell(raw).to_string()).or_insert(index);
        }
        Self(map)
    }

    /// Cell for a header, or empty when the header or cell is missing.
    fn get<'a>(&self, cells: &[&'a str], header: &str) -> &'a str {
        self.0
            .get(header)
            .and_then(|&index| cells.get(index).copied())
            .unwrap_or("")
    }
}

fn parse_row(line: &str, columns: &ColumnMap) -> PrescriptionRecord {
    let cells: Vec<&str> = line.split(',').map(clean_cell).collect();
    let cell = |header: &str| columns.get(&cells, header);

    PrescriptionRecord {
        patient_id: cell(H_PATIENT_ID).to_string(),
        full_name: cell(H_FULL_NAME).to_string(),
        date_of_birth: cell(H_DATE_OF_BIRTH).to_string(),
        gender: cell(H_GENDER).to_string(),
        prescriber_id: cell(H_PRESCRIBER_ID).to_string(),
        prescriber_dea: non_empty(cell(H_PRESCRIBER_DEA)),
        prescriber_name: cell(H_PRESCRIBER_NAME).to_string(),
        pharmacy_name: cell(H_PHARMACY_NAME).to_string(),
        drug_name: cell(H_DRUG_NAME).to_string(),
        drug_code: cell(H_DRUG_CODE).to_string(),
        prescription_date: cell(H_PRESCRIPTION_DATE).to_string(),
        dispense_date: cell(H_DISPENSE_DATE).to_string(),
        refill_date: non_empty(cell(H_REFILL_DATE)),
        days_supplied: int_or_zero(cell(H_DAYS_SUPPLIED), H_DAYS_SUPPLIED),
        dosage_mg: float_or_zero(cell(H_DOSAGE_MG), H_DOSAGE_MG),
        quantity: int_or_zero(cell(H_QUANTITY), H_QUANTITY),
        refill_number: int_or_zero(cell(H_REFILL_NUMBER), H_REFILL_NUMBER),
        payment_type: cell(H_PAYMENT_TYPE).to_string(),
        pickup_method: cell(H_PICKUP_METHOD).to_string(),
        pdmp_status: cell(H_PDMP_STATUS).to_string(),
        overlapping_prescriptions: cell(H_OVERLAPPING).eq_ignore_ascii_case("true"),
        adherence_score: optional_float(cell(H_ADHERENCE_SCORE), H_ADHERENCE_SCORE),
        notes: non_empty(cell(H_NOTES)),
    }
}

/// Trim surrounding whitespace and one layer of enclosing double quotes.
fn clean_cell(raw: &str) -> &str {
    let trimmed = raw.trim();
    if trimmed.len() >= 2 && trimmed.starts_with('"') && trimmed.ends_with('"') {
        &trimmed[1..trimmed.len() - 1]
    } else {
        trimmed
    }
}

fn int_or_zero(cell: &str, column: &'static str) -> i64 {
    cell.parse().unwrap_or_else(|_| {
        if !cell.is_empty() {
            warn!(column, value = cell, "unparsable integer cell, defaulting to 0");
        }
        0
    })
}

fn float_or_zero(cell: &str, column: &'static str) -> f64 {
    cell.parse().unwrap_or_else(|_| {
        if !cell.is_empty() {
            warn!(column, value = cell, "unparsable numeric cell, defaulting to 0");
        }
        0.0
    })
}

/// Optional numeric field: absent (not zero) when missing or unparsable.
fn optional_float(cell: &str, column: &'static str) -> Option<f64> {
    if cell.is_empty() {
        return None;
    }
    match cell.parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!(column, value = cell, "unparsable numeric cell, dropping value");
            None
        }
    }
}

fn non_empty(cell: &str) -> Option<String> {
    if cell.is_empty() {
        None
    } else {
        Some(cell.to_string())
    }
}
