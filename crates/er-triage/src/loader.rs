//! CSV intake loader.
//!
//! # Format
//!
//! Headerless, one patient per line, exactly seven comma-separated fields:
//!
//! ```csv
//! # name, age, weight, height, billing_key, symptoms, id
//! Ada Lovelace,36,60kg,170cm,123456789,chest pain,1
//! Alan Turing,41,70kg,178cm,987654321,"fever, chills",2
//! ```
//!
//! Fields are trimmed; quoted fields may contain commas; lines starting with
//! `#` are ignored.  `age`, `billing_key` and `id` must be non-negative
//! integers; `id` and `billing_key` may not be `u32::MAX`, which is reserved
//! as the invalid-id sentinel.
//!
//! A malformed line (wrong field count, bad number) is skipped and recorded
//! in [`IntakeReport::skipped`]; it never fails the whole load.  Failing to
//! read the source at all does.

use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Trim};
use tracing::{info, warn};

use er_core::{BillingKey, Patient, PatientId};

use crate::{TriageError, TriageResult};

/// Number of fields in an intake record.
pub const INTAKE_FIELDS: usize = 7;

/// A line that could not be turned into a patient.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SkippedRecord {
    /// 1-based line number in the source, when known.
    pub line:   u64,
    pub reason: String,
}

/// Result of loading an intake source.
#[derive(Clone, Debug, Default)]
pub struct IntakeReport {
    /// Well-formed patients in source order.
    pub patients: Vec<Patient>,
    pub skipped:  Vec<SkippedRecord>,
}

/// Load intake records from a file.
pub fn load_intake_csv(path: &Path) -> TriageResult<IntakeReport> {
    let file = std::fs::File::open(path)?;
    load_intake_reader(file)
}

/// Like [`load_intake_csv`] but accepts any `Read` source.
pub fn load_intake_reader<R: Read>(reader: R) -> TriageResult<IntakeReport> {
    let mut csv_reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .comment(Some(b'#'))
        .from_reader(reader);

    let mut report = IntakeReport::default();

    for result in csv_reader.records() {
        let record = match result {
            Ok(r) => r,
            Err(e) if e.is_io_error() => return Err(TriageError::Csv(e)),
            Err(e) => {
                let line = e.position().map_or(0, |p| p.line());
                skip(&mut report, line, e.to_string());
                continue;
            }
        };
        let line = record.position().map_or(0, |p| p.line());
        match parse_record(&record) {
            Ok(patient) => report.patients.push(patient),
            Err(reason) => skip(&mut report, line, reason),
        }
    }

    info!(
        loaded = report.patients.len(),
        skipped = report.skipped.len(),
        "intake loaded"
    );
    Ok(report)
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn skip(report: &mut IntakeReport, line: u64, reason: String) {
    warn!(line, %reason, "skipping malformed intake record");
    report.skipped.push(SkippedRecord { line, reason });
}

fn parse_record(record: &StringRecord) -> Result<Patient, String> {
    if record.len() != INTAKE_FIELDS {
        return Err(format!(
            "expected {INTAKE_FIELDS} fields, found {}",
            record.len()
        ));
    }
    let name        = &record[0];
    let age         = parse_u32(&record[1], "age")?;
    let weight      = &record[2];
    let height      = &record[3];
    let billing_key = parse_u32(&record[4], "billing_key")?;
    let symptoms    = &record[5];
    let id          = parse_u32(&record[6], "id")?;

    if name.is_empty() {
        return Err("empty name".to_owned());
    }
    // u32::MAX is the "no id" sentinel for both identifiers.
    if id == PatientId::INVALID.0 {
        return Err(format!("id {id} is reserved"));
    }
    if billing_key == BillingKey::INVALID.0 {
        return Err(format!("billing_key {billing_key} is reserved"));
    }

    Ok(Patient::new(
        PatientId(id),
        BillingKey(billing_key),
        name,
        age,
        weight,
        height,
        symptoms,
    ))
}

fn parse_u32(field: &str, what: &str) -> Result<u32, String> {
    field
        .parse::<u32>()
        .map_err(|_| format!("invalid {what} {field:?}: expected a non-negative integer"))
}
