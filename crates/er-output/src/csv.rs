//! CSV output backend.
//!
//! Creates two files in the configured output directory:
//! - `discharges.csv`
//! - `round_summaries.csv`

use std::fs::File;
use std::path::Path;

use csv::Writer;

use crate::writer::DischargeWriter;
use crate::{DischargeRow, OutputError, OutputResult, RoundSummaryRow};

/// Writes the discharge log and round summaries to two CSV files.
///
/// Discharge rows are flushed as they are written so the log survives a
/// crash mid-run.
pub struct CsvWriter {
    discharges: Writer<File>,
    summaries:  Writer<File>,
    finished:   bool,
}

impl CsvWriter {
    /// Create the two CSV files in `dir` and write the header rows.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let mut discharges = Writer::from_path(dir.join("discharges.csv"))?;
        discharges.write_record(["round", "patient_id", "billing_key", "name", "visits", "total_billed"])?;

        let mut summaries = Writer::from_path(dir.join("round_summaries.csv"))?;
        summaries.write_record([
            "round",
            "in_treatment",
            "waiting",
            "discharged",
            "discharged_total",
            "billed_total",
        ])?;

        Ok(Self {
            discharges,
            summaries,
            finished: false,
        })
    }
}

impl DischargeWriter for CsvWriter {
    fn write_discharge(&mut self, row: &DischargeRow) -> OutputResult<()> {
        if self.finished {
            return Err(OutputError::Finished);
        }
        self.discharges.write_record(&[
            row.round.to_string(),
            row.patient_id.to_string(),
            row.billing_key.to_string(),
            row.name.clone(),
            row.visits.to_string(),
            row.total_billed.to_string(),
        ])?;
        self.discharges.flush()?;
        Ok(())
    }

    fn write_round_summary(&mut self, row: &RoundSummaryRow) -> OutputResult<()> {
        if self.finished {
            return Err(OutputError::Finished);
        }
        self.summaries.write_record(&[
            row.round.to_string(),
            row.in_treatment.to_string(),
            row.waiting.to_string(),
            row.discharged.to_string(),
            row.discharged_total.to_string(),
            row.billed_total.to_string(),
        ])?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.discharges.flush()?;
        self.summaries.flush()?;
        Ok(())
    }
}
