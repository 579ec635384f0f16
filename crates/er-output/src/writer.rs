//! The `DischargeWriter` trait implemented by all backend writers.

use crate::{DischargeRow, OutputResult, RoundSummaryRow};

/// Trait implemented by the CSV and SQLite writers.
pub trait DischargeWriter {
    /// Append one discharge record.
    fn write_discharge(&mut self, row: &DischargeRow) -> OutputResult<()>;

    /// Append one round summary row.
    fn write_round_summary(&mut self, row: &RoundSummaryRow) -> OutputResult<()>;

    /// Flush and close all underlying handles.
    ///
    /// Idempotent — safe to call more than once.
    fn finish(&mut self) -> OutputResult<()>;
}
