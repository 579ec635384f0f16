//! `OutputObserver<W>` — bridges `SimObserver` to a `DischargeWriter`.

use tracing::warn;

use er_core::Round;
use er_sim::{DischargeRecord, RoundSnapshot, SimObserver, SinkResult};

use crate::row::{DischargeRow, RoundSummaryRow};
use crate::writer::DischargeWriter;
use crate::{OutputError, OutputResult};

/// A [`SimObserver`] that persists discharge records and round summaries to
/// any [`DischargeWriter`] backend.
///
/// Discharge write failures are returned to the scheduler, which logs them
/// and counts them as sink failures.  Summary and finish failures are logged
/// here.  The first error of any kind is kept for
/// [`take_error`][Self::take_error].
pub struct OutputObserver<W: DischargeWriter> {
    writer:     W,
    written:    usize,
    last_error: Option<OutputError>,
}

impl<W: DischargeWriter> OutputObserver<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            written:    0,
            last_error: None,
        }
    }

    /// Take the stored write error (if any) after the run.
    ///
    /// Returns `None` if all writes succeeded.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    /// Discharge rows successfully written.
    pub fn discharges_written(&self) -> usize {
        self.written
    }

    /// Unwrap the inner writer (e.g. to inspect files after the run).
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn store_err(&mut self, result: OutputResult<()>, what: &str) {
        if let Err(e) = result {
            warn!(error = %e, "{what} write failed");
            // Keep only the first error.
            if self.last_error.is_none() {
                self.last_error = Some(e);
            }
        }
    }
}

impl<W: DischargeWriter> SimObserver for OutputObserver<W> {
    fn on_discharge(&mut self, record: &DischargeRecord) -> SinkResult {
        match self.writer.write_discharge(&DischargeRow::from(record)) {
            Ok(()) => {
                self.written += 1;
                Ok(())
            }
            Err(e) => {
                let message = e.to_string();
                if self.last_error.is_none() {
                    self.last_error = Some(e);
                }
                Err(message.into())
            }
        }
    }

    fn on_round_end(&mut self, snapshot: &RoundSnapshot) {
        let result = self.writer.write_round_summary(&RoundSummaryRow::from(snapshot));
        self.store_err(result, "round summary");
    }

    fn on_sim_end(&mut self, _final_round: Round) {
        let result = self.writer.finish();
        self.store_err(result, "finish");
    }
}
