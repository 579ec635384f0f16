//! SQLite output backend (feature `sqlite`).
//!
//! Creates a single `discharges.db` file in the configured output directory
//! with two tables: `discharges` and `round_summaries`.

use std::path::Path;

use rusqlite::Connection;

use crate::writer::DischargeWriter;
use crate::{DischargeRow, OutputError, OutputResult, RoundSummaryRow};

/// Writes the discharge log to an SQLite database.
pub struct SqliteWriter {
    conn:     Connection,
    finished: bool,
}

impl SqliteWriter {
    /// Open (or create) `discharges.db` in `dir` and initialise the schema.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let conn = Connection::open(dir.join("discharges.db"))?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous  = NORMAL;
             CREATE TABLE IF NOT EXISTS discharges (
                 round        INTEGER NOT NULL,
                 patient_id   INTEGER NOT NULL,
                 billing_key  INTEGER NOT NULL,
                 name         TEXT    NOT NULL,
                 visits       INTEGER NOT NULL,
                 total_billed INTEGER NOT NULL
             );
             CREATE TABLE IF NOT EXISTS round_summaries (
                 round            INTEGER PRIMARY KEY,
                 in_treatment     INTEGER NOT NULL,
                 waiting          INTEGER NOT NULL,
                 discharged       INTEGER NOT NULL,
                 discharged_total INTEGER NOT NULL,
                 billed_total     INTEGER NOT NULL
             );",
        )?;

        Ok(Self { conn, finished: false })
    }
}

impl DischargeWriter for SqliteWriter {
    fn write_discharge(&mut self, row: &DischargeRow) -> OutputResult<()> {
        if self.finished {
            return Err(OutputError::Finished);
        }
        self.conn.execute(
            "INSERT INTO discharges \
             (round, patient_id, billing_key, name, visits, total_billed) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            rusqlite::params![
                row.round as i64,
                row.patient_id,
                row.billing_key,
                row.name,
                row.visits,
                row.total_billed as i64,
            ],
        )?;
        Ok(())
    }

    fn write_round_summary(&mut self, row: &RoundSummaryRow) -> OutputResult<()> {
        if self.finished {
            return Err(OutputError::Finished);
        }
        self.conn.execute(
            "INSERT INTO round_summaries \
             (round, in_treatment, waiting, discharged, discharged_total, billed_total) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            rusqlite::params![
                row.round as i64,
                row.in_treatment as i64,
                row.waiting as i64,
                row.discharged as i64,
                row.discharged_total as i64,
                row.billed_total as i64,
            ],
        )?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.conn
            .execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
        Ok(())
    }
}
