//! `er-output` — discharge and billing log writers for er_sim.
//!
//! | Feature   | Backend | Files created                                 |
//! |-----------|---------|-----------------------------------------------|
//! | *(none)*  | CSV     | `discharges.csv`, `round_summaries.csv`       |
//! | `sqlite`  | SQLite  | `discharges.db`                               |
//!
//! All backends implement [`DischargeWriter`] and are driven by
//! [`OutputObserver`], which implements `er_sim::SimObserver`.  Writes are
//! best-effort: a failed write is logged and reported back to the scheduler
//! as a sink failure, and the run carries on.
//!
//! # Usage
//!
//! ```rust,ignore
//! use er_output::{CsvWriter, OutputObserver};
//!
//! let writer = CsvWriter::new(Path::new("./output"))?;
//! let mut obs = OutputObserver::new(writer);
//! sim.run(&mut obs)?;
//! if let Some(e) = obs.take_error() {
//!     tracing::warn!("output error: {e}");
//! }
//! ```

pub mod csv;
pub mod error;
pub mod observer;
pub mod row;
pub mod writer;

#[cfg(feature = "sqlite")]
pub mod sqlite;


pub use csv::CsvWriter;
pub use error::{OutputError, OutputResult};
pub use observer::OutputObserver;
pub use row::{DischargeRow, RoundSummaryRow};
pub use writer::DischargeWriter;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteWriter;
