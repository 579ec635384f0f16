//! `er-triage` — turning an arrival list into a severity-ordered queue.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                  |
//! |---------------|-----------------------------------------------------------|
//! | [`selector`]  | `PrioritySelector` (binary min-heap over `PatientId`)     |
//! | [`triage`]    | `TriageStage`, `TriageOutcome`, `TriageReport`            |
//! | [`oracle`]    | `SeverityOracle` trait, scripted / seeded / prompt impls  |
//! | [`loader`]    | `load_intake_csv`, `load_intake_reader`                   |
//! | [`error`]     | `TriageError`, `SelectorError`, `TriageResult<T>`         |
//!
//! # Flow
//!
//! ```text
//! intake CSV ──loader──▶ ErContext.arrivals (FIFO)
//!                              │  TriageStage: one oracle rating per patient
//!                              ▼
//!                       PrioritySelector (min severity first, FIFO on ties)
//! ```
//!
//! The selector stores only patient ids.  Severity is re-read from the
//! identity table through a lookup closure on every comparison, so the
//! registry stays the single source of truth.

pub mod error;
pub mod loader;
pub mod oracle;
pub mod selector;
pub mod triage;

#[cfg(test)]
mod tests;

pub use error::{SelectorError, TriageError, TriageResult};
pub use loader::{IntakeReport, SkippedRecord, load_intake_csv, load_intake_reader};
pub use oracle::{PromptOracle, ScriptedOracle, SeededOracle, SeverityOracle};
pub use selector::PrioritySelector;
pub use triage::{TriageOutcome, TriageReport, TriageStage};
