use er_core::{ErError, PatientId};
use thiserror::Error;

/// Failures of the fixed-capacity priority selector.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SelectorError {
    /// Insert beyond the capacity chosen at construction.  Indicates the
    /// selector was sized too small for the intake.
    #[error("priority selector full (capacity {capacity}); dropped {id}")]
    Overflow { capacity: usize, id: PatientId },

    /// `peek_min` / `pop_min` on an empty selector.
    #[error("priority selector is empty")]
    Empty,
}

#[derive(Debug, Error)]
pub enum TriageError {
    #[error(transparent)]
    Selector(#[from] SelectorError),

    #[error(transparent)]
    Core(#[from] ErError),

    /// The severity oracle has no more answers (e.g. end of input).
    #[error("severity oracle exhausted while assessing {0}")]
    OracleExhausted(PatientId),

    #[error("intake parse error: {0}")]
    Parse(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type TriageResult<T> = Result<T, TriageError>;
