use er_core::ErError;
use er_triage::{SelectorError, TriageError};
use thiserror::Error;

use crate::SimPhase;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("simulation configuration error: {0}")]
    Config(String),

    #[error("rounds cannot run before triage has completed")]
    NotTriaged,

    #[error("operation requires phase {expected:?}, simulation is {actual:?}")]
    InvalidPhase {
        expected: SimPhase,
        actual:   SimPhase,
    },

    #[error("triage failed: {0}")]
    Triage(#[from] TriageError),

    /// Selector misuse inside the scheduler — a logic error, fatal to the run.
    #[error("scheduler invariant violated: {0}")]
    Selector(#[from] SelectorError),

    #[error(transparent)]
    Core(#[from] ErError),
}

pub type SimResult<T> = Result<T, SimError>;
