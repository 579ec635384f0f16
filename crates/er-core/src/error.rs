//! Shared error type for the `er-*` crates.
//!
//! Sub-crates define their own enums and wrap `ErError` as one variant via
//! `#[from]`.

use thiserror::Error;

use crate::PatientId;

#[derive(Debug, Error)]
pub enum ErError {
    #[error("patient {0} not found")]
    PatientNotFound(PatientId),

    #[error("patient {0} registered twice")]
    DuplicatePatient(PatientId),

    #[error("invalid triage rating {0:?}: expected 1, 2 or 3")]
    InvalidRating(String),

    #[error("patient {0} already has a severity assigned")]
    AlreadyTriaged(PatientId),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Shorthand result type for the `er-*` crates.
pub type ErResult<T> = Result<T, ErError>;
