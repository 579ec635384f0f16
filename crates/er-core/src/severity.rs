//! Severity levels and the closed set of triage ratings.
//!
//! Lower severity means more urgent.  A patient enters treatment with a
//! severity of 1–3 and loses one point per treatment visit; severity 0 means
//! fully treated.

use std::fmt;
use std::str::FromStr;

use crate::ErError;

// ── Severity ──────────────────────────────────────────────────────────────────

/// Current urgency of a patient.  Ordered so that the most urgent compares
/// lowest.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Severity(pub u8);

impl Severity {
    /// Fully treated; ready for discharge.
    pub const TREATED: Severity = Severity(0);

    /// One treatment visit's worth of improvement, floored at zero.
    #[inline]
    pub fn decrement(self) -> Severity {
        Severity(self.0.saturating_sub(1))
    }

    #[inline]
    pub fn is_treated(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<TriageRating> for Severity {
    fn from(rating: TriageRating) -> Severity {
        Severity(rating as u8)
    }
}

// ── TriageRating ──────────────────────────────────────────────────────────────

/// The only values a triage assessment may produce.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum TriageRating {
    /// See immediately.
    Immediate = 1,
    Urgent    = 2,
    /// Lowest urgency.
    NonUrgent = 3,
}

impl TriageRating {
    pub fn severity(self) -> Severity {
        Severity::from(self)
    }
}

impl TryFrom<i64> for TriageRating {
    type Error = ErError;

    fn try_from(n: i64) -> Result<TriageRating, ErError> {
        match n {
            1 => Ok(TriageRating::Immediate),
            2 => Ok(TriageRating::Urgent),
            3 => Ok(TriageRating::NonUrgent),
            other => Err(ErError::InvalidRating(other.to_string())),
        }
    }
}

impl FromStr for TriageRating {
    type Err = ErError;

    fn from_str(s: &str) -> Result<TriageRating, ErError> {
        let trimmed = s.trim();
        trimmed
            .parse::<i64>()
            .map_err(|_| ErError::InvalidRating(trimmed.to_owned()))
            .and_then(TriageRating::try_from)
    }
}

impl fmt::Display for TriageRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", *self as u8)
    }
}
