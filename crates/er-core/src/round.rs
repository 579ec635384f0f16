//! Simulation round counter.
//!
//! There is no wall clock: the only notion of time is the number of
//! treat-then-admit rounds executed so far.

use std::fmt;

/// A monotonically increasing round counter.  `Round::ZERO` is the state
/// after triage, before the first round has been executed.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Round(pub u64);

impl Round {
    pub const ZERO: Round = Round(0);

    /// The round after `self`.
    #[inline]
    pub fn next(self) -> Round {
        Round(self.0 + 1)
    }

    /// Rounds elapsed from `earlier` to `self`.
    #[inline]
    pub fn since(self, earlier: Round) -> u64 {
        self.0 - earlier.0
    }
}

impl fmt::Display for Round {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "R{}", self.0)
    }
}
