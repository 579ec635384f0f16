//! Sources of triage ratings.
//!
//! An oracle returns a *raw* response.  Parsing and validation happen in the
//! triage stage, which re-asks until the response is one of `1`, `2`, `3`.

use std::collections::VecDeque;
use std::io::{BufRead, Write};

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use tracing::warn;

use er_core::{ErError, Patient};

use crate::{TriageError, TriageResult};

/// Supplies a severity rating for one patient.
pub trait SeverityOracle {
    /// Produce a raw rating for `patient`.  May be called again for the same
    /// patient after [`rejected`](Self::rejected).
    fn assess(&mut self, patient: &Patient) -> TriageResult<String>;

    /// Called when the last response from [`assess`](Self::assess) was not a
    /// valid rating.  Default: nothing.
    fn rejected(&mut self, _patient: &Patient, _response: &str, _reason: &ErError) {}
}

impl<O: SeverityOracle + ?Sized> SeverityOracle for &mut O {
    fn assess(&mut self, patient: &Patient) -> TriageResult<String> {
        (**self).assess(patient)
    }

    fn rejected(&mut self, patient: &Patient, response: &str, reason: &ErError) {
        (**self).rejected(patient, response, reason)
    }
}

// ── ScriptedOracle ────────────────────────────────────────────────────────────

/// Replays a fixed list of responses in order, one per `assess` call.
#[derive(Clone, Debug, Default)]
pub struct ScriptedOracle {
    responses: VecDeque<String>,
    rejected:  usize,
}

impl ScriptedOracle {
    pub fn new<I, S>(responses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            responses: responses.into_iter().map(Into::into).collect(),
            rejected:  0,
        }
    }

    /// Responses not yet consumed.
    pub fn remaining(&self) -> usize {
        self.responses.len()
    }

    /// How many responses were rejected as invalid.
    pub fn rejected_count(&self) -> usize {
        self.rejected
    }
}

impl SeverityOracle for ScriptedOracle {
    fn assess(&mut self, patient: &Patient) -> TriageResult<String> {
        self.responses
            .pop_front()
            .ok_or(TriageError::OracleExhausted(patient.id))
    }

    fn rejected(&mut self, _patient: &Patient, _response: &str, _reason: &ErError) {
        self.rejected += 1;
    }
}

// ── SeededOracle ──────────────────────────────────────────────────────────────

/// Deterministic pseudo-random ratings for unattended runs.  The same seed
/// always yields the same sequence of ratings.
pub struct SeededOracle(SmallRng);

impl SeededOracle {
    pub fn new(seed: u64) -> Self {
        SeededOracle(SmallRng::seed_from_u64(seed))
    }
}

impl SeverityOracle for SeededOracle {
    fn assess(&mut self, _patient: &Patient) -> TriageResult<String> {
        Ok(self.0.gen_range(1..=3u8).to_string())
    }
}

// ── PromptOracle ──────────────────────────────────────────────────────────────

/// Asks a person.  Writes the patient summary to `output` and reads one line
/// from `input` per rating.
pub struct PromptOracle<R, W> {
    input:  R,
    output: W,
}

impl<R: BufRead, W: Write> PromptOracle<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn into_inner(self) -> (R, W) {
        (self.input, self.output)
    }
}

impl<R: BufRead, W: Write> SeverityOracle for PromptOracle<R, W> {
    fn assess(&mut self, patient: &Patient) -> TriageResult<String> {
        write!(
            self.output,
            "{} {}\nSeverity (1 = see immediately, 3 = lowest urgency): ",
            patient.id,
            patient.summary(),
        )?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(TriageError::OracleExhausted(patient.id));
        }
        Ok(line.trim().to_owned())
    }

    fn rejected(&mut self, patient: &Patient, response: &str, _reason: &ErError) {
        if let Err(e) = writeln!(self.output, "{response:?} is not a valid severity; enter 1, 2 or 3.") {
            warn!(patient = %patient.id, error = %e, "could not write prompt");
        }
    }
}
