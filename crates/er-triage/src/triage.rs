//! The triage stage: pending → ranked, exactly once per patient.
//!
//! Pending patients are taken from `ErContext::arrivals` in FIFO order.  For
//! each one the oracle is asked for a rating until it produces a valid one;
//! invalid responses are logged and never reach the patient record.  The
//! ranked patient is then inserted into the [`PrioritySelector`].
//!
//! Arrival order only decides who is asked first.  Treatment order is decided
//! by severity in the selector.

use tracing::{debug, warn};

use er_core::{ErContext, ErError, PatientId, TriageRating, TriageState};

use crate::{PrioritySelector, SelectorError, SeverityOracle, TriageResult};

/// What happened to one arrival.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TriageOutcome {
    /// Rated and queued for treatment.
    Ranked { id: PatientId, rating: TriageRating },
    /// Rated, but the selector was full; the patient is not queued.
    Overflowed { id: PatientId, rating: TriageRating },
    /// The arrival queue named a patient the registry does not know.
    Unresolved(PatientId),
    /// The patient was already ranked (duplicate arrival); not re-queued.
    AlreadyRanked(PatientId),
}

/// Running tally of a triage pass.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TriageReport {
    pub ranked:         Vec<PatientId>,
    pub overflowed:     Vec<PatientId>,
    pub unresolved:     Vec<PatientId>,
    pub duplicates:     Vec<PatientId>,
    /// Oracle responses rejected as invalid ratings.
    pub rejected_ratings: usize,
}

impl TriageReport {
    fn record(&mut self, outcome: TriageOutcome) {
        match outcome {
            TriageOutcome::Ranked { id, .. }     => self.ranked.push(id),
            TriageOutcome::Overflowed { id, .. } => self.overflowed.push(id),
            TriageOutcome::Unresolved(id)        => self.unresolved.push(id),
            TriageOutcome::AlreadyRanked(id)     => self.duplicates.push(id),
        }
    }
}

/// Drives the pending → ranked transition.
#[derive(Debug, Default)]
pub struct TriageStage {
    report: TriageReport,
}

impl TriageStage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn report(&self) -> &TriageReport {
        &self.report
    }

    /// Triage every pending arrival and return the tally.
    pub fn run<O: SeverityOracle + ?Sized>(
        mut self,
        ctx:      &mut ErContext,
        selector: &mut PrioritySelector,
        oracle:   &mut O,
    ) -> TriageResult<TriageReport> {
        while self.step(ctx, selector, oracle)?.is_some() {}
        Ok(self.report)
    }

    /// Triage the next pending arrival.  Returns `Ok(None)` once the arrival
    /// queue is empty.
    ///
    /// An error from the oracle aborts the step; the patient stays pending at
    /// the front of the arrival queue, so a later run asks for it again.
    pub fn step<O: SeverityOracle + ?Sized>(
        &mut self,
        ctx:      &mut ErContext,
        selector: &mut PrioritySelector,
        oracle:   &mut O,
    ) -> TriageResult<Option<TriageOutcome>> {
        let Some(id) = ctx.arrivals.pop_front() else {
            return Ok(None);
        };

        let state = ctx.patients.get(id).map(|p| p.triage_state());
        let outcome = match state {
            None => {
                warn!(patient = %id, "arrival has no patient record; skipping");
                TriageOutcome::Unresolved(id)
            }
            Some(TriageState::Ranked) => {
                warn!(patient = %id, "patient already ranked; ignoring duplicate arrival");
                TriageOutcome::AlreadyRanked(id)
            }
            Some(TriageState::Pending) => {
                let rating = match self.obtain_rating(ctx, id, oracle) {
                    Ok(rating) => rating,
                    Err(e) => {
                        ctx.arrivals.push_front(id);
                        return Err(e);
                    }
                };
                ctx.patients.require_mut(id)?.assign_rating(rating)?;

                let patients = &ctx.patients;
                match selector.insert(id, |pid| patients.severity_of(pid)) {
                    Ok(()) => {
                        debug!(patient = %id, %rating, "patient ranked");
                        TriageOutcome::Ranked { id, rating }
                    }
                    Err(e @ SelectorError::Overflow { .. }) => {
                        warn!(patient = %id, error = %e, "selector overflow; insert dropped");
                        TriageOutcome::Overflowed { id, rating }
                    }
                    Err(e) => return Err(e.into()),
                }
            }
        };

        self.report.record(outcome);
        Ok(Some(outcome))
    }

    /// Ask until the oracle gives a rating in the closed set.
    fn obtain_rating<O: SeverityOracle + ?Sized>(
        &mut self,
        ctx:    &ErContext,
        id:     PatientId,
        oracle: &mut O,
    ) -> TriageResult<TriageRating> {
        let patient = ctx.patients.get(id).ok_or(ErError::PatientNotFound(id))?;
        loop {
            let response = oracle.assess(patient)?;
            match response.parse::<TriageRating>() {
                Ok(rating) => return Ok(rating),
                Err(e) => {
                    warn!(patient = %id, response = %response, "rejected severity rating");
                    self.report.rejected_ratings += 1;
                    oracle.rejected(patient, &response, &e);
                }
            }
        }
    }
}
