//! The `ErSim` struct and its round loop.

use tracing::{debug, info, warn};

use er_core::{ErConfig, ErContext, PatientId, Round};
use er_triage::{PrioritySelector, SeverityOracle, TriageReport, TriageStage};

use crate::observer::{DischargeRecord, DoctorView, PatientView, RoundSnapshot, SimObserver};
use crate::{DoctorSlot, SimError, SimResult};

#[cfg(feature = "fx-hash")]
type IdSet = rustc_hash::FxHashSet<PatientId>;
#[cfg(not(feature = "fx-hash"))]
type IdSet = std::collections::HashSet<PatientId>;

/// Lifecycle of a run.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SimPhase {
    /// Built; arrivals not yet rated.
    AwaitingTriage,
    /// Triaged; each `advance` runs one round.
    Ready,
    /// Selector empty and every slot empty.  Terminal.
    Finished,
}

/// Counts for one executed round.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct RoundSummary {
    pub round:      Round,
    /// Treatment visits applied in the treat phase.
    pub treated:    usize,
    pub discharged: usize,
    pub admitted:   usize,
}

/// Result of one [`ErSim::advance`] call.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RoundOutcome {
    Advanced(RoundSummary),
    /// Nothing left to do; no round was executed.
    Finished,
}

// ── ErSim ─────────────────────────────────────────────────────────────────────

/// The treatment scheduler.
///
/// Owns the simulation context (arrivals, identity table, billing), the
/// priority selector, and a fixed pool of doctor slots.  Create via
/// [`SimBuilder`][crate::SimBuilder], rate arrivals with
/// [`triage`](Self::triage), then drive rounds with
/// [`advance`](Self::advance) or [`run`](Self::run).
pub struct ErSim {
    /// Run configuration.  Fixed for the lifetime of the run.
    pub config: ErConfig,

    /// Arrival queue, identity table and billing ledger.
    pub ctx: ErContext,

    /// Severity-ordered queue of triaged patients awaiting a slot.
    pub selector: PrioritySelector,

    doctors:       Vec<DoctorSlot>,
    occupied:      IdSet,
    phase:         SimPhase,
    round:         Round,
    intake_count:  usize,
    discharged:    Vec<DischargeRecord>,
    triage_report: Option<TriageReport>,
    sink_failures: usize,
}

impl ErSim {
    pub(crate) fn new(config: ErConfig, ctx: ErContext, selector: PrioritySelector) -> Self {
        let doctors = (0..config.doctor_count)
            .map(|_| DoctorSlot::new(config.capacity_per_doctor))
            .collect();
        let intake_count = ctx.patients.len();
        Self {
            config,
            ctx,
            selector,
            doctors,
            occupied: IdSet::default(),
            phase: SimPhase::AwaitingTriage,
            round: Round::ZERO,
            intake_count,
            discharged: Vec::new(),
            triage_report: None,
            sink_failures: 0,
        }
    }

    // ── Public API ────────────────────────────────────────────────────────

    /// Rate every pending arrival, rank it into the selector, then fill the
    /// doctor slots so the first round has patients to treat.
    pub fn triage<O: SeverityOracle + ?Sized>(&mut self, oracle: &mut O) -> SimResult<&TriageReport> {
        if self.phase != SimPhase::AwaitingTriage {
            return Err(SimError::InvalidPhase {
                expected: SimPhase::AwaitingTriage,
                actual:   self.phase,
            });
        }

        let report = TriageStage::new().run(&mut self.ctx, &mut self.selector, oracle)?;
        info!(
            ranked = report.ranked.len(),
            overflowed = report.overflowed.len(),
            rejected_ratings = report.rejected_ratings,
            "triage complete"
        );

        let admitted = self.admit_phase()?;
        debug!(admitted, "initial admission");

        self.phase = SimPhase::Ready;
        Ok(self.triage_report.insert(report))
    }

    /// Execute exactly one round.
    ///
    /// Returns [`RoundOutcome::Finished`] without doing any work once the
    /// terminal state has been reached.  The round that reaches it calls
    /// [`SimObserver::on_sim_end`].
    pub fn advance<O: SimObserver + ?Sized>(&mut self, observer: &mut O) -> SimResult<RoundOutcome> {
        match self.phase {
            SimPhase::AwaitingTriage => return Err(SimError::NotTriaged),
            SimPhase::Finished       => return Ok(RoundOutcome::Finished),
            SimPhase::Ready          => {}
        }

        // Nothing was ever admitted (empty intake): finish without a round.
        if self.is_terminal() {
            self.finish(observer);
            return Ok(RoundOutcome::Finished);
        }

        let round = self.round.next();
        observer.on_round_start(round);

        let (treated, discharged) = self.treat_phase(round, observer);
        let admitted = self.admit_phase()?;
        self.round = round;

        let summary = RoundSummary { round, treated, discharged, admitted };
        debug!(%round, treated, discharged, admitted, "round complete");

        let snapshot = self.snapshot_with(discharged);
        observer.on_round_end(&snapshot);

        if self.is_terminal() {
            self.finish(observer);
        }
        Ok(RoundOutcome::Advanced(summary))
    }

    /// Advance until the terminal state.  Returns the number of rounds run.
    pub fn run<O: SimObserver + ?Sized>(&mut self, observer: &mut O) -> SimResult<u64> {
        let start = self.round;
        while let RoundOutcome::Advanced(_) = self.advance(observer)? {}
        Ok(self.round.since(start))
    }

    /// Current occupancy and per-patient state.
    pub fn snapshot(&self) -> RoundSnapshot {
        self.snapshot_with(0)
    }

    // ── Observers ─────────────────────────────────────────────────────────

    pub fn phase(&self) -> SimPhase {
        self.phase
    }

    pub fn is_finished(&self) -> bool {
        self.phase == SimPhase::Finished
    }

    /// Last completed round; `Round::ZERO` before the first.
    pub fn round(&self) -> Round {
        self.round
    }

    pub fn doctors(&self) -> &[DoctorSlot] {
        &self.doctors
    }

    /// Discharge history in discharge order.
    pub fn discharged(&self) -> &[DischargeRecord] {
        &self.discharged
    }

    pub fn triage_report(&self) -> Option<&TriageReport> {
        self.triage_report.as_ref()
    }

    /// Patients admitted at intake.
    pub fn intake_count(&self) -> usize {
        self.intake_count
    }

    /// Patients registered and not yet discharged.
    pub fn active_count(&self) -> usize {
        self.ctx.patients.len()
    }

    pub fn waiting_count(&self) -> usize {
        self.selector.len()
    }

    pub fn in_treatment_count(&self) -> usize {
        self.occupied.len()
    }

    /// Discharge records the observer failed to accept.
    pub fn sink_failures(&self) -> usize {
        self.sink_failures
    }

    // ── Phases ────────────────────────────────────────────────────────────

    /// Treat every occupant once.  Returns `(visits, discharges)`.
    fn treat_phase<O: SimObserver + ?Sized>(&mut self, round: Round, observer: &mut O) -> (usize, usize) {
        let charge = self.config.visit_charge;
        let mut treated = 0;
        let mut discharged = 0;

        for slot in &mut self.doctors {
            let occupants = slot.take();
            let mut remaining = Vec::with_capacity(occupants.len());

            for id in occupants {
                let Some(patient) = self.ctx.patients.get_mut(id) else {
                    warn!(patient = %id, "occupant has no patient record; freeing slot");
                    self.occupied.remove(&id);
                    continue;
                };

                patient.record_visit();
                self.ctx.billing.charge(patient.billing_key, charge);
                treated += 1;

                if !patient.is_treated() {
                    remaining.push(id);
                    continue;
                }

                // Fully treated: discharge now, within this phase.
                self.occupied.remove(&id);
                let Some(patient) = self.ctx.patients.remove(id) else {
                    continue;
                };
                let visits = patient.visit_count();
                let record = DischargeRecord {
                    round,
                    patient_id:   id,
                    billing_key:  patient.billing_key,
                    visits,
                    total_billed: self.ctx.billing.total(patient.billing_key),
                    name:         patient.name,
                };
                debug!(patient = %id, visits = record.visits, total = record.total_billed, "discharged");

                if let Err(e) = observer.on_discharge(&record) {
                    warn!(patient = %id, error = %e, "discharge sink write failed");
                    self.sink_failures += 1;
                }
                self.discharged.push(record);
                discharged += 1;
            }

            slot.restore(remaining);
        }

        (treated, discharged)
    }

    /// Fill every slot with open capacity from the selector.  Returns how
    /// many patients were admitted.
    fn admit_phase(&mut self) -> SimResult<usize> {
        let patients = &self.ctx.patients;
        let mut admitted = 0;

        for slot in &mut self.doctors {
            while !slot.is_full() && !self.selector.is_empty() {
                let id = self.selector.pop_min(|p| patients.severity_of(p))?;

                if patients.severity_of(id).is_none() {
                    debug!(patient = %id, "discarding unresolvable selector entry");
                    continue;
                }
                if !self.occupied.insert(id) {
                    warn!(patient = %id, "patient already in treatment; discarding duplicate entry");
                    continue;
                }
                slot.admit(id);
                admitted += 1;
            }
        }

        Ok(admitted)
    }

    // ── Helpers ───────────────────────────────────────────────────────────

    fn is_terminal(&self) -> bool {
        self.selector.is_empty() && self.doctors.iter().all(DoctorSlot::is_empty)
    }

    fn finish<O: SimObserver + ?Sized>(&mut self, observer: &mut O) {
        self.phase = SimPhase::Finished;
        info!(
            rounds = self.round.0,
            discharged = self.discharged.len(),
            billed = self.ctx.billing.grand_total(),
            "simulation finished"
        );
        observer.on_sim_end(self.round);
    }

    fn snapshot_with(&self, discharged_this_round: usize) -> RoundSnapshot {
        let doctors = self
            .doctors
            .iter()
            .enumerate()
            .map(|(doctor, slot)| DoctorView {
                doctor,
                capacity: slot.capacity(),
                patients: slot
                    .patients()
                    .iter()
                    .filter_map(|&id| self.ctx.patients.get(id))
                    .map(|p| PatientView {
                        id:       p.id,
                        severity: p.severity().unwrap_or_default(),
                        visits:   p.visit_count(),
                    })
                    .collect(),
            })
            .collect();

        RoundSnapshot {
            round: self.round,
            doctors,
            waiting: self.selector.len(),
            discharged_this_round,
            discharged_total: self.discharged.len(),
            billed_total: self.ctx.billing.grand_total(),
        }
    }
}
