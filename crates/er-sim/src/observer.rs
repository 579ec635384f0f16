//! Observer hooks: the discharge sink and the per-round status view.

use er_core::{BillingKey, PatientId, Round, Severity};

/// Error type a discharge sink may report.  The scheduler logs it and moves
/// on; it never aborts a round.
pub type SinkError = Box<dyn std::error::Error + Send + Sync + 'static>;

pub type SinkResult = Result<(), SinkError>;

/// Final state of one discharged patient.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DischargeRecord {
    /// Round in which the patient was discharged.
    pub round:        Round,
    pub patient_id:   PatientId,
    pub billing_key:  BillingKey,
    pub name:         String,
    pub visits:       u32,
    /// Billing total for `billing_key` at the moment of discharge.
    pub total_billed: u64,
}

/// One occupant as shown to status observers.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PatientView {
    pub id:       PatientId,
    pub severity: Severity,
    pub visits:   u32,
}

/// One doctor's occupancy.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DoctorView {
    pub doctor:   usize,
    pub capacity: usize,
    pub patients: Vec<PatientView>,
}

/// Read-only picture of the scheduler taken between rounds.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RoundSnapshot {
    pub round:                 Round,
    pub doctors:               Vec<DoctorView>,
    /// Ids still in the priority selector.
    pub waiting:               usize,
    pub discharged_this_round: usize,
    pub discharged_total:      usize,
    pub billed_total:          u64,
}

impl RoundSnapshot {
    /// Patients currently occupying a slot.
    pub fn in_treatment(&self) -> usize {
        self.doctors.iter().map(|d| d.patients.len()).sum()
    }
}

/// Callbacks invoked by [`ErSim::advance`][crate::ErSim::advance].
///
/// All methods have default implementations so implementors only override
/// what they need.
///
/// # Example — status printer
///
/// ```rust,ignore
/// struct Printer;
///
/// impl SimObserver for Printer {
///     fn on_round_end(&mut self, snap: &RoundSnapshot) {
///         println!("{}: {} in treatment, {} waiting", snap.round, snap.in_treatment(), snap.waiting);
///     }
/// }
/// ```
pub trait SimObserver {
    /// Called before the treat phase of each round.
    fn on_round_start(&mut self, _round: Round) {}

    /// Called once per discharged patient, in discharge order.  Returning an
    /// error is logged by the scheduler and otherwise ignored.
    fn on_discharge(&mut self, _record: &DischargeRecord) -> SinkResult {
        Ok(())
    }

    /// Called after the admit phase of each round.
    fn on_round_end(&mut self, _snapshot: &RoundSnapshot) {}

    /// Called once when the simulation reaches its terminal state.
    fn on_sim_end(&mut self, _final_round: Round) {}
}

impl<O: SimObserver + ?Sized> SimObserver for &mut O {
    fn on_round_start(&mut self, round: Round) {
        (**self).on_round_start(round)
    }

    fn on_discharge(&mut self, record: &DischargeRecord) -> SinkResult {
        (**self).on_discharge(record)
    }

    fn on_round_end(&mut self, snapshot: &RoundSnapshot) {
        (**self).on_round_end(snapshot)
    }

    fn on_sim_end(&mut self, final_round: Round) {
        (**self).on_sim_end(final_round)
    }
}

/// A [`SimObserver`] that does nothing.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}
