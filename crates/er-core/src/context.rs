//! `ErContext` — the explicitly owned state shared by every stage.
//!
//! Arrival queue, identity table and billing ledger live together in one
//! value that is passed to the triage stage and owned by the scheduler, so
//! each stage can be exercised in isolation with a hand-built context.

use std::collections::VecDeque;

use tracing::warn;

use crate::{BillingLedger, Patient, PatientId, PatientRegistry};

#[derive(Default, Debug)]
pub struct ErContext {
    /// Patients awaiting triage, in arrival order.
    pub arrivals: VecDeque<PatientId>,
    /// Identity table of all admitted, not-yet-discharged patients.
    pub patients: PatientRegistry,
    /// Running charges keyed by billing key.
    pub billing:  BillingLedger,
}

impl ErContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a context from a materialised intake list.
    pub fn from_intake(patients: Vec<Patient>) -> Self {
        let mut ctx = Self::new();
        ctx.admit_intake(patients);
        ctx
    }

    /// Register each patient, open its billing account and queue it for
    /// triage in the order given.  Returns how many were accepted.
    ///
    /// A patient whose id is already registered is skipped with a warning.
    pub fn admit_intake(&mut self, patients: Vec<Patient>) -> usize {
        let mut accepted = 0;
        for patient in patients {
            let id = patient.id;
            let key = patient.billing_key;
            match self.patients.insert(patient) {
                Ok(()) => {
                    self.billing.open_account(key);
                    self.arrivals.push_back(id);
                    accepted += 1;
                }
                Err(e) => warn!(patient = %id, error = %e, "skipping intake record"),
            }
        }
        accepted
    }
}
