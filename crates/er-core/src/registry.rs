//! `PatientRegistry` — the identity table keyed by `PatientId`.
//!
//! The registry holds every patient that has been admitted to the simulation
//! and not yet discharged.  Discharge removes the record, so any later lookup
//! of that id reports "not found"; the priority selector treats such misses
//! as lowest priority rather than as errors.

use crate::{ErError, ErResult, Map, Patient, PatientId, Severity};

#[derive(Default, Debug)]
pub struct PatientRegistry {
    patients: Map<PatientId, Patient>,
}

impl PatientRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a patient.  A second patient with the same id is rejected and the
    /// existing record is left untouched.
    pub fn insert(&mut self, patient: Patient) -> ErResult<()> {
        if self.patients.contains_key(&patient.id) {
            return Err(ErError::DuplicatePatient(patient.id));
        }
        self.patients.insert(patient.id, patient);
        Ok(())
    }

    pub fn get(&self, id: PatientId) -> Option<&Patient> {
        self.patients.get(&id)
    }

    pub fn get_mut(&mut self, id: PatientId) -> Option<&mut Patient> {
        self.patients.get_mut(&id)
    }

    /// Like [`get_mut`](Self::get_mut) but reports a missing id as an error.
    pub fn require_mut(&mut self, id: PatientId) -> ErResult<&mut Patient> {
        self.patients.get_mut(&id).ok_or(ErError::PatientNotFound(id))
    }

    /// Remove and return a patient record (discharge).
    pub fn remove(&mut self, id: PatientId) -> Option<Patient> {
        self.patients.remove(&id)
    }

    pub fn contains(&self, id: PatientId) -> bool {
        self.patients.contains_key(&id)
    }

    /// Authoritative current severity.  `None` if the patient is unknown or
    /// still pending triage.
    #[inline]
    pub fn severity_of(&self, id: PatientId) -> Option<Severity> {
        self.patients.get(&id).and_then(Patient::severity)
    }

    pub fn len(&self) -> usize {
        self.patients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patients.is_empty()
    }

    /// Iterate over all registered patients in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = &Patient> + '_ {
        self.patients.values()
    }
}
