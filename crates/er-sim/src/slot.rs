//! `DoctorSlot` — one doctor's bounded set of concurrent patients.

use er_core::PatientId;

/// Patients under one doctor, in admission order.  Never holds more than
/// `capacity` ids.
#[derive(Clone, Debug)]
pub struct DoctorSlot {
    patients: Vec<PatientId>,
    capacity: usize,
}

impl DoctorSlot {
    pub fn new(capacity: usize) -> Self {
        Self {
            patients: Vec::with_capacity(capacity),
            capacity,
        }
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.patients.len() >= self.capacity
    }

    /// Add `id` at the back.  Returns `false` (and does nothing) when full.
    pub fn admit(&mut self, id: PatientId) -> bool {
        if self.is_full() {
            return false;
        }
        self.patients.push(id);
        true
    }

    /// Take the current occupants, leaving the slot empty.  The treat phase
    /// works on this snapshot so each occupant is visited exactly once.
    pub(crate) fn take(&mut self) -> Vec<PatientId> {
        std::mem::take(&mut self.patients)
    }

    /// Put back the occupants that stay for another round.
    pub(crate) fn restore(&mut self, remaining: Vec<PatientId>) {
        debug_assert!(remaining.len() <= self.capacity);
        self.patients = remaining;
    }

    pub fn patients(&self) -> &[PatientId] {
        &self.patients
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.patients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patients.is_empty()
    }
}
