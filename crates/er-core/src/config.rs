//! Run configuration.
//!
//! Typically built with [`ErConfig::default`] and adjusted field by field, or
//! loaded from a TOML file by the application crate (feature `serde`).
//! Doctor count and capacity are fixed for the lifetime of a run.

use crate::{ErError, ErResult};

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ErConfig {
    /// Number of doctor slots.  Default: 10.
    pub doctor_count: usize,

    /// Maximum concurrent patients per doctor.  Default: 5.
    pub capacity_per_doctor: usize,

    /// Amount added to a patient's billing total per treatment visit.
    /// Default: 100.
    pub visit_charge: u64,

    /// Fixed capacity of the priority selector.  `None` sizes it to the
    /// number of patients admitted at intake, the maximum that can ever be
    /// outstanding.
    pub selector_capacity: Option<usize>,
}

impl Default for ErConfig {
    fn default() -> Self {
        Self {
            doctor_count:        10,
            capacity_per_doctor: 5,
            visit_charge:        100,
            selector_capacity:   None,
        }
    }
}

impl ErConfig {
    /// Reject configurations under which no patient could ever be admitted.
    pub fn validate(&self) -> ErResult<()> {
        if self.doctor_count == 0 {
            return Err(ErError::Config("doctor_count must be at least 1".into()));
        }
        if self.capacity_per_doctor == 0 {
            return Err(ErError::Config("capacity_per_doctor must be at least 1".into()));
        }
        if self.selector_capacity == Some(0) {
            return Err(ErError::Config("selector_capacity must be at least 1".into()));
        }
        Ok(())
    }

    /// Total number of patients that can be in treatment at once.
    #[inline]
    pub fn total_capacity(&self) -> usize {
        self.doctor_count * self.capacity_per_doctor
    }

    /// Selector capacity for an intake of `intake_count` patients.
    pub fn selector_capacity_for(&self, intake_count: usize) -> usize {
        self.selector_capacity.unwrap_or(intake_count)
    }
}
