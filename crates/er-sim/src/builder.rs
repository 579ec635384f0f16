//! Fluent builder for constructing an [`ErSim`].

use er_core::{ErConfig, ErContext, Patient};
use er_triage::PrioritySelector;

use crate::{ErSim, SimError, SimResult};

/// Fluent builder for [`ErSim`].
///
/// # Inputs
///
/// | Method           | Default                              |
/// |------------------|--------------------------------------|
/// | `new(config)`    | required                             |
/// | `.intake(v)`     | no patients                          |
/// | `.context(ctx)`  | replaces the context built by intake |
///
/// The selector capacity comes from `config.selector_capacity`, or the
/// number of registered patients when unset.
///
/// # Example
///
/// ```rust,ignore
/// let mut sim = SimBuilder::new(ErConfig::default())
///     .intake(report.patients)
///     .build()?;
/// ```
pub struct SimBuilder {
    config:  ErConfig,
    context: ErContext,
}

impl SimBuilder {
    pub fn new(config: ErConfig) -> Self {
        Self { config, context: ErContext::new() }
    }

    /// Register patients in arrival order.  Duplicate ids are skipped with a
    /// warning.  May be called more than once.
    pub fn intake(mut self, patients: Vec<Patient>) -> Self {
        self.context.admit_intake(patients);
        self
    }

    /// Use a pre-built context (e.g. with hand-crafted arrivals).
    pub fn context(mut self, context: ErContext) -> Self {
        self.context = context;
        self
    }

    /// Validate the configuration and return a sim awaiting triage.
    pub fn build(self) -> SimResult<ErSim> {
        self.config
            .validate()
            .map_err(|e| SimError::Config(e.to_string()))?;

        let capacity = self.config.selector_capacity_for(self.context.patients.len());
        let selector = PrioritySelector::with_capacity(capacity);

        Ok(ErSim::new(self.config, self.context, selector))
    }
}
