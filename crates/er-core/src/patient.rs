//! The patient record: immutable intake data plus mutable treatment state.

use crate::{BillingKey, ErError, ErResult, PatientId, Severity, TriageRating};

/// Where a patient sits in the triage state machine.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum TriageState {
    /// Awaiting a severity rating.
    Pending,
    /// Severity assigned; eligible for the priority selector.
    Ranked,
}

/// One emergency-room patient.
///
/// Demographic fields are carried as given; nothing beyond presence is
/// validated.  `severity` is `None` until triage sets it (exactly once) and is
/// thereafter only lowered by [`Patient::record_visit`].
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Patient {
    pub id:          PatientId,
    pub billing_key: BillingKey,
    pub name:        String,
    pub age:         u32,
    pub weight:      String,
    pub height:      String,
    pub symptoms:    String,
    severity:        Option<Severity>,
    visit_count:     u32,
}

impl Patient {
    pub fn new(
        id:          PatientId,
        billing_key: BillingKey,
        name:        impl Into<String>,
        age:         u32,
        weight:      impl Into<String>,
        height:      impl Into<String>,
        symptoms:    impl Into<String>,
    ) -> Self {
        Self {
            id,
            billing_key,
            name:        name.into(),
            age,
            weight:      weight.into(),
            height:      height.into(),
            symptoms:    symptoms.into(),
            severity:    None,
            visit_count: 0,
        }
    }

    /// Current severity, or `None` while the patient is still pending triage.
    #[inline]
    pub fn severity(&self) -> Option<Severity> {
        self.severity
    }

    #[inline]
    pub fn visit_count(&self) -> u32 {
        self.visit_count
    }

    pub fn triage_state(&self) -> TriageState {
        match self.severity {
            None    => TriageState::Pending,
            Some(_) => TriageState::Ranked,
        }
    }

    /// Record the triage outcome.  Fails if a severity was already assigned.
    pub fn assign_rating(&mut self, rating: TriageRating) -> ErResult<()> {
        if self.severity.is_some() {
            return Err(ErError::AlreadyTriaged(self.id));
        }
        self.severity = Some(rating.severity());
        Ok(())
    }

    /// Apply one treatment visit: severity down by one (floored at zero),
    /// visit count up by one.  Returns the new severity.
    pub fn record_visit(&mut self) -> Severity {
        let next = self.severity.unwrap_or(Severity::TREATED).decrement();
        self.severity = Some(next);
        self.visit_count += 1;
        next
    }

    /// `true` once treatment has brought severity to zero.
    pub fn is_treated(&self) -> bool {
        self.severity.is_some_and(Severity::is_treated)
    }

    /// One-line summary shown to whoever supplies the triage rating.
    pub fn summary(&self) -> String {
        format!("{} (age {}): {}", self.name, self.age, self.symptoms)
    }
}
