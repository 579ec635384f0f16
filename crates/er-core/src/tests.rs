//! Unit tests for er-core primitives.

#[cfg(test)]
mod ids {
    use crate::{BillingKey, PatientId};

    #[test]
    fn ordering() {
        assert!(PatientId(0) < PatientId(1));
        assert!(BillingKey(123_456_789) > BillingKey(99));
    }

    #[test]
    fn invalid_sentinels_are_max() {
        assert_eq!(PatientId::INVALID.0, u32::MAX);
        assert_eq!(BillingKey::default(), BillingKey::INVALID);
    }

    #[test]
    fn display() {
        assert_eq!(PatientId(7).to_string(), "PatientId(7)");
        assert_eq!(BillingKey(5).to_string(), "BillingKey(5)");
    }
}

#[cfg(test)]
mod severity {
    use crate::{ErError, Severity, TriageRating};

    #[test]
    fn decrement_floors_at_zero() {
        assert_eq!(Severity(2).decrement(), Severity(1));
        assert_eq!(Severity(1).decrement(), Severity::TREATED);
        assert_eq!(Severity::TREATED.decrement(), Severity::TREATED);
    }

    #[test]
    fn more_urgent_compares_lower() {
        assert!(TriageRating::Immediate.severity() < TriageRating::NonUrgent.severity());
    }

    #[test]
    fn parse_accepts_only_closed_set() {
        assert_eq!("1".parse::<TriageRating>().unwrap(), TriageRating::Immediate);
        assert_eq!(" 2\n".parse::<TriageRating>().unwrap(), TriageRating::Urgent);
        assert_eq!("3".parse::<TriageRating>().unwrap(), TriageRating::NonUrgent);
        for bad in ["0", "4", "-1", "", "two", "1.5"] {
            assert!(
                matches!(bad.parse::<TriageRating>(), Err(ErError::InvalidRating(_))),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn try_from_integer() {
        assert_eq!(TriageRating::try_from(3).unwrap(), TriageRating::NonUrgent);
        assert!(TriageRating::try_from(42).is_err());
    }
}

#[cfg(test)]
mod patient {
    use crate::{BillingKey, ErError, Patient, PatientId, Severity, TriageRating, TriageState};

    fn patient() -> Patient {
        Patient::new(PatientId(1), BillingKey(111), "Ada", 36, "60kg", "170cm", "fever")
    }

    #[test]
    fn starts_pending() {
        let p = patient();
        assert_eq!(p.triage_state(), TriageState::Pending);
        assert_eq!(p.severity(), None);
        assert_eq!(p.visit_count(), 0);
    }

    #[test]
    fn rating_assigned_exactly_once() {
        let mut p = patient();
        p.assign_rating(TriageRating::Urgent).unwrap();
        assert_eq!(p.triage_state(), TriageState::Ranked);
        assert!(matches!(
            p.assign_rating(TriageRating::Immediate),
            Err(ErError::AlreadyTriaged(PatientId(1)))
        ));
        assert_eq!(p.severity(), Some(Severity(2)));
    }

    #[test]
    fn visit_lowers_severity_and_counts() {
        let mut p = patient();
        p.assign_rating(TriageRating::Urgent).unwrap();
        assert_eq!(p.record_visit(), Severity(1));
        assert!(!p.is_treated());
        assert_eq!(p.record_visit(), Severity::TREATED);
        assert!(p.is_treated());
        assert_eq!(p.visit_count(), 2);
    }

    #[test]
    fn summary_mentions_symptoms() {
        assert_eq!(patient().summary(), "Ada (age 36): fever");
    }
}

#[cfg(test)]
mod registry {
    use crate::{BillingKey, ErError, Patient, PatientId, PatientRegistry, Severity, TriageRating};

    #[test]
    fn duplicate_id_rejected() {
        let mut reg = PatientRegistry::new();
        reg.insert(Patient::new(PatientId(1), BillingKey(1), "A", 1, "", "", "")).unwrap();
        let err = reg
            .insert(Patient::new(PatientId(1), BillingKey(2), "B", 2, "", "", ""))
            .unwrap_err();
        assert!(matches!(err, ErError::DuplicatePatient(PatientId(1))));
        assert_eq!(reg.get(PatientId(1)).unwrap().name, "A");
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn severity_lookup() {
        let mut reg = PatientRegistry::new();
        let mut p = Patient::new(PatientId(3), BillingKey(3), "C", 3, "", "", "");
        assert_eq!(reg.severity_of(PatientId(3)), None);
        p.assign_rating(TriageRating::Immediate).unwrap();
        reg.insert(p).unwrap();
        assert_eq!(reg.severity_of(PatientId(3)), Some(Severity(1)));
        reg.remove(PatientId(3));
        assert_eq!(reg.severity_of(PatientId(3)), None);
        assert!(reg.require_mut(PatientId(3)).is_err());
    }
}

#[cfg(test)]
mod billing {
    use crate::{BillingKey, BillingLedger};

    #[test]
    fn open_account_is_idempotent() {
        let mut ledger = BillingLedger::new();
        ledger.open_account(BillingKey(9));
        ledger.charge(BillingKey(9), 50);
        ledger.open_account(BillingKey(9));
        assert_eq!(ledger.total(BillingKey(9)), 50);
    }

    #[test]
    fn charges_accumulate() {
        let mut ledger = BillingLedger::new();
        assert_eq!(ledger.charge(BillingKey(1), 100), 100);
        assert_eq!(ledger.charge(BillingKey(1), 100), 200);
        assert_eq!(ledger.charge(BillingKey(2), 100), 100);
        assert_eq!(ledger.grand_total(), 300);
        assert_eq!(ledger.accounts(), vec![(BillingKey(1), 200), (BillingKey(2), 100)]);
    }

    #[test]
    fn unknown_account_totals_zero() {
        let ledger = BillingLedger::new();
        assert_eq!(ledger.total(BillingKey(42)), 0);
        assert!(!ledger.has_account(BillingKey(42)));
    }
}

#[cfg(test)]
mod context {
    use crate::{BillingKey, ErContext, Patient, PatientId};

    #[test]
    fn intake_preserves_arrival_order_and_opens_accounts() {
        let ctx = ErContext::from_intake(vec![
            Patient::new(PatientId(2), BillingKey(20), "B", 1, "", "", ""),
            Patient::new(PatientId(1), BillingKey(10), "A", 1, "", "", ""),
        ]);
        assert_eq!(ctx.arrivals, [PatientId(2), PatientId(1)]);
        assert!(ctx.billing.has_account(BillingKey(10)));
        assert_eq!(ctx.billing.total(BillingKey(20)), 0);
    }

    #[test]
    fn duplicate_intake_skipped() {
        let mut ctx = ErContext::new();
        let accepted = ctx.admit_intake(vec![
            Patient::new(PatientId(1), BillingKey(10), "A", 1, "", "", ""),
            Patient::new(PatientId(1), BillingKey(11), "A again", 1, "", "", ""),
        ]);
        assert_eq!(accepted, 1);
        assert_eq!(ctx.arrivals.len(), 1);
        assert!(!ctx.billing.has_account(BillingKey(11)));
    }
}

#[cfg(test)]
mod config {
    use crate::ErConfig;

    #[test]
    fn defaults_are_valid() {
        let cfg = ErConfig::default();
        cfg.validate().unwrap();
        assert_eq!(cfg.total_capacity(), 50);
        assert_eq!(cfg.selector_capacity_for(12), 12);
    }

    #[test]
    fn zero_doctors_or_capacity_rejected() {
        let cfg = ErConfig { doctor_count: 0, ..ErConfig::default() };
        assert!(cfg.validate().is_err());
        let cfg = ErConfig { capacity_per_doctor: 0, ..ErConfig::default() };
        assert!(cfg.validate().is_err());
        let cfg = ErConfig { selector_capacity: Some(0), ..ErConfig::default() };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn explicit_selector_capacity_wins() {
        let cfg = ErConfig { selector_capacity: Some(3), ..ErConfig::default() };
        assert_eq!(cfg.selector_capacity_for(100), 3);
    }
}

#[cfg(test)]
mod round {
    use crate::Round;

    #[test]
    fn next_and_since() {
        let r = Round::ZERO.next().next();
        assert_eq!(r, Round(2));
        assert_eq!(r.since(Round(1)), 1);
        assert_eq!(r.to_string(), "R2");
    }
}
