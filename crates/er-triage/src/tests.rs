//! Unit tests for er-triage.

use std::collections::HashMap;

use er_core::{BillingKey, ErContext, Patient, PatientId, Severity};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn patient(id: u32) -> Patient {
    Patient::new(PatientId(id), BillingKey(1_000 + id), format!("P{id}"), 30, "70kg", "175cm", "cough")
}

fn ctx_with(n: u32) -> ErContext {
    ErContext::from_intake((1..=n).map(patient).collect())
}

/// Severity table used as a selector lookup.
fn table(entries: &[(u32, u8)]) -> HashMap<PatientId, Severity> {
    entries.iter().map(|&(id, s)| (PatientId(id), Severity(s))).collect()
}

// ── PrioritySelector ──────────────────────────────────────────────────────────

#[cfg(test)]
mod selector {
    use super::*;
    use crate::{PrioritySelector, SelectorError};

    fn drain(sel: &mut PrioritySelector, sev: &HashMap<PatientId, Severity>) -> Vec<u32> {
        let mut out = vec![];
        while !sel.is_empty() {
            out.push(sel.pop_min(|id| sev.get(&id).copied()).unwrap().0);
        }
        out
    }

    #[test]
    fn pops_lowest_severity_first() {
        let sev = table(&[(1, 3), (2, 1), (3, 2)]);
        let mut sel = PrioritySelector::with_capacity(3);
        for id in [1, 2, 3] {
            sel.insert(PatientId(id), |p| sev.get(&p).copied()).unwrap();
        }
        assert_eq!(sel.peek_min(|p| sev.get(&p).copied()), Ok(PatientId(2)));
        assert_eq!(drain(&mut sel, &sev), vec![2, 3, 1]);
    }

    #[test]
    fn ties_resolve_to_earliest_insert() {
        let sev = table(&[(5, 2), (3, 2), (9, 2), (1, 1), (7, 2)]);
        let mut sel = PrioritySelector::with_capacity(8);
        for id in [5, 3, 9, 1, 7] {
            sel.insert(PatientId(id), |p| sev.get(&p).copied()).unwrap();
        }
        assert_eq!(drain(&mut sel, &sev), vec![1, 5, 3, 9, 7]);
    }

    #[test]
    fn empty_access_reports_empty() {
        let mut sel = PrioritySelector::with_capacity(2);
        assert_eq!(sel.peek_min(|_| None), Err(SelectorError::Empty));
        assert_eq!(sel.pop_min(|_| None), Err(SelectorError::Empty));
        assert!(sel.is_empty());
        assert_eq!(sel.len(), 0);
    }

    #[test]
    fn overflow_reported_and_existing_entries_intact() {
        let sev = table(&[(1, 3), (2, 2), (3, 1), (4, 1)]);
        let mut sel = PrioritySelector::with_capacity(2);
        sel.insert(PatientId(1), |p| sev.get(&p).copied()).unwrap();
        sel.insert(PatientId(2), |p| sev.get(&p).copied()).unwrap();

        let err = sel.insert(PatientId(3), |p| sev.get(&p).copied()).unwrap_err();
        assert_eq!(err, SelectorError::Overflow { capacity: 2, id: PatientId(3) });
        assert!(sel.insert(PatientId(4), |p| sev.get(&p).copied()).is_err());

        assert_eq!(sel.len(), 2);
        assert!(!sel.contains(PatientId(3)));
        assert_eq!(drain(&mut sel, &sev), vec![2, 1]);
    }

    #[test]
    fn unresolved_ids_rank_last() {
        let sev = table(&[(1, 3), (2, 2)]);
        let mut sel = PrioritySelector::with_capacity(4);
        // 99 has no severity: inserted first but must come out last.
        for id in [99, 1, 2] {
            sel.insert(PatientId(id), |p| sev.get(&p).copied()).unwrap();
        }
        assert_eq!(drain(&mut sel, &sev), vec![2, 1, 99]);
    }

    #[test]
    fn severity_read_at_operation_time() {
        let mut sev = table(&[(1, 1), (2, 3), (3, 2)]);
        let mut sel = PrioritySelector::with_capacity(3);
        for id in [1, 2, 3] {
            sel.insert(PatientId(id), |p| sev.get(&p).copied()).unwrap();
        }
        // Patient 1 vanishes from the identity table while queued.
        sev.remove(&PatientId(1));
        assert_eq!(sel.peek_min(|p| sev.get(&p).copied()), Ok(PatientId(3)));
        assert_eq!(drain(&mut sel, &sev), vec![3, 2, 1]);
    }

    #[test]
    fn held_interior_entry_turning_unresolvable_hides_nothing() {
        let mut sev = table(&[(1, 1), (2, 2), (3, 3), (4, 2), (5, 2), (6, 3), (7, 3)]);
        let mut sel = PrioritySelector::with_capacity(7);
        for id in 1..=7 {
            sel.insert(PatientId(id), |p| sev.get(&p).copied()).unwrap();
        }
        // 2 sits above 4 and 5 in the heap; once it stops resolving it must
        // not shadow them.
        sev.remove(&PatientId(2));
        assert_eq!(drain(&mut sel, &sev), vec![1, 4, 5, 3, 6, 7, 2]);
    }

    #[test]
    fn severity_lowered_while_held_is_honoured() {
        let mut sev = table(&[(1, 2), (2, 3), (3, 3), (4, 3)]);
        let mut sel = PrioritySelector::with_capacity(4);
        for id in 1..=4 {
            sel.insert(PatientId(id), |p| sev.get(&p).copied()).unwrap();
        }
        sev.insert(PatientId(4), Severity(1));
        assert_eq!(sel.peek_min(|p| sev.get(&p).copied()), Ok(PatientId(4)));
        assert_eq!(drain(&mut sel, &sev), vec![4, 1, 2, 3]);
    }

    #[test]
    fn reinsert_after_pop_keeps_order() {
        let sev = table(&[(1, 2), (2, 2), (3, 1)]);
        let mut sel = PrioritySelector::with_capacity(2);
        sel.insert(PatientId(1), |p| sev.get(&p).copied()).unwrap();
        sel.insert(PatientId(2), |p| sev.get(&p).copied()).unwrap();
        assert_eq!(sel.pop_min(|p| sev.get(&p).copied()), Ok(PatientId(1)));
        sel.insert(PatientId(3), |p| sev.get(&p).copied()).unwrap();
        assert_eq!(drain(&mut sel, &sev), vec![3, 2]);
    }
}

// ── Property tests ────────────────────────────────────────────────────────────

#[cfg(test)]
mod selector_properties {
    use proptest::prelude::*;

    use super::*;
    use crate::PrioritySelector;

    #[derive(Clone, Debug)]
    enum Op {
        Insert(Option<u8>),
        Pop,
        /// Drop the severity of the n-th held entry (mod len), as discharge does.
        Forget(usize),
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        prop_oneof![
            3 => prop::option::weighted(0.9, 1u8..=3).prop_map(Op::Insert),
            2 => Just(Op::Pop),
            1 => any::<usize>().prop_map(Op::Forget),
        ]
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(512))]

        #[test]
        fn pop_matches_stable_min(ops in prop::collection::vec(op_strategy(), 0..200)) {
            let mut sev: HashMap<PatientId, Severity> = HashMap::new();
            let mut sel = PrioritySelector::with_capacity(64);
            // Reference model: held ids in insertion order.  Rank is re-read
            // from `sev` at pop time.
            let mut model: Vec<PatientId> = vec![];
            let mut next_id = 0u32;

            for op in ops {
                match op {
                    Op::Insert(s) => {
                        let id = PatientId(next_id);
                        next_id += 1;
                        if let Some(s) = s {
                            sev.insert(id, Severity(s));
                        }
                        let accepted = sel.insert(id, |p| sev.get(&p).copied()).is_ok();
                        prop_assert_eq!(accepted, model.len() < 64);
                        if accepted {
                            model.push(id);
                        }
                    }
                    Op::Pop => {
                        let got = sel.pop_min(|p| sev.get(&p).copied());
                        if model.is_empty() {
                            prop_assert!(got.is_err());
                        } else {
                            let (i, _) = model
                                .iter()
                                .enumerate()
                                .min_by_key(|(order, id)| {
                                    let rank = sev.get(*id).map_or(u16::MAX, |s| u16::from(s.0));
                                    (rank, *order)
                                })
                                .unwrap();
                            let expected = model.remove(i);
                            prop_assert_eq!(got, Ok(expected));
                        }
                    }
                    Op::Forget(n) => {
                        if !model.is_empty() {
                            sev.remove(&model[n % model.len()]);
                        }
                    }
                }
                prop_assert_eq!(sel.len(), model.len());
            }
        }
    }
}

// ── TriageStage ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod triage {
    use super::*;
    use crate::{PrioritySelector, ScriptedOracle, SeededOracle, TriageError, TriageOutcome, TriageStage};
    use er_core::{TriageRating, TriageState};

    #[test]
    fn every_patient_ranked_once_in_closed_set() {
        let mut ctx = ctx_with(3);
        let mut sel = PrioritySelector::with_capacity(3);
        let mut oracle = ScriptedOracle::new(["1", "3", "2"]);

        let report = TriageStage::new().run(&mut ctx, &mut sel, &mut oracle).unwrap();

        assert_eq!(report.ranked, vec![PatientId(1), PatientId(2), PatientId(3)]);
        assert!(ctx.arrivals.is_empty());
        for p in ctx.patients.iter() {
            assert_eq!(p.triage_state(), TriageState::Ranked);
            assert!((1..=3).contains(&p.severity().unwrap().0));
        }
        assert_eq!(sel.len(), 3);
        assert_eq!(sel.peek_min(|p| ctx.patients.severity_of(p)), Ok(PatientId(1)));
    }

    #[test]
    fn invalid_ratings_re_requested_and_never_written() {
        let mut ctx = ctx_with(1);
        let mut sel = PrioritySelector::with_capacity(1);
        let mut oracle = ScriptedOracle::new(["0", "urgent", "4", "", "2"]);

        let mut stage = TriageStage::new();
        let outcome = stage.step(&mut ctx, &mut sel, &mut oracle).unwrap();

        assert_eq!(
            outcome,
            Some(TriageOutcome::Ranked { id: PatientId(1), rating: TriageRating::Urgent })
        );
        assert_eq!(stage.report().rejected_ratings, 4);
        assert_eq!(oracle.rejected_count(), 4);
        assert_eq!(ctx.patients.severity_of(PatientId(1)), Some(Severity(2)));
    }

    #[test]
    fn duplicate_arrival_not_inserted_twice() {
        let mut ctx = ctx_with(1);
        ctx.arrivals.push_back(PatientId(1));
        let mut sel = PrioritySelector::with_capacity(4);
        let mut oracle = ScriptedOracle::new(["3", "1"]);

        let report = TriageStage::new().run(&mut ctx, &mut sel, &mut oracle).unwrap();

        assert_eq!(report.ranked, vec![PatientId(1)]);
        assert_eq!(report.duplicates, vec![PatientId(1)]);
        assert_eq!(sel.len(), 1);
        // Second response never consumed.
        assert_eq!(oracle.remaining(), 1);
        assert_eq!(ctx.patients.severity_of(PatientId(1)), Some(Severity(3)));
    }

    #[test]
    fn unknown_arrival_skipped() {
        let mut ctx = ctx_with(1);
        ctx.arrivals.push_front(PatientId(42));
        let mut sel = PrioritySelector::with_capacity(2);
        let mut oracle = ScriptedOracle::new(["2"]);

        let report = TriageStage::new().run(&mut ctx, &mut sel, &mut oracle).unwrap();
        assert_eq!(report.unresolved, vec![PatientId(42)]);
        assert_eq!(report.ranked, vec![PatientId(1)]);
    }

    #[test]
    fn overflow_drops_insert_but_keeps_rating() {
        let mut ctx = ctx_with(3);
        let mut sel = PrioritySelector::with_capacity(2);
        let mut oracle = ScriptedOracle::new(["2", "2", "1"]);

        let report = TriageStage::new().run(&mut ctx, &mut sel, &mut oracle).unwrap();

        assert_eq!(report.ranked, vec![PatientId(1), PatientId(2)]);
        assert_eq!(report.overflowed, vec![PatientId(3)]);
        assert_eq!(ctx.patients.severity_of(PatientId(3)), Some(Severity(1)));
        assert_eq!(sel.peek_min(|p| ctx.patients.severity_of(p)), Ok(PatientId(1)));
    }

    #[test]
    fn exhausted_oracle_is_an_error() {
        let mut ctx = ctx_with(2);
        let mut sel = PrioritySelector::with_capacity(2);
        let mut oracle = ScriptedOracle::new(["1"]);

        let err = TriageStage::new().run(&mut ctx, &mut sel, &mut oracle).unwrap_err();
        assert!(matches!(err, TriageError::OracleExhausted(PatientId(2))));
        assert_eq!(ctx.patients.get(PatientId(2)).unwrap().triage_state(), TriageState::Pending);
        assert_eq!(ctx.arrivals.front(), Some(&PatientId(2)));
    }

    #[test]
    fn rerun_after_oracle_failure_ranks_the_patient_left_pending() {
        let mut ctx = ctx_with(2);
        let mut sel = PrioritySelector::with_capacity(2);

        assert!(TriageStage::new().run(&mut ctx, &mut sel, &mut ScriptedOracle::new(["1"])).is_err());
        let report = TriageStage::new()
            .run(&mut ctx, &mut sel, &mut ScriptedOracle::new(["2"]))
            .unwrap();

        assert_eq!(report.ranked, vec![PatientId(2)]);
        assert!(ctx.arrivals.is_empty());
        assert_eq!(sel.len(), 2);
        for p in ctx.patients.iter() {
            assert_eq!(p.triage_state(), TriageState::Ranked);
        }
    }

    #[test]
    fn seeded_oracle_is_deterministic_and_valid() {
        let run = |seed| {
            let mut ctx = ctx_with(20);
            let mut sel = PrioritySelector::with_capacity(20);
            TriageStage::new().run(&mut ctx, &mut sel, &mut SeededOracle::new(seed)).unwrap();
            (1..=20)
                .map(|id| ctx.patients.severity_of(PatientId(id)).unwrap().0)
                .collect::<Vec<_>>()
        };
        let a = run(7);
        assert_eq!(a, run(7));
        assert!(a.iter().all(|s| (1..=3).contains(s)));
    }
}

// ── PromptOracle ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod prompt {
    use std::io::Cursor;

    use super::*;
    use crate::{PrioritySelector, PromptOracle, TriageError, TriageStage};

    #[test]
    fn reads_lines_and_re_prompts() {
        let mut ctx = ctx_with(1);
        let mut sel = PrioritySelector::with_capacity(1);
        let mut oracle = PromptOracle::new(Cursor::new("seven\n 3 \n"), Vec::new());

        TriageStage::new().run(&mut ctx, &mut sel, &mut oracle).unwrap();

        assert_eq!(ctx.patients.severity_of(PatientId(1)), Some(Severity(3)));
        let (_, out) = oracle.into_inner();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.matches("Severity (1 = see immediately").count(), 2);
        assert!(text.contains("\"seven\" is not a valid severity"));
        assert!(text.contains("P1 (age 30): cough"));
    }

    #[test]
    fn end_of_input_is_exhaustion() {
        let mut ctx = ctx_with(1);
        let mut sel = PrioritySelector::with_capacity(1);
        let mut oracle = PromptOracle::new(Cursor::new(""), Vec::new());
        let err = TriageStage::new().run(&mut ctx, &mut sel, &mut oracle).unwrap_err();
        assert!(matches!(err, TriageError::OracleExhausted(_)));
    }
}

// ── Intake loader ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod loader {
    use std::io::Cursor;

    use super::*;
    use crate::{load_intake_csv, load_intake_reader};

    #[test]
    fn loads_well_formed_records() {
        let csv = "\
# name,age,weight,height,billing_key,symptoms,id
Ada Lovelace, 36, 60kg, 170cm, 123456789, chest pain, 1
Alan Turing,41,70kg,178cm,987654321,\"fever, chills\",2
";
        let report = load_intake_reader(Cursor::new(csv)).unwrap();
        assert!(report.skipped.is_empty());
        assert_eq!(report.patients.len(), 2);

        let ada = &report.patients[0];
        assert_eq!(ada.id, PatientId(1));
        assert_eq!(ada.billing_key, BillingKey(123_456_789));
        assert_eq!(ada.name, "Ada Lovelace");
        assert_eq!(ada.age, 36);
        assert_eq!(ada.symptoms, "chest pain");
        assert_eq!(report.patients[1].symptoms, "fever, chills");
    }

    #[test]
    fn malformed_lines_skipped_not_fatal() {
        let csv = "\
A,30,60kg,170cm,111,cough,1
B,thirty,60kg,170cm,222,cough,2
C,30,60kg,170cm,333,cough
D,30,60kg,170cm,444,cough,4,extra
E,30,60kg,170cm,-5,cough,5
F,30,60kg,170cm,666,cough,6
";
        let report = load_intake_reader(Cursor::new(csv)).unwrap();
        let ids: Vec<u32> = report.patients.iter().map(|p| p.id.0).collect();
        assert_eq!(ids, vec![1, 6]);

        let lines: Vec<u64> = report.skipped.iter().map(|s| s.line).collect();
        assert_eq!(lines, vec![2, 3, 4, 5]);
        assert!(report.skipped[0].reason.contains("age"));
        assert!(report.skipped[1].reason.contains("expected 7 fields"));
    }

    #[test]
    fn reserved_sentinel_ids_rejected() {
        let csv = "\
A,30,60kg,170cm,111,cough,4294967295
B,30,60kg,170cm,4294967295,cough,2
C,30,60kg,170cm,333,cough,4294967294
";
        let report = load_intake_reader(Cursor::new(csv)).unwrap();
        let ids: Vec<u32> = report.patients.iter().map(|p| p.id.0).collect();
        assert_eq!(ids, vec![4_294_967_294]);

        let lines: Vec<u64> = report.skipped.iter().map(|s| s.line).collect();
        assert_eq!(lines, vec![1, 2]);
        assert!(report.skipped.iter().all(|s| s.reason.contains("reserved")));
    }

    #[test]
    fn missing_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_intake_csv(&dir.path().join("nope.csv")).is_err());
    }

    #[test]
    fn loads_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("intake.csv");
        std::fs::write(&path, "A,30,60kg,170cm,111,cough,1\n").unwrap();
        let report = load_intake_csv(&path).unwrap();
        assert_eq!(report.patients.len(), 1);
    }
}
