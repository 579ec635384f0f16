//! Plain data row types written by output backends.

use er_sim::{DischargeRecord, RoundSnapshot};

/// One discharged patient: the persisted billing record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DischargeRow {
    pub round:        u64,
    pub patient_id:   u32,
    pub billing_key:  u32,
    pub name:         String,
    pub visits:       u32,
    pub total_billed: u64,
}

impl From<&DischargeRecord> for DischargeRow {
    fn from(r: &DischargeRecord) -> Self {
        Self {
            round:        r.round.0,
            patient_id:   r.patient_id.0,
            billing_key:  r.billing_key.0,
            name:         r.name.clone(),
            visits:       r.visits,
            total_billed: r.total_billed,
        }
    }
}

/// Occupancy and throughput after one round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundSummaryRow {
    pub round:            u64,
    pub in_treatment:     u64,
    pub waiting:          u64,
    pub discharged:       u64,
    pub discharged_total: u64,
    pub billed_total:     u64,
}

impl From<&RoundSnapshot> for RoundSummaryRow {
    fn from(s: &RoundSnapshot) -> Self {
        Self {
            round:            s.round.0,
            in_treatment:     s.in_treatment() as u64,
            waiting:          s.waiting as u64,
            discharged:       s.discharged_this_round as u64,
            discharged_total: s.discharged_total as u64,
            billed_total:     s.billed_total,
        }
    }
}
