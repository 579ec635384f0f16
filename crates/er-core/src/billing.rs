//! `BillingLedger` — running charge totals keyed by `BillingKey`.
//!
//! Totals only ever grow.  Patients who share a billing key share one
//! account.

use tracing::debug;

use crate::{BillingKey, Map};

#[derive(Default, Debug)]
pub struct BillingLedger {
    totals: Map<BillingKey, u64>,
}

impl BillingLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open an account at zero.  Idempotent: an existing balance is kept.
    pub fn open_account(&mut self, key: BillingKey) {
        self.totals.entry(key).or_insert(0);
    }

    /// Add `amount` to `key`'s total, opening the account if needed.
    /// Returns the new total.
    pub fn charge(&mut self, key: BillingKey, amount: u64) -> u64 {
        let total = self.totals.entry(key).or_insert(0);
        *total = total.saturating_add(amount);
        debug!(billing_key = %key, amount, total = *total, "charged visit");
        *total
    }

    /// Current total for `key`; zero for unknown accounts.
    pub fn total(&self, key: BillingKey) -> u64 {
        self.totals.get(&key).copied().unwrap_or(0)
    }

    pub fn has_account(&self, key: BillingKey) -> bool {
        self.totals.contains_key(&key)
    }

    pub fn len(&self) -> usize {
        self.totals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.totals.is_empty()
    }

    /// Sum of all account totals.
    pub fn grand_total(&self) -> u64 {
        self.totals.values().sum()
    }

    /// Iterate over `(key, total)` in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (BillingKey, u64)> + '_ {
        self.totals.iter().map(|(&k, &v)| (k, v))
    }

    /// All accounts sorted by billing key.
    pub fn accounts(&self) -> Vec<(BillingKey, u64)> {
        let mut accounts: Vec<(BillingKey, u64)> = self.iter().collect();
        accounts.sort_unstable_by_key(|&(k, _)| k);
        accounts
    }
}
