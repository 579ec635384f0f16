//! `PrioritySelector` — fixed-capacity binary min-heap over patient ids.
//!
//! The heap holds keys, not values.  Every comparison calls a caller-supplied
//! lookup `Fn(PatientId) -> Option<Severity>` against the authoritative
//! identity table, so the ordering reflects severity at the moment of the
//! operation rather than a copy taken at insertion.
//!
//! A lookup that returns `None` (patient discharged, never triaged, or a
//! garbage id) ranks below every real severity.  Such entries sink to the
//! bottom and are handed out last; the scheduler discards them when they
//! surface.
//!
//! A held entry's severity may change, or stop resolving, after it was
//! sifted into place.  `pop_min` therefore re-heapifies against the current
//! lookup before removing the root (O(n)), and `peek_min` scans for the
//! current minimum, so a stale entry can never hide a more urgent one below
//! it.  Insert stays O(log n).
//!
//! Ties on severity go to the entry inserted first.  Each entry carries a
//! monotonically increasing insertion sequence number as the secondary key,
//! which makes the pop order fully deterministic.

use er_core::{PatientId, Severity};

use crate::SelectorError;

/// Rank for an entry whose severity cannot be resolved.  Above any `u8`.
const UNRESOLVED_RANK: u16 = u16::MAX;

#[derive(Copy, Clone, Debug)]
struct Entry {
    id:  PatientId,
    seq: u64,
}

#[derive(Debug)]
pub struct PrioritySelector {
    heap:     Vec<Entry>,
    capacity: usize,
    next_seq: u64,
}

impl PrioritySelector {
    /// Create an empty selector that can hold at most `capacity` entries.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            heap: Vec::with_capacity(capacity),
            capacity,
            next_seq: 0,
        }
    }

    /// Add `id`.  Fails with [`SelectorError::Overflow`] if the selector is
    /// full; existing entries are unaffected.
    pub fn insert<F>(&mut self, id: PatientId, lookup: F) -> Result<(), SelectorError>
    where
        F: Fn(PatientId) -> Option<Severity>,
    {
        if self.heap.len() >= self.capacity {
            return Err(SelectorError::Overflow { capacity: self.capacity, id });
        }
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(Entry { id, seq });
        self.sift_up(self.heap.len() - 1, &lookup);
        Ok(())
    }

    /// The most urgent id by current severity, without removing it.
    pub fn peek_min<F>(&self, lookup: F) -> Result<PatientId, SelectorError>
    where
        F: Fn(PatientId) -> Option<Severity>,
    {
        (0..self.heap.len())
            .min_by_key(|&i| self.rank(i, &lookup))
            .map(|i| self.heap[i].id)
            .ok_or(SelectorError::Empty)
    }

    /// Remove and return the most urgent id by current severity.
    pub fn pop_min<F>(&mut self, lookup: F) -> Result<PatientId, SelectorError>
    where
        F: Fn(PatientId) -> Option<Severity>,
    {
        if self.heap.is_empty() {
            return Err(SelectorError::Empty);
        }
        self.heapify(&lookup);
        let top = self.heap.swap_remove(0);
        if !self.heap.is_empty() {
            self.sift_down(0, &lookup);
        }
        Ok(top.id)
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// `true` if `id` is currently held (linear scan).
    pub fn contains(&self, id: PatientId) -> bool {
        self.heap.iter().any(|e| e.id == id)
    }

    // ── Heap internals ────────────────────────────────────────────────────

    #[inline]
    fn rank<F>(&self, i: usize, lookup: &F) -> (u16, u64)
    where
        F: Fn(PatientId) -> Option<Severity>,
    {
        let e = self.heap[i];
        let sev = lookup(e.id).map_or(UNRESOLVED_RANK, |s| u16::from(s.0));
        (sev, e.seq)
    }

    /// Bottom-up heap construction against the current lookup.
    fn heapify<F>(&mut self, lookup: &F)
    where
        F: Fn(PatientId) -> Option<Severity>,
    {
        for i in (0..self.heap.len() / 2).rev() {
            self.sift_down(i, lookup);
        }
    }

    fn sift_up<F>(&mut self, mut i: usize, lookup: &F)
    where
        F: Fn(PatientId) -> Option<Severity>,
    {
        while i > 0 {
            let parent = (i - 1) / 2;
            if self.rank(i, lookup) >= self.rank(parent, lookup) {
                break;
            }
            self.heap.swap(i, parent);
            i = parent;
        }
    }

    fn sift_down<F>(&mut self, mut i: usize, lookup: &F)
    where
        F: Fn(PatientId) -> Option<Severity>,
    {
        let len = self.heap.len();
        loop {
            let left = 2 * i + 1;
            if left >= len {
                break;
            }
            let right = left + 1;
            let mut child = left;
            if right < len && self.rank(right, lookup) < self.rank(left, lookup) {
                child = right;
            }
            if self.rank(child, lookup) >= self.rank(i, lookup) {
                break;
            }
            self.heap.swap(i, child);
            i = child;
        }
    }
}
