// crates/form-validator/src/debounce.rs
// ============================================================================
// Module: Debounce Queue
// Description: Per-unit revalidation deadlines on tokio time.
// Purpose: Collapse bursts of component events into one revalidation.
// Dependencies: tokio::time::Instant
// ============================================================================

//! ## Overview
//! Each unit has at most one pending deadline. Scheduling again replaces the
//! deadline, so only the last event in a burst triggers a revalidation.

use std::collections::HashMap;
use std::hash::Hash;

use tokio::time::Instant;

/// Pending revalidation deadlines keyed by unit
///
/// # Invariants
/// - At most one deadline per identifier.
#[derive(Debug)]
pub(crate) struct DebounceQueue<K> {
    /// Deadline per identifier.
    deadlines: HashMap<K, Instant>,
}

impl<K: Clone + Eq + Hash> DebounceQueue<K> {
    /// Creates an empty queue
    pub(crate) fn new() -> Self {
        Self {
            deadlines: HashMap::new(),
        }
    }

    /// Sets the deadline for `identifier`; returns true when one was replaced
    pub(crate) fn schedule(&mut self, identifier: K, deadline: Instant) -> bool {
        self.deadlines.insert(identifier, deadline).is_some()
    }

    /// Drops the deadline for `identifier`
    pub(crate) fn cancel(&mut self, identifier: &K) {
        self.deadlines.remove(identifier);
    }

    /// Drops every deadline
    pub(crate) fn clear(&mut self) {
        self.deadlines.clear();
    }

    /// Returns the earliest pending deadline
    pub(crate) fn next_deadline(&self) -> Option<Instant> {
        self.deadlines.values().min().copied()
    }

    /// Removes and returns identifiers due at `now`, earliest first
    pub(crate) fn take_due(&mut self, now: Instant) -> Vec<K> {
        let mut due: Vec<(K, Instant)> = self
            .deadlines
            .iter()
            .filter(|(_, deadline)| **deadline <= now)
            .map(|(identifier, deadline)| (identifier.clone(), *deadline))
            .collect();
        due.sort_by_key(|(_, deadline)| *deadline);
        for (identifier, _) in &due {
            self.deadlines.remove(identifier);
        }
        due.into_iter().map(|(identifier, _)| identifier).collect()
    }

    /// Returns true when no deadline is pending
    pub(crate) fn is_empty(&self) -> bool {
        self.deadlines.is_empty()
    }
}
