//! Failure statistics tracking.
//!
//! Thread-safe per-kind failure counters, shared by every task of a batch.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use strum::IntoEnumIterator;

use super::types::ErrorKind;

/// Thread-safe failure counter.
///
/// Holds one atomic counter per [`ErrorKind`], all initialized to zero on
/// creation, so it can be shared across tasks behind an `Arc` without locking.
#[derive(Debug)]
pub struct FailureStats {
    counts: HashMap<ErrorKind, AtomicUsize>,
}

impl Default for FailureStats {
    fn default() -> Self {
        Self::new()
    }
}

impl FailureStats {
    pub fn new() -> Self {
        let counts = ErrorKind::iter()
            .map(|kind| (kind, AtomicUsize::new(0)))
            .collect();
        FailureStats { counts }
    }

    /// Increment the counter for `kind`.
    pub fn increment(&self, kind: ErrorKind) {
        if let Some(counter) = self.counts.get(&kind) {
            counter.fetch_add(1, Ordering::Relaxed);
        } else {
            log::error!(
                "Attempted to increment failure counter for {:?} which is not in the map. \
                 This indicates a bug in FailureStats initialization.",
                kind
            );
        }
    }

    /// Get the count for a failure kind.
    pub fn get(&self, kind: ErrorKind) -> usize {
        self.counts
            .get(&kind)
            .map(|c| c.load(Ordering::SeqCst))
            .unwrap_or(0)
    }

    /// Total failures across all kinds.
    pub fn total(&self) -> usize {
        self.counts.values().map(|c| c.load(Ordering::SeqCst)).sum()
    }
}
