//! Concurrency-safe collection of per-document outcomes.
//!
//! The aggregator is the single place where cross-document mutable state is
//! shared: conversion units push outcomes in whatever order they finish, and
//! the coordinator drains the collection once after the join barrier. A plain
//! mutex-guarded vector is enough: each unit takes the lock exactly once,
//! for a push.

use crate::output::{BatchResult, BatchStats, ConversionOutcome};
use std::sync::{Arc, Mutex};

/// Accepts one [`ConversionOutcome`] per completed conversion unit, in any
/// arrival order, without losing or duplicating entries.
#[derive(Debug, Clone, Default)]
pub struct ResultAggregator {
    outcomes: Arc<Mutex<Vec<ConversionOutcome>>>,
}

impl ResultAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one document's outcome. Safe to call from any task or thread.
    pub fn add(&self, outcome: ConversionOutcome) {
        self.outcomes
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(outcome);
    }

    /// Number of outcomes recorded so far.
    pub fn len(&self) -> usize {
        self.outcomes
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Declare the batch complete and assemble the final [`BatchResult`].
    ///
    /// Called by the coordinator after every dispatched unit has finished.
    /// The flattened output list is the union of every successful outcome's
    /// paths; failed documents contribute zero paths.
    pub fn finish(self, duration_ms: u64, effective_concurrency: usize) -> BatchResult {
        let outcomes = self
            .outcomes
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .drain(..)
            .collect::<Vec<_>>();

        let succeeded = outcomes.iter().filter(|o| o.is_success()).count();
        let outputs: Vec<_> = outcomes
            .iter()
            .filter(|o| o.is_success())
            .flat_map(|o| o.outputs.iter().cloned())
            .collect();

        let stats = BatchStats {
            total_documents: outcomes.len(),
            succeeded,
            failed: outcomes.len() - succeeded,
            pages_written: outputs.len(),
            duration_ms,
            effective_concurrency,
        };

        BatchResult {
            outputs,
            outcomes,
            stats,
        }
    }
}
