//! Bounded admission control for concurrent document conversions.
//!
//! ## Why RAII permits?
//!
//! Every `acquire()` must be paired with exactly one release, even when the
//! protected work fails or panics. Returning an owned permit that releases on
//! drop makes the pairing structural: a conversion unit cannot leak a permit
//! on any error path, so the gate can never deadlock a later batch.

use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

/// A bounded permit pool limiting how many document conversions run at once.
///
/// Capacity is fixed at construction and must already be resolved to ≥ 1;
/// the gate itself is never unbounded.
#[derive(Debug, Clone)]
pub struct ConcurrencyGate {
    semaphore: Arc<Semaphore>,
    capacity: usize,
}

impl ConcurrencyGate {
    /// Create a gate admitting at most `capacity` holders at once.
    ///
    /// A capacity of 0 is coerced to 1: the resolved concurrency limit is
    /// positive by the time a gate is built, and a zero-capacity gate would
    /// block the batch forever.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            semaphore: Arc::new(Semaphore::new(capacity)),
            capacity,
        }
    }

    /// Wait until a permit is free, then take it.
    ///
    /// The permit is released when the returned [`GatePermit`] is dropped.
    pub async fn acquire(&self) -> GatePermit {
        // The semaphore is never closed, so acquisition can only fail if the
        // gate was dropped mid-acquire, which the Arc prevents.
        let permit = Arc::clone(&self.semaphore)
            .acquire_owned()
            .await
            .unwrap_or_else(|_| unreachable!("gate semaphore is never closed"));
        GatePermit { _permit: permit }
    }

    /// The fixed number of simultaneous holders this gate admits.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Permits currently free (capacity minus outstanding holders).
    pub fn available(&self) -> usize {
        self.semaphore.available_permits()
    }
}

/// A held permit; dropping it returns the slot to the gate.
#[derive(Debug)]
pub struct GatePermit {
    _permit: OwnedSemaphorePermit,
}
