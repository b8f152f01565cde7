//! Capacity-1 handoff queue between the presentation worker and its
//! consumer.

use std::sync::{Arc, Condvar, Mutex};
use std::time::{Duration, Instant};

use tracing::warn;

/// Returned by [`HandoffSlot::publish`] when the previous entry has not been
/// consumed yet. Carries the rejected value back to the caller.
#[derive(Debug)]
pub struct SlotFull<T>(pub T);

/// Single-producer/single-consumer bounded queue of capacity 1.
///
/// The producer publishes a value per frame without blocking and waits for
/// the slot to drain before the next frame; the consumer takes each value
/// when it is ready for it. The single slot is the back-pressure mechanism:
/// the producer can never run ahead of the consumer by more than one entry.
///
/// Clones share the same slot.
#[derive(Debug)]
pub struct HandoffSlot<T> {
    inner: Arc<(Mutex<Option<T>>, Condvar)>,
}

impl<T> Clone for HandoffSlot<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> Default for HandoffSlot<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> HandoffSlot<T> {
    /// Create an empty slot.
    pub fn new() -> Self {
        Self {
            inner: Arc::new((Mutex::new(None), Condvar::new())),
        }
    }

    /// Deposit a value without blocking.
    ///
    /// Fails with [`SlotFull`] if the previous entry is still there; under
    /// the presentation protocol that never happens, because the producer
    /// waits for the slot to drain first.
    pub fn publish(&self, value: T) -> Result<(), SlotFull<T>> {
        let (lock, cvar) = &*self.inner;
        let mut slot = lock.lock().unwrap_or_else(|e| {
            warn!("handoff slot mutex poisoned; continuing");
            e.into_inner()
        });
        if slot.is_some() {
            return Err(SlotFull(value));
        }
        *slot = Some(value);
        cvar.notify_all();
        Ok(())
    }

    /// Block until the consumer has taken the current entry; returns
    /// immediately if the slot is already empty.
    pub fn wait_drained(&self) {
        let (lock, cvar) = &*self.inner;
        let mut slot = lock.lock().unwrap_or_else(|e| e.into_inner());
        while slot.is_some() {
            slot = cvar.wait(slot).unwrap_or_else(|e| e.into_inner());
        }
    }

    /// Block until an entry is available and take it.
    pub fn take(&self) -> T {
        let (lock, cvar) = &*self.inner;
        let mut slot = lock.lock().unwrap_or_else(|e| e.into_inner());
        loop {
            if let Some(value) = slot.take() {
                cvar.notify_all();
                return value;
            }
            slot = cvar.wait(slot).unwrap_or_else(|e| e.into_inner());
        }
    }

    /// Take the current entry if there is one, without blocking.
    pub fn try_take(&self) -> Option<T> {
        let (lock, cvar) = &*self.inner;
        let mut slot = lock.lock().unwrap_or_else(|e| e.into_inner());
        let value = slot.take();
        if value.is_some() {
            cvar.notify_all();
        }
        value
    }

    /// Like [`take`](Self::take) but gives up after `timeout`.
    pub fn take_timeout(&self, timeout: Duration) -> Option<T> {
        let deadline = Instant::now() + timeout;
        let (lock, cvar) = &*self.inner;
        let mut slot = lock.lock().unwrap_or_else(|e| e.into_inner());
        loop {
            if let Some(value) = slot.take() {
                cvar.notify_all();
                return Some(value);
            }
            let now = Instant::now();
            if now >= deadline {
                return None;
            }
            let (guard, _) = cvar
                .wait_timeout(slot, deadline - now)
                .unwrap_or_else(|e| e.into_inner());
            slot = guard;
        }
    }

    pub fn is_empty(&self) -> bool {
        let (lock, _) = &*self.inner;
        lock.lock().unwrap_or_else(|e| e.into_inner()).is_none()
    }
}
