//! Resettable binary gate.

use std::sync::{Arc, Condvar, Mutex};
use std::time::{Duration, Instant};

use tracing::warn;

/// Binary synchronization signal between workers.
///
/// Clones share the same underlying state, so one side can open the gate
/// while another waits on it. Starts closed.
#[derive(Debug, Clone)]
pub struct Gate {
    inner: Arc<(Mutex<bool>, Condvar)>,
}

impl Default for Gate {
    fn default() -> Self {
        Self::new()
    }
}

impl Gate {
    /// Create a closed gate.
    pub fn new() -> Self {
        Self {
            inner: Arc::new((Mutex::new(false), Condvar::new())),
        }
    }

    /// Open the gate, waking every waiter.
    pub fn open(&self) {
        let (lock, cvar) = &*self.inner;
        let mut open = lock.lock().unwrap_or_else(|e| {
            warn!("gate mutex poisoned; continuing");
            e.into_inner()
        });
        *open = true;
        cvar.notify_all();
    }

    /// Close the gate again. Used by the acknowledgment mode, which re-arms
    /// the gate after every frame.
    pub fn close(&self) {
        let (lock, _) = &*self.inner;
        let mut open = lock.lock().unwrap_or_else(|e| {
            warn!("gate mutex poisoned; continuing");
            e.into_inner()
        });
        *open = false;
    }

    pub fn is_open(&self) -> bool {
        let (lock, _) = &*self.inner;
        *lock.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Block until the gate is open.
    pub fn wait(&self) {
        let (lock, cvar) = &*self.inner;
        let mut open = lock.lock().unwrap_or_else(|e| e.into_inner());
        while !*open {
            open = cvar.wait(open).unwrap_or_else(|e| e.into_inner());
        }
    }

    /// Block until the gate is open or `timeout` elapses.
    ///
    /// Returns `true` if the gate was open before the deadline.
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        let (lock, cvar) = &*self.inner;
        let mut open = lock.lock().unwrap_or_else(|e| e.into_inner());
        while !*open {
            let now = Instant::now();
            if now >= deadline {
                return false;
            }
            let (guard, _) = cvar
                .wait_timeout(open, deadline - now)
                .unwrap_or_else(|e| e.into_inner());
            open = guard;
        }
        true
    }
}
