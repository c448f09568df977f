//! Per-key write serialization.
//!
//! One read-modify-write per key runs at a time. A later writer blocks until
//! the in-flight one finishes, then performs its own read against the value
//! the previous writer left behind. Different keys never wait on each other.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

#[derive(Debug, Default)]
pub struct KeyedWriteQueue {
    slots: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl KeyedWriteQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs `critical` while holding the write slot for `key`.
    ///
    /// A panic inside a previous critical section does not wedge the key:
    /// the poisoned slot is reclaimed and the next writer proceeds.
    pub fn run<R>(&self, key: &str, critical: impl FnOnce() -> R) -> R {
        let slot = self.slot(key);
        let _guard = slot.lock().unwrap_or_else(PoisonError::into_inner);
        critical()
    }

    fn slot(&self, key: &str) -> Arc<Mutex<()>> {
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(slots.entry(key.to_string()).or_default())
    }
}
