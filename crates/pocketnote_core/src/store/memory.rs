//! In-memory `KvStore` for tests and ephemeral sessions.

use super::{BackendError, KvStore, StoreError, StoreResult};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};

#[derive(Debug, Default)]
pub struct MemoryKvStore {
    entries: Mutex<HashMap<String, String>>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
}

impl MemoryKvStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent `get_raw` fail until switched back off.
    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Makes every subsequent `set_raw`/`remove` fail until switched back off.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    fn entries(&self) -> Result<MutexGuard<'_, HashMap<String, String>>, BackendError> {
        self.entries.lock().map_err(|_| BackendError::Poisoned)
    }

    fn write_guard(&self, key: &str) -> StoreResult<MutexGuard<'_, HashMap<String, String>>> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Write {
                key: key.to_string(),
                source: BackendError::Unavailable("writes disabled".to_string()),
            });
        }
        self.entries().map_err(|source| StoreError::Write {
            key: key.to_string(),
            source,
        })
    }
}

impl KvStore for MemoryKvStore {
    fn get_raw(&self, key: &str) -> StoreResult<Option<String>> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(StoreError::Read {
                key: key.to_string(),
                source: BackendError::Unavailable("reads disabled".to_string()),
            });
        }
        let entries = self.entries().map_err(|source| StoreError::Read {
            key: key.to_string(),
            source,
        })?;
        Ok(entries.get(key).cloned())
    }

    fn set_raw(&self, key: &str, value: &str) -> StoreResult<()> {
        self.write_guard(key)?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> StoreResult<()> {
        self.write_guard(key)?.remove(key);
        Ok(())
    }
}
