//! Typed JSON codec over a `KvStore`.
//!
//! # Responsibility
//! - Encode values to JSON text before writing; decode on read.
//! - Route every write for a key through the shared `KeyedWriteQueue`.
//!
//! # Invariants
//! - Encoding happens before the backend is touched, so an encode failure
//!   never produces a partial write.
//! - `update` holds the key's write slot across read, mutate and write.

use super::{KeyedWriteQueue, KvStore, StoreError, StoreResult};
use log::warn;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;

/// Cloneable handle sharing one backend and one write queue.
pub struct JsonStore<S: KvStore> {
    backend: Arc<S>,
    writes: Arc<KeyedWriteQueue>,
}

impl<S: KvStore> Clone for JsonStore<S> {
    fn clone(&self) -> Self {
        Self {
            backend: Arc::clone(&self.backend),
            writes: Arc::clone(&self.writes),
        }
    }
}

impl<S: KvStore> JsonStore<S> {
    pub fn new(backend: S) -> Self {
        Self::from_shared(Arc::new(backend))
    }

    /// Wraps a backend that the caller keeps a handle to (e.g. for tests
    /// that toggle failure injection).
    pub fn from_shared(backend: Arc<S>) -> Self {
        Self {
            backend,
            writes: Arc::new(KeyedWriteQueue::new()),
        }
    }

    /// Reads and decodes the value under `key`.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> StoreResult<Option<T>> {
        read_decoded(self.backend.as_ref(), key)
    }

    /// Encodes `value` and replaces whatever is stored under `key`.
    pub fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> StoreResult<()> {
        let encoded = encode(key, value)?;
        self.writes.run(key, || self.backend.set_raw(key, encoded.as_str()))
    }

    /// Deletes `key`; absent keys are a successful no-op.
    pub fn remove(&self, key: &str) -> StoreResult<()> {
        self.writes.run(key, || self.backend.remove(key))
    }

    /// Read-modify-write of one key as a single queued unit.
    ///
    /// `mutate` receives the current decoded value (or `None`) and returns the
    /// value to persist plus a result for the caller. If `mutate` fails,
    /// nothing is written.
    pub fn update<T, R, E>(
        &self,
        key: &str,
        mutate: impl FnOnce(Option<T>) -> Result<(T, R), E>,
    ) -> Result<R, E>
    where
        T: Serialize + DeserializeOwned,
        E: From<StoreError>,
    {
        self.writes.run(key, || {
            let current = read_decoded(self.backend.as_ref(), key)?;
            let (next, output) = mutate(current)?;
            let encoded = encode(key, &next)?;
            self.backend.set_raw(key, encoded.as_str())?;
            Ok(output)
        })
    }
}

fn read_decoded<T: DeserializeOwned>(backend: &dyn KvStore, key: &str) -> StoreResult<Option<T>> {
    let Some(raw) = backend.get_raw(key)? else {
        return Ok(None);
    };
    match serde_json::from_str(raw.as_str()) {
        Ok(value) => Ok(Some(value)),
        Err(source) => {
            warn!(
                "event=store_decode module=store status=error key={key} bytes={} error_code=storage_value_corrupt",
                raw.len()
            );
            Err(StoreError::Corrupt {
                key: key.to_string(),
                source,
            })
        }
    }
}

fn encode<T: Serialize + ?Sized>(key: &str, value: &T) -> StoreResult<String> {
    serde_json::to_string(value).map_err(|source| StoreError::Encode {
        key: key.to_string(),
        source,
    })
}
