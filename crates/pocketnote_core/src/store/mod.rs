//! Key-value store adapter.
//!
//! # Responsibility
//! - Define the opaque string-blob boundary (`KvStore`) the core persists to.
//! - Provide SQLite-backed and in-memory implementations.
//! - Provide the typed JSON codec (`JsonStore`) and per-key write queue.
//!
//! # Invariants
//! - Every logical record is one JSON text blob under one key.
//! - An absent key is `Ok(None)`, never an error.
//! - An undecodable blob is `StoreError::Corrupt`, never silently absent.
//! - Writes to the same key are serialized through `KeyedWriteQueue`.

use crate::db::DbError;
use std::error::Error;
use std::fmt::{Display, Formatter};

mod json;
mod memory;
mod sqlite;
mod write_queue;

pub use json::JsonStore;
pub use memory::MemoryKvStore;
pub use sqlite::SqliteKvStore;
pub use write_queue::KeyedWriteQueue;

pub type StoreResult<T> = Result<T, StoreError>;

/// Opaque persistent string store.
///
/// Implementations know nothing about domain shapes; they persist and return
/// raw text. Writing a key fully replaces its previous value.
pub trait KvStore: Send + Sync {
    /// Returns the raw text under `key`, or `None` when the key is absent.
    fn get_raw(&self, key: &str) -> StoreResult<Option<String>>;
    /// Replaces the value under `key`.
    fn set_raw(&self, key: &str, value: &str) -> StoreResult<()>;
    /// Deletes `key`. Removing an absent key succeeds.
    fn remove(&self, key: &str) -> StoreResult<()>;
}

/// Failure reported by a store backend.
#[derive(Debug)]
pub enum BackendError {
    Db(DbError),
    /// A previous holder of the backend lock panicked.
    Poisoned,
    /// Backend refused the call (used by `MemoryKvStore` failure injection).
    Unavailable(String),
}

impl Display for BackendError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Poisoned => write!(f, "store lock poisoned"),
            Self::Unavailable(details) => write!(f, "store unavailable: {details}"),
        }
    }
}

impl Error for BackendError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Poisoned | Self::Unavailable(_) => None,
        }
    }
}

impl From<DbError> for BackendError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for BackendError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Store adapter error.
#[derive(Debug)]
pub enum StoreError {
    /// Underlying store read failed.
    Read { key: String, source: BackendError },
    /// Underlying store write or delete failed. Prior value is unchanged.
    Write { key: String, source: BackendError },
    /// A value exists under `key` but cannot be decoded.
    Corrupt {
        key: String,
        source: serde_json::Error,
    },
    /// The value could not be encoded; nothing was written.
    Encode {
        key: String,
        source: serde_json::Error,
    },
}

impl StoreError {
    /// Returns the key the failed operation targeted.
    pub fn key(&self) -> &str {
        match self {
            Self::Read { key, .. }
            | Self::Write { key, .. }
            | Self::Corrupt { key, .. }
            | Self::Encode { key, .. } => key,
        }
    }

    /// Stable short code used in log events and FFI messages.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Read { .. } => "storage_read_failed",
            Self::Write { .. } => "storage_write_failed",
            Self::Corrupt { .. } => "storage_value_corrupt",
            Self::Encode { .. } => "storage_encode_failed",
        }
    }
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Read { key, source } => write!(f, "failed to read `{key}`: {source}"),
            Self::Write { key, source } => write!(f, "failed to write `{key}`: {source}"),
            Self::Corrupt { key, source } => {
                write!(f, "stored value under `{key}` is corrupt: {source}")
            }
            Self::Encode { key, source } => {
                write!(f, "failed to encode value for `{key}`: {source}")
            }
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Read { source, .. } | Self::Write { source, .. } => Some(source),
            Self::Corrupt { source, .. } | Self::Encode { source, .. } => Some(source),
        }
    }
}
