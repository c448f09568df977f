//! SQLite-backed `KvStore`.
//!
//! # Invariants
//! - Blobs live in `kv_entries`, one row per key.
//! - `set_raw` is a single upsert statement, so a failed write leaves the
//!   previous value in place.

use super::{BackendError, KvStore, StoreError, StoreResult};
use crate::db::{open_db, open_db_in_memory, DbResult};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

pub struct SqliteKvStore {
    conn: Mutex<Connection>,
}

impl SqliteKvStore {
    /// Opens the store file at `path`, creating and migrating it as needed.
    pub fn open(path: impl AsRef<Path>, busy_timeout: Duration) -> DbResult<Self> {
        Ok(Self::from_connection(open_db(path, busy_timeout)?))
    }

    /// Opens an ephemeral store that is discarded on drop.
    pub fn open_in_memory() -> DbResult<Self> {
        Ok(Self::from_connection(open_db_in_memory()?))
    }

    /// Wraps a connection that already has migrations applied.
    pub fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, BackendError> {
        self.conn.lock().map_err(|_| BackendError::Poisoned)
    }
}

impl KvStore for SqliteKvStore {
    fn get_raw(&self, key: &str) -> StoreResult<Option<String>> {
        let read = || -> Result<Option<String>, BackendError> {
            let conn = self.lock()?;
            let value = conn
                .query_row(
                    "SELECT value FROM kv_entries WHERE key = ?1;",
                    [key],
                    |row| row.get::<_, String>(0),
                )
                .optional()?;
            Ok(value)
        };
        read().map_err(|source| StoreError::Read {
            key: key.to_string(),
            source,
        })
    }

    fn set_raw(&self, key: &str, value: &str) -> StoreResult<()> {
        let write = || -> Result<(), BackendError> {
            let conn = self.lock()?;
            conn.execute(
                "INSERT INTO kv_entries (key, value, updated_at)
                 VALUES (?1, ?2, CAST(strftime('%s', 'now') AS INTEGER) * 1000)
                 ON CONFLICT(key) DO UPDATE SET
                    value = excluded.value,
                    updated_at = excluded.updated_at;",
                params![key, value],
            )?;
            Ok(())
        };
        write().map_err(|source| StoreError::Write {
            key: key.to_string(),
            source,
        })
    }

    fn remove(&self, key: &str) -> StoreResult<()> {
        let delete = || -> Result<(), BackendError> {
            let conn = self.lock()?;
            conn.execute("DELETE FROM kv_entries WHERE key = ?1;", [key])?;
            Ok(())
        };
        delete().map_err(|source| StoreError::Write {
            key: key.to_string(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::SqliteKvStore;
    use crate::store::KvStore;

    #[test]
    fn upsert_replaces_previous_value() {
        let store = SqliteKvStore::open_in_memory().unwrap();
        store.set_raw("notes", "[]").unwrap();
        store.set_raw("notes", "[1]").unwrap();
        assert_eq!(store.get_raw("notes").unwrap().as_deref(), Some("[1]"));
    }

    #[test]
    fn missing_key_reads_as_none_and_remove_is_noop() {
        let store = SqliteKvStore::open_in_memory().unwrap();
        assert_eq!(store.get_raw("profile").unwrap(), None);
        store.remove("profile").unwrap();
        assert_eq!(store.get_raw("profile").unwrap(), None);
    }
}
