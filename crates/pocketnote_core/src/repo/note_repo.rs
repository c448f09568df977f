//! Note collection persistence.
//!
//! # Responsibility
//! - Load the full note collection, normalized to canonical shape.
//! - Apply caller mutations as one queued read-modify-write.
//!
//! # Invariants
//! - An absent collection reads as empty.
//! - The whole collection is rewritten on every mutation; there are no
//!   partial updates.

use super::{RepoResult, NOTES_KEY};
use crate::model::note::Note;
use crate::store::{JsonStore, KvStore, StoreError};

/// Repository interface for the note collection.
pub trait NoteRepository {
    /// Returns every stored note in storage order.
    fn load_notes(&self) -> RepoResult<Vec<Note>>;

    /// Replaces the stored collection.
    fn save_notes(&self, notes: &[Note]) -> RepoResult<()>;

    /// Runs `mutate` against the current collection and persists the result
    /// before any other writer of the collection can read it.
    ///
    /// Returning `Err` from `mutate` aborts without writing.
    fn modify_notes<R, E>(
        &self,
        mutate: impl FnOnce(&mut Vec<Note>) -> Result<R, E>,
    ) -> Result<R, E>
    where
        E: From<StoreError>;
}

/// `NoteRepository` backed by a JSON key-value store.
pub struct KvNoteRepository<S: KvStore> {
    store: JsonStore<S>,
}

impl<S: KvStore> KvNoteRepository<S> {
    pub fn new(store: JsonStore<S>) -> Self {
        Self { store }
    }
}

impl<S: KvStore> NoteRepository for KvNoteRepository<S> {
    fn load_notes(&self) -> RepoResult<Vec<Note>> {
        Ok(self.store.get::<Vec<Note>>(NOTES_KEY)?.unwrap_or_default())
    }

    fn save_notes(&self, notes: &[Note]) -> RepoResult<()> {
        self.store.set(NOTES_KEY, notes)
    }

    fn modify_notes<R, E>(
        &self,
        mutate: impl FnOnce(&mut Vec<Note>) -> Result<R, E>,
    ) -> Result<R, E>
    where
        E: From<StoreError>,
    {
        self.store.update(NOTES_KEY, |current: Option<Vec<Note>>| {
            let mut notes = current.unwrap_or_default();
            let output = mutate(&mut notes)?;
            Ok((notes, output))
        })
    }
}
