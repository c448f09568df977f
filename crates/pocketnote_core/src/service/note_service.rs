//! Note use-case service.
//!
//! # Responsibility
//! - List notes in display order.
//! - Validate and append new notes with fresh ids.
//! - Toggle the pin flag of one note.
//!
//! # Invariants
//! - Listing order: pinned before unpinned, then numeric `id` descending.
//! - A new id is strictly greater than every numeric id already stored, so
//!   ids stay unique and creation-ordered even within one millisecond.
//! - Validation failures never touch storage.

use crate::model::note::{Note, NoteDraft, NoteId, NoteValidationError};
use crate::repo::note_repo::NoteRepository;
use crate::repo::RepoResult;
use crate::store::StoreError;
use log::{info, warn};
use std::cmp::Ordering;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::{SystemTime, UNIX_EPOCH};

/// Service error for note use-cases.
#[derive(Debug)]
pub enum NoteServiceError {
    /// Draft rejected before any storage access.
    Validation(NoteValidationError),
    /// Persistence-layer failure; stored notes are unchanged.
    Store(StoreError),
}

impl Display for NoteServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for NoteServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Store(err) => Some(err),
        }
    }
}

impl From<NoteValidationError> for NoteServiceError {
    fn from(value: NoteValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<StoreError> for NoteServiceError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

/// Note service facade over repository implementations.
pub struct NoteService<R: NoteRepository> {
    repo: R,
    clock: fn() -> u64,
}

impl<R: NoteRepository> NoteService<R> {
    /// Creates a service that stamps ids from the system clock.
    pub fn new(repo: R) -> Self {
        Self::with_clock(repo, now_epoch_ms)
    }

    /// Creates a service with a caller-provided epoch-millisecond clock.
    pub fn with_clock(repo: R, clock: fn() -> u64) -> Self {
        Self { repo, clock }
    }

    /// Returns all notes in display order.
    pub fn list_notes(&self) -> RepoResult<Vec<Note>> {
        let mut notes = self.repo.load_notes()?;
        sort_notes(&mut notes);
        Ok(notes)
    }

    /// Finds one note by id.
    pub fn get_note(&self, id: &str) -> RepoResult<Option<Note>> {
        Ok(self
            .repo
            .load_notes()?
            .into_iter()
            .find(|note| note.id == id))
    }

    /// Validates `draft`, appends it to the collection and returns the stored note.
    pub fn add_note(&self, draft: NoteDraft) -> Result<Note, NoteServiceError> {
        if let Err(err) = draft.validate() {
            warn!(
                "event=note_add module=service status=rejected error_code={}",
                err.code()
            );
            return Err(err.into());
        }

        let now_ms = (self.clock)();
        let result = self.repo.modify_notes(|notes| {
            let note = Note::from_draft(next_note_id(notes, now_ms), draft)?;
            notes.push(note.clone());
            Ok::<_, NoteServiceError>((note, notes.len()))
        });

        match result {
            Ok((note, note_count)) => {
                info!(
                    "event=note_add module=service status=ok has_image={} has_location={} note_count={note_count}",
                    note.image.is_some(),
                    note.location.is_some()
                );
                Ok(note)
            }
            Err(err) => {
                log_store_failure("note_add", &err);
                Err(err)
            }
        }
    }

    /// Flips the pin flag of `id` and returns the re-sorted collection.
    ///
    /// Unknown ids leave every note unchanged.
    pub fn toggle_pin(&self, id: &str) -> Result<Vec<Note>, NoteServiceError> {
        let result = self.repo.modify_notes(|notes| {
            let found = notes.iter_mut().find(|note| note.id == id).map(|note| {
                note.toggle_pin();
                note.is_pinned
            });
            Ok::<_, NoteServiceError>((notes.clone(), found))
        });

        match result {
            Ok((mut notes, found)) => {
                match found {
                    Some(pinned) => {
                        info!("event=note_toggle_pin module=service status=ok pinned={pinned}")
                    }
                    None => info!("event=note_toggle_pin module=service status=not_found"),
                }
                sort_notes(&mut notes);
                Ok(notes)
            }
            Err(err) => {
                log_store_failure("note_toggle_pin", &err);
                Err(err)
            }
        }
    }
}

/// Sorts notes for display: pinned first, newest id first within each group.
///
/// Ids that are not numeric sort after numeric ones in their group.
pub fn sort_notes(notes: &mut [Note]) {
    notes.sort_by(compare_for_display);
}

fn compare_for_display(a: &Note, b: &Note) -> Ordering {
    b.is_pinned
        .cmp(&a.is_pinned)
        .then_with(|| b.id_value().cmp(&a.id_value()))
}

/// Returns a fresh id: `now_ms`, or one past the largest stored id if that
/// is not already in the past.
pub fn next_note_id(existing: &[Note], now_ms: u64) -> NoteId {
    let newest = existing.iter().filter_map(Note::id_value).max();
    let value = match newest {
        Some(newest) if newest >= now_ms => newest.saturating_add(1),
        _ => now_ms,
    };
    value.to_string()
}

fn now_epoch_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX))
        .unwrap_or(0)
}

fn log_store_failure(event: &str, err: &NoteServiceError) {
    if let NoteServiceError::Store(store_err) = err {
        warn!(
            "event={event} module=service status=error error_code={} key={}",
            store_err.code(),
            store_err.key()
        );
    }
}
