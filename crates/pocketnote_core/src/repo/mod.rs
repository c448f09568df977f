//! Repository layer over the key-value store.
//!
//! # Responsibility
//! - Map each record type to its fixed storage key.
//! - Own read-modify-write sequencing for that key.
//!
//! # Invariants
//! - Notes live under `NOTES_KEY` as one array; the profile under
//!   `PROFILE_KEY` as one object.
//! - Every mutation of a key goes through the store's write queue.

use crate::store::StoreError;

pub mod note_repo;
pub mod profile_repo;

pub type RepoResult<T> = Result<T, StoreError>;

/// Storage key of the full note collection.
pub const NOTES_KEY: &str = "notes";
/// Storage key of the singleton profile.
pub const PROFILE_KEY: &str = "profile";
