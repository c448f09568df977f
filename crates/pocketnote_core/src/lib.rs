//! Core domain logic for PocketNote.
//! This crate is the single source of truth for note and profile invariants.

pub mod capture;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod routing;
pub mod service;
pub mod store;

pub use capture::{
    attach_location, attach_photo, attach_profile_photo, CaptureError, CaptureSource,
    LocationProvider, PhotoPick, PhotoPicker,
};
pub use config::{ConfigError, CoreConfig};
pub use logging::{default_log_level, init_logging, init_logging_from_config, logging_status};
pub use model::note::{Note, NoteDraft, NoteId, NoteLocation, NoteValidationError};
pub use model::profile::{Profile, ProfileDraft, ProfileValidationError};
pub use repo::note_repo::{KvNoteRepository, NoteRepository};
pub use repo::profile_repo::{KvProfileRepository, ProfileRepository};
pub use repo::{RepoResult, NOTES_KEY, PROFILE_KEY};
pub use routing::{launch_route, NavAction, Route};
pub use service::note_service::{NoteService, NoteServiceError};
pub use service::profile_service::{ProfileService, ProfileServiceError};
pub use store::{JsonStore, KvStore, MemoryKvStore, SqliteKvStore, StoreError, StoreResult};

/// Note and profile services sharing one store.
pub struct Core<S: KvStore> {
    pub notes: NoteService<KvNoteRepository<S>>,
    pub profile: ProfileService<KvProfileRepository<S>>,
}

impl<S: KvStore> Core<S> {
    /// Wires both services onto `store`, sharing its write queue.
    pub fn new(store: JsonStore<S>) -> Self {
        Self {
            notes: NoteService::new(KvNoteRepository::new(store.clone())),
            profile: ProfileService::new(KvProfileRepository::new(store)),
        }
    }
}

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
