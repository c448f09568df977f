//! FFI use-case API for the mobile UI.
//!
//! # Responsibility
//! - Expose stable, use-case-level functions to Dart via FRB.
//! - Own the single process-wide store the UI talks to.
//!
//! # Invariants
//! - Exported functions must not panic across the FFI boundary.
//! - Failures come back as `ok=false` envelopes with a readable message.
//! - The data directory is fixed once the store has been opened.

use log::warn;
use pocketnote_core::routing::{route_after_logout, route_after_setup, NavAction};
use pocketnote_core::{
    core_version as core_version_inner, init_logging as init_logging_inner,
    init_logging_from_config, logging_status, ping as ping_inner, Core, CoreConfig, JsonStore,
    Note, NoteDraft, NoteLocation, Profile, ProfileDraft, SqliteKvStore,
};
use std::path::PathBuf;
use std::sync::OnceLock;

const DEFAULT_DATA_DIR_NAME: &str = "pocketnote";

static DATA_DIR: OnceLock<PathBuf> = OnceLock::new();
static CORE: OnceLock<Core<SqliteKvStore>> = OnceLock::new();

/// Minimal health-check API for FRB smoke integration.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// When the host never calls this, the first store call starts logging under
/// `<data_dir>/logs` at `POCKETNOTE_LOG_LEVEL` (or the build default).
/// Returns an empty string on success and an error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Sets the app data directory. Must be called before the first store call.
///
/// # FFI contract
/// - Repeating the same directory is accepted.
/// - A different directory after the first call is rejected.
/// - Returns an empty string on success and an error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn configure_data_dir(dir: String) -> String {
    let trimmed = dir.trim();
    if trimmed.is_empty() {
        return "data dir cannot be empty".to_string();
    }
    let requested = PathBuf::from(trimmed);
    let active = DATA_DIR.get_or_init(|| requested.clone());
    if *active == requested {
        String::new()
    } else {
        format!(
            "data dir already set to `{}`; refusing to switch to `{}`",
            active.display(),
            requested.display()
        )
    }
}

/// Note as shown in list cards.
#[derive(Debug, Clone, PartialEq)]
pub struct NoteItem {
    pub id: String,
    pub title: String,
    pub description: String,
    pub image: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// Four-decimal `lat, lon` label, when a location is attached.
    pub location_label: Option<String>,
    pub is_pinned: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NotesResponse {
    pub ok: bool,
    /// Display-ordered notes; empty on failure.
    pub items: Vec<NoteItem>,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NoteActionResponse {
    pub ok: bool,
    pub note: Option<NoteItem>,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileItem {
    pub name: String,
    pub email: String,
    pub image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileResponse {
    pub ok: bool,
    pub profile: Option<ProfileItem>,
    /// Where the UI should go next (`main|profile_setup`), when navigation follows.
    pub next_route: Option<String>,
    pub message: String,
}

/// Returns `main` or `profile_setup`, or an `error: ...` string.
#[flutter_rust_bridge::frb(sync)]
pub fn launch_route() -> String {
    match with_core(|core| core.profile.launch_route().map_err(|err| err.to_string())) {
        Ok(route) => route.as_str().to_string(),
        Err(err) => format!("error: {err}"),
    }
}

#[flutter_rust_bridge::frb(sync)]
pub fn profile_get() -> ProfileResponse {
    match with_core(|core| core.profile.get_profile().map_err(|err| err.to_string())) {
        Ok(profile) => ProfileResponse {
            ok: true,
            profile: profile.map(to_profile_item),
            next_route: None,
            message: String::new(),
        },
        Err(err) => profile_failure(format!("profile_get failed: {err}")),
    }
}

/// Validates and stores the profile; on success the UI replaces setup with main.
#[flutter_rust_bridge::frb(sync)]
pub fn profile_save(name: String, email: String, image: Option<String>) -> ProfileResponse {
    let draft = ProfileDraft { name, email, image };
    match with_core(|core| core.profile.save_profile(draft).map_err(|err| err.to_string())) {
        Ok(profile) => ProfileResponse {
            ok: true,
            profile: Some(to_profile_item(profile)),
            next_route: replace_target(route_after_setup()),
            message: "Profile saved.".to_string(),
        },
        Err(err) => profile_failure(format!("profile_save failed: {err}")),
    }
}

/// Logs out: deletes the profile and keeps every note.
#[flutter_rust_bridge::frb(sync)]
pub fn profile_clear() -> ProfileResponse {
    match with_core(|core| core.profile.clear_profile().map_err(|err| err.to_string())) {
        Ok(()) => ProfileResponse {
            ok: true,
            profile: None,
            next_route: replace_target(route_after_logout()),
            message: "Logged out.".to_string(),
        },
        Err(err) => profile_failure(format!("profile_clear failed: {err}")),
    }
}

#[flutter_rust_bridge::frb(sync)]
pub fn notes_list() -> NotesResponse {
    match with_core(|core| core.notes.list_notes().map_err(|err| err.to_string())) {
        Ok(notes) => notes_success(notes),
        Err(err) => notes_failure(format!("notes_list failed: {err}")),
    }
}

/// Creates a note. `latitude`/`longitude` attach a location only when both are set.
#[flutter_rust_bridge::frb(sync)]
pub fn note_add(
    title: String,
    description: String,
    image: Option<String>,
    latitude: Option<f64>,
    longitude: Option<f64>,
) -> NoteActionResponse {
    let mut draft = NoteDraft::new(title, description);
    if let Some(uri) = image.filter(|uri| !uri.trim().is_empty()) {
        draft.attach_image(uri);
    }
    if let (Some(latitude), Some(longitude)) = (latitude, longitude) {
        draft.attach_location(NoteLocation::new(latitude, longitude));
    }

    match with_core(|core| core.notes.add_note(draft).map_err(|err| err.to_string())) {
        Ok(note) => NoteActionResponse {
            ok: true,
            note: Some(to_note_item(note)),
            message: "Note saved.".to_string(),
        },
        Err(err) => NoteActionResponse {
            ok: false,
            note: None,
            message: format!("note_add failed: {err}"),
        },
    }
}

/// Flips the pin flag and returns the re-sorted list.
#[flutter_rust_bridge::frb(sync)]
pub fn note_toggle_pin(id: String) -> NotesResponse {
    match with_core(|core| core.notes.toggle_pin(id.trim()).map_err(|err| err.to_string())) {
        Ok(notes) => notes_success(notes),
        Err(err) => notes_failure(format!("note_toggle_pin failed: {err}")),
    }
}

fn with_core<T>(f: impl FnOnce(&Core<SqliteKvStore>) -> Result<T, String>) -> Result<T, String> {
    let core = match CORE.get() {
        Some(core) => core,
        None => {
            let opened = open_core()?;
            // A concurrent caller may have won the race; its core is used either way.
            let _ = CORE.set(opened);
            CORE.get().ok_or_else(|| "store unavailable".to_string())?
        }
    };
    f(core)
}

fn open_core() -> Result<Core<SqliteKvStore>, String> {
    // An explicitly configured directory wins over the environment.
    let config = match DATA_DIR.get() {
        Some(dir) => CoreConfig::new(dir.clone()),
        None => CoreConfig::from_env(std::env::temp_dir().join(DEFAULT_DATA_DIR_NAME)),
    }
    .map_err(|err| err.to_string())?;
    let active = DATA_DIR.get_or_init(|| config.data_dir.clone());
    if *active != config.data_dir {
        return Err(format!(
            "data dir changed to `{}` while opening the store",
            active.display()
        ));
    }
    if logging_status().is_none() {
        if let Err(err) = init_logging_from_config(&config) {
            eprintln!("pocketnote: file logging disabled: {err}");
        }
    }
    let store = config.open_store().map_err(|err| {
        warn!("event=ffi_open module=ffi status=error error={err}");
        format!("store open failed: {err}")
    })?;
    Ok(Core::new(JsonStore::new(store)))
}

fn replace_target(action: NavAction) -> Option<String> {
    match action {
        NavAction::Replace(route) => Some(route.as_str().to_string()),
        NavAction::Back => None,
    }
}

fn notes_success(notes: Vec<Note>) -> NotesResponse {
    let items = notes.into_iter().map(to_note_item).collect::<Vec<_>>();
    let message = if items.is_empty() {
        "No notes yet.".to_string()
    } else {
        format!("{} note(s).", items.len())
    };
    NotesResponse {
        ok: true,
        items,
        message,
    }
}

fn notes_failure(message: String) -> NotesResponse {
    NotesResponse {
        ok: false,
        items: Vec::new(),
        message,
    }
}

fn profile_failure(message: String) -> ProfileResponse {
    ProfileResponse {
        ok: false,
        profile: None,
        next_route: None,
        message,
    }
}

fn to_note_item(note: Note) -> NoteItem {
    NoteItem {
        location_label: note.location.map(|location| location.display()),
        latitude: note.location.map(|location| location.latitude),
        longitude: note.location.map(|location| location.longitude),
        id: note.id,
        title: note.title,
        description: note.description,
        image: note.image,
        is_pinned: note.is_pinned,
    }
}

fn to_profile_item(profile: Profile) -> ProfileItem {
    ProfileItem {
        name: profile.name,
        email: profile.email,
        image: profile.image,
    }
}
