//! Note record, location attachment and in-progress draft.
//!
//! # Invariants
//! - `id` is decimal epoch milliseconds; larger means newer.
//! - A persisted `text` field is read as `description` when the latter is
//!   missing or empty, and is never written back.
//! - `is_pinned` defaults to `false` when absent from storage.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Note identity; also the creation-time sort key.
pub type NoteId = String;

/// Maximum title length accepted from the editor, in characters.
pub const NOTE_TITLE_MAX_CHARS: usize = 50;

/// Geolocation captured when the note was written, in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NoteLocation {
    pub latitude: f64,
    pub longitude: f64,
}

impl NoteLocation {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Finite and inside `±90` latitude / `±180` longitude.
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }

    /// Four-decimal `lat, lon` label used by list cards and the editor chip.
    pub fn display(&self) -> String {
        format!("{:.4}, {:.4}", self.latitude, self.longitude)
    }
}

/// Canonical note record.
///
/// Deserialization goes through the legacy-tolerant `StoredNote` shape, so
/// every `Note` in memory is already normalized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "StoredNote")]
pub struct Note {
    pub id: NoteId,
    pub title: String,
    pub description: String,
    pub image: Option<String>,
    pub location: Option<NoteLocation>,
    #[serde(rename = "isPinned")]
    pub is_pinned: bool,
}

impl Note {
    /// Materializes a validated draft under the given id.
    pub fn from_draft(
        id: impl Into<NoteId>,
        draft: NoteDraft,
    ) -> Result<Self, NoteValidationError> {
        draft.validate()?;
        Ok(Self {
            id: id.into(),
            title: draft.title,
            description: draft.description,
            image: draft.image,
            location: draft.location,
            is_pinned: false,
        })
    }

    /// Numeric value of `id`, or `None` for ids that are not epoch millis.
    pub fn id_value(&self) -> Option<u64> {
        self.id.trim().parse().ok()
    }

    pub fn toggle_pin(&mut self) {
        self.is_pinned = !self.is_pinned;
    }
}

/// On-disk note shape across all app iterations.
#[derive(Debug, Deserialize)]
struct StoredNote {
    id: String,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    image: Option<String>,
    #[serde(default)]
    location: Option<NoteLocation>,
    #[serde(default, rename = "isPinned")]
    is_pinned: Option<bool>,
}

impl From<StoredNote> for Note {
    fn from(stored: StoredNote) -> Self {
        let description = stored
            .description
            .filter(|value| !value.is_empty())
            .or(stored.text)
            .unwrap_or_default();
        Self {
            id: stored.id,
            title: stored.title.unwrap_or_default(),
            description,
            image: stored.image,
            location: stored.location,
            is_pinned: stored.is_pinned.unwrap_or(false),
        }
    }
}

/// Note being composed in the editor, before it has an id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NoteDraft {
    title: String,
    description: String,
    image: Option<String>,
    location: Option<NoteLocation>,
}

impl NoteDraft {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        let mut draft = Self::default();
        draft.set_title(title);
        draft.set_description(description);
        draft
    }

    /// Builds a draft from single-field legacy input.
    pub fn from_legacy_text(text: impl Into<String>) -> Self {
        Self::new(String::new(), text)
    }

    /// Sets the title, keeping at most `NOTE_TITLE_MAX_CHARS` characters.
    pub fn set_title(&mut self, title: impl Into<String>) {
        let title = title.into();
        self.title = if title.chars().count() > NOTE_TITLE_MAX_CHARS {
            title.chars().take(NOTE_TITLE_MAX_CHARS).collect()
        } else {
            title
        };
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }

    pub fn attach_image(&mut self, uri: impl Into<String>) {
        self.image = Some(uri.into());
    }

    pub fn clear_image(&mut self) {
        self.image = None;
    }

    pub fn attach_location(&mut self, location: NoteLocation) {
        self.location = Some(location);
    }

    pub fn clear_location(&mut self) {
        self.location = None;
    }

    pub fn with_image(mut self, uri: impl Into<String>) -> Self {
        self.attach_image(uri);
        self
    }

    pub fn with_location(mut self, location: NoteLocation) -> Self {
        self.attach_location(location);
        self
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn image(&self) -> Option<&str> {
        self.image.as_deref()
    }

    pub fn location(&self) -> Option<NoteLocation> {
        self.location
    }

    /// Rejects drafts whose title and description are both blank, and
    /// locations that JSON cannot carry or that lie off the globe.
    pub fn validate(&self) -> Result<(), NoteValidationError> {
        if self.title.trim().is_empty() && self.description.trim().is_empty() {
            return Err(NoteValidationError::EmptyContent);
        }
        if self.location.is_some_and(|location| !location.is_valid()) {
            return Err(NoteValidationError::InvalidLocation);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteValidationError {
    /// Both title and description are empty or whitespace-only.
    EmptyContent,
    /// Latitude or longitude is NaN, infinite or out of range.
    InvalidLocation,
}

impl NoteValidationError {
    /// Stable code for log events.
    pub fn code(&self) -> &'static str {
        match self {
            Self::EmptyContent => "note_empty_content",
            Self::InvalidLocation => "note_invalid_location",
        }
    }
}

impl Display for NoteValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyContent => write!(f, "note needs a title or a description"),
            Self::InvalidLocation => write!(f, "note location is not a valid coordinate"),
        }
    }
}

impl Error for NoteValidationError {}

#[cfg(test)]
mod tests {
    use super::{Note, NoteDraft, NoteLocation, NoteValidationError, NOTE_TITLE_MAX_CHARS};

    #[test]
    fn legacy_text_becomes_description() {
        let note: Note =
            serde_json::from_str(r#"{"id":"1700","text":"old body","image":null,"location":null}"#)
                .unwrap();
        assert_eq!(note.title, "");
        assert_eq!(note.description, "old body");
        assert!(!note.is_pinned);
    }

    #[test]
    fn description_wins_over_legacy_text() {
        let note: Note = serde_json::from_str(
            r#"{"id":"1","description":"new","text":"old","image":null,"location":null}"#,
        )
        .unwrap();
        assert_eq!(note.description, "new");
    }

    #[test]
    fn serialization_never_emits_text_and_always_emits_pin_flag() {
        let note: Note = serde_json::from_str(r#"{"id":"5","text":"body"}"#).unwrap();
        let json = serde_json::to_value(&note).unwrap();
        assert!(json.get("text").is_none());
        assert_eq!(json["description"], "body");
        assert_eq!(json["isPinned"], false);
        assert!(json["image"].is_null());
        assert!(json["location"].is_null());
    }

    #[test]
    fn blank_draft_is_rejected() {
        let draft = NoteDraft::new("   ", "\n\t");
        assert_eq!(draft.validate(), Err(NoteValidationError::EmptyContent));
        assert!(NoteDraft::from_legacy_text("legacy").validate().is_ok());
    }

    #[test]
    fn non_finite_or_off_globe_location_is_rejected() {
        for location in [
            NoteLocation::new(f64::NAN, 1.0),
            NoteLocation::new(1.0, f64::INFINITY),
            NoteLocation::new(90.5, 0.0),
            NoteLocation::new(0.0, -180.5),
        ] {
            let draft = NoteDraft::new("t", "").with_location(location);
            assert_eq!(draft.validate(), Err(NoteValidationError::InvalidLocation));
        }
        let edge = NoteDraft::new("t", "").with_location(NoteLocation::new(-90.0, 180.0));
        assert!(edge.validate().is_ok());
    }

    #[test]
    fn attachments_clear_independently() {
        let mut draft = NoteDraft::new("t", "")
            .with_image("file:///a.jpg")
            .with_location(NoteLocation::new(1.0, 2.0));

        draft.clear_image();
        assert_eq!(draft.image(), None);
        assert_eq!(draft.location(), Some(NoteLocation::new(1.0, 2.0)));

        draft.attach_image("file:///b.jpg");
        draft.clear_location();
        assert_eq!(draft.location(), None);
        assert_eq!(draft.image(), Some("file:///b.jpg"));

        let note = Note::from_draft("1", draft).unwrap();
        assert_eq!(note.location, None);
        assert_eq!(note.image.as_deref(), Some("file:///b.jpg"));
    }

    #[test]
    fn title_is_capped() {
        let draft = NoteDraft::new("x".repeat(80), "");
        assert_eq!(draft.title().chars().count(), NOTE_TITLE_MAX_CHARS);
    }

    #[test]
    fn location_display_uses_four_decimals() {
        let location = NoteLocation::new(52.520008, 13.404954);
        assert_eq!(location.display(), "52.5200, 13.4050");
    }

    #[test]
    fn non_numeric_id_has_no_value() {
        let note = Note::from_draft("abc", NoteDraft::new("t", "")).unwrap();
        assert_eq!(note.id_value(), None);
    }
}
