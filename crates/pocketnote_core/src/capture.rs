//! Photo and geolocation capture boundary.
//!
//! # Responsibility
//! - Model the platform photo picker and location provider as traits.
//! - Attach capture results to drafts without ever losing draft content.
//!
//! # Invariants
//! - A cancelled pick or any capture error leaves the draft untouched.
//! - The core performs no size/format validation on picked photos.

use crate::model::note::{NoteDraft, NoteLocation};
use crate::model::profile::ProfileDraft;
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Platform resource a permission prompt guards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureSource {
    PhotoLibrary,
    Location,
}

impl CaptureSource {
    fn as_str(self) -> &'static str {
        match self {
            Self::PhotoLibrary => "photo_library",
            Self::Location => "location",
        }
    }
}

/// User-visible, non-fatal capture failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureError {
    /// The user or OS refused access.
    PermissionDenied(CaptureSource),
    /// Access was granted but the capture itself failed.
    CaptureFailed(String),
}

impl Display for CaptureError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PermissionDenied(CaptureSource::PhotoLibrary) => {
                write!(f, "photo library permission is required")
            }
            Self::PermissionDenied(CaptureSource::Location) => {
                write!(f, "location permission is required")
            }
            Self::CaptureFailed(details) => write!(f, "could not fetch location: {details}"),
        }
    }
}

impl Error for CaptureError {}

/// Outcome of a photo pick that did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PhotoPick {
    Cancelled,
    /// Local file URI of the chosen photo.
    Picked(String),
}

pub trait PhotoPicker {
    fn pick_photo(&self) -> Result<PhotoPick, CaptureError>;
}

pub trait LocationProvider {
    fn current_location(&self) -> Result<NoteLocation, CaptureError>;
}

/// Picks a photo into the note draft. Returns whether an image was attached.
pub fn attach_photo(
    draft: &mut NoteDraft,
    picker: &impl PhotoPicker,
) -> Result<bool, CaptureError> {
    match pick_uri(picker)? {
        Some(uri) => {
            draft.attach_image(uri);
            Ok(true)
        }
        None => Ok(false),
    }
}

/// Picks a profile photo into the setup draft. Returns whether one was attached.
pub fn attach_profile_photo(
    draft: &mut ProfileDraft,
    picker: &impl PhotoPicker,
) -> Result<bool, CaptureError> {
    match pick_uri(picker)? {
        Some(uri) => {
            draft.image = Some(uri);
            Ok(true)
        }
        None => Ok(false),
    }
}

/// Captures the current position into the note draft.
pub fn attach_location(
    draft: &mut NoteDraft,
    provider: &impl LocationProvider,
) -> Result<NoteLocation, CaptureError> {
    match provider.current_location() {
        Ok(location) => {
            draft.attach_location(location);
            info!("event=capture module=capture status=ok source=location");
            Ok(location)
        }
        Err(err) => {
            log_capture_error(CaptureSource::Location, &err);
            Err(err)
        }
    }
}

fn pick_uri(picker: &impl PhotoPicker) -> Result<Option<String>, CaptureError> {
    match picker.pick_photo() {
        Ok(PhotoPick::Picked(uri)) => {
            info!("event=capture module=capture status=ok source=photo_library");
            Ok(Some(uri))
        }
        Ok(PhotoPick::Cancelled) => {
            info!("event=capture module=capture status=cancelled source=photo_library");
            Ok(None)
        }
        Err(err) => {
            log_capture_error(CaptureSource::PhotoLibrary, &err);
            Err(err)
        }
    }
}

fn log_capture_error(source: CaptureSource, err: &CaptureError) {
    let code = match err {
        CaptureError::PermissionDenied(_) => "permission_denied",
        CaptureError::CaptureFailed(_) => "capture_failed",
    };
    warn!(
        "event=capture module=capture status=error source={} error_code={code}",
        source.as_str()
    );
}
