//! Core use-case services.
//!
//! # Responsibility
//! - Apply validation and ordering on top of repository persistence.
//! - Keep FFI/UI layers decoupled from storage details.

pub mod note_service;
pub mod profile_service;
