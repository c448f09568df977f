//! Domain records persisted by the core.
//!
//! # Responsibility
//! - Define the canonical `Note` and `Profile` shapes and their drafts.
//! - Own field-level validation rules.
//!
//! # Invariants
//! - Notes are always held in canonical `title` + `description` form; the
//!   legacy `text` field only exists on the read path.
//! - Missing optional fields take their documented defaults (false / empty).

pub mod note;
pub mod profile;
