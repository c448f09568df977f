//! Local user profile.
//!
//! There is exactly one profile per device. Saving replaces it; logout
//! deletes it.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub name: String,
    /// Free-form; no format validation is applied.
    pub email: String,
    #[serde(default)]
    pub image: Option<String>,
}

/// Profile fields as entered in the setup flow.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileDraft {
    pub name: String,
    pub email: String,
    pub image: Option<String>,
}

impl ProfileDraft {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            image: None,
        }
    }

    pub fn with_image(mut self, uri: impl Into<String>) -> Self {
        self.image = Some(uri.into());
        self
    }

    /// Checks required fields and produces the record to persist.
    ///
    /// Values are stored exactly as entered; only blankness is checked.
    pub fn into_profile(self) -> Result<Profile, ProfileValidationError> {
        if self.name.trim().is_empty() {
            return Err(ProfileValidationError::EmptyName);
        }
        if self.email.trim().is_empty() {
            return Err(ProfileValidationError::EmptyEmail);
        }
        Ok(Profile {
            name: self.name,
            email: self.email,
            image: self.image,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileValidationError {
    EmptyName,
    EmptyEmail,
}

impl Display for ProfileValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyName => write!(f, "profile name cannot be empty"),
            Self::EmptyEmail => write!(f, "profile email cannot be empty"),
        }
    }
}

impl Error for ProfileValidationError {}
