//! Profile use-case service.
//!
//! # Invariants
//! - Saving validates before storage is touched; a rejected save leaves the
//!   previous profile in place.
//! - Clearing the profile never touches notes.

use crate::model::profile::{Profile, ProfileDraft, ProfileValidationError};
use crate::repo::profile_repo::ProfileRepository;
use crate::repo::RepoResult;
use crate::routing::{launch_route, Route};
use crate::store::StoreError;
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for profile use-cases.
#[derive(Debug)]
pub enum ProfileServiceError {
    Validation(ProfileValidationError),
    Store(StoreError),
}

impl Display for ProfileServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ProfileServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Store(err) => Some(err),
        }
    }
}

impl From<ProfileValidationError> for ProfileServiceError {
    fn from(value: ProfileValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<StoreError> for ProfileServiceError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

/// Profile service facade over repository implementations.
pub struct ProfileService<R: ProfileRepository> {
    repo: R,
}

impl<R: ProfileRepository> ProfileService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn get_profile(&self) -> RepoResult<Option<Profile>> {
        self.repo.load_profile()
    }

    /// Validates `draft` and overwrites the stored profile with it.
    pub fn save_profile(&self, draft: ProfileDraft) -> Result<Profile, ProfileServiceError> {
        let profile = draft.into_profile().map_err(|err| {
            warn!("event=profile_save module=service status=rejected error={err}");
            err
        })?;
        if let Err(err) = self.repo.store_profile(&profile) {
            warn!(
                "event=profile_save module=service status=error error_code={}",
                err.code()
            );
            return Err(err.into());
        }
        info!(
            "event=profile_save module=service status=ok has_image={}",
            profile.image.is_some()
        );
        Ok(profile)
    }

    /// Deletes the stored profile (logout). Notes are preserved.
    pub fn clear_profile(&self) -> RepoResult<()> {
        self.repo.delete_profile()?;
        info!("event=profile_clear module=service status=ok");
        Ok(())
    }

    /// Decides the first screen from whether a profile is stored.
    pub fn launch_route(&self) -> RepoResult<Route> {
        let route = launch_route(self.repo.load_profile()?.is_some());
        info!("event=launch_route module=service status=ok route={}", route.as_str());
        Ok(route)
    }
}
