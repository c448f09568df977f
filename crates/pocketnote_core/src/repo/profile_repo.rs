//! Singleton profile persistence.

use super::{RepoResult, PROFILE_KEY};
use crate::model::profile::Profile;
use crate::store::{JsonStore, KvStore};

/// Repository interface for the device profile.
pub trait ProfileRepository {
    fn load_profile(&self) -> RepoResult<Option<Profile>>;
    /// Overwrites any existing profile.
    fn store_profile(&self, profile: &Profile) -> RepoResult<()>;
    /// Deletes the profile; succeeds when none is stored.
    fn delete_profile(&self) -> RepoResult<()>;
}

/// `ProfileRepository` backed by a JSON key-value store.
pub struct KvProfileRepository<S: KvStore> {
    store: JsonStore<S>,
}

impl<S: KvStore> KvProfileRepository<S> {
    pub fn new(store: JsonStore<S>) -> Self {
        Self { store }
    }
}

impl<S: KvStore> ProfileRepository for KvProfileRepository<S> {
    fn load_profile(&self) -> RepoResult<Option<Profile>> {
        self.store.get(PROFILE_KEY)
    }

    fn store_profile(&self, profile: &Profile) -> RepoResult<()> {
        self.store.set(PROFILE_KEY, profile)
    }

    fn delete_profile(&self) -> RepoResult<()> {
        self.store.remove(PROFILE_KEY)
    }
}
