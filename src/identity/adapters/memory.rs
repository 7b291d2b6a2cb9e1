//! In-memory identity directory.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::identity::{
    domain::{UserId, UserProfile},
    ports::{IdentityDirectory, IdentityError, IdentityResult},
};

/// Thread-safe in-memory identity directory.
///
/// Embedding applications register the identities they have already
/// authenticated; tests use it as a fixture.
#[derive(Debug, Clone, Default)]
pub struct InMemoryIdentityDirectory {
    profiles: Arc<RwLock<HashMap<UserId, UserProfile>>>,
}

impl InMemoryIdentityDirectory {
    /// Creates an empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers or replaces a profile.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::Lookup`] if the internal lock is poisoned.
    pub fn register(&self, profile: UserProfile) -> IdentityResult<()> {
        let mut profiles = self
            .profiles
            .write()
            .map_err(|err| IdentityError::lookup(std::io::Error::other(err.to_string())))?;
        profiles.insert(profile.id(), profile);
        Ok(())
    }
}

#[async_trait]
impl IdentityDirectory for InMemoryIdentityDirectory {
    async fn find_profile(&self, id: UserId) -> IdentityResult<Option<UserProfile>> {
        let profiles = self
            .profiles
            .read()
            .map_err(|err| IdentityError::lookup(std::io::Error::other(err.to_string())))?;
        Ok(profiles.get(&id).cloned())
    }
}
