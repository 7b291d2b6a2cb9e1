//! Directory port for looking up identities.

use crate::identity::domain::{UserId, UserProfile};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;
use tracing::warn;

/// Result type for identity directory operations.
pub type IdentityResult<T> = Result<T, IdentityError>;

/// Lookup contract exposed by the external identity collaborator.
#[async_trait]
pub trait IdentityDirectory: Send + Sync {
    /// Finds the profile for a user.
    ///
    /// Returns `None` when the user is unknown.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::Lookup`] when the collaborator fails.
    async fn find_profile(&self, id: UserId) -> IdentityResult<Option<UserProfile>>;

    /// Resolves a display name for denormalised payloads.
    ///
    /// Falls back to the raw identifier when the user is unknown or the
    /// lookup fails; failures are logged.
    async fn display_name_or_id(&self, id: UserId) -> String {
        match self.find_profile(id).await {
            Ok(Some(profile)) => profile.display_name().to_owned(),
            Ok(None) => id.to_string(),
            Err(err) => {
                warn!(user_id = %id, error = %err, "display name lookup failed");
                id.to_string()
            }
        }
    }
}

/// Errors returned by identity directory implementations.
#[derive(Debug, Clone, Error)]
pub enum IdentityError {
    /// The collaborator could not answer.
    #[error("identity lookup failed: {0}")]
    Lookup(Arc<dyn std::error::Error + Send + Sync>),
}

impl IdentityError {
    /// Wraps a collaborator failure.
    pub fn lookup(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Lookup(Arc::new(err))
    }
}
