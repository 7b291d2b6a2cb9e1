//! Roles and the profile view consumed from the identity collaborator.

use super::UserId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use thiserror::Error;

/// Role membership of a marketplace identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Requester posting service requests.
    User,
    /// Individual service provider.
    Helper,
    /// Provider organisation.
    Business,
    /// Platform administrator.
    Admin,
}

impl Role {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Helper => "helper",
            Self::Business => "business",
            Self::Admin => "admin",
        }
    }

    /// Returns `true` for roles allowed to bid on job posts.
    #[must_use]
    pub const fn is_provider(self) -> bool {
        matches!(self, Self::Helper | Self::Business)
    }
}

impl TryFrom<&str> for Role {
    type Error = ParseRoleError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "user" => Ok(Self::User),
            "helper" => Ok(Self::Helper),
            "business" => Ok(Self::Business),
            "admin" => Ok(Self::Admin),
            _ => Err(ParseRoleError(value.to_owned())),
        }
    }
}

/// Error returned while parsing a role name.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown role: {0}")]
pub struct ParseRoleError(pub String);

/// Read-only view of an identity as the core needs it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    id: UserId,
    display_name: String,
    roles: BTreeSet<Role>,
}

impl UserProfile {
    /// Creates a profile with no roles.
    #[must_use]
    pub fn new(id: UserId, display_name: impl Into<String>) -> Self {
        Self {
            id,
            display_name: display_name.into(),
            roles: BTreeSet::new(),
        }
    }

    /// Adds a role to the profile.
    #[must_use]
    pub fn with_role(mut self, role: Role) -> Self {
        self.roles.insert(role);
        self
    }

    /// Returns the user identifier.
    #[must_use]
    pub const fn id(&self) -> UserId {
        self.id
    }

    /// Returns the name shown to counterparts.
    #[must_use]
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Returns the roles held by this identity.
    #[must_use]
    pub const fn roles(&self) -> &BTreeSet<Role> {
        &self.roles
    }

    /// Returns `true` if the identity holds `role`.
    #[must_use]
    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }

    /// Returns `true` if the identity may apply to job posts.
    #[must_use]
    pub fn is_provider(&self) -> bool {
        self.roles.iter().any(|role| role.is_provider())
    }
}
