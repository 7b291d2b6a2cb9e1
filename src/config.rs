//! Runtime limits and notification templates.
//!
//! Services take a [`MarketplaceConfig`] through their `with_config`
//! builders. Defaults match the limits the public API documents; embedders
//! may deserialize a config from their own settings source or read the
//! numeric limits from the environment.

use crate::notification::domain::{NotificationTemplates, TemplateError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Environment variable overriding [`MarketplaceConfig::max_message_length`].
pub const MAX_MESSAGE_LENGTH_ENV: &str = "HIRELINK_MAX_MESSAGE_LENGTH";

/// Environment variable overriding
/// [`MarketplaceConfig::max_application_message_length`].
pub const MAX_APPLICATION_MESSAGE_LENGTH_ENV: &str = "HIRELINK_MAX_APPLICATION_MESSAGE_LENGTH";

/// Environment variable overriding [`MarketplaceConfig::max_category_length`].
pub const MAX_CATEGORY_LENGTH_ENV: &str = "HIRELINK_MAX_CATEGORY_LENGTH";

const DEFAULT_MAX_MESSAGE_LENGTH: usize = 5000;
const DEFAULT_MAX_APPLICATION_MESSAGE_LENGTH: usize = 2000;
const DEFAULT_MAX_CATEGORY_LENGTH: usize = 100;

/// Limits and templates shared by the job and messaging services.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarketplaceConfig {
    /// Maximum message body length in characters.
    pub max_message_length: usize,
    /// Maximum application cover note length in characters.
    pub max_application_message_length: usize,
    /// Maximum service category length in characters.
    pub max_category_length: usize,
    /// Templates used to render notifications.
    pub notification_templates: NotificationTemplates,
}

impl Default for MarketplaceConfig {
    fn default() -> Self {
        Self {
            max_message_length: DEFAULT_MAX_MESSAGE_LENGTH,
            max_application_message_length: DEFAULT_MAX_APPLICATION_MESSAGE_LENGTH,
            max_category_length: DEFAULT_MAX_CATEGORY_LENGTH,
            notification_templates: NotificationTemplates::default(),
        }
    }
}

/// Errors raised while loading or validating configuration.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A numeric variable could not be parsed.
    #[error("{name} must be a positive integer, got {value:?}")]
    InvalidNumber {
        /// Variable name.
        name: &'static str,
        /// Raw value.
        value: String,
    },

    /// A limit was set to zero.
    #[error("{name} must be greater than zero")]
    ZeroLimit {
        /// Setting name.
        name: &'static str,
    },

    /// A notification template failed to compile.
    #[error(transparent)]
    Template(#[from] TemplateError),
}

impl MarketplaceConfig {
    /// Loads limits from the process environment on top of the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a variable is malformed or the resulting
    /// configuration is invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Loads limits through `lookup` on top of the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a value is malformed or the resulting
    /// configuration is invalid.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(value) = parse_limit(&lookup, MAX_MESSAGE_LENGTH_ENV)? {
            config.max_message_length = value;
        }
        if let Some(value) = parse_limit(&lookup, MAX_APPLICATION_MESSAGE_LENGTH_ENV)? {
            config.max_application_message_length = value;
        }
        if let Some(value) = parse_limit(&lookup, MAX_CATEGORY_LENGTH_ENV)? {
            config.max_category_length = value;
        }
        config.validate()?;
        Ok(config)
    }

    /// Checks limits and templates.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ZeroLimit`] for a zero limit and
    /// [`ConfigError::Template`] for a template that does not compile.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("max_message_length", self.max_message_length),
            (
                "max_application_message_length",
                self.max_application_message_length,
            ),
            ("max_category_length", self.max_category_length),
        ] {
            if value == 0 {
                return Err(ConfigError::ZeroLimit { name });
            }
        }
        self.notification_templates.validate()?;
        Ok(())
    }
}

fn parse_limit<F>(lookup: &F, name: &'static str) -> Result<Option<usize>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(name) else {
        return Ok(None);
    };
    raw.trim()
        .parse::<usize>()
        .map(Some)
        .map_err(|_| ConfigError::InvalidNumber { name, value: raw })
}
