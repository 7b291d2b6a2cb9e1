//! Stable error taxonomy shared by every service in the crate.
//!
//! Each service error maps onto one [`ErrorCode`]. The code is the
//! machine-readable half of a failure; the error's `Display` output is the
//! human half. Callers that expose errors over a transport should use
//! [`ErrorReport`] rather than inventing their own mapping.

use serde::Serialize;
use std::fmt;

/// Machine-readable error code surfaced to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// The referenced entity does not exist.
    NotFound,
    /// The actor lacks authorization for the target entity.
    Forbidden,
    /// A state machine precondition was violated.
    InvalidTransition,
    /// The applicant already applied to the job post.
    DuplicateApplication,
    /// The job post no longer accepts applications.
    PostNotOpen,
    /// A conversation was requested between a user and themselves.
    SelfConversation,
    /// A message was addressed to its own sender.
    SelfMessage,
    /// A message body is blank or exceeds the configured limit.
    EmptyOrOversizedBody,
    /// Request input failed validation.
    InvalidInput,
    /// Storage or a collaborator failed; the caller may retry.
    StorageFailure,
}

impl ErrorCode {
    /// Returns the stable wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotFound => "not_found",
            Self::Forbidden => "forbidden",
            Self::InvalidTransition => "invalid_transition",
            Self::DuplicateApplication => "duplicate_application",
            Self::PostNotOpen => "post_not_open",
            Self::SelfConversation => "self_conversation",
            Self::SelfMessage => "self_message",
            Self::EmptyOrOversizedBody => "empty_or_oversized_body",
            Self::InvalidInput => "invalid_input",
            Self::StorageFailure => "storage_failure",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors that expose a stable [`ErrorCode`].
pub trait Coded {
    /// Returns the machine-readable code for this error.
    fn code(&self) -> ErrorCode;
}

/// Serializable pairing of an error code and its human-readable message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorReport {
    /// Machine-readable code.
    pub code: ErrorCode,
    /// Human-readable message.
    pub message: String,
}

impl ErrorReport {
    /// Builds a report from any coded error.
    #[must_use]
    pub fn from_error<E>(error: &E) -> Self
    where
        E: Coded + fmt::Display,
    {
        Self {
            code: error.code(),
            message: error.to_string(),
        }
    }
}
