//! Service-level errors for the messaging context.

use crate::error::{Coded, ErrorCode};
use crate::identity::{domain::UserId, ports::IdentityError};
use crate::messaging::{
    domain::{ConversationId, MessageId, MessagingDomainError},
    ports::MessagingRepositoryError,
};
use thiserror::Error;

/// Errors returned by [`super::ConversationDirectory`] and
/// [`super::MessageLogService`].
#[derive(Debug, Clone, Error)]
pub enum MessagingServiceError {
    /// A domain rule refused the operation.
    #[error(transparent)]
    Domain(#[from] MessagingDomainError),

    /// Storage failed.
    #[error(transparent)]
    Repository(MessagingRepositoryError),

    /// The identity collaborator failed.
    #[error(transparent)]
    Identity(#[from] IdentityError),

    /// The conversation does not exist.
    #[error("conversation not found: {0}")]
    ConversationNotFound(ConversationId),

    /// The message does not exist.
    #[error("message not found: {0}")]
    MessageNotFound(MessageId),

    /// The user is unknown to the identity directory.
    #[error("user not found: {0}")]
    UserNotFound(UserId),
}

/// Result type for messaging service operations.
pub type MessagingServiceResult<T> = Result<T, MessagingServiceError>;

impl From<MessagingRepositoryError> for MessagingServiceError {
    fn from(err: MessagingRepositoryError) -> Self {
        match err {
            MessagingRepositoryError::ConversationNotFound(id) => Self::ConversationNotFound(id),
            MessagingRepositoryError::MessageNotFound(id) => Self::MessageNotFound(id),
            other => Self::Repository(other),
        }
    }
}

impl Coded for MessagingServiceError {
    fn code(&self) -> ErrorCode {
        match self {
            Self::Domain(err) => err.code(),
            Self::Repository(err) => err.code(),
            Self::Identity(_) => ErrorCode::StorageFailure,
            Self::ConversationNotFound(_) | Self::MessageNotFound(_) | Self::UserNotFound(_) => {
                ErrorCode::NotFound
            }
        }
    }
}
