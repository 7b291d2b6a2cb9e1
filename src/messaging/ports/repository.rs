//! Repository ports for conversations and their message logs.

use crate::error::{Coded, ErrorCode};
use crate::identity::domain::UserId;
use crate::messaging::domain::{
    Conversation, ConversationId, Message, MessageId, ParticipantPair,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use thiserror::Error;

/// Result type for messaging repository operations.
pub type MessagingRepositoryResult<T> = Result<T, MessagingRepositoryError>;

/// Conversation persistence contract.
#[async_trait]
pub trait ConversationRepository: Send + Sync {
    /// Returns the conversation for the candidate's participant pair,
    /// inserting the candidate if none exists.
    ///
    /// Concurrent callers for the same pair must all receive the same
    /// conversation. The flag is `true` only for the caller whose candidate
    /// was inserted.
    async fn get_or_create(
        &self,
        candidate: &Conversation,
    ) -> MessagingRepositoryResult<(Conversation, bool)>;

    /// Finds a conversation by identifier.
    async fn find_conversation(
        &self,
        id: ConversationId,
    ) -> MessagingRepositoryResult<Option<Conversation>>;

    /// Finds the conversation for a participant pair.
    async fn find_conversation_by_pair(
        &self,
        participants: ParticipantPair,
    ) -> MessagingRepositoryResult<Option<Conversation>>;

    /// Returns every conversation `user_id` takes part in, most recently
    /// active first.
    async fn conversations_for_participant(
        &self,
        user_id: UserId,
    ) -> MessagingRepositoryResult<Vec<Conversation>>;

    /// Deletes a conversation and all of its messages.
    ///
    /// # Errors
    ///
    /// Returns [`MessagingRepositoryError::ConversationNotFound`] when it
    /// does not exist.
    async fn delete_conversation(&self, id: ConversationId) -> MessagingRepositoryResult<()>;
}

/// Message log persistence contract.
#[async_trait]
pub trait MessageRepository: Send + Sync {
    /// Appends a message and bumps the conversation's last activity in one
    /// unit. The store assigns the message's position in the log.
    ///
    /// Returns the updated conversation.
    ///
    /// # Errors
    ///
    /// Returns [`MessagingRepositoryError::ConversationNotFound`] when the
    /// conversation is gone and [`MessagingRepositoryError::DuplicateMessage`]
    /// when the identifier is taken.
    async fn append(&self, message: &Message) -> MessagingRepositoryResult<Conversation>;

    /// Finds a message by identifier.
    async fn find_message(&self, id: MessageId) -> MessagingRepositoryResult<Option<Message>>;

    /// Marks every unread message not sent by `viewer` as read at `at`, then
    /// returns the whole log in append order.
    async fn read_conversation(
        &self,
        conversation_id: ConversationId,
        viewer: UserId,
        at: DateTime<Utc>,
    ) -> MessagingRepositoryResult<Vec<Message>>;

    /// Counts messages in a conversation that `viewer` has not read.
    async fn unread_count(
        &self,
        conversation_id: ConversationId,
        viewer: UserId,
    ) -> MessagingRepositoryResult<u64>;

    /// Counts unread messages addressed to `viewer` across all
    /// conversations.
    async fn unread_total(&self, viewer: UserId) -> MessagingRepositoryResult<u64>;

    /// Returns the most recently appended message.
    async fn last_message(
        &self,
        conversation_id: ConversationId,
    ) -> MessagingRepositoryResult<Option<Message>>;

    /// Deletes a single message.
    ///
    /// # Errors
    ///
    /// Returns [`MessagingRepositoryError::MessageNotFound`] when it does not
    /// exist.
    async fn delete_message(&self, id: MessageId) -> MessagingRepositoryResult<()>;
}

/// Errors returned by messaging repository implementations.
#[derive(Debug, Clone, Error)]
pub enum MessagingRepositoryError {
    /// The conversation was not found.
    #[error("conversation not found: {0}")]
    ConversationNotFound(ConversationId),

    /// The message was not found.
    #[error("message not found: {0}")]
    MessageNotFound(MessageId),

    /// A message with the same identifier already exists.
    #[error("duplicate message identifier: {0}")]
    DuplicateMessage(MessageId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl MessagingRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}

impl From<diesel::result::Error> for MessagingRepositoryError {
    fn from(err: diesel::result::Error) -> Self {
        Self::persistence(err)
    }
}

impl Coded for MessagingRepositoryError {
    fn code(&self) -> ErrorCode {
        match self {
            Self::ConversationNotFound(_) | Self::MessageNotFound(_) => ErrorCode::NotFound,
            Self::DuplicateMessage(_) | Self::Persistence(_) => ErrorCode::StorageFailure,
        }
    }
}
