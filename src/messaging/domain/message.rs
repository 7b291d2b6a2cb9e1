//! Messages appended to a conversation.

use super::{Conversation, ConversationId, MessageId, MessagingDomainError};
use crate::identity::domain::UserId;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Validated message text.
///
/// Surrounding whitespace is trimmed. Length is counted in Unicode scalar
/// values, not bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageBody(String);

impl MessageBody {
    /// Validates and wraps a message body.
    ///
    /// # Errors
    ///
    /// Returns [`MessagingDomainError::EmptyBody`] for blank text and
    /// [`MessagingDomainError::BodyTooLong`] above `max_length` characters.
    pub fn new(value: impl Into<String>, max_length: usize) -> Result<Self, MessagingDomainError> {
        let raw = value.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(MessagingDomainError::EmptyBody);
        }
        let actual = trimmed.chars().count();
        if actual > max_length {
            return Err(MessagingDomainError::BodyTooLong {
                max: max_length,
                actual,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the body as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns at most `max_chars` leading characters, with an ellipsis when
    /// the body was cut.
    #[must_use]
    pub fn preview(&self, max_chars: usize) -> String {
        let mut chars = self.0.chars();
        let head: String = chars.by_ref().take(max_chars).collect();
        if chars.next().is_some() {
            format!("{head}…")
        } else {
            head
        }
    }
}

/// One entry in a conversation's append-only log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    id: MessageId,
    conversation_id: ConversationId,
    sender_id: UserId,
    body: MessageBody,
    read_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedMessageData {
    /// Persisted identifier.
    pub id: MessageId,
    /// Owning conversation.
    pub conversation_id: ConversationId,
    /// Author.
    pub sender_id: UserId,
    /// Body text.
    pub body: MessageBody,
    /// When the recipient first fetched the message.
    pub read_at: Option<DateTime<Utc>>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl Message {
    /// Composes an unread message from `sender_id`.
    ///
    /// # Errors
    ///
    /// Returns [`MessagingDomainError::NotParticipant`] when the sender is
    /// not part of `conversation`.
    pub fn compose(
        conversation: &Conversation,
        sender_id: UserId,
        body: MessageBody,
        clock: &impl Clock,
    ) -> Result<Self, MessagingDomainError> {
        conversation.ensure_participant(sender_id)?;
        Ok(Self {
            id: MessageId::new(),
            conversation_id: conversation.id(),
            sender_id,
            body,
            read_at: None,
            created_at: clock.utc(),
        })
    }

    /// Reconstructs a message from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedMessageData) -> Self {
        Self {
            id: data.id,
            conversation_id: data.conversation_id,
            sender_id: data.sender_id,
            body: data.body,
            read_at: data.read_at,
            created_at: data.created_at,
        }
    }

    /// Returns the message identifier.
    #[must_use]
    pub const fn id(&self) -> MessageId {
        self.id
    }

    /// Returns the owning conversation.
    #[must_use]
    pub const fn conversation_id(&self) -> ConversationId {
        self.conversation_id
    }

    /// Returns the author.
    #[must_use]
    pub const fn sender_id(&self) -> UserId {
        self.sender_id
    }

    /// Returns the body.
    #[must_use]
    pub const fn body(&self) -> &MessageBody {
        &self.body
    }

    /// Returns when the recipient first fetched the message.
    #[must_use]
    pub const fn read_at(&self) -> Option<DateTime<Utc>> {
        self.read_at
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns `true` once the recipient has fetched the message.
    #[must_use]
    pub const fn is_read(&self) -> bool {
        self.read_at.is_some()
    }

    /// Returns `true` if `viewer` should see this message as unread.
    #[must_use]
    pub fn is_unread_for(&self, viewer: UserId) -> bool {
        self.sender_id != viewer && self.read_at.is_none()
    }

    /// Marks the message read for `viewer`. Messages the viewer sent and
    /// messages already read are left unchanged.
    ///
    /// Returns `true` when the read state changed.
    pub fn mark_read_by(&mut self, viewer: UserId, at: DateTime<Utc>) -> bool {
        if !self.is_unread_for(viewer) {
            return false;
        }
        self.read_at = Some(at);
        true
    }

    /// Checks that `user_id` wrote the message.
    ///
    /// # Errors
    ///
    /// Returns [`MessagingDomainError::NotSender`] otherwise.
    pub fn ensure_sender(&self, user_id: UserId) -> Result<(), MessagingDomainError> {
        if self.sender_id == user_id {
            Ok(())
        } else {
            Err(MessagingDomainError::NotSender {
                message_id: self.id,
                user_id,
            })
        }
    }
}
