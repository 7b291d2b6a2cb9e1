//! Error types for conversation and message rules.

use super::{ConversationId, MessageId};
use crate::error::{Coded, ErrorCode};
use crate::identity::domain::UserId;
use thiserror::Error;

/// Errors raised while validating conversations and messages.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MessagingDomainError {
    /// Both participants are the same user.
    #[error("user {0} cannot open a conversation with themselves")]
    SelfConversation(UserId),

    /// The sender addressed a message to themselves.
    #[error("user {0} cannot message themselves")]
    SelfMessage(UserId),

    /// The message body is blank after trimming.
    #[error("message body must not be empty")]
    EmptyBody,

    /// The message body exceeds the configured length.
    #[error("message body has {actual} characters, limit is {max}")]
    BodyTooLong {
        /// Maximum permitted length in characters.
        max: usize,
        /// Length of the rejected body.
        actual: usize,
    },

    /// The user is not one of the two participants.
    #[error("user {user_id} is not a participant in conversation {conversation_id}")]
    NotParticipant {
        /// Target conversation.
        conversation_id: ConversationId,
        /// Acting user.
        user_id: UserId,
    },

    /// Only the sender may delete a message.
    #[error("user {user_id} did not send message {message_id}")]
    NotSender {
        /// Target message.
        message_id: MessageId,
        /// Acting user.
        user_id: UserId,
    },
}

impl Coded for MessagingDomainError {
    fn code(&self) -> ErrorCode {
        match self {
            Self::SelfConversation(_) => ErrorCode::SelfConversation,
            Self::SelfMessage(_) => ErrorCode::SelfMessage,
            Self::EmptyBody | Self::BodyTooLong { .. } => ErrorCode::EmptyOrOversizedBody,
            Self::NotParticipant { .. } | Self::NotSender { .. } => ErrorCode::Forbidden,
        }
    }
}
