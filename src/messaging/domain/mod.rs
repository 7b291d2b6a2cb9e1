//! Domain model for two-party conversations and their messages.

mod conversation;
mod error;
mod ids;
mod message;

pub use conversation::{Conversation, ConversationSummary, ParticipantPair, PersistedConversationData};
pub use error::MessagingDomainError;
pub use ids::{ConversationId, MessageId};
pub use message::{Message, MessageBody, PersistedMessageData};
