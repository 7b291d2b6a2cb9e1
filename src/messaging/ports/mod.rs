//! Port contracts for conversation and message persistence.

pub mod repository;

pub use repository::{
    ConversationRepository, MessageRepository, MessagingRepositoryError, MessagingRepositoryResult,
};
