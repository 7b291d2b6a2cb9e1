//! `PostgreSQL` adapter for conversations and messages.

mod models;
mod repository;
mod schema;

pub use repository::{MessagingPgPool, PostgresMessagingStore};

#[cfg(test)]
pub(crate) use models::{ConversationRow, MessageRow};
#[cfg(test)]
pub(crate) use repository::{row_to_conversation, row_to_message};
