//! Diesel row models for messaging persistence.

use super::schema::{conversations, messages};
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Row model for conversations, used for reads and inserts.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = conversations)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ConversationRow {
    /// Conversation identifier.
    pub id: uuid::Uuid,
    /// Participant that sorts first.
    pub participant_low: uuid::Uuid,
    /// Participant that sorts second.
    pub participant_high: uuid::Uuid,
    /// Timestamp of the latest message.
    pub last_activity_at: DateTime<Utc>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Query result row for messages.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = messages)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct MessageRow {
    /// Message identifier.
    pub id: uuid::Uuid,
    /// Storage-assigned position in the log.
    pub seq: i64,
    /// Owning conversation.
    pub conversation_id: uuid::Uuid,
    /// Author.
    pub sender_id: uuid::Uuid,
    /// Body text.
    pub body: String,
    /// When the recipient first fetched the message.
    pub read_at: Option<DateTime<Utc>>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Insert model for messages. `seq` is assigned by the database.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = messages)]
pub struct NewMessageRow {
    /// Message identifier.
    pub id: uuid::Uuid,
    /// Owning conversation.
    pub conversation_id: uuid::Uuid,
    /// Author.
    pub sender_id: uuid::Uuid,
    /// Body text.
    pub body: String,
    /// Read timestamp, normally unset on insert.
    pub read_at: Option<DateTime<Utc>>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}
