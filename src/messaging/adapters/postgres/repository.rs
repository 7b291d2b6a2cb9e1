//! `PostgreSQL` repository implementation for conversations and messages.

use super::{
    models::{ConversationRow, MessageRow, NewMessageRow},
    schema::{conversations, messages},
};
use crate::identity::domain::UserId;
use crate::messaging::{
    domain::{
        Conversation, ConversationId, Message, MessageBody, MessageId, ParticipantPair,
        PersistedConversationData, PersistedMessageData,
    },
    ports::{
        ConversationRepository, MessageRepository, MessagingRepositoryError,
        MessagingRepositoryResult,
    },
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorKind, Error as DieselError};

/// `PostgreSQL` connection pool type used by the messaging adapter.
pub type MessagingPgPool = Pool<ConnectionManager<PgConnection>>;

/// `PostgreSQL`-backed messaging store.
///
/// Conversation creation relies on the unique `(participant_low,
/// participant_high)` constraint: the insert is skipped on conflict and the
/// surviving row is read back. Appends lock the conversation row, so the
/// `seq` column follows commit order within a conversation.
#[derive(Debug, Clone)]
pub struct PostgresMessagingStore {
    pool: MessagingPgPool,
}

impl PostgresMessagingStore {
    /// Creates a new store from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: MessagingPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> MessagingRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> MessagingRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(MessagingRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(MessagingRepositoryError::persistence)?
    }
}

#[async_trait]
impl ConversationRepository for PostgresMessagingStore {
    async fn get_or_create(
        &self,
        candidate: &Conversation,
    ) -> MessagingRepositoryResult<(Conversation, bool)> {
        let row = to_conversation_row(candidate);
        self.run_blocking(move |connection| {
            connection.transaction::<_, MessagingRepositoryError, _>(|tx| {
                let inserted = diesel::insert_into(conversations::table)
                    .values(&row)
                    .on_conflict((conversations::participant_low, conversations::participant_high))
                    .do_nothing()
                    .execute(tx)?;
                let stored = conversations::table
                    .filter(conversations::participant_low.eq(row.participant_low))
                    .filter(conversations::participant_high.eq(row.participant_high))
                    .select(ConversationRow::as_select())
                    .first::<ConversationRow>(tx)?;
                Ok((row_to_conversation(stored)?, inserted > 0))
            })
        })
        .await
    }

    async fn find_conversation(
        &self,
        id: ConversationId,
    ) -> MessagingRepositoryResult<Option<Conversation>> {
        self.run_blocking(move |connection| {
            let row = conversations::table
                .filter(conversations::id.eq(id.into_inner()))
                .select(ConversationRow::as_select())
                .first::<ConversationRow>(connection)
                .optional()?;
            row.map(row_to_conversation).transpose()
        })
        .await
    }

    async fn find_conversation_by_pair(
        &self,
        participants: ParticipantPair,
    ) -> MessagingRepositoryResult<Option<Conversation>> {
        self.run_blocking(move |connection| {
            let row = conversations::table
                .filter(conversations::participant_low.eq(participants.low().into_inner()))
                .filter(conversations::participant_high.eq(participants.high().into_inner()))
                .select(ConversationRow::as_select())
                .first::<ConversationRow>(connection)
                .optional()?;
            row.map(row_to_conversation).transpose()
        })
        .await
    }

    async fn conversations_for_participant(
        &self,
        user_id: UserId,
    ) -> MessagingRepositoryResult<Vec<Conversation>> {
        self.run_blocking(move |connection| {
            let user = user_id.into_inner();
            let rows = conversations::table
                .filter(
                    conversations::participant_low
                        .eq(user)
                        .or(conversations::participant_high.eq(user)),
                )
                .order((
                    conversations::last_activity_at.desc(),
                    conversations::created_at.desc(),
                ))
                .select(ConversationRow::as_select())
                .load::<ConversationRow>(connection)?;
            rows.into_iter().map(row_to_conversation).collect()
        })
        .await
    }

    async fn delete_conversation(&self, id: ConversationId) -> MessagingRepositoryResult<()> {
        self.run_blocking(move |connection| {
            connection.transaction::<_, MessagingRepositoryError, _>(|tx| {
                diesel::delete(
                    messages::table.filter(messages::conversation_id.eq(id.into_inner())),
                )
                .execute(tx)?;
                let deleted = diesel::delete(
                    conversations::table.filter(conversations::id.eq(id.into_inner())),
                )
                .execute(tx)?;
                if deleted == 0 {
                    return Err(MessagingRepositoryError::ConversationNotFound(id));
                }
                Ok(())
            })
        })
        .await
    }
}

#[async_trait]
impl MessageRepository for PostgresMessagingStore {
    async fn append(&self, message: &Message) -> MessagingRepositoryResult<Conversation> {
        let message_id = message.id();
        let conversation_id = message.conversation_id();
        let created_at = message.created_at();
        let row = to_new_message_row(message);
        self.run_blocking(move |connection| {
            connection.transaction::<_, MessagingRepositoryError, _>(|tx| {
                let current = conversations::table
                    .filter(conversations::id.eq(conversation_id.into_inner()))
                    .select(ConversationRow::as_select())
                    .for_update()
                    .first::<ConversationRow>(tx)
                    .optional()?
                    .ok_or(MessagingRepositoryError::ConversationNotFound(conversation_id))?;
                let mut conversation = row_to_conversation(current)?;
                conversation.touch(created_at);

                diesel::update(
                    conversations::table
                        .filter(conversations::id.eq(conversation_id.into_inner())),
                )
                .set((
                    conversations::last_activity_at.eq(conversation.last_activity_at()),
                    conversations::updated_at.eq(conversation.updated_at()),
                ))
                .execute(tx)?;

                diesel::insert_into(messages::table)
                    .values(&row)
                    .execute(tx)
                    .map_err(|err| match err {
                        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                            MessagingRepositoryError::DuplicateMessage(message_id)
                        }
                        _ => MessagingRepositoryError::persistence(err),
                    })?;
                Ok(conversation)
            })
        })
        .await
    }

    async fn find_message(&self, id: MessageId) -> MessagingRepositoryResult<Option<Message>> {
        self.run_blocking(move |connection| {
            let row = messages::table
                .filter(messages::id.eq(id.into_inner()))
                .select(MessageRow::as_select())
                .first::<MessageRow>(connection)
                .optional()?;
            row.map(row_to_message).transpose()
        })
        .await
    }

    async fn read_conversation(
        &self,
        conversation_id: ConversationId,
        viewer: UserId,
        at: DateTime<Utc>,
    ) -> MessagingRepositoryResult<Vec<Message>> {
        self.run_blocking(move |connection| {
            connection.transaction::<_, MessagingRepositoryError, _>(|tx| {
                diesel::update(
                    messages::table
                        .filter(messages::conversation_id.eq(conversation_id.into_inner()))
                        .filter(messages::sender_id.ne(viewer.into_inner()))
                        .filter(messages::read_at.is_null()),
                )
                .set(messages::read_at.eq(Some(at)))
                .execute(tx)?;

                let rows = messages::table
                    .filter(messages::conversation_id.eq(conversation_id.into_inner()))
                    .order(messages::seq.asc())
                    .select(MessageRow::as_select())
                    .load::<MessageRow>(tx)?;
                rows.into_iter().map(row_to_message).collect()
            })
        })
        .await
    }

    async fn unread_count(
        &self,
        conversation_id: ConversationId,
        viewer: UserId,
    ) -> MessagingRepositoryResult<u64> {
        self.run_blocking(move |connection| {
            let count: i64 = messages::table
                .filter(messages::conversation_id.eq(conversation_id.into_inner()))
                .filter(messages::sender_id.ne(viewer.into_inner()))
                .filter(messages::read_at.is_null())
                .count()
                .get_result(connection)?;
            u64::try_from(count).map_err(MessagingRepositoryError::persistence)
        })
        .await
    }

    async fn unread_total(&self, viewer: UserId) -> MessagingRepositoryResult<u64> {
        self.run_blocking(move |connection| {
            let user = viewer.into_inner();
            let count: i64 = messages::table
                .inner_join(conversations::table)
                .filter(
                    conversations::participant_low
                        .eq(user)
                        .or(conversations::participant_high.eq(user)),
                )
                .filter(messages::sender_id.ne(user))
                .filter(messages::read_at.is_null())
                .count()
                .get_result(connection)?;
            u64::try_from(count).map_err(MessagingRepositoryError::persistence)
        })
        .await
    }

    async fn last_message(
        &self,
        conversation_id: ConversationId,
    ) -> MessagingRepositoryResult<Option<Message>> {
        self.run_blocking(move |connection| {
            let row = messages::table
                .filter(messages::conversation_id.eq(conversation_id.into_inner()))
                .order(messages::seq.desc())
                .select(MessageRow::as_select())
                .first::<MessageRow>(connection)
                .optional()?;
            row.map(row_to_message).transpose()
        })
        .await
    }

    async fn delete_message(&self, id: MessageId) -> MessagingRepositoryResult<()> {
        self.run_blocking(move |connection| {
            let deleted = diesel::delete(messages::table.filter(messages::id.eq(id.into_inner())))
                .execute(connection)?;
            if deleted == 0 {
                return Err(MessagingRepositoryError::MessageNotFound(id));
            }
            Ok(())
        })
        .await
    }
}

fn to_conversation_row(conversation: &Conversation) -> ConversationRow {
    let participants = conversation.participants();
    ConversationRow {
        id: conversation.id().into_inner(),
        participant_low: participants.low().into_inner(),
        participant_high: participants.high().into_inner(),
        last_activity_at: conversation.last_activity_at(),
        created_at: conversation.created_at(),
        updated_at: conversation.updated_at(),
    }
}

pub(crate) fn row_to_conversation(row: ConversationRow) -> MessagingRepositoryResult<Conversation> {
    let ConversationRow {
        id,
        participant_low,
        participant_high,
        last_activity_at,
        created_at,
        updated_at,
    } = row;
    let participants = ParticipantPair::new(
        UserId::from_uuid(participant_low),
        UserId::from_uuid(participant_high),
    )
    .map_err(MessagingRepositoryError::persistence)?;

    Ok(Conversation::from_persisted(PersistedConversationData {
        id: ConversationId::from_uuid(id),
        participants,
        last_activity_at,
        created_at,
        updated_at,
    }))
}

fn to_new_message_row(message: &Message) -> NewMessageRow {
    NewMessageRow {
        id: message.id().into_inner(),
        conversation_id: message.conversation_id().into_inner(),
        sender_id: message.sender_id().into_inner(),
        body: message.body().as_str().to_owned(),
        read_at: message.read_at(),
        created_at: message.created_at(),
    }
}

pub(crate) fn row_to_message(row: MessageRow) -> MessagingRepositoryResult<Message> {
    let MessageRow {
        id,
        seq: _,
        conversation_id,
        sender_id,
        body,
        read_at,
        created_at,
    } = row;
    let message_body =
        MessageBody::new(body, usize::MAX).map_err(MessagingRepositoryError::persistence)?;

    Ok(Message::from_persisted(PersistedMessageData {
        id: MessageId::from_uuid(id),
        conversation_id: ConversationId::from_uuid(conversation_id),
        sender_id: UserId::from_uuid(sender_id),
        body: message_body,
        read_at,
        created_at,
    }))
}
