//! In-memory conversation and message store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::identity::domain::UserId;
use crate::messaging::{
    domain::{Conversation, ConversationId, Message, MessageId, ParticipantPair},
    ports::{
        ConversationRepository, MessageRepository, MessagingRepositoryError,
        MessagingRepositoryResult,
    },
};

/// Thread-safe in-memory store implementing both messaging ports.
///
/// Messages are keyed by an append counter, so iteration order is log
/// order.
#[derive(Debug, Clone, Default)]
pub struct InMemoryMessagingStore {
    state: Arc<RwLock<MessagingState>>,
}

#[derive(Debug, Default)]
struct MessagingState {
    conversations: HashMap<ConversationId, Conversation>,
    pair_index: HashMap<ParticipantPair, ConversationId>,
    messages: BTreeMap<u64, Message>,
    message_index: HashMap<MessageId, u64>,
    next_seq: u64,
}

impl MessagingState {
    fn messages_in(&self, conversation_id: ConversationId) -> impl Iterator<Item = &Message> {
        self.messages
            .values()
            .filter(move |message| message.conversation_id() == conversation_id)
    }

    fn unread_in(&self, conversation_id: ConversationId, viewer: UserId) -> u64 {
        let count = self
            .messages_in(conversation_id)
            .filter(|message| message.is_unread_for(viewer))
            .count();
        u64::try_from(count).unwrap_or(u64::MAX)
    }
}

impl InMemoryMessagingStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> MessagingRepositoryResult<RwLockReadGuard<'_, MessagingState>> {
        self.state.read().map_err(|err| {
            MessagingRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }

    fn write(&self) -> MessagingRepositoryResult<RwLockWriteGuard<'_, MessagingState>> {
        self.state.write().map_err(|err| {
            MessagingRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }
}

#[async_trait]
impl ConversationRepository for InMemoryMessagingStore {
    async fn get_or_create(
        &self,
        candidate: &Conversation,
    ) -> MessagingRepositoryResult<(Conversation, bool)> {
        let mut state = self.write()?;
        let pair = candidate.participants();
        if let Some(existing) = state
            .pair_index
            .get(&pair)
            .and_then(|id| state.conversations.get(id))
        {
            return Ok((existing.clone(), false));
        }
        state.pair_index.insert(pair, candidate.id());
        state
            .conversations
            .insert(candidate.id(), candidate.clone());
        Ok((candidate.clone(), true))
    }

    async fn find_conversation(
        &self,
        id: ConversationId,
    ) -> MessagingRepositoryResult<Option<Conversation>> {
        let state = self.read()?;
        Ok(state.conversations.get(&id).cloned())
    }

    async fn find_conversation_by_pair(
        &self,
        participants: ParticipantPair,
    ) -> MessagingRepositoryResult<Option<Conversation>> {
        let state = self.read()?;
        Ok(state
            .pair_index
            .get(&participants)
            .and_then(|id| state.conversations.get(id))
            .cloned())
    }

    async fn conversations_for_participant(
        &self,
        user_id: UserId,
    ) -> MessagingRepositoryResult<Vec<Conversation>> {
        let state = self.read()?;
        let mut conversations: Vec<Conversation> = state
            .conversations
            .values()
            .filter(|conversation| conversation.participants().contains(user_id))
            .cloned()
            .collect();
        conversations.sort_by(|left, right| {
            right
                .last_activity_at()
                .cmp(&left.last_activity_at())
                .then_with(|| right.created_at().cmp(&left.created_at()))
        });
        Ok(conversations)
    }

    async fn delete_conversation(&self, id: ConversationId) -> MessagingRepositoryResult<()> {
        let mut state = self.write()?;
        let conversation = state
            .conversations
            .remove(&id)
            .ok_or(MessagingRepositoryError::ConversationNotFound(id))?;
        state.pair_index.remove(&conversation.participants());

        let doomed: Vec<(u64, MessageId)> = state
            .messages
            .iter()
            .filter(|(_, message)| message.conversation_id() == id)
            .map(|(seq, message)| (*seq, message.id()))
            .collect();
        for (seq, message_id) in doomed {
            state.messages.remove(&seq);
            state.message_index.remove(&message_id);
        }
        Ok(())
    }
}

#[async_trait]
impl MessageRepository for InMemoryMessagingStore {
    async fn append(&self, message: &Message) -> MessagingRepositoryResult<Conversation> {
        let mut state = self.write()?;
        if state.message_index.contains_key(&message.id()) {
            return Err(MessagingRepositoryError::DuplicateMessage(message.id()));
        }
        let conversation_id = message.conversation_id();
        let conversation = state
            .conversations
            .get_mut(&conversation_id)
            .ok_or(MessagingRepositoryError::ConversationNotFound(conversation_id))?;
        conversation.touch(message.created_at());
        let updated = conversation.clone();

        state.next_seq += 1;
        let seq = state.next_seq;
        state.message_index.insert(message.id(), seq);
        state.messages.insert(seq, message.clone());
        Ok(updated)
    }

    async fn find_message(&self, id: MessageId) -> MessagingRepositoryResult<Option<Message>> {
        let state = self.read()?;
        Ok(state
            .message_index
            .get(&id)
            .and_then(|seq| state.messages.get(seq))
            .cloned())
    }

    async fn read_conversation(
        &self,
        conversation_id: ConversationId,
        viewer: UserId,
        at: DateTime<Utc>,
    ) -> MessagingRepositoryResult<Vec<Message>> {
        let mut state = self.write()?;
        let mut log = Vec::new();
        for message in state
            .messages
            .values_mut()
            .filter(|message| message.conversation_id() == conversation_id)
        {
            message.mark_read_by(viewer, at);
            log.push(message.clone());
        }
        Ok(log)
    }

    async fn unread_count(
        &self,
        conversation_id: ConversationId,
        viewer: UserId,
    ) -> MessagingRepositoryResult<u64> {
        let state = self.read()?;
        Ok(state.unread_in(conversation_id, viewer))
    }

    async fn unread_total(&self, viewer: UserId) -> MessagingRepositoryResult<u64> {
        let state = self.read()?;
        Ok(state
            .conversations
            .values()
            .filter(|conversation| conversation.participants().contains(viewer))
            .map(|conversation| state.unread_in(conversation.id(), viewer))
            .sum())
    }

    async fn last_message(
        &self,
        conversation_id: ConversationId,
    ) -> MessagingRepositoryResult<Option<Message>> {
        let state = self.read()?;
        Ok(state.messages_in(conversation_id).last().cloned())
    }

    async fn delete_message(&self, id: MessageId) -> MessagingRepositoryResult<()> {
        let mut state = self.write()?;
        let seq = state
            .message_index
            .remove(&id)
            .ok_or(MessagingRepositoryError::MessageNotFound(id))?;
        state.messages.remove(&seq);
        Ok(())
    }
}
