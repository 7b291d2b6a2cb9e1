//! Conversation directory: one conversation per unordered user pair.

use super::{MessagingServiceError, MessagingServiceResult};
use crate::identity::domain::UserId;
use crate::messaging::{
    domain::{Conversation, ConversationId, ParticipantPair},
    ports::ConversationRepository,
};
use mockable::Clock;
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Resolves and looks up conversations.
#[derive(Clone)]
pub struct ConversationDirectory<R, C>
where
    R: ConversationRepository,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    clock: Arc<C>,
}

impl<R, C> ConversationDirectory<R, C>
where
    R: ConversationRepository,
    C: Clock + Send + Sync,
{
    /// Creates a directory backed by `repository`.
    #[must_use]
    pub const fn new(repository: Arc<R>, clock: Arc<C>) -> Self {
        Self { repository, clock }
    }

    /// Returns the conversation between `first` and `second`, creating it on
    /// first contact. Argument order does not matter.
    ///
    /// The flag is `true` when this call created the conversation.
    ///
    /// # Errors
    ///
    /// Returns [`MessagingServiceError::Domain`] when both users are the
    /// same.
    #[instrument(skip_all, fields(%first, %second))]
    pub async fn resolve(
        &self,
        first: UserId,
        second: UserId,
    ) -> MessagingServiceResult<(Conversation, bool)> {
        let participants = ParticipantPair::new(first, second)?;
        let candidate = Conversation::new(participants, &*self.clock);
        let (conversation, created) = self.repository.get_or_create(&candidate).await?;
        if created {
            info!(conversation_id = %conversation.id(), "conversation created");
        } else {
            debug!(conversation_id = %conversation.id(), "conversation reused");
        }
        Ok((conversation, created))
    }

    /// Returns the conversation between `first` and `second`, creating it on
    /// first contact.
    ///
    /// # Errors
    ///
    /// See [`Self::resolve`].
    pub async fn get_or_create(
        &self,
        first: UserId,
        second: UserId,
    ) -> MessagingServiceResult<Conversation> {
        let (conversation, _) = self.resolve(first, second).await?;
        Ok(conversation)
    }

    /// Returns the participant of the conversation who is not `viewer`.
    ///
    /// # Errors
    ///
    /// Returns [`MessagingServiceError::ConversationNotFound`] for an
    /// unknown conversation and [`MessagingServiceError::Domain`] when
    /// `viewer` is not a participant.
    pub async fn other_participant(
        &self,
        conversation_id: ConversationId,
        viewer: UserId,
    ) -> MessagingServiceResult<UserId> {
        let conversation = self.find(conversation_id).await?;
        Ok(conversation.other_participant(viewer)?)
    }

    /// Finds a conversation by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`MessagingServiceError::ConversationNotFound`] when it does
    /// not exist.
    pub async fn find(&self, conversation_id: ConversationId) -> MessagingServiceResult<Conversation> {
        self.repository
            .find_conversation(conversation_id)
            .await?
            .ok_or(MessagingServiceError::ConversationNotFound(conversation_id))
    }
}
