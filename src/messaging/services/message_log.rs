//! Message log: send, read-on-fetch listing, inbox summaries, and deletes.

use super::{ConversationDirectory, MessagingServiceError, MessagingServiceResult};
use crate::config::MarketplaceConfig;
use crate::identity::{domain::UserId, ports::IdentityDirectory};
use crate::messaging::{
    domain::{
        Conversation, ConversationId, ConversationSummary, Message, MessageBody, MessageId,
        MessagingDomainError,
    },
    ports::{ConversationRepository, MessageRepository},
};
use crate::notification::{
    domain::{NotificationEvent, NotificationTemplates},
    ports::NotificationSink,
    services::NotificationDispatcher,
};
use mockable::Clock;
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Characters of the body carried in a `message.new` notification.
const PREVIEW_CHARS: usize = 80;

/// Where a message is addressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageTarget {
    /// Direct message to a user; the conversation is created on first
    /// contact.
    Recipient(UserId),
    /// Reply within an existing conversation.
    Conversation(ConversationId),
}

/// Request payload for sending a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendMessageRequest {
    target: MessageTarget,
    sender_id: UserId,
    body: String,
}

impl SendMessageRequest {
    /// Creates a request.
    #[must_use]
    pub fn new(target: MessageTarget, sender_id: UserId, body: impl Into<String>) -> Self {
        Self {
            target,
            sender_id,
            body: body.into(),
        }
    }

    /// Addresses `recipient_id` directly.
    #[must_use]
    pub fn to_user(recipient_id: UserId, sender_id: UserId, body: impl Into<String>) -> Self {
        Self::new(MessageTarget::Recipient(recipient_id), sender_id, body)
    }

    /// Replies within `conversation_id`.
    #[must_use]
    pub fn in_conversation(
        conversation_id: ConversationId,
        sender_id: UserId,
        body: impl Into<String>,
    ) -> Self {
        Self::new(MessageTarget::Conversation(conversation_id), sender_id, body)
    }
}

/// Result of a successful send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMessage {
    /// The stored message.
    pub message: Message,
    /// The conversation after its activity was bumped.
    pub conversation: Conversation,
    /// `true` when this send opened the conversation.
    pub created_conversation: bool,
}

/// Message log service.
#[derive(Clone)]
pub struct MessageLogService<R, I, N, C>
where
    R: ConversationRepository + MessageRepository,
    I: IdentityDirectory,
    N: NotificationSink,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    directory: ConversationDirectory<R, C>,
    identities: Arc<I>,
    notifications: NotificationDispatcher<N>,
    clock: Arc<C>,
    max_message_length: usize,
}

impl<R, I, N, C> MessageLogService<R, I, N, C>
where
    R: ConversationRepository + MessageRepository,
    I: IdentityDirectory,
    N: NotificationSink,
    C: Clock + Send + Sync,
{
    /// Creates a service with default limits and templates.
    #[must_use]
    pub fn new(repository: Arc<R>, identities: Arc<I>, sink: Arc<N>, clock: Arc<C>) -> Self {
        Self {
            directory: ConversationDirectory::new(Arc::clone(&repository), Arc::clone(&clock)),
            repository,
            identities,
            notifications: NotificationDispatcher::new(sink, NotificationTemplates::default()),
            clock,
            max_message_length: MarketplaceConfig::default().max_message_length,
        }
    }

    /// Applies limits and templates from `config`.
    #[must_use]
    pub fn with_config(mut self, config: &MarketplaceConfig) -> Self {
        self.max_message_length = config.max_message_length;
        self.notifications = self
            .notifications
            .with_templates(config.notification_templates.clone());
        self
    }

    /// Returns the directory this service resolves conversations through.
    #[must_use]
    pub const fn directory(&self) -> &ConversationDirectory<R, C> {
        &self.directory
    }

    /// Sends a message and notifies the other participant.
    ///
    /// Addressing a user opens the conversation on first contact.
    ///
    /// # Errors
    ///
    /// - [`MessagingServiceError::Domain`] for a blank or oversized body, a
    ///   message to oneself, or a sender outside the conversation.
    /// - [`MessagingServiceError::UserNotFound`] for an unknown recipient.
    /// - [`MessagingServiceError::ConversationNotFound`] for an unknown
    ///   conversation.
    #[instrument(skip_all, fields(sender_id = %request.sender_id))]
    pub async fn send(&self, request: SendMessageRequest) -> MessagingServiceResult<SentMessage> {
        let SendMessageRequest {
            target,
            sender_id,
            body,
        } = request;
        let message_body = MessageBody::new(body, self.max_message_length)?;

        let (conversation, created_conversation) = match target {
            MessageTarget::Recipient(recipient_id) => {
                if recipient_id == sender_id {
                    return Err(MessagingDomainError::SelfMessage(sender_id).into());
                }
                self.identities
                    .find_profile(recipient_id)
                    .await?
                    .ok_or(MessagingServiceError::UserNotFound(recipient_id))?;
                self.directory.resolve(sender_id, recipient_id).await?
            }
            MessageTarget::Conversation(conversation_id) => {
                let existing = self.directory.find(conversation_id).await?;
                existing.ensure_participant(sender_id)?;
                (existing, false)
            }
        };

        let recipient_id = conversation.other_participant(sender_id)?;
        let message = Message::compose(&conversation, sender_id, message_body, &*self.clock)?;
        let bumped = self.repository.append(&message).await?;
        info!(
            conversation_id = %bumped.id(),
            message_id = %message.id(),
            created_conversation,
            "message sent"
        );

        let sender_name = self.identities.display_name_or_id(sender_id).await;
        self.notifications
            .dispatch(
                recipient_id,
                NotificationEvent::MessageNew {
                    conversation_id: bumped.id(),
                    message_id: message.id(),
                    sender_id,
                    sender_name,
                    recipient_id,
                    preview: message.body().preview(PREVIEW_CHARS),
                },
                message.created_at(),
            )
            .await;

        Ok(SentMessage {
            message,
            conversation: bumped,
            created_conversation,
        })
    }

    /// Returns the conversation's messages in send order, marking those
    /// addressed to `viewer` as read.
    ///
    /// # Errors
    ///
    /// Returns [`MessagingServiceError::Domain`] when `viewer` is not a
    /// participant.
    #[instrument(skip_all, fields(%conversation_id, %viewer))]
    pub async fn list_for_conversation(
        &self,
        conversation_id: ConversationId,
        viewer: UserId,
    ) -> MessagingServiceResult<Vec<Message>> {
        let conversation = self.directory.find(conversation_id).await?;
        conversation.ensure_participant(viewer)?;
        let messages = self
            .repository
            .read_conversation(conversation_id, viewer, self.clock.utc())
            .await?;
        debug!(count = messages.len(), "listed conversation messages");
        Ok(messages)
    }

    /// Builds the inbox for `user_id`, most recently active first.
    ///
    /// # Errors
    ///
    /// Returns [`MessagingServiceError::Repository`] when storage fails.
    pub async fn list_conversations_for_user(
        &self,
        user_id: UserId,
    ) -> MessagingServiceResult<Vec<ConversationSummary>> {
        let conversations = self
            .repository
            .conversations_for_participant(user_id)
            .await?;
        let mut summaries = Vec::with_capacity(conversations.len());
        for conversation in conversations {
            let other_participant = conversation.other_participant(user_id)?;
            let last_message = self.repository.last_message(conversation.id()).await?;
            let unread_count = self
                .repository
                .unread_count(conversation.id(), user_id)
                .await?;
            summaries.push(ConversationSummary {
                conversation,
                other_participant,
                last_message,
                unread_count,
            });
        }
        debug!(%user_id, count = summaries.len(), "built inbox");
        Ok(summaries)
    }

    /// Counts unread messages addressed to `user_id` across every
    /// conversation.
    ///
    /// # Errors
    ///
    /// Returns [`MessagingServiceError::Repository`] when storage fails.
    pub async fn unread_total(&self, user_id: UserId) -> MessagingServiceResult<u64> {
        Ok(self.repository.unread_total(user_id).await?)
    }

    /// Deletes a message. Sender only.
    ///
    /// # Errors
    ///
    /// Returns [`MessagingServiceError::MessageNotFound`] for an unknown
    /// message and [`MessagingServiceError::Domain`] when `acting_user_id`
    /// did not send it.
    #[instrument(skip_all, fields(%message_id, %acting_user_id))]
    pub async fn delete(
        &self,
        message_id: MessageId,
        acting_user_id: UserId,
    ) -> MessagingServiceResult<()> {
        let message = self
            .repository
            .find_message(message_id)
            .await?
            .ok_or(MessagingServiceError::MessageNotFound(message_id))?;
        message.ensure_sender(acting_user_id)?;
        self.repository.delete_message(message_id).await?;
        info!(conversation_id = %message.conversation_id(), "message deleted");
        Ok(())
    }

    /// Deletes a conversation and all of its messages. Either participant
    /// may do this.
    ///
    /// # Errors
    ///
    /// Returns [`MessagingServiceError::ConversationNotFound`] for an
    /// unknown conversation and [`MessagingServiceError::Domain`] when
    /// `acting_user_id` is not a participant.
    #[instrument(skip_all, fields(%conversation_id, %acting_user_id))]
    pub async fn delete_conversation(
        &self,
        conversation_id: ConversationId,
        acting_user_id: UserId,
    ) -> MessagingServiceResult<()> {
        let conversation = self.directory.find(conversation_id).await?;
        conversation.ensure_participant(acting_user_id)?;
        self.repository.delete_conversation(conversation_id).await?;
        info!("conversation deleted");
        Ok(())
    }
}
