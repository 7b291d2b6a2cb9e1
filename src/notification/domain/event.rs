//! Events emitted by the matching and messaging core.

use crate::identity::domain::UserId;
use crate::job::domain::{ApplicationStatus, JobApplicationId, JobPostId};
use crate::messaging::domain::{ConversationId, MessageId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Event payload handed to the notification sink.
///
/// Payloads carry display names and labels so a sink can render them
/// without calling back into the core.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NotificationEvent {
    /// A provider applied to a job post. Sent to the post owner.
    ApplicationReceived {
        /// Target job post.
        job_post_id: JobPostId,
        /// New application.
        application_id: JobApplicationId,
        /// Applying provider.
        applicant_id: UserId,
        /// Display name of the applicant.
        applicant_name: String,
        /// Category label of the job post.
        service_category: String,
    },
    /// An application left `pending`. Sent to the party that did not act.
    ApplicationStatusChanged {
        /// Target application.
        application_id: JobApplicationId,
        /// Job post the application belongs to.
        job_post_id: JobPostId,
        /// Status before the transition.
        old_status: ApplicationStatus,
        /// Status after the transition.
        new_status: ApplicationStatus,
        /// Category label of the job post.
        service_category: String,
        /// Display name of the party who caused the change.
        counterpart_name: String,
    },
    /// A message was appended to a conversation. Sent to the recipient.
    MessageNew {
        /// Conversation the message belongs to.
        conversation_id: ConversationId,
        /// New message.
        message_id: MessageId,
        /// Author of the message.
        sender_id: UserId,
        /// Display name of the author.
        sender_name: String,
        /// Other participant.
        recipient_id: UserId,
        /// Leading excerpt of the body.
        preview: String,
    },
}

impl NotificationEvent {
    /// Returns the dotted event name used by downstream consumers.
    #[must_use]
    pub const fn event_name(&self) -> &'static str {
        match self {
            Self::ApplicationReceived { .. } => "application.received",
            Self::ApplicationStatusChanged { .. } => "application.status_changed",
            Self::MessageNew { .. } => "message.new",
        }
    }
}

/// Unique identifier for a rendered notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NotificationId(Uuid);

impl NotificationId {
    /// Creates a new random notification identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for NotificationId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for NotificationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Rendered notification addressed to one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    /// Notification identifier.
    pub id: NotificationId,
    /// Addressee.
    pub recipient_id: UserId,
    /// Structured payload.
    pub event: NotificationEvent,
    /// Rendered title.
    pub title: String,
    /// Rendered body.
    pub body: String,
    /// When the notification was composed.
    pub created_at: DateTime<Utc>,
}
