//! Renders events and hands them to the configured sink.

use crate::identity::domain::UserId;
use crate::notification::{
    domain::{Notification, NotificationEvent, NotificationId, NotificationTemplates},
    ports::{NotificationResult, NotificationSink},
};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{debug, warn};

/// Best-effort notification dispatcher.
///
/// Callers dispatch only after the state change that triggered the event
/// has been stored. Failures are logged and never surface to the caller.
#[derive(Debug)]
pub struct NotificationDispatcher<S>
where
    S: NotificationSink,
{
    sink: Arc<S>,
    templates: NotificationTemplates,
}

impl<S> Clone for NotificationDispatcher<S>
where
    S: NotificationSink,
{
    fn clone(&self) -> Self {
        Self {
            sink: Arc::clone(&self.sink),
            templates: self.templates.clone(),
        }
    }
}

impl<S> NotificationDispatcher<S>
where
    S: NotificationSink,
{
    /// Creates a dispatcher using the given templates.
    #[must_use]
    pub const fn new(sink: Arc<S>, templates: NotificationTemplates) -> Self {
        Self { sink, templates }
    }

    /// Replaces the templates.
    #[must_use]
    pub fn with_templates(mut self, templates: NotificationTemplates) -> Self {
        self.templates = templates;
        self
    }

    /// Renders `event` for `recipient_id`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::notification::ports::NotificationError::Template`]
    /// when rendering fails.
    pub fn compose(
        &self,
        recipient_id: UserId,
        event: NotificationEvent,
        at: DateTime<Utc>,
    ) -> NotificationResult<Notification> {
        let (title, body) = self.templates.render(&event)?;
        Ok(Notification {
            id: NotificationId::new(),
            recipient_id,
            event,
            title,
            body,
            created_at: at,
        })
    }

    /// Renders and delivers `event`, logging any failure.
    pub async fn dispatch(&self, recipient_id: UserId, event: NotificationEvent, at: DateTime<Utc>) {
        let event_name = event.event_name();
        let notification = match self.compose(recipient_id, event, at) {
            Ok(notification) => notification,
            Err(err) => {
                warn!(%recipient_id, event = event_name, error = %err, "notification not rendered");
                return;
            }
        };

        match self.sink.deliver(&notification).await {
            Ok(()) => debug!(
                notification_id = %notification.id,
                %recipient_id,
                event = event_name,
                "notification dispatched"
            ),
            Err(err) => warn!(
                notification_id = %notification.id,
                %recipient_id,
                event = event_name,
                error = %err,
                "notification delivery failed"
            ),
        }
    }
}
