//! Sink that emits each notification as a structured log record.

use async_trait::async_trait;
use tracing::info;

use crate::notification::{
    domain::Notification,
    ports::{NotificationResult, NotificationSink},
};

/// Writes notifications to the `tracing` pipeline instead of a transport.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotificationSink;

#[async_trait]
impl NotificationSink for TracingNotificationSink {
    async fn deliver(&self, notification: &Notification) -> NotificationResult<()> {
        info!(
            notification_id = %notification.id,
            recipient_id = %notification.recipient_id,
            event = notification.event.event_name(),
            title = %notification.title,
            "notification delivered"
        );
        Ok(())
    }
}
