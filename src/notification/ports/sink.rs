//! Delivery port for rendered notifications.

use crate::notification::domain::{Notification, TemplateError};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for notification operations.
pub type NotificationResult<T> = Result<T, NotificationError>;

/// Destination for rendered notifications (push, SMS, e-mail, or a log).
///
/// At-least-once delivery is acceptable; consumers must tolerate duplicates.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    /// Delivers one notification.
    ///
    /// # Errors
    ///
    /// Returns [`NotificationError::Delivery`] when the transport fails.
    async fn deliver(&self, notification: &Notification) -> NotificationResult<()>;
}

/// Errors raised while composing or delivering notifications.
#[derive(Debug, Clone, Error)]
pub enum NotificationError {
    /// Rendering the notification text failed.
    #[error(transparent)]
    Template(#[from] TemplateError),

    /// The sink could not deliver the notification.
    #[error("notification delivery failed: {0}")]
    Delivery(Arc<dyn std::error::Error + Send + Sync>),
}

impl NotificationError {
    /// Wraps a transport error.
    pub fn delivery(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Delivery(Arc::new(err))
    }
}
