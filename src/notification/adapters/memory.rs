//! Recording sink for tests and embedders that poll for notifications.

use async_trait::async_trait;
use std::sync::{Arc, RwLock};

use crate::identity::domain::UserId;
use crate::notification::{
    domain::Notification,
    ports::{NotificationError, NotificationResult, NotificationSink},
};

/// Thread-safe sink that keeps every delivered notification in order.
#[derive(Debug, Clone, Default)]
pub struct InMemoryNotificationSink {
    delivered: Arc<RwLock<Vec<Notification>>>,
}

impl InMemoryNotificationSink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns every notification delivered so far.
    ///
    /// # Errors
    ///
    /// Returns [`NotificationError::Delivery`] if the internal lock is
    /// poisoned.
    pub fn delivered(&self) -> NotificationResult<Vec<Notification>> {
        let delivered = self
            .delivered
            .read()
            .map_err(|err| NotificationError::delivery(std::io::Error::other(err.to_string())))?;
        Ok(delivered.clone())
    }

    /// Returns the notifications addressed to `recipient_id`.
    ///
    /// # Errors
    ///
    /// Returns [`NotificationError::Delivery`] if the internal lock is
    /// poisoned.
    pub fn delivered_to(&self, recipient_id: UserId) -> NotificationResult<Vec<Notification>> {
        Ok(self
            .delivered()?
            .into_iter()
            .filter(|notification| notification.recipient_id == recipient_id)
            .collect())
    }
}

#[async_trait]
impl NotificationSink for InMemoryNotificationSink {
    async fn deliver(&self, notification: &Notification) -> NotificationResult<()> {
        let mut delivered = self
            .delivered
            .write()
            .map_err(|err| NotificationError::delivery(std::io::Error::other(err.to_string())))?;
        delivered.push(notification.clone());
        Ok(())
    }
}
