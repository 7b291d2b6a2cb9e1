//! Notification dispatch.

mod dispatcher;

pub use dispatcher::NotificationDispatcher;
