//! Notification events, rendered notifications, and templates.

mod event;
mod templates;

pub use event::{Notification, NotificationEvent, NotificationId};
pub use templates::{EventTemplate, NotificationTemplates, TemplateError};
