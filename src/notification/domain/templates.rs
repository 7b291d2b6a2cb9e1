//! `minijinja` templates that turn events into human-readable text.
//!
//! Each template is rendered against the serialised event, so every payload
//! field is available by name (for example `{{ applicant_name }}`).

use super::NotificationEvent;
use minijinja::Environment;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Title and body templates for one event kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventTemplate {
    /// Template for the notification title.
    pub title: String,
    /// Template for the notification body.
    pub body: String,
}

impl EventTemplate {
    /// Creates a template pair.
    #[must_use]
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
        }
    }
}

/// Templates for every event kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationTemplates {
    /// Template for `application.received`.
    pub application_received: EventTemplate,
    /// Template for `application.status_changed`.
    pub application_status_changed: EventTemplate,
    /// Template for `message.new`.
    pub message_new: EventTemplate,
}

impl Default for NotificationTemplates {
    fn default() -> Self {
        Self {
            application_received: EventTemplate::new(
                "New application for {{ service_category }}",
                "{{ applicant_name }} applied to your {{ service_category }} request.",
            ),
            application_status_changed: EventTemplate::new(
                "Application {{ new_status }}",
                "The {{ service_category }} application is now {{ new_status }} ({{ counterpart_name }}).",
            ),
            message_new: EventTemplate::new(
                "New message from {{ sender_name }}",
                "{{ preview }}",
            ),
        }
    }
}

/// Errors raised while compiling or rendering notification templates.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TemplateError {
    /// A template failed to parse.
    #[error("template for {event} is invalid: {reason}")]
    Invalid {
        /// Event name the template belongs to.
        event: &'static str,
        /// Parser message.
        reason: String,
    },

    /// A template failed to render against an event.
    #[error("failed to render {event} notification: {reason}")]
    Render {
        /// Event name being rendered.
        event: &'static str,
        /// Renderer message.
        reason: String,
    },
}

impl NotificationTemplates {
    /// Checks that every template parses.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError::Invalid`] for the first template that fails
    /// to compile.
    pub fn validate(&self) -> Result<(), TemplateError> {
        let environment = Environment::new();
        for (event, template) in self.entries() {
            for source in [template.title.as_str(), template.body.as_str()] {
                environment
                    .template_from_str(source)
                    .map_err(|error| TemplateError::Invalid {
                        event,
                        reason: error.to_string(),
                    })?;
            }
        }
        Ok(())
    }

    /// Renders the title and body for `event`.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError::Render`] when either template fails.
    pub fn render(&self, event: &NotificationEvent) -> Result<(String, String), TemplateError> {
        let name = event.event_name();
        let template = self.template_for(event);
        let environment = Environment::new();
        let render = |source: &str| {
            environment
                .render_str(source, event)
                .map_err(|error| TemplateError::Render {
                    event: name,
                    reason: error.to_string(),
                })
        };
        Ok((render(&template.title)?, render(&template.body)?))
    }

    const fn template_for(&self, event: &NotificationEvent) -> &EventTemplate {
        match event {
            NotificationEvent::ApplicationReceived { .. } => &self.application_received,
            NotificationEvent::ApplicationStatusChanged { .. } => {
                &self.application_status_changed
            }
            NotificationEvent::MessageNew { .. } => &self.message_new,
        }
    }

    fn entries(&self) -> [(&'static str, &EventTemplate); 3] {
        [
            ("application.received", &self.application_received),
            ("application.status_changed", &self.application_status_changed),
            ("message.new", &self.message_new),
        ]
    }
}
