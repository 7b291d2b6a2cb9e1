//! Notification sink collaborator.
//!
//! State transitions in the job and messaging contexts emit
//! [`domain::NotificationEvent`]s. The dispatcher renders each event into a
//! [`domain::Notification`] with configured templates and hands it to a
//! [`ports::NotificationSink`]. Delivery is best-effort and happens after
//! the triggering change has been stored.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;
