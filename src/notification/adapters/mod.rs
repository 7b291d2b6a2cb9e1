//! Notification sink adapters.

pub mod log_sink;
pub mod memory;

pub use log_sink::TracingNotificationSink;
pub use memory::InMemoryNotificationSink;
