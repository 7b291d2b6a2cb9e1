//! In-memory adapter for the messaging repository ports.

mod store;

pub use store::InMemoryMessagingStore;
