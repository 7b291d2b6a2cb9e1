//! In-memory adapter for the job board repository.

mod board;

pub use board::InMemoryJobBoard;
