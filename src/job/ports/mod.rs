//! Port contracts for job post and application persistence.

pub mod repository;

pub use repository::{JobBoardRepository, JobRepositoryError, JobRepositoryResult};
