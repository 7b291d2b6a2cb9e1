//! `PostgreSQL` adapter for job posts and applications.

mod models;
mod repository;
mod schema;

pub use repository::{JobPgPool, PostgresJobBoard};

#[cfg(test)]
pub(crate) use models::{JobApplicationRow, JobPostRow};
#[cfg(test)]
pub(crate) use repository::{row_to_application, row_to_post};
