//! Service-level errors for the job context.

use crate::error::{Coded, ErrorCode};
use crate::identity::{domain::UserId, ports::IdentityError};
use crate::job::{
    domain::{JobApplicationId, JobDomainError, JobPostId},
    ports::JobRepositoryError,
};
use thiserror::Error;

/// Errors returned by [`super::JobPostService`] and
/// [`super::ApplicationService`].
#[derive(Debug, Clone, Error)]
pub enum JobServiceError {
    /// A domain rule refused the operation.
    #[error(transparent)]
    Domain(#[from] JobDomainError),

    /// Storage failed or detected a conflicting change.
    #[error(transparent)]
    Repository(JobRepositoryError),

    /// The identity collaborator failed.
    #[error(transparent)]
    Identity(#[from] IdentityError),

    /// The job post does not exist.
    #[error("job post not found: {0}")]
    PostNotFound(JobPostId),

    /// The application does not exist.
    #[error("job application not found: {0}")]
    ApplicationNotFound(JobApplicationId),

    /// The user is unknown to the identity directory.
    #[error("user not found: {0}")]
    UserNotFound(UserId),
}

/// Result type for job service operations.
pub type JobServiceResult<T> = Result<T, JobServiceError>;

impl From<JobRepositoryError> for JobServiceError {
    fn from(err: JobRepositoryError) -> Self {
        match err {
            JobRepositoryError::Domain(domain) => Self::Domain(domain),
            JobRepositoryError::PostNotFound(id) => Self::PostNotFound(id),
            JobRepositoryError::ApplicationNotFound(id) => Self::ApplicationNotFound(id),
            other => Self::Repository(other),
        }
    }
}

impl Coded for JobServiceError {
    fn code(&self) -> ErrorCode {
        match self {
            Self::Domain(err) => err.code(),
            Self::Repository(err) => err.code(),
            Self::Identity(_) => ErrorCode::StorageFailure,
            Self::PostNotFound(_) | Self::ApplicationNotFound(_) | Self::UserNotFound(_) => {
                ErrorCode::NotFound
            }
        }
    }
}
