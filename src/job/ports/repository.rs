//! Repository port for job posts and their applications.
//!
//! Job posts and the applications against them behave as one aggregate
//! while an accept is in flight, so a single port owns both tables.

use crate::error::{Coded, ErrorCode};
use crate::identity::domain::UserId;
use crate::job::domain::{
    AcceptanceDecision, AcceptanceOutcome, ApplicationStatus, JobApplication, JobApplicationId,
    JobDomainError, JobPost, JobPostId, JobPostStatus, ServiceCategory,
};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for job board repository operations.
pub type JobRepositoryResult<T> = Result<T, JobRepositoryError>;

/// Job post and application persistence contract.
///
/// Mutations of existing rows carry the status the caller observed. An
/// implementation must apply the write only if the stored status still
/// matches, so that concurrent transitions surface as conflicts instead of
/// silently overwriting each other.
#[async_trait]
pub trait JobBoardRepository: Send + Sync {
    /// Stores a new job post.
    ///
    /// # Errors
    ///
    /// Returns [`JobRepositoryError::DuplicatePost`] when the identifier is
    /// already taken.
    async fn store_post(&self, post: &JobPost) -> JobRepositoryResult<()>;

    /// Persists changes to a job post.
    ///
    /// # Errors
    ///
    /// Returns [`JobRepositoryError::PostNotFound`] when the post is gone and
    /// [`JobRepositoryError::PostConflict`] when its stored status differs
    /// from `expected_status`.
    async fn update_post(
        &self,
        post: &JobPost,
        expected_status: JobPostStatus,
    ) -> JobRepositoryResult<()>;

    /// Finds a job post by identifier.
    async fn find_post(&self, id: JobPostId) -> JobRepositoryResult<Option<JobPost>>;

    /// Returns every post owned by `owner_id`, newest first.
    async fn find_posts_by_owner(&self, owner_id: UserId) -> JobRepositoryResult<Vec<JobPost>>;

    /// Returns pending posts, optionally restricted to one category, newest
    /// first.
    async fn find_open_posts(
        &self,
        category: Option<&ServiceCategory>,
    ) -> JobRepositoryResult<Vec<JobPost>>;

    /// Deletes an unassigned job post together with its applications.
    ///
    /// # Errors
    ///
    /// Returns [`JobRepositoryError::PostNotFound`] when the post is gone and
    /// [`JobRepositoryError::PostConflict`] when it changed status or gained
    /// an assignee since it was read.
    async fn delete_post(
        &self,
        id: JobPostId,
        expected_status: JobPostStatus,
    ) -> JobRepositoryResult<()>;

    /// Stores a new application.
    ///
    /// The open check on the post and the per-applicant uniqueness check run
    /// atomically with the insert.
    ///
    /// # Errors
    ///
    /// Returns [`JobRepositoryError::PostNotFound`] when the post is gone,
    /// [`JobDomainError::PostNotOpen`] when it no longer accepts
    /// applications, and [`JobDomainError::DuplicateApplication`] when the
    /// applicant already applied.
    async fn submit_application(&self, application: &JobApplication) -> JobRepositoryResult<()>;

    /// Persists a transition of a single application.
    ///
    /// # Errors
    ///
    /// Returns [`JobRepositoryError::ApplicationNotFound`] when the
    /// application is gone and [`JobRepositoryError::ApplicationConflict`]
    /// when its stored status differs from `expected_status`.
    async fn update_application(
        &self,
        application: &JobApplication,
        expected_status: ApplicationStatus,
    ) -> JobRepositoryResult<()>;

    /// Finds an application by identifier.
    async fn find_application(
        &self,
        id: JobApplicationId,
    ) -> JobRepositoryResult<Option<JobApplication>>;

    /// Returns every application on a post in submission order.
    async fn find_applications_for_post(
        &self,
        job_post_id: JobPostId,
    ) -> JobRepositoryResult<Vec<JobApplication>>;

    /// Returns every application submitted by `applicant_id`, newest first.
    async fn find_applications_by_applicant(
        &self,
        applicant_id: UserId,
    ) -> JobRepositoryResult<Vec<JobApplication>>;

    /// Deletes an application.
    ///
    /// # Errors
    ///
    /// Returns [`JobRepositoryError::ApplicationNotFound`] when the
    /// application is gone and [`JobRepositoryError::ApplicationConflict`]
    /// when its stored status differs from `expected_status`.
    async fn delete_application(
        &self,
        id: JobApplicationId,
        expected_status: ApplicationStatus,
    ) -> JobRepositoryResult<()>;

    /// Runs the accept cascade as one atomic unit.
    ///
    /// Implementations serialise concurrent accepts on the same post, read
    /// the post and its applications inside the critical section, apply
    /// [`crate::job::domain::resolve_acceptance`], and persist every change
    /// before releasing it.
    ///
    /// # Errors
    ///
    /// Returns [`JobRepositoryError::ApplicationNotFound`] or
    /// [`JobRepositoryError::PostNotFound`] for missing rows and
    /// [`JobRepositoryError::Domain`] when the cascade is refused.
    async fn accept_application(
        &self,
        decision: AcceptanceDecision,
    ) -> JobRepositoryResult<AcceptanceOutcome>;
}

/// Errors returned by job board repository implementations.
#[derive(Debug, Clone, Error)]
pub enum JobRepositoryError {
    /// The job post was not found.
    #[error("job post not found: {0}")]
    PostNotFound(JobPostId),

    /// The application was not found.
    #[error("job application not found: {0}")]
    ApplicationNotFound(JobApplicationId),

    /// A job post with the same identifier already exists.
    #[error("duplicate job post identifier: {0}")]
    DuplicatePost(JobPostId),

    /// A domain rule refused the operation inside the storage boundary.
    #[error(transparent)]
    Domain(#[from] JobDomainError),

    /// The job post changed since it was read.
    #[error("job post {job_post_id} is no longer {expected}")]
    PostConflict {
        /// Target job post.
        job_post_id: JobPostId,
        /// Status the caller observed.
        expected: JobPostStatus,
    },

    /// The application changed since it was read.
    #[error("job application {application_id} is no longer {expected}")]
    ApplicationConflict {
        /// Target application.
        application_id: JobApplicationId,
        /// Status the caller observed.
        expected: ApplicationStatus,
    },

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl JobRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}

impl From<diesel::result::Error> for JobRepositoryError {
    fn from(err: diesel::result::Error) -> Self {
        Self::persistence(err)
    }
}

impl Coded for JobRepositoryError {
    fn code(&self) -> ErrorCode {
        match self {
            Self::PostNotFound(_) | Self::ApplicationNotFound(_) => ErrorCode::NotFound,
            Self::DuplicatePost(_) | Self::Persistence(_) => ErrorCode::StorageFailure,
            Self::Domain(err) => err.code(),
            Self::PostConflict { .. } | Self::ApplicationConflict { .. } => {
                ErrorCode::InvalidTransition
            }
        }
    }
}
