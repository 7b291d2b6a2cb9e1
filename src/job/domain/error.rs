//! Error types for job post and application rules.

use super::{ApplicationStatus, JobApplicationId, JobPostId, JobPostStatus};
use crate::error::{Coded, ErrorCode};
use crate::identity::domain::UserId;
use thiserror::Error;

/// Errors raised while validating or transitioning job aggregates.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum JobDomainError {
    /// The service category is empty after trimming.
    #[error("service category must not be empty")]
    EmptyCategory,

    /// The service category exceeds the configured length.
    #[error("service category exceeds {max} characters")]
    CategoryTooLong {
        /// Maximum permitted length in characters.
        max: usize,
    },

    /// The job post title is empty after trimming.
    #[error("job post title must not be empty")]
    EmptyTitle,

    /// The application cover note exceeds the configured length.
    #[error("application message exceeds {max} characters")]
    ApplicationMessageTooLong {
        /// Maximum permitted length in characters.
        max: usize,
    },

    /// The proposed rate is zero or too large to store.
    #[error("proposed rate must be a positive amount within range")]
    InvalidProposedRate,

    /// The acting user does not own the job post.
    #[error("user {user_id} does not own job post {job_post_id}")]
    NotOwner {
        /// Target job post.
        job_post_id: JobPostId,
        /// Acting user.
        user_id: UserId,
    },

    /// The acting user did not submit the application.
    #[error("user {user_id} did not submit application {application_id}")]
    NotApplicant {
        /// Target application.
        application_id: JobApplicationId,
        /// Acting user.
        user_id: UserId,
    },

    /// The acting user is neither the post owner nor the applicant.
    #[error("user {user_id} is not a party to application {application_id}")]
    NotParty {
        /// Target application.
        application_id: JobApplicationId,
        /// Acting user.
        user_id: UserId,
    },

    /// The applicant does not hold a provider role.
    #[error("user {0} is not registered as a provider")]
    NotProvider(UserId),

    /// The owner tried to apply to their own job post.
    #[error("user {user_id} cannot apply to their own job post {job_post_id}")]
    OwnJobPost {
        /// Target job post.
        job_post_id: JobPostId,
        /// Acting user.
        user_id: UserId,
    },

    /// The job post does not accept applications in its current state.
    #[error("job post {job_post_id} is {status} and does not accept applications")]
    PostNotOpen {
        /// Target job post.
        job_post_id: JobPostId,
        /// Current status of the post.
        status: JobPostStatus,
    },

    /// The applicant already holds an application for the job post.
    #[error("user {applicant_id} already applied to job post {job_post_id}")]
    DuplicateApplication {
        /// Target job post.
        job_post_id: JobPostId,
        /// Applicant who already applied.
        applicant_id: UserId,
    },

    /// The job post can no longer be edited or deleted.
    #[error("job post {job_post_id} cannot be modified while {status}")]
    PostLocked {
        /// Target job post.
        job_post_id: JobPostId,
        /// Current status of the post.
        status: JobPostStatus,
    },

    /// The job post state machine does not permit the transition.
    #[error("invalid job post transition from {from} to {to} for {job_post_id}")]
    InvalidPostTransition {
        /// Target job post.
        job_post_id: JobPostId,
        /// Current status.
        from: JobPostStatus,
        /// Requested status.
        to: JobPostStatus,
    },

    /// The application state machine does not permit the transition.
    #[error("invalid application transition from {from} to {to} for {application_id}")]
    InvalidApplicationTransition {
        /// Target application.
        application_id: JobApplicationId,
        /// Current status.
        from: ApplicationStatus,
        /// Requested status.
        to: ApplicationStatus,
    },

    /// Only pending applications can be deleted.
    #[error("application {application_id} is {status} and cannot be deleted")]
    ApplicationDecided {
        /// Target application.
        application_id: JobApplicationId,
        /// Current status of the application.
        status: ApplicationStatus,
    },

    /// The application does not belong to the job post it was paired with.
    #[error("application {application_id} does not belong to job post {job_post_id}")]
    ApplicationNotOnPost {
        /// Target application.
        application_id: JobApplicationId,
        /// Job post that was checked.
        job_post_id: JobPostId,
    },
}

impl Coded for JobDomainError {
    fn code(&self) -> ErrorCode {
        match self {
            Self::EmptyCategory
            | Self::CategoryTooLong { .. }
            | Self::EmptyTitle
            | Self::ApplicationMessageTooLong { .. }
            | Self::InvalidProposedRate => ErrorCode::InvalidInput,
            Self::NotOwner { .. }
            | Self::NotApplicant { .. }
            | Self::NotParty { .. }
            | Self::NotProvider(_)
            | Self::OwnJobPost { .. } => ErrorCode::Forbidden,
            Self::PostNotOpen { .. } => ErrorCode::PostNotOpen,
            Self::DuplicateApplication { .. } => ErrorCode::DuplicateApplication,
            Self::PostLocked { .. }
            | Self::InvalidPostTransition { .. }
            | Self::InvalidApplicationTransition { .. }
            | Self::ApplicationDecided { .. } => ErrorCode::InvalidTransition,
            Self::ApplicationNotOnPost { .. } => ErrorCode::NotFound,
        }
    }
}

/// Error returned while parsing job post statuses from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown job post status: {0}")]
pub struct ParseJobPostStatusError(pub String);

/// Error returned while parsing application statuses from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown application status: {0}")]
pub struct ParseApplicationStatusError(pub String);

/// Error returned while parsing work modes.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown work mode: {0}")]
pub struct ParseWorkModeError(pub String);
