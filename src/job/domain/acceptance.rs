//! Accept cascade for a single job post.
//!
//! Accepting one application confirms the post, assigns the applicant, and
//! forecloses every other pending application on the same post. The rule is
//! a pure function over the post and its applications so that each
//! repository can run it inside its own critical section against freshly
//! read state.

use super::{ApplicationStatus, JobApplication, JobApplicationId, JobDomainError, JobPost};
use crate::identity::domain::UserId;
use chrono::{DateTime, Utc};

/// Inputs to an accept decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AcceptanceDecision {
    /// Application being accepted.
    pub application_id: JobApplicationId,
    /// User performing the accept.
    pub acting_user_id: UserId,
    /// Timestamp stamped on every row the cascade touches.
    pub decided_at: DateTime<Utc>,
}

/// Result of a successful accept cascade.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcceptanceOutcome {
    /// The confirmed job post.
    pub job_post: JobPost,
    /// The accepted application.
    pub accepted: JobApplication,
    /// Siblings moved from `pending` to `rejected`.
    pub auto_rejected: Vec<JobApplication>,
}

/// Applies the accept cascade.
///
/// `applications` holds every application on `post`; entries for other
/// posts are ignored. Rejected and withdrawn siblings are left untouched.
///
/// # Errors
///
/// - [`JobDomainError::ApplicationNotOnPost`] when the target is not among
///   `applications`.
/// - [`JobDomainError::NotOwner`] when the acting user does not own the post.
/// - [`JobDomainError::InvalidApplicationTransition`] when the target is
///   not pending.
/// - [`JobDomainError::PostNotOpen`] when the post already left `pending`.
pub fn resolve_acceptance(
    post: &JobPost,
    applications: &[JobApplication],
    decision: &AcceptanceDecision,
) -> Result<AcceptanceOutcome, JobDomainError> {
    post.ensure_owner(decision.acting_user_id)?;

    let target = applications
        .iter()
        .find(|application| {
            application.id() == decision.application_id && application.job_post_id() == post.id()
        })
        .ok_or(JobDomainError::ApplicationNotOnPost {
            application_id: decision.application_id,
            job_post_id: post.id(),
        })?;

    let mut accepted = target.clone();
    accepted.accept_at(decision.decided_at)?;
    post.ensure_open()?;

    let mut job_post = post.clone();
    job_post.confirm(accepted.applicant_id(), decision.decided_at)?;

    let mut auto_rejected = Vec::new();
    for sibling in applications.iter().filter(|application| {
        application.job_post_id() == post.id()
            && application.id() != decision.application_id
            && matches!(application.status(), ApplicationStatus::Pending)
    }) {
        let mut rejected = sibling.clone();
        rejected.auto_reject_at(decision.decided_at)?;
        auto_rejected.push(rejected);
    }

    Ok(AcceptanceOutcome {
        job_post,
        accepted,
        auto_rejected,
    })
}
