//! Unit tests for the job context.


use crate::identity::domain::UserId;
use crate::job::domain::{
    JobApplication, JobDomainError, JobPost, JobPostDetails, ServiceCategory, WorkMode,
};
use mockable::DefaultClock;

pub(super) fn pending_post(owner_id: UserId) -> Result<JobPost, JobDomainError> {
    let category = ServiceCategory::new("Plumbing", 100)?;
    let details = JobPostDetails::new("Fix the kitchen sink", "Lagos")?;
    Ok(JobPost::new(
        owner_id,
        category,
        WorkMode::PartTime,
        details,
        &DefaultClock,
    ))
}

pub(super) fn pending_application(
    post: &JobPost,
    applicant_id: UserId,
) -> Result<JobApplication, JobDomainError> {
    JobApplication::submit(post, applicant_id, None, None, &DefaultClock)
}
