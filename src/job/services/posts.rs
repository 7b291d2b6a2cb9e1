//! Owner-facing job post lifecycle.

use super::{JobServiceError, JobServiceResult};
use crate::config::MarketplaceConfig;
use crate::identity::{domain::UserId, ports::IdentityDirectory};
use crate::job::{
    domain::{
        JobPost, JobPostDetails, JobPostId, JobPostRevision, ServiceCategory, WorkMode,
    },
    ports::JobBoardRepository,
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Request payload for publishing a job post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateJobPostRequest {
    category: String,
    work_mode: WorkMode,
    title: String,
    city: String,
    description: Option<String>,
    address: Option<String>,
    contact_phone: Option<String>,
    scheduled_for: Option<DateTime<Utc>>,
}

impl CreateJobPostRequest {
    /// Creates a request with the required fields.
    #[must_use]
    pub fn new(
        category: impl Into<String>,
        work_mode: WorkMode,
        title: impl Into<String>,
        city: impl Into<String>,
    ) -> Self {
        Self {
            category: category.into(),
            work_mode,
            title: title.into(),
            city: city.into(),
            description: None,
            address: None,
            contact_phone: None,
            scheduled_for: None,
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the street address.
    #[must_use]
    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    /// Sets the contact phone.
    #[must_use]
    pub fn with_contact_phone(mut self, contact_phone: impl Into<String>) -> Self {
        self.contact_phone = Some(contact_phone.into());
        self
    }

    /// Sets the requested start time.
    #[must_use]
    pub const fn with_scheduled_for(mut self, scheduled_for: DateTime<Utc>) -> Self {
        self.scheduled_for = Some(scheduled_for);
        self
    }
}

/// Request payload for editing a pending job post. Unset fields are kept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateJobPostRequest {
    category: Option<String>,
    work_mode: Option<WorkMode>,
    title: Option<String>,
    description: Option<String>,
    city: Option<String>,
    address: Option<String>,
    contact_phone: Option<String>,
    scheduled_for: Option<DateTime<Utc>>,
}

impl UpdateJobPostRequest {
    /// Creates an empty edit.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the category.
    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Replaces the work mode.
    #[must_use]
    pub const fn with_work_mode(mut self, work_mode: WorkMode) -> Self {
        self.work_mode = Some(work_mode);
        self
    }

    /// Replaces the title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Replaces the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Replaces the city.
    #[must_use]
    pub fn with_city(mut self, city: impl Into<String>) -> Self {
        self.city = Some(city.into());
        self
    }

    /// Replaces the street address.
    #[must_use]
    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    /// Replaces the contact phone.
    #[must_use]
    pub fn with_contact_phone(mut self, contact_phone: impl Into<String>) -> Self {
        self.contact_phone = Some(contact_phone.into());
        self
    }

    /// Replaces the requested start time.
    #[must_use]
    pub const fn with_scheduled_for(mut self, scheduled_for: DateTime<Utc>) -> Self {
        self.scheduled_for = Some(scheduled_for);
        self
    }
}

/// Answer to "may a review be written for this job post?".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReviewEligibility {
    /// Job post checked.
    pub job_post_id: JobPostId,
    /// `true` once the post is completed with an assigned provider.
    pub reviewable: bool,
    /// Provider who would be reviewed.
    pub provider_id: Option<UserId>,
    /// Requester who would write the review.
    pub reviewer_id: UserId,
}

/// Job post lifecycle service.
#[derive(Clone)]
pub struct JobPostService<R, I, C>
where
    R: JobBoardRepository,
    I: IdentityDirectory,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    identities: Arc<I>,
    clock: Arc<C>,
    max_category_length: usize,
}

impl<R, I, C> JobPostService<R, I, C>
where
    R: JobBoardRepository,
    I: IdentityDirectory,
    C: Clock + Send + Sync,
{
    /// Creates a service with default limits.
    #[must_use]
    pub fn new(repository: Arc<R>, identities: Arc<I>, clock: Arc<C>) -> Self {
        Self {
            repository,
            identities,
            clock,
            max_category_length: MarketplaceConfig::default().max_category_length,
        }
    }

    /// Applies limits from `config`.
    #[must_use]
    pub const fn with_config(mut self, config: &MarketplaceConfig) -> Self {
        self.max_category_length = config.max_category_length;
        self
    }

    /// Publishes a new pending job post.
    ///
    /// # Errors
    ///
    /// Returns [`JobServiceError::UserNotFound`] for an unknown owner and
    /// [`JobServiceError::Domain`] for invalid fields.
    #[instrument(skip_all, fields(%owner_id))]
    pub async fn create(
        &self,
        owner_id: UserId,
        request: CreateJobPostRequest,
    ) -> JobServiceResult<JobPost> {
        self.identities
            .find_profile(owner_id)
            .await?
            .ok_or(JobServiceError::UserNotFound(owner_id))?;

        let CreateJobPostRequest {
            category,
            work_mode,
            title,
            city,
            description,
            address,
            contact_phone,
            scheduled_for,
        } = request;
        let service_category = ServiceCategory::new(category, self.max_category_length)?;
        let details = JobPostDetails {
            description,
            address,
            contact_phone,
            scheduled_for,
            ..JobPostDetails::new(title, city)?
        };

        let post = JobPost::new(owner_id, service_category, work_mode, details, &*self.clock);
        self.repository.store_post(&post).await?;
        info!(job_post_id = %post.id(), category = %post.category(), "job post created");
        Ok(post)
    }

    /// Loads a job post.
    ///
    /// # Errors
    ///
    /// Returns [`JobServiceError::PostNotFound`] when it does not exist.
    pub async fn find(&self, job_post_id: JobPostId) -> JobServiceResult<JobPost> {
        self.repository
            .find_post(job_post_id)
            .await?
            .ok_or(JobServiceError::PostNotFound(job_post_id))
    }

    /// Edits a pending job post.
    ///
    /// # Errors
    ///
    /// Returns [`JobServiceError::Domain`] when the acting user is not the
    /// owner, the post has left `pending`, or a field is invalid.
    #[instrument(skip_all, fields(%job_post_id, %acting_user_id))]
    pub async fn update(
        &self,
        job_post_id: JobPostId,
        acting_user_id: UserId,
        request: UpdateJobPostRequest,
    ) -> JobServiceResult<JobPost> {
        let mut post = self.find(job_post_id).await?;
        let observed = post.status();
        let revision = self.revision_from(request)?;
        post.revise(acting_user_id, revision, &*self.clock)?;
        self.repository.update_post(&post, observed).await?;
        info!("job post updated");
        Ok(post)
    }

    /// Cancels a pending or confirmed job post.
    ///
    /// # Errors
    ///
    /// Returns [`JobServiceError::Domain`] when the acting user is not the
    /// owner or the post is already cancelled or completed.
    #[instrument(skip_all, fields(%job_post_id, %acting_user_id))]
    pub async fn cancel(
        &self,
        job_post_id: JobPostId,
        acting_user_id: UserId,
    ) -> JobServiceResult<JobPost> {
        let mut post = self.find(job_post_id).await?;
        let observed = post.status();
        post.cancel(acting_user_id, &*self.clock)?;
        self.repository.update_post(&post, observed).await?;
        info!(from = %observed, "job post cancelled");
        Ok(post)
    }

    /// Marks a confirmed job post as completed.
    ///
    /// # Errors
    ///
    /// Returns [`JobServiceError::Domain`] when the acting user is not the
    /// owner or the post is not confirmed.
    #[instrument(skip_all, fields(%job_post_id, %acting_user_id))]
    pub async fn mark_completed(
        &self,
        job_post_id: JobPostId,
        acting_user_id: UserId,
    ) -> JobServiceResult<JobPost> {
        let mut post = self.find(job_post_id).await?;
        let observed = post.status();
        post.mark_completed(acting_user_id, &*self.clock)?;
        self.repository.update_post(&post, observed).await?;
        info!("job post completed");
        Ok(post)
    }

    /// Deletes an unassigned job post and its applications.
    ///
    /// # Errors
    ///
    /// Returns [`JobServiceError::Domain`] when the acting user is not the
    /// owner or a provider is assigned.
    #[instrument(skip_all, fields(%job_post_id, %acting_user_id))]
    pub async fn delete(&self, job_post_id: JobPostId, acting_user_id: UserId) -> JobServiceResult<()> {
        let post = self.find(job_post_id).await?;
        post.ensure_deletable_by(acting_user_id)?;
        self.repository
            .delete_post(job_post_id, post.status())
            .await?;
        info!("job post deleted");
        Ok(())
    }

    /// Lists the posts owned by `owner_id`, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`JobServiceError::Repository`] when storage fails.
    pub async fn list_for_owner(&self, owner_id: UserId) -> JobServiceResult<Vec<JobPost>> {
        let posts = self.repository.find_posts_by_owner(owner_id).await?;
        debug!(%owner_id, count = posts.len(), "listed owner job posts");
        Ok(posts)
    }

    /// Lists posts still accepting applications, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`JobServiceError::Domain`] for an invalid category filter.
    pub async fn list_open(&self, category: Option<&str>) -> JobServiceResult<Vec<JobPost>> {
        let filter = category
            .map(|label| ServiceCategory::new(label, self.max_category_length))
            .transpose()?;
        Ok(self.repository.find_open_posts(filter.as_ref()).await?)
    }

    /// Reports whether a review may be written for the job post.
    ///
    /// # Errors
    ///
    /// Returns [`JobServiceError::PostNotFound`] when it does not exist.
    pub async fn review_eligibility(
        &self,
        job_post_id: JobPostId,
    ) -> JobServiceResult<ReviewEligibility> {
        let post = self.find(job_post_id).await?;
        Ok(ReviewEligibility {
            job_post_id,
            reviewable: post.is_reviewable(),
            provider_id: post.assigned_user_id(),
            reviewer_id: post.owner_id(),
        })
    }

    fn revision_from(&self, request: UpdateJobPostRequest) -> JobServiceResult<JobPostRevision> {
        let UpdateJobPostRequest {
            category,
            work_mode,
            title,
            description,
            city,
            address,
            contact_phone,
            scheduled_for,
        } = request;
        let service_category = category
            .map(|label| ServiceCategory::new(label, self.max_category_length))
            .transpose()?;
        Ok(JobPostRevision {
            category: service_category,
            work_mode,
            title,
            description,
            city,
            address,
            contact_phone,
            scheduled_for,
        })
    }
}
