//! Application engine: submit, accept, reject, withdraw, and delete.

use super::{JobServiceError, JobServiceResult};
use crate::config::MarketplaceConfig;
use crate::identity::{domain::UserId, ports::IdentityDirectory};
use crate::job::{
    domain::{
        AcceptanceDecision, AcceptanceOutcome, ApplicationMessage, ApplicationStatus,
        JobApplication, JobApplicationId, JobDomainError, JobPost, JobPostId, ProposedRate,
    },
    ports::JobBoardRepository,
};
use crate::notification::{
    domain::{NotificationEvent, NotificationTemplates},
    ports::NotificationSink,
    services::NotificationDispatcher,
};
use mockable::Clock;
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Request payload for applying to a job post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitApplicationRequest {
    job_post_id: JobPostId,
    applicant_id: UserId,
    message: Option<String>,
    proposed_rate_minor: Option<u64>,
}

impl SubmitApplicationRequest {
    /// Creates a request without a cover note or rate.
    #[must_use]
    pub const fn new(job_post_id: JobPostId, applicant_id: UserId) -> Self {
        Self {
            job_post_id,
            applicant_id,
            message: None,
            proposed_rate_minor: None,
        }
    }

    /// Sets the cover note.
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Sets the offered rate in minor currency units.
    #[must_use]
    pub const fn with_proposed_rate(mut self, minor_units: u64) -> Self {
        self.proposed_rate_minor = Some(minor_units);
        self
    }
}

/// Application engine service.
///
/// Notifications are sent after the repository call returns, never from
/// inside the storage transaction.
#[derive(Clone)]
pub struct ApplicationService<R, I, N, C>
where
    R: JobBoardRepository,
    I: IdentityDirectory,
    N: NotificationSink,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    identities: Arc<I>,
    notifications: NotificationDispatcher<N>,
    clock: Arc<C>,
    max_application_message_length: usize,
}

impl<R, I, N, C> ApplicationService<R, I, N, C>
where
    R: JobBoardRepository,
    I: IdentityDirectory,
    N: NotificationSink,
    C: Clock + Send + Sync,
{
    /// Creates a service with default limits and templates.
    #[must_use]
    pub fn new(repository: Arc<R>, identities: Arc<I>, sink: Arc<N>, clock: Arc<C>) -> Self {
        Self {
            repository,
            identities,
            notifications: NotificationDispatcher::new(sink, NotificationTemplates::default()),
            clock,
            max_application_message_length: MarketplaceConfig::default()
                .max_application_message_length,
        }
    }

    /// Applies limits and templates from `config`.
    #[must_use]
    pub fn with_config(mut self, config: &MarketplaceConfig) -> Self {
        self.max_application_message_length = config.max_application_message_length;
        self.notifications = self
            .notifications
            .with_templates(config.notification_templates.clone());
        self
    }

    /// Submits a pending application and notifies the post owner.
    ///
    /// # Errors
    ///
    /// - [`JobServiceError::UserNotFound`] for an unknown applicant.
    /// - [`JobServiceError::PostNotFound`] for an unknown post.
    /// - [`JobServiceError::Domain`] when the applicant is not a provider,
    ///   owns the post, already applied, or the post is not open.
    #[instrument(skip_all, fields(job_post_id = %request.job_post_id, applicant_id = %request.applicant_id))]
    pub async fn submit(&self, request: SubmitApplicationRequest) -> JobServiceResult<JobApplication> {
        let SubmitApplicationRequest {
            job_post_id,
            applicant_id,
            message,
            proposed_rate_minor,
        } = request;

        let profile = self
            .identities
            .find_profile(applicant_id)
            .await?
            .ok_or(JobServiceError::UserNotFound(applicant_id))?;
        if !profile.is_provider() {
            return Err(JobDomainError::NotProvider(applicant_id).into());
        }

        let post = self.load_post(job_post_id).await?;
        let note = ApplicationMessage::parse(message, self.max_application_message_length)?;
        let rate = proposed_rate_minor.map(ProposedRate::new).transpose()?;
        let application = JobApplication::submit(&post, applicant_id, note, rate, &*self.clock)?;
        self.repository.submit_application(&application).await?;
        info!(application_id = %application.id(), "application submitted");

        self.notifications
            .dispatch(
                post.owner_id(),
                NotificationEvent::ApplicationReceived {
                    job_post_id,
                    application_id: application.id(),
                    applicant_id,
                    applicant_name: profile.display_name().to_owned(),
                    service_category: post.category().as_str().to_owned(),
                },
                application.created_at(),
            )
            .await;
        Ok(application)
    }

    /// Accepts an application and forecloses its pending siblings.
    ///
    /// The accepted applicant and every auto-rejected applicant are
    /// notified once the cascade has been stored.
    ///
    /// # Errors
    ///
    /// - [`JobServiceError::ApplicationNotFound`] for an unknown application.
    /// - [`JobServiceError::Domain`] when the acting user is not the owner,
    ///   the application is not pending, or the post is no longer open.
    #[instrument(skip_all, fields(%application_id, %acting_user_id))]
    pub async fn accept(
        &self,
        application_id: JobApplicationId,
        acting_user_id: UserId,
    ) -> JobServiceResult<AcceptanceOutcome> {
        let decision = AcceptanceDecision {
            application_id,
            acting_user_id,
            decided_at: self.clock.utc(),
        };
        let outcome = self.repository.accept_application(decision).await?;
        info!(
            job_post_id = %outcome.job_post.id(),
            assignee = %outcome.accepted.applicant_id(),
            auto_rejected = outcome.auto_rejected.len(),
            "application accepted"
        );

        let owner_name = self.identities.display_name_or_id(acting_user_id).await;
        for application in std::iter::once(&outcome.accepted).chain(&outcome.auto_rejected) {
            self.notify_status_change(
                application,
                &outcome.job_post,
                application.applicant_id(),
                owner_name.clone(),
            )
            .await;
        }
        Ok(outcome)
    }

    /// Rejects a single pending application without touching its siblings.
    ///
    /// # Errors
    ///
    /// Returns [`JobServiceError::Domain`] when the acting user is not the
    /// owner or the application is not pending.
    #[instrument(skip_all, fields(%application_id, %acting_user_id))]
    pub async fn reject(
        &self,
        application_id: JobApplicationId,
        acting_user_id: UserId,
    ) -> JobServiceResult<JobApplication> {
        let mut application = self.load_application(application_id).await?;
        let post = self.load_post(application.job_post_id()).await?;
        let observed = application.status();
        application.reject(&post, acting_user_id, &*self.clock)?;
        self.repository
            .update_application(&application, observed)
            .await?;
        info!("application rejected");

        let owner_name = self.identities.display_name_or_id(acting_user_id).await;
        self.notify_status_change(&application, &post, application.applicant_id(), owner_name)
            .await;
        Ok(application)
    }

    /// Withdraws a pending application on behalf of its applicant.
    ///
    /// # Errors
    ///
    /// Returns [`JobServiceError::Domain`] when the acting user is not the
    /// applicant or the application is not pending.
    #[instrument(skip_all, fields(%application_id, %acting_user_id))]
    pub async fn withdraw(
        &self,
        application_id: JobApplicationId,
        acting_user_id: UserId,
    ) -> JobServiceResult<JobApplication> {
        let mut application = self.load_application(application_id).await?;
        let post = self.load_post(application.job_post_id()).await?;
        let observed = application.status();
        application.withdraw(acting_user_id, &*self.clock)?;
        self.repository
            .update_application(&application, observed)
            .await?;
        info!("application withdrawn");

        let applicant_name = self.identities.display_name_or_id(acting_user_id).await;
        self.notify_status_change(&application, &post, post.owner_id(), applicant_name)
            .await;
        Ok(application)
    }

    /// Deletes an application that is still pending.
    ///
    /// # Errors
    ///
    /// Returns [`JobServiceError::Domain`] when the acting user is neither
    /// party or the application was already decided.
    #[instrument(skip_all, fields(%application_id, %acting_user_id))]
    pub async fn destroy(
        &self,
        application_id: JobApplicationId,
        acting_user_id: UserId,
    ) -> JobServiceResult<()> {
        let application = self.load_application(application_id).await?;
        let post = self.load_post(application.job_post_id()).await?;
        application.ensure_deletable_by(&post, acting_user_id)?;
        self.repository
            .delete_application(application_id, application.status())
            .await?;
        info!(status = %application.status(), "application deleted");
        Ok(())
    }

    /// Lists the applications on a post in submission order. Owner only.
    ///
    /// # Errors
    ///
    /// Returns [`JobServiceError::Domain`] when the acting user is not the
    /// owner.
    pub async fn list_for_post(
        &self,
        job_post_id: JobPostId,
        acting_user_id: UserId,
    ) -> JobServiceResult<Vec<JobApplication>> {
        let post = self.load_post(job_post_id).await?;
        post.ensure_owner(acting_user_id)?;
        let applications = self.repository.find_applications_for_post(job_post_id).await?;
        debug!(%job_post_id, count = applications.len(), "listed applications for post");
        Ok(applications)
    }

    /// Lists the applications submitted by `applicant_id`, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`JobServiceError::Repository`] when storage fails.
    pub async fn list_for_applicant(
        &self,
        applicant_id: UserId,
    ) -> JobServiceResult<Vec<JobApplication>> {
        Ok(self
            .repository
            .find_applications_by_applicant(applicant_id)
            .await?)
    }

    async fn load_post(&self, job_post_id: JobPostId) -> JobServiceResult<JobPost> {
        self.repository
            .find_post(job_post_id)
            .await?
            .ok_or(JobServiceError::PostNotFound(job_post_id))
    }

    async fn load_application(
        &self,
        application_id: JobApplicationId,
    ) -> JobServiceResult<JobApplication> {
        self.repository
            .find_application(application_id)
            .await?
            .ok_or(JobServiceError::ApplicationNotFound(application_id))
    }

    async fn notify_status_change(
        &self,
        application: &JobApplication,
        post: &JobPost,
        recipient_id: UserId,
        counterpart_name: String,
    ) {
        self.notifications
            .dispatch(
                recipient_id,
                NotificationEvent::ApplicationStatusChanged {
                    application_id: application.id(),
                    job_post_id: post.id(),
                    old_status: ApplicationStatus::Pending,
                    new_status: application.status(),
                    service_category: post.category().as_str().to_owned(),
                    counterpart_name,
                },
                application.updated_at(),
            )
            .await;
    }
}
