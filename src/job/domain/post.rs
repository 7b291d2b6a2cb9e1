//! Job post aggregate and its owner-controlled lifecycle.

use super::{JobDomainError, JobPostId, ParseJobPostStatusError, ParseWorkModeError};
use crate::identity::domain::UserId;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Request-side lifecycle state of a job post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobPostStatus {
    /// Open for applications.
    Pending,
    /// An application was accepted and a provider is assigned.
    Confirmed,
    /// Withdrawn by the owner.
    Cancelled,
    /// Work concluded with the assigned provider.
    Completed,
}

impl JobPostStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Cancelled => "cancelled",
            Self::Completed => "completed",
        }
    }

    /// Returns `true` while providers may still apply.
    #[must_use]
    pub const fn accepts_applications(self) -> bool {
        matches!(self, Self::Pending)
    }

    /// Returns `true` for states with no outgoing transitions.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Cancelled | Self::Completed)
    }

    /// Returns `true` if the state machine allows moving to `target`.
    #[must_use]
    pub const fn can_transition_to(self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Pending, Self::Confirmed | Self::Cancelled)
                | (Self::Confirmed, Self::Completed | Self::Cancelled)
        )
    }

    /// Returns `true` for states that carry an assigned provider.
    #[must_use]
    pub const fn requires_assignee(self) -> bool {
        matches!(self, Self::Confirmed | Self::Completed)
    }
}

impl TryFrom<&str> for JobPostStatus {
    type Error = ParseJobPostStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "confirmed" => Ok(Self::Confirmed),
            "cancelled" => Ok(Self::Cancelled),
            "completed" => Ok(Self::Completed),
            _ => Err(ParseJobPostStatusError(value.to_owned())),
        }
    }
}

impl fmt::Display for JobPostStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Engagement type requested by the owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkMode {
    /// Full-time engagement.
    FullTime,
    /// Part-time engagement.
    PartTime,
}

impl WorkMode {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::FullTime => "full_time",
            Self::PartTime => "part_time",
        }
    }
}

impl TryFrom<&str> for WorkMode {
    type Error = ParseWorkModeError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "full_time" => Ok(Self::FullTime),
            "part_time" => Ok(Self::PartTime),
            _ => Err(ParseWorkModeError(value.to_owned())),
        }
    }
}

/// Validated service category label.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ServiceCategory(String);

impl ServiceCategory {
    /// Creates a category, trimming surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns [`JobDomainError::EmptyCategory`] for blank input and
    /// [`JobDomainError::CategoryTooLong`] when the label exceeds
    /// `max_length` characters.
    pub fn new(value: impl Into<String>, max_length: usize) -> Result<Self, JobDomainError> {
        let raw = value.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(JobDomainError::EmptyCategory);
        }
        if trimmed.chars().count() > max_length {
            return Err(JobDomainError::CategoryTooLong { max: max_length });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the label as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ServiceCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Location and contact fields. Opaque to the matching rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobPostDetails {
    /// Short summary of the request.
    pub title: String,
    /// Free-form description.
    pub description: Option<String>,
    /// City the work takes place in.
    pub city: String,
    /// Street address.
    pub address: Option<String>,
    /// Contact phone number, already formatted by the caller.
    pub contact_phone: Option<String>,
    /// Requested start time.
    pub scheduled_for: Option<DateTime<Utc>>,
}

impl JobPostDetails {
    /// Creates details with the required fields.
    ///
    /// # Errors
    ///
    /// Returns [`JobDomainError::EmptyTitle`] when the title is blank.
    pub fn new(title: impl Into<String>, city: impl Into<String>) -> Result<Self, JobDomainError> {
        let title = validated_title(title.into())?;
        Ok(Self {
            title,
            description: None,
            city: city.into().trim().to_owned(),
            address: None,
            contact_phone: None,
            scheduled_for: None,
        })
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
    pub fn with_contact_phone(mut self, phone: impl Into<String>) -> Self {
        self.contact_phone = Some(phone.into());
        self
    }

    /// Sets the requested start time.
    #[must_use]
    pub const fn with_scheduled_for(mut self, scheduled_for: DateTime<Utc>) -> Self {
        self.scheduled_for = Some(scheduled_for);
        self
    }
}

fn validated_title(raw: String) -> Result<String, JobDomainError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(JobDomainError::EmptyTitle);
    }
    Ok(trimmed.to_owned())
}

/// Owner edits applied to a pending job post. `None` leaves a field as is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobPostRevision {
    /// Replacement category.
    pub category: Option<ServiceCategory>,
    /// Replacement work mode.
    pub work_mode: Option<WorkMode>,
    /// Replacement title.
    pub title: Option<String>,
    /// Replacement description.
    pub description: Option<String>,
    /// Replacement city.
    pub city: Option<String>,
    /// Replacement address.
    pub address: Option<String>,
    /// Replacement contact phone.
    pub contact_phone: Option<String>,
    /// Replacement start time.
    pub scheduled_for: Option<DateTime<Utc>>,
}

/// Job post aggregate root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobPost {
    id: JobPostId,
    owner_id: UserId,
    assigned_user_id: Option<UserId>,
    category: ServiceCategory,
    work_mode: WorkMode,
    status: JobPostStatus,
    details: JobPostDetails,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted job post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedJobPostData {
    /// Persisted identifier.
    pub id: JobPostId,
    /// Requester who owns the post.
    pub owner_id: UserId,
    /// Assigned provider, if any.
    pub assigned_user_id: Option<UserId>,
    /// Service category.
    pub category: ServiceCategory,
    /// Work mode.
    pub work_mode: WorkMode,
    /// Lifecycle state.
    pub status: JobPostStatus,
    /// Location and contact fields.
    pub details: JobPostDetails,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Latest modification timestamp.
    pub updated_at: DateTime<Utc>,
}

impl JobPost {
    /// Creates a new pending job post.
    #[must_use]
    pub fn new(
        owner_id: UserId,
        category: ServiceCategory,
        work_mode: WorkMode,
        details: JobPostDetails,
        clock: &impl Clock,
    ) -> Self {
        let timestamp = clock.utc();
        Self {
            id: JobPostId::new(),
            owner_id,
            assigned_user_id: None,
            category,
            work_mode,
            status: JobPostStatus::Pending,
            details,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Reconstructs a job post from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedJobPostData) -> Self {
        Self {
            id: data.id,
            owner_id: data.owner_id,
            assigned_user_id: data.assigned_user_id,
            category: data.category,
            work_mode: data.work_mode,
            status: data.status,
            details: data.details,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the job post identifier.
    #[must_use]
    pub const fn id(&self) -> JobPostId {
        self.id
    }

    /// Returns the requester who owns the post.
    #[must_use]
    pub const fn owner_id(&self) -> UserId {
        self.owner_id
    }

    /// Returns the assigned provider, if any.
    #[must_use]
    pub const fn assigned_user_id(&self) -> Option<UserId> {
        self.assigned_user_id
    }

    /// Returns the service category.
    #[must_use]
    pub const fn category(&self) -> &ServiceCategory {
        &self.category
    }

    /// Returns the work mode.
    #[must_use]
    pub const fn work_mode(&self) -> WorkMode {
        self.work_mode
    }

    /// Returns the lifecycle state.
    #[must_use]
    pub const fn status(&self) -> JobPostStatus {
        self.status
    }

    /// Returns the location and contact fields.
    #[must_use]
    pub const fn details(&self) -> &JobPostDetails {
        &self.details
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest modification timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Returns `true` if `user_id` owns the post.
    #[must_use]
    pub fn is_owned_by(&self, user_id: UserId) -> bool {
        self.owner_id == user_id
    }

    /// Returns `true` once work is completed with an assigned provider.
    ///
    /// This is the only gate the review collaborator relies on.
    #[must_use]
    pub const fn is_reviewable(&self) -> bool {
        matches!(self.status, JobPostStatus::Completed) && self.assigned_user_id.is_some()
    }

    /// Checks that `user_id` owns the post.
    ///
    /// # Errors
    ///
    /// Returns [`JobDomainError::NotOwner`] otherwise.
    pub fn ensure_owner(&self, user_id: UserId) -> Result<(), JobDomainError> {
        if self.is_owned_by(user_id) {
            Ok(())
        } else {
            Err(JobDomainError::NotOwner {
                job_post_id: self.id,
                user_id,
            })
        }
    }

    /// Checks that the post still accepts applications.
    ///
    /// # Errors
    ///
    /// Returns [`JobDomainError::PostNotOpen`] unless the post is pending.
    pub const fn ensure_open(&self) -> Result<(), JobDomainError> {
        if self.status.accepts_applications() {
            Ok(())
        } else {
            Err(JobDomainError::PostNotOpen {
                job_post_id: self.id,
                status: self.status,
            })
        }
    }

    /// Checks that `user_id` may delete the post.
    ///
    /// # Errors
    ///
    /// Returns [`JobDomainError::NotOwner`] for other users and
    /// [`JobDomainError::PostLocked`] once a provider is assigned.
    pub fn ensure_deletable_by(&self, user_id: UserId) -> Result<(), JobDomainError> {
        self.ensure_owner(user_id)?;
        if self.status.requires_assignee() || self.assigned_user_id.is_some() {
            return Err(self.locked());
        }
        Ok(())
    }

    /// Applies owner edits while the post is still pending.
    ///
    /// # Errors
    ///
    /// Returns [`JobDomainError::NotOwner`] for other users,
    /// [`JobDomainError::PostLocked`] once the post left `pending`, and
    /// [`JobDomainError::EmptyTitle`] for a blank replacement title.
    pub fn revise(
        &mut self,
        acting_user_id: UserId,
        revision: JobPostRevision,
        clock: &impl Clock,
    ) -> Result<(), JobDomainError> {
        self.ensure_owner(acting_user_id)?;
        if !matches!(self.status, JobPostStatus::Pending) {
            return Err(self.locked());
        }

        let JobPostRevision {
            category,
            work_mode,
            title,
            description,
            city,
            address,
            contact_phone,
            scheduled_for,
        } = revision;

        let mut details = self.details.clone();
        if let Some(raw_title) = title {
            details.title = validated_title(raw_title)?;
        }
        if let Some(city_value) = city {
            details.city = city_value.trim().to_owned();
        }
        if description.is_some() {
            details.description = description;
        }
        if address.is_some() {
            details.address = address;
        }
        if contact_phone.is_some() {
            details.contact_phone = contact_phone;
        }
        if scheduled_for.is_some() {
            details.scheduled_for = scheduled_for;
        }

        if let Some(new_category) = category {
            self.category = new_category;
        }
        if let Some(new_mode) = work_mode {
            self.work_mode = new_mode;
        }
        self.details = details;
        self.updated_at = clock.utc();
        Ok(())
    }

    /// Cancels the post. Cancelling a confirmed post releases the assignee.
    ///
    /// # Errors
    ///
    /// Returns [`JobDomainError::NotOwner`] for other users and
    /// [`JobDomainError::InvalidPostTransition`] from a terminal state.
    pub fn cancel(&mut self, acting_user_id: UserId, clock: &impl Clock) -> Result<(), JobDomainError> {
        self.ensure_owner(acting_user_id)?;
        self.transition_to(JobPostStatus::Cancelled, clock.utc())?;
        self.assigned_user_id = None;
        Ok(())
    }

    /// Marks the engagement as completed, making the post reviewable.
    ///
    /// # Errors
    ///
    /// Returns [`JobDomainError::NotOwner`] for other users and
    /// [`JobDomainError::InvalidPostTransition`] unless the post is
    /// confirmed.
    pub fn mark_completed(
        &mut self,
        acting_user_id: UserId,
        clock: &impl Clock,
    ) -> Result<(), JobDomainError> {
        self.ensure_owner(acting_user_id)?;
        self.transition_to(JobPostStatus::Completed, clock.utc())
    }

    /// Confirms the post with `assignee`. Only the accept cascade calls this.
    pub(crate) fn confirm(
        &mut self,
        assignee: UserId,
        at: DateTime<Utc>,
    ) -> Result<(), JobDomainError> {
        self.transition_to(JobPostStatus::Confirmed, at)?;
        self.assigned_user_id = Some(assignee);
        Ok(())
    }

    fn transition_to(&mut self, target: JobPostStatus, at: DateTime<Utc>) -> Result<(), JobDomainError> {
        if !self.status.can_transition_to(target) {
            return Err(JobDomainError::InvalidPostTransition {
                job_post_id: self.id,
                from: self.status,
                to: target,
            });
        }
        self.status = target;
        self.updated_at = at;
        Ok(())
    }

    const fn locked(&self) -> JobDomainError {
        JobDomainError::PostLocked {
            job_post_id: self.id,
            status: self.status,
        }
    }
}
