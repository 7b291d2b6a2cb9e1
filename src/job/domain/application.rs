//! Provider applications against a job post.

use super::{
    JobApplicationId, JobDomainError, JobPost, JobPostId, ParseApplicationStatusError,
};
use crate::identity::domain::UserId;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle state of an application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    /// Awaiting the owner's decision.
    Pending,
    /// Chosen by the owner.
    Accepted,
    /// Declined by the owner, or auto-rejected when a sibling was accepted.
    Rejected,
    /// Retracted by the applicant.
    Withdrawn,
}

impl ApplicationStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Accepted => "accepted",
            Self::Rejected => "rejected",
            Self::Withdrawn => "withdrawn",
        }
    }

    /// Returns `true` once no further transitions are possible.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::Pending)
    }

    /// Returns `true` if the state machine allows moving to `target`.
    ///
    /// Every transition leaves `pending`; there is no way back.
    #[must_use]
    pub const fn can_transition_to(self, target: Self) -> bool {
        matches!(
            (self, target),
            (
                Self::Pending,
                Self::Accepted | Self::Rejected | Self::Withdrawn
            )
        )
    }
}

impl TryFrom<&str> for ApplicationStatus {
    type Error = ParseApplicationStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "accepted" => Ok(Self::Accepted),
            "rejected" => Ok(Self::Rejected),
            "withdrawn" => Ok(Self::Withdrawn),
            _ => Err(ParseApplicationStatusError(value.to_owned())),
        }
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rate offered by the applicant, in minor currency units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProposedRate(u64);

impl ProposedRate {
    /// Largest accepted amount; rates are stored as signed 64-bit integers.
    pub const MAX_MINOR_UNITS: u64 = i64::MAX.unsigned_abs();

    /// Creates a positive rate.
    ///
    /// # Errors
    ///
    /// Returns [`JobDomainError::InvalidProposedRate`] for zero or for
    /// amounts above [`Self::MAX_MINOR_UNITS`].
    pub const fn new(minor_units: u64) -> Result<Self, JobDomainError> {
        if minor_units == 0 || minor_units > Self::MAX_MINOR_UNITS {
            return Err(JobDomainError::InvalidProposedRate);
        }
        Ok(Self(minor_units))
    }

    /// Returns the amount in minor currency units.
    #[must_use]
    pub const fn minor_units(self) -> u64 {
        self.0
    }
}

/// Optional cover note attached to an application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ApplicationMessage(String);

impl ApplicationMessage {
    /// Parses an optional cover note. Blank input yields `None`.
    ///
    /// # Errors
    ///
    /// Returns [`JobDomainError::ApplicationMessageTooLong`] when the note
    /// exceeds `max_length` characters.
    pub fn parse(value: Option<String>, max_length: usize) -> Result<Option<Self>, JobDomainError> {
        let Some(raw) = value else {
            return Ok(None);
        };
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }
        if trimmed.chars().count() > max_length {
            return Err(JobDomainError::ApplicationMessageTooLong { max: max_length });
        }
        Ok(Some(Self(trimmed.to_owned())))
    }

    /// Returns the note as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A provider's bid on a job post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobApplication {
    id: JobApplicationId,
    job_post_id: JobPostId,
    applicant_id: UserId,
    status: ApplicationStatus,
    message: Option<ApplicationMessage>,
    proposed_rate: Option<ProposedRate>,
    decided_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedJobApplicationData {
    /// Persisted identifier.
    pub id: JobApplicationId,
    /// Job post applied to.
    pub job_post_id: JobPostId,
    /// Applying provider.
    pub applicant_id: UserId,
    /// Lifecycle state.
    pub status: ApplicationStatus,
    /// Cover note.
    pub message: Option<ApplicationMessage>,
    /// Offered rate.
    pub proposed_rate: Option<ProposedRate>,
    /// When the owner or applicant decided.
    pub decided_at: Option<DateTime<Utc>>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Latest modification timestamp.
    pub updated_at: DateTime<Utc>,
}

impl JobApplication {
    /// Creates a pending application against an open job post.
    ///
    /// # Errors
    ///
    /// Returns [`JobDomainError::PostNotOpen`] unless the post is pending
    /// and [`JobDomainError::OwnJobPost`] when the owner applies.
    pub fn submit(
        post: &JobPost,
        applicant_id: UserId,
        message: Option<ApplicationMessage>,
        proposed_rate: Option<ProposedRate>,
        clock: &impl Clock,
    ) -> Result<Self, JobDomainError> {
        post.ensure_open()?;
        if post.is_owned_by(applicant_id) {
            return Err(JobDomainError::OwnJobPost {
                job_post_id: post.id(),
                user_id: applicant_id,
            });
        }

        let timestamp = clock.utc();
        Ok(Self {
            id: JobApplicationId::new(),
            job_post_id: post.id(),
            applicant_id,
            status: ApplicationStatus::Pending,
            message,
            proposed_rate,
            decided_at: None,
            created_at: timestamp,
            updated_at: timestamp,
        })
    }

    /// Reconstructs an application from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedJobApplicationData) -> Self {
        Self {
            id: data.id,
            job_post_id: data.job_post_id,
            applicant_id: data.applicant_id,
            status: data.status,
            message: data.message,
            proposed_rate: data.proposed_rate,
            decided_at: data.decided_at,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the application identifier.
    #[must_use]
    pub const fn id(&self) -> JobApplicationId {
        self.id
    }

    /// Returns the job post applied to.
    #[must_use]
    pub const fn job_post_id(&self) -> JobPostId {
        self.job_post_id
    }

    /// Returns the applying provider.
    #[must_use]
    pub const fn applicant_id(&self) -> UserId {
        self.applicant_id
    }

    /// Returns the lifecycle state.
    #[must_use]
    pub const fn status(&self) -> ApplicationStatus {
        self.status
    }

    /// Returns the cover note.
    #[must_use]
    pub const fn message(&self) -> Option<&ApplicationMessage> {
        self.message.as_ref()
    }

    /// Returns the offered rate.
    #[must_use]
    pub const fn proposed_rate(&self) -> Option<ProposedRate> {
        self.proposed_rate
    }

    /// Returns when the application left `pending`.
    #[must_use]
    pub const fn decided_at(&self) -> Option<DateTime<Utc>> {
        self.decided_at
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

    /// Checks that the application belongs to `post`.
    ///
    /// # Errors
    ///
    /// Returns [`JobDomainError::ApplicationNotOnPost`] otherwise.
    pub fn ensure_on_post(&self, post: &JobPost) -> Result<(), JobDomainError> {
        if self.job_post_id == post.id() {
            Ok(())
        } else {
            Err(JobDomainError::ApplicationNotOnPost {
                application_id: self.id,
                job_post_id: post.id(),
            })
        }
    }

    /// Declines the application on behalf of the post owner.
    ///
    /// # Errors
    ///
    /// Returns [`JobDomainError::NotOwner`] when `acting_user_id` does not
    /// own `post` and [`JobDomainError::InvalidApplicationTransition`] when
    /// the application already left `pending`.
    pub fn reject(
        &mut self,
        post: &JobPost,
        acting_user_id: UserId,
        clock: &impl Clock,
    ) -> Result<(), JobDomainError> {
        self.ensure_on_post(post)?;
        post.ensure_owner(acting_user_id)?;
        self.transition_to(ApplicationStatus::Rejected, clock.utc())
    }

    /// Retracts the application on behalf of the applicant.
    ///
    /// # Errors
    ///
    /// Returns [`JobDomainError::NotApplicant`] for other users and
    /// [`JobDomainError::InvalidApplicationTransition`] when the
    /// application already left `pending`.
    pub fn withdraw(&mut self, acting_user_id: UserId, clock: &impl Clock) -> Result<(), JobDomainError> {
        if self.applicant_id != acting_user_id {
            return Err(JobDomainError::NotApplicant {
                application_id: self.id,
                user_id: acting_user_id,
            });
        }
        self.transition_to(ApplicationStatus::Withdrawn, clock.utc())
    }

    /// Checks that `acting_user_id` may delete the application.
    ///
    /// Either party may delete while the application is still pending. A
    /// decided application stays on record so its pair keeps blocking
    /// resubmission.
    ///
    /// # Errors
    ///
    /// Returns [`JobDomainError::NotParty`] for unrelated users and
    /// [`JobDomainError::ApplicationDecided`] once the application left
    /// `pending`.
    pub fn ensure_deletable_by(&self, post: &JobPost, acting_user_id: UserId) -> Result<(), JobDomainError> {
        self.ensure_on_post(post)?;
        if self.applicant_id != acting_user_id && !post.is_owned_by(acting_user_id) {
            return Err(JobDomainError::NotParty {
                application_id: self.id,
                user_id: acting_user_id,
            });
        }
        if self.status != ApplicationStatus::Pending {
            return Err(JobDomainError::ApplicationDecided {
                application_id: self.id,
                status: self.status,
            });
        }
        Ok(())
    }

    pub(crate) fn accept_at(&mut self, at: DateTime<Utc>) -> Result<(), JobDomainError> {
        self.transition_to(ApplicationStatus::Accepted, at)
    }

    pub(crate) fn auto_reject_at(&mut self, at: DateTime<Utc>) -> Result<(), JobDomainError> {
        self.transition_to(ApplicationStatus::Rejected, at)
    }

    fn transition_to(&mut self, target: ApplicationStatus, at: DateTime<Utc>) -> Result<(), JobDomainError> {
        if !self.status.can_transition_to(target) {
            return Err(JobDomainError::InvalidApplicationTransition {
                application_id: self.id,
                from: self.status,
                to: target,
            });
        }
        self.status = target;
        self.decided_at = Some(at);
        self.updated_at = at;
        Ok(())
    }
}
