//! Domain model for job posts and the applications providers submit.
//!
//! A job post moves through `pending → confirmed → completed` (or is
//! cancelled by its owner). Applications move out of `pending` exactly once.
//! The accept cascade ties both state machines together.

mod acceptance;
mod application;
mod error;
mod ids;
mod post;

pub use acceptance::{AcceptanceDecision, AcceptanceOutcome, resolve_acceptance};
pub use application::{
    ApplicationMessage, ApplicationStatus, JobApplication, PersistedJobApplicationData,
    ProposedRate,
};
pub use error::{
    JobDomainError, ParseApplicationStatusError, ParseJobPostStatusError, ParseWorkModeError,
};
pub use ids::{JobApplicationId, JobPostId};
pub use post::{
    JobPost, JobPostDetails, JobPostRevision, JobPostStatus, PersistedJobPostData,
    ServiceCategory, WorkMode,
};
