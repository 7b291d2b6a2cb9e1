//! Application services for job posts and applications.

mod applications;
mod error;
mod posts;

pub use applications::{ApplicationService, SubmitApplicationRequest};
pub use error::{JobServiceError, JobServiceResult};
pub use posts::{CreateJobPostRequest, JobPostService, ReviewEligibility, UpdateJobPostRequest};
