//! Diesel row models for job board persistence.

use super::schema::{job_applications, job_posts};
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Row model for job posts, used for reads, inserts, and updates.
#[derive(Debug, Clone, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = job_posts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[diesel(treat_none_as_null = true)]
pub struct JobPostRow {
    /// Job post identifier.
    pub id: uuid::Uuid,
    /// Requester who owns the post.
    pub owner_id: uuid::Uuid,
    /// Assigned provider.
    pub assigned_user_id: Option<uuid::Uuid>,
    /// Service category label.
    pub category: String,
    /// Work mode.
    pub work_mode: String,
    /// Lifecycle state.
    pub status: String,
    /// Short summary.
    pub title: String,
    /// Free-form description.
    pub description: Option<String>,
    /// City.
    pub city: String,
    /// Street address.
    pub address: Option<String>,
    /// Contact phone.
    pub contact_phone: Option<String>,
    /// Requested start time.
    pub scheduled_for: Option<DateTime<Utc>>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Row model for job applications, used for reads, inserts, and updates.
#[derive(Debug, Clone, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = job_applications)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[diesel(treat_none_as_null = true)]
pub struct JobApplicationRow {
    /// Application identifier.
    pub id: uuid::Uuid,
    /// Job post applied to.
    pub job_post_id: uuid::Uuid,
    /// Applying provider.
    pub applicant_id: uuid::Uuid,
    /// Lifecycle state.
    pub status: String,
    /// Cover note.
    pub message: Option<String>,
    /// Offered rate in minor currency units.
    pub proposed_rate_minor: Option<i64>,
    /// When the application left `pending`.
    pub decided_at: Option<DateTime<Utc>>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}
