//! Diesel schema for job board persistence.

diesel::table! {
    /// Job posts published by requesters.
    job_posts (id) {
        /// Job post identifier.
        id -> Uuid,
        /// Requester who owns the post.
        owner_id -> Uuid,
        /// Provider assigned by an accepted application.
        assigned_user_id -> Nullable<Uuid>,
        /// Service category label.
        category -> Text,
        /// Work mode.
        #[max_length = 20]
        work_mode -> Varchar,
        /// Lifecycle state.
        #[max_length = 20]
        status -> Varchar,
        /// Short summary.
        title -> Text,
        /// Free-form description.
        description -> Nullable<Text>,
        /// City the work takes place in.
        city -> Text,
        /// Street address.
        address -> Nullable<Text>,
        /// Contact phone number.
        contact_phone -> Nullable<Text>,
        /// Requested start time.
        scheduled_for -> Nullable<Timestamptz>,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Provider applications against job posts.
    job_applications (id) {
        /// Application identifier.
        id -> Uuid,
        /// Job post applied to.
        job_post_id -> Uuid,
        /// Applying provider.
        applicant_id -> Uuid,
        /// Lifecycle state.
        #[max_length = 20]
        status -> Varchar,
        /// Cover note.
        message -> Nullable<Text>,
        /// Offered rate in minor currency units.
        proposed_rate_minor -> Nullable<Int8>,
        /// When the application left `pending`.
        decided_at -> Nullable<Timestamptz>,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::joinable!(job_applications -> job_posts (job_post_id));
diesel::allow_tables_to_appear_in_same_query!(job_posts, job_applications);
