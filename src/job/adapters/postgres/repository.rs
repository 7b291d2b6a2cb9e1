//! `PostgreSQL` repository implementation for the job board.

use super::{
    models::{JobApplicationRow, JobPostRow},
    schema::{job_applications, job_posts},
};
use crate::identity::domain::UserId;
use crate::job::{
    domain::{
        AcceptanceDecision, AcceptanceOutcome, ApplicationMessage, ApplicationStatus,
        JobApplication, JobApplicationId, JobDomainError, JobPost, JobPostDetails, JobPostId,
        JobPostStatus, PersistedJobApplicationData, PersistedJobPostData, ProposedRate,
        ServiceCategory, WorkMode, resolve_acceptance,
    },
    ports::{JobBoardRepository, JobRepositoryError, JobRepositoryResult},
};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorInformation, DatabaseErrorKind, Error as DieselError};

/// `PostgreSQL` connection pool type used by the job board adapter.
pub type JobPgPool = Pool<ConnectionManager<PgConnection>>;

const APPLICATION_PAIR_CONSTRAINT: &str = "job_applications_post_applicant_unique";
const SINGLE_ACCEPTED_CONSTRAINT: &str = "job_applications_one_accepted_per_post";

/// `PostgreSQL`-backed job board.
///
/// Every write to a post or its applications first locks the job post row
/// with `SELECT ... FOR UPDATE`, so an accept never interleaves with a
/// sibling's withdraw, reject or delete.
#[derive(Debug, Clone)]
pub struct PostgresJobBoard {
    pool: JobPgPool,
}

impl PostgresJobBoard {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: JobPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> JobRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> JobRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(JobRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(JobRepositoryError::persistence)?
    }
}

#[async_trait]
impl JobBoardRepository for PostgresJobBoard {
    async fn store_post(&self, post: &JobPost) -> JobRepositoryResult<()> {
        let post_id = post.id();
        let row = to_post_row(post);
        self.run_blocking(move |connection| {
            diesel::insert_into(job_posts::table)
                .values(&row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        JobRepositoryError::DuplicatePost(post_id)
                    }
                    _ => JobRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn update_post(
        &self,
        post: &JobPost,
        expected_status: JobPostStatus,
    ) -> JobRepositoryResult<()> {
        let row = to_post_row(post);
        self.run_blocking(move |connection| write_post(connection, &row, expected_status))
            .await
    }

    async fn find_post(&self, id: JobPostId) -> JobRepositoryResult<Option<JobPost>> {
        self.run_blocking(move |connection| {
            let row = job_posts::table
                .filter(job_posts::id.eq(id.into_inner()))
                .select(JobPostRow::as_select())
                .first::<JobPostRow>(connection)
                .optional()?;
            row.map(row_to_post).transpose()
        })
        .await
    }

    async fn find_posts_by_owner(&self, owner_id: UserId) -> JobRepositoryResult<Vec<JobPost>> {
        self.run_blocking(move |connection| {
            let rows = job_posts::table
                .filter(job_posts::owner_id.eq(owner_id.into_inner()))
                .order((job_posts::created_at.desc(), job_posts::id.desc()))
                .select(JobPostRow::as_select())
                .load::<JobPostRow>(connection)?;
            rows.into_iter().map(row_to_post).collect()
        })
        .await
    }

    async fn find_open_posts(
        &self,
        category: Option<&ServiceCategory>,
    ) -> JobRepositoryResult<Vec<JobPost>> {
        let wanted = category.map(|value| value.as_str().to_owned());
        self.run_blocking(move |connection| {
            let mut query = job_posts::table
                .filter(job_posts::status.eq(JobPostStatus::Pending.as_str()))
                .into_boxed();
            if let Some(label) = wanted {
                query = query.filter(job_posts::category.eq(label));
            }
            let rows = query
                .order((job_posts::created_at.desc(), job_posts::id.desc()))
                .select(JobPostRow::as_select())
                .load::<JobPostRow>(connection)?;
            rows.into_iter().map(row_to_post).collect()
        })
        .await
    }

    async fn delete_post(
        &self,
        id: JobPostId,
        expected_status: JobPostStatus,
    ) -> JobRepositoryResult<()> {
        self.run_blocking(move |connection| {
            connection.transaction::<_, JobRepositoryError, _>(|tx| {
                let current = lock_post(tx, id)?;
                if current.status != expected_status.as_str() || current.assigned_user_id.is_some()
                {
                    return Err(JobRepositoryError::PostConflict {
                        job_post_id: id,
                        expected: expected_status,
                    });
                }
                diesel::delete(
                    job_applications::table
                        .filter(job_applications::job_post_id.eq(id.into_inner())),
                )
                .execute(tx)?;
                diesel::delete(job_posts::table.filter(job_posts::id.eq(id.into_inner())))
                    .execute(tx)?;
                Ok(())
            })
        })
        .await
    }

    async fn submit_application(&self, application: &JobApplication) -> JobRepositoryResult<()> {
        let row = to_application_row(application)?;
        let post_id = application.job_post_id();
        let applicant_id = application.applicant_id();
        self.run_blocking(move |connection| {
            connection.transaction::<_, JobRepositoryError, _>(|tx| {
                let post = row_to_post(lock_post(tx, post_id)?)?;
                post.ensure_open()?;

                let duplicate = JobDomainError::DuplicateApplication {
                    job_post_id: post_id,
                    applicant_id,
                };
                let existing: i64 = job_applications::table
                    .filter(job_applications::job_post_id.eq(post_id.into_inner()))
                    .filter(job_applications::applicant_id.eq(applicant_id.into_inner()))
                    .count()
                    .get_result(tx)?;
                if existing > 0 {
                    return Err(duplicate.into());
                }

                diesel::insert_into(job_applications::table)
                    .values(&row)
                    .execute(tx)
                    .map_err(|err| match err {
                        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, ref info)
                            if has_constraint(info.as_ref(), APPLICATION_PAIR_CONSTRAINT) =>
                        {
                            JobRepositoryError::Domain(duplicate.clone())
                        }
                        _ => JobRepositoryError::persistence(err),
                    })?;
                Ok(())
            })
        })
        .await
    }

    async fn update_application(
        &self,
        application: &JobApplication,
        expected_status: ApplicationStatus,
    ) -> JobRepositoryResult<()> {
        let row = to_application_row(application)?;
        let post_id = application.job_post_id();
        self.run_blocking(move |connection| {
            connection.transaction::<_, JobRepositoryError, _>(|tx| {
                lock_post(tx, post_id)?;
                write_application(tx, &row, expected_status)
            })
        })
        .await
    }

    async fn find_application(
        &self,
        id: JobApplicationId,
    ) -> JobRepositoryResult<Option<JobApplication>> {
        self.run_blocking(move |connection| {
            let row = job_applications::table
                .filter(job_applications::id.eq(id.into_inner()))
                .select(JobApplicationRow::as_select())
                .first::<JobApplicationRow>(connection)
                .optional()?;
            row.map(row_to_application).transpose()
        })
        .await
    }

    async fn find_applications_for_post(
        &self,
        job_post_id: JobPostId,
    ) -> JobRepositoryResult<Vec<JobApplication>> {
        self.run_blocking(move |connection| load_applications_for_post(connection, job_post_id))
            .await
    }

    async fn find_applications_by_applicant(
        &self,
        applicant_id: UserId,
    ) -> JobRepositoryResult<Vec<JobApplication>> {
        self.run_blocking(move |connection| {
            let rows = job_applications::table
                .filter(job_applications::applicant_id.eq(applicant_id.into_inner()))
                .order((
                    job_applications::created_at.desc(),
                    job_applications::id.desc(),
                ))
                .select(JobApplicationRow::as_select())
                .load::<JobApplicationRow>(connection)?;
            rows.into_iter().map(row_to_application).collect()
        })
        .await
    }

    async fn delete_application(
        &self,
        id: JobApplicationId,
        expected_status: ApplicationStatus,
    ) -> JobRepositoryResult<()> {
        self.run_blocking(move |connection| {
            connection.transaction::<_, JobRepositoryError, _>(|tx| {
                let post_uuid: uuid::Uuid = job_applications::table
                    .filter(job_applications::id.eq(id.into_inner()))
                    .select(job_applications::job_post_id)
                    .first(tx)
                    .optional()?
                    .ok_or(JobRepositoryError::ApplicationNotFound(id))?;
                lock_post(tx, JobPostId::from_uuid(post_uuid))?;

                let affected = diesel::delete(
                    job_applications::table
                        .filter(job_applications::id.eq(id.into_inner()))
                        .filter(job_applications::status.eq(expected_status.as_str())),
                )
                .execute(tx)?;
                if affected > 0 {
                    return Ok(());
                }
                if application_exists(tx, id)? {
                    Err(JobRepositoryError::ApplicationConflict {
                        application_id: id,
                        expected: expected_status,
                    })
                } else {
                    Err(JobRepositoryError::ApplicationNotFound(id))
                }
            })
        })
        .await
    }

    async fn accept_application(
        &self,
        decision: AcceptanceDecision,
    ) -> JobRepositoryResult<AcceptanceOutcome> {
        self.run_blocking(move |connection| {
            connection.transaction::<_, JobRepositoryError, _>(|tx| {
                let application_id = decision.application_id;
                let post_uuid: uuid::Uuid = job_applications::table
                    .filter(job_applications::id.eq(application_id.into_inner()))
                    .select(job_applications::job_post_id)
                    .first(tx)
                    .optional()?
                    .ok_or(JobRepositoryError::ApplicationNotFound(application_id))?;
                let post_id = JobPostId::from_uuid(post_uuid);

                let post = row_to_post(lock_post(tx, post_id)?)?;
                let applications = lock_applications_for_post(tx, post_id)?;
                let outcome = resolve_acceptance(&post, &applications, &decision)?;

                for rejected in &outcome.auto_rejected {
                    write_application(
                        tx,
                        &to_application_row(rejected)?,
                        ApplicationStatus::Pending,
                    )?;
                }
                write_application(
                    tx,
                    &to_application_row(&outcome.accepted)?,
                    ApplicationStatus::Pending,
                )
                .map_err(|err| map_single_accepted_violation(err, &post))?;
                write_post(tx, &to_post_row(&outcome.job_post), JobPostStatus::Pending)?;
                Ok(outcome)
            })
        })
        .await
    }
}

/// Reads the job post row while holding a row lock until the transaction
/// ends.
fn lock_post(connection: &mut PgConnection, id: JobPostId) -> JobRepositoryResult<JobPostRow> {
    job_posts::table
        .filter(job_posts::id.eq(id.into_inner()))
        .select(JobPostRow::as_select())
        .for_update()
        .first::<JobPostRow>(connection)
        .optional()?
        .ok_or(JobRepositoryError::PostNotFound(id))
}

/// Reads the applications on a post with row locks held until the
/// transaction ends. Callers must already hold the post lock.
fn lock_applications_for_post(
    connection: &mut PgConnection,
    job_post_id: JobPostId,
) -> JobRepositoryResult<Vec<JobApplication>> {
    let rows = job_applications::table
        .filter(job_applications::job_post_id.eq(job_post_id.into_inner()))
        .order((job_applications::created_at.asc(), job_applications::id.asc()))
        .select(JobApplicationRow::as_select())
        .for_update()
        .load::<JobApplicationRow>(connection)?;
    rows.into_iter().map(row_to_application).collect()
}

fn load_applications_for_post(
    connection: &mut PgConnection,
    job_post_id: JobPostId,
) -> JobRepositoryResult<Vec<JobApplication>> {
    let rows = job_applications::table
        .filter(job_applications::job_post_id.eq(job_post_id.into_inner()))
        .order((job_applications::created_at.asc(), job_applications::id.asc()))
        .select(JobApplicationRow::as_select())
        .load::<JobApplicationRow>(connection)?;
    rows.into_iter().map(row_to_application).collect()
}

fn write_post(
    connection: &mut PgConnection,
    row: &JobPostRow,
    expected_status: JobPostStatus,
) -> JobRepositoryResult<()> {
    let affected = diesel::update(
        job_posts::table
            .filter(job_posts::id.eq(row.id))
            .filter(job_posts::status.eq(expected_status.as_str())),
    )
    .set(row)
    .execute(connection)?;
    if affected > 0 {
        return Ok(());
    }

    let id = JobPostId::from_uuid(row.id);
    let exists: bool =
        diesel::select(diesel::dsl::exists(job_posts::table.filter(job_posts::id.eq(row.id))))
            .get_result(connection)?;
    if exists {
        Err(JobRepositoryError::PostConflict {
            job_post_id: id,
            expected: expected_status,
        })
    } else {
        Err(JobRepositoryError::PostNotFound(id))
    }
}

fn write_application(
    connection: &mut PgConnection,
    row: &JobApplicationRow,
    expected_status: ApplicationStatus,
) -> JobRepositoryResult<()> {
    let affected = diesel::update(
        job_applications::table
            .filter(job_applications::id.eq(row.id))
            .filter(job_applications::status.eq(expected_status.as_str())),
    )
    .set(row)
    .execute(connection)?;
    if affected > 0 {
        return Ok(());
    }

    let id = JobApplicationId::from_uuid(row.id);
    if application_exists(connection, id)? {
        Err(JobRepositoryError::ApplicationConflict {
            application_id: id,
            expected: expected_status,
        })
    } else {
        Err(JobRepositoryError::ApplicationNotFound(id))
    }
}

fn application_exists(
    connection: &mut PgConnection,
    id: JobApplicationId,
) -> JobRepositoryResult<bool> {
    let exists = diesel::select(diesel::dsl::exists(
        job_applications::table.filter(job_applications::id.eq(id.into_inner())),
    ))
    .get_result(connection)?;
    Ok(exists)
}

/// The partial unique index is the last line of defence against a second
/// accepted application; surface it as the post having closed.
fn map_single_accepted_violation(err: JobRepositoryError, post: &JobPost) -> JobRepositoryError {
    let JobRepositoryError::Persistence(source) = &err else {
        return err;
    };
    let violated = source
        .downcast_ref::<DieselError>()
        .is_some_and(|diesel_err| match diesel_err {
            DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
                has_constraint(info.as_ref(), SINGLE_ACCEPTED_CONSTRAINT)
            }
            _ => false,
        });
    if violated {
        JobDomainError::PostNotOpen {
            job_post_id: post.id(),
            status: JobPostStatus::Confirmed,
        }
        .into()
    } else {
        err
    }
}

fn has_constraint(info: &dyn DatabaseErrorInformation, constraint: &str) -> bool {
    info.constraint_name().is_some_and(|name| name == constraint)
}

fn to_post_row(post: &JobPost) -> JobPostRow {
    let details = post.details();
    JobPostRow {
        id: post.id().into_inner(),
        owner_id: post.owner_id().into_inner(),
        assigned_user_id: post.assigned_user_id().map(UserId::into_inner),
        category: post.category().as_str().to_owned(),
        work_mode: post.work_mode().as_str().to_owned(),
        status: post.status().as_str().to_owned(),
        title: details.title.clone(),
        description: details.description.clone(),
        city: details.city.clone(),
        address: details.address.clone(),
        contact_phone: details.contact_phone.clone(),
        scheduled_for: details.scheduled_for,
        created_at: post.created_at(),
        updated_at: post.updated_at(),
    }
}

pub(crate) fn row_to_post(row: JobPostRow) -> JobRepositoryResult<JobPost> {
    let JobPostRow {
        id,
        owner_id,
        assigned_user_id,
        category,
        work_mode,
        status,
        title,
        description,
        city,
        address,
        contact_phone,
        scheduled_for,
        created_at,
        updated_at,
    } = row;

    let status =
        JobPostStatus::try_from(status.as_str()).map_err(JobRepositoryError::persistence)?;
    let work_mode = WorkMode::try_from(work_mode.as_str()).map_err(JobRepositoryError::persistence)?;
    let category =
        ServiceCategory::new(category, usize::MAX).map_err(JobRepositoryError::persistence)?;

    Ok(JobPost::from_persisted(PersistedJobPostData {
        id: JobPostId::from_uuid(id),
        owner_id: UserId::from_uuid(owner_id),
        assigned_user_id: assigned_user_id.map(UserId::from_uuid),
        category,
        work_mode,
        status,
        details: JobPostDetails {
            title,
            description,
            city,
            address,
            contact_phone,
            scheduled_for,
        },
        created_at,
        updated_at,
    }))
}

fn to_application_row(application: &JobApplication) -> JobRepositoryResult<JobApplicationRow> {
    let proposed_rate_minor = application
        .proposed_rate()
        .map(|rate| i64::try_from(rate.minor_units()))
        .transpose()
        .map_err(JobRepositoryError::persistence)?;

    Ok(JobApplicationRow {
        id: application.id().into_inner(),
        job_post_id: application.job_post_id().into_inner(),
        applicant_id: application.applicant_id().into_inner(),
        status: application.status().as_str().to_owned(),
        message: application.message().map(|note| note.as_str().to_owned()),
        proposed_rate_minor,
        decided_at: application.decided_at(),
        created_at: application.created_at(),
        updated_at: application.updated_at(),
    })
}

pub(crate) fn row_to_application(row: JobApplicationRow) -> JobRepositoryResult<JobApplication> {
    let JobApplicationRow {
        id,
        job_post_id,
        applicant_id,
        status,
        message,
        proposed_rate_minor,
        decided_at,
        created_at,
        updated_at,
    } = row;

    let status =
        ApplicationStatus::try_from(status.as_str()).map_err(JobRepositoryError::persistence)?;
    let message =
        ApplicationMessage::parse(message, usize::MAX).map_err(JobRepositoryError::persistence)?;
    let proposed_rate = proposed_rate_minor
        .map(|minor| {
            let units = u64::try_from(minor).map_err(JobRepositoryError::persistence)?;
            ProposedRate::new(units).map_err(JobRepositoryError::persistence)
        })
        .transpose()?;

    Ok(JobApplication::from_persisted(PersistedJobApplicationData {
        id: JobApplicationId::from_uuid(id),
        job_post_id: JobPostId::from_uuid(job_post_id),
        applicant_id: UserId::from_uuid(applicant_id),
        status,
        message,
        proposed_rate,
        decided_at,
        created_at,
        updated_at,
    }))
}
