//! Shared helpers for `PostgreSQL` integration tests.
//!
//! Tests run only when `HIRELINK_TEST_DATABASE_URL` points at a database
//! the test user may create schemas in. Each test gets its own schema, so
//! tests can run in parallel against one database.

use std::sync::Arc;

use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, CustomizeConnection, Pool};
use hirelink::identity::{
    adapters::memory::InMemoryIdentityDirectory,
    domain::{Role, UserId, UserProfile},
};
use hirelink::job::{
    adapters::postgres::PostgresJobBoard,
    services::{ApplicationService, JobPostService},
};
use hirelink::messaging::{adapters::postgres::PostgresMessagingStore, services::MessageLogService};
use hirelink::notification::adapters::InMemoryNotificationSink;
use mockable::DefaultClock;
use uuid::Uuid;

/// Environment variable naming the test database.
pub const DATABASE_URL_ENV: &str = "HIRELINK_TEST_DATABASE_URL";

const JOB_BOARD_SQL: &str =
    include_str!("../../migrations/2026-10-01-000000_create_job_board/up.sql");
const MESSAGING_SQL: &str =
    include_str!("../../migrations/2026-10-01-000001_create_messaging/up.sql");

type PgPool = Pool<ConnectionManager<PgConnection>>;

/// Job post service over `PostgreSQL`.
pub type PgPosts = JobPostService<PostgresJobBoard, InMemoryIdentityDirectory, DefaultClock>;

/// Application service over `PostgreSQL`.
pub type PgApplications = ApplicationService<
    PostgresJobBoard,
    InMemoryIdentityDirectory,
    InMemoryNotificationSink,
    DefaultClock,
>;

/// Message log service over `PostgreSQL`.
pub type PgMessages = MessageLogService<
    PostgresMessagingStore,
    InMemoryIdentityDirectory,
    InMemoryNotificationSink,
    DefaultClock,
>;

#[derive(Debug)]
struct SearchPath(String);

impl CustomizeConnection<PgConnection, diesel::r2d2::Error> for SearchPath {
    fn on_acquire(&self, conn: &mut PgConnection) -> Result<(), diesel::r2d2::Error> {
        conn.batch_execute(&format!("SET search_path TO {}", self.0))
            .map_err(diesel::r2d2::Error::QueryError)
    }
}

/// A migrated schema that is dropped when the value goes out of scope.
pub struct TestDatabase {
    url: String,
    schema: String,
    pub identities: Arc<InMemoryIdentityDirectory>,
    pub sink: Arc<InMemoryNotificationSink>,
    pub board: Arc<PostgresJobBoard>,
    pub store: Arc<PostgresMessagingStore>,
    pub posts: Arc<PgPosts>,
    pub applications: Arc<PgApplications>,
    pub messages: Arc<PgMessages>,
}

impl TestDatabase {
    /// Registers a user with `role`.
    pub fn user(&self, name: &str, role: Role) -> UserId {
        let id = UserId::new();
        self.identities
            .register(UserProfile::new(id, name).with_role(role))
            .expect("register profile");
        id
    }
}

impl Drop for TestDatabase {
    fn drop(&mut self) {
        if let Ok(mut conn) = PgConnection::establish(&self.url) {
            conn.batch_execute(&format!("DROP SCHEMA IF EXISTS {} CASCADE", self.schema))
                .ok();
        }
    }
}

/// Creates a migrated schema and services over it, or `None` when no test
/// database is configured.
pub fn test_database() -> Option<TestDatabase> {
    let url = std::env::var(DATABASE_URL_ENV).ok()?;
    let schema = format!("hirelink_test_{}", Uuid::new_v4().simple());

    let mut conn = PgConnection::establish(&url).expect("connect to test database");
    conn.batch_execute(&format!("CREATE SCHEMA {schema}; SET search_path TO {schema};"))
        .expect("create test schema");
    conn.batch_execute(JOB_BOARD_SQL).expect("apply job board migration");
    conn.batch_execute(MESSAGING_SQL).expect("apply messaging migration");

    let pool: PgPool = Pool::builder()
        .max_size(8)
        .connection_customizer(Box::new(SearchPath(schema.clone())))
        .build(ConnectionManager::new(url.as_str()))
        .expect("build pool");

    let identities = Arc::new(InMemoryIdentityDirectory::new());
    let sink = Arc::new(InMemoryNotificationSink::new());
    let clock = Arc::new(DefaultClock);
    let board = Arc::new(PostgresJobBoard::new(pool.clone()));
    let store = Arc::new(PostgresMessagingStore::new(pool));

    Some(TestDatabase {
        url,
        schema,
        posts: Arc::new(JobPostService::new(
            Arc::clone(&board),
            Arc::clone(&identities),
            Arc::clone(&clock),
        )),
        applications: Arc::new(ApplicationService::new(
            Arc::clone(&board),
            Arc::clone(&identities),
            Arc::clone(&sink),
            Arc::clone(&clock),
        )),
        messages: Arc::new(MessageLogService::new(
            Arc::clone(&store),
            Arc::clone(&identities),
            Arc::clone(&sink),
            clock,
        )),
        identities,
        sink,
        board,
        store,
    })
}
