//! Shared test helpers for in-memory integration tests.

use std::sync::Arc;

use hirelink::identity::{
    adapters::memory::InMemoryIdentityDirectory,
    domain::{Role, UserId, UserProfile},
};
use hirelink::job::{
    adapters::memory::InMemoryJobBoard,
    domain::{JobPost, WorkMode},
    services::{ApplicationService, CreateJobPostRequest, JobPostService},
};
use hirelink::messaging::{
    adapters::memory::InMemoryMessagingStore, services::MessageLogService,
};
use hirelink::notification::adapters::InMemoryNotificationSink;
use mockable::DefaultClock;
use rstest::fixture;

/// Job post service over in-memory adapters.
pub type Posts = JobPostService<InMemoryJobBoard, InMemoryIdentityDirectory, DefaultClock>;

/// Application service over in-memory adapters.
pub type Applications = ApplicationService<
    InMemoryJobBoard,
    InMemoryIdentityDirectory,
    InMemoryNotificationSink,
    DefaultClock,
>;

/// Message log service over in-memory adapters.
pub type Messages = MessageLogService<
    InMemoryMessagingStore,
    InMemoryIdentityDirectory,
    InMemoryNotificationSink,
    DefaultClock,
>;

/// Every service wired to one set of in-memory adapters.
pub struct Marketplace {
    pub identities: Arc<InMemoryIdentityDirectory>,
    pub sink: Arc<InMemoryNotificationSink>,
    pub store: Arc<InMemoryMessagingStore>,
    pub posts: Arc<Posts>,
    pub applications: Arc<Applications>,
    pub messages: Arc<Messages>,
}

impl Marketplace {
    /// Registers a user with `role`.
    pub fn user(&self, name: &str, role: Role) -> UserId {
        let id = UserId::new();
        self.identities
            .register(UserProfile::new(id, name).with_role(role))
            .expect("register profile");
        id
    }

    /// Publishes a pending post owned by `owner`.
    pub async fn post(&self, owner: UserId) -> JobPost {
        self.posts
            .create(
                owner,
                CreateJobPostRequest::new("Gardening", WorkMode::PartTime, "Trim hedges", "Kumasi"),
            )
            .await
            .expect("create post")
    }
}

/// Provides a fresh marketplace for each test.
#[fixture]
pub fn marketplace() -> Marketplace {
    let identities = Arc::new(InMemoryIdentityDirectory::new());
    let sink = Arc::new(InMemoryNotificationSink::new());
    let board = Arc::new(InMemoryJobBoard::new());
    let store = Arc::new(InMemoryMessagingStore::new());
    let clock = Arc::new(DefaultClock);

    Marketplace {
        posts: Arc::new(JobPostService::new(
            Arc::clone(&board),
            Arc::clone(&identities),
            Arc::clone(&clock),
        )),
        applications: Arc::new(ApplicationService::new(
            board,
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
        store,
    }
}
