//! Shared world state for marketplace BDD scenarios.

use std::collections::HashMap;
use std::sync::Arc;

use eyre::eyre;
use hirelink::error::ErrorCode;
use hirelink::identity::{
    adapters::memory::InMemoryIdentityDirectory,
    domain::{Role, UserId, UserProfile},
};
use hirelink::job::{
    adapters::memory::InMemoryJobBoard,
    domain::{JobApplicationId, JobPost},
    services::{ApplicationService, JobPostService},
};
use hirelink::messaging::{
    adapters::memory::InMemoryMessagingStore, domain::Message, services::MessageLogService,
};
use hirelink::notification::adapters::InMemoryNotificationSink;
use mockable::DefaultClock;
use rstest::fixture;

/// Job post service used by the BDD world.
pub type TestPostService = JobPostService<InMemoryJobBoard, InMemoryIdentityDirectory, DefaultClock>;

/// Application service used by the BDD world.
pub type TestApplicationService = ApplicationService<
    InMemoryJobBoard,
    InMemoryIdentityDirectory,
    InMemoryNotificationSink,
    DefaultClock,
>;

/// Message log service used by the BDD world.
pub type TestMessageService = MessageLogService<
    InMemoryMessagingStore,
    InMemoryIdentityDirectory,
    InMemoryNotificationSink,
    DefaultClock,
>;

/// Scenario world for marketplace behaviour tests.
pub struct MarketplaceWorld {
    /// Registered identities.
    pub identities: Arc<InMemoryIdentityDirectory>,
    /// Job post service under test.
    pub posts: TestPostService,
    /// Application service under test.
    pub applications: TestApplicationService,
    /// Message log service under test.
    pub messages: TestMessageService,
    /// Users by scenario name.
    pub users: HashMap<String, UserId>,
    /// The job post the scenario is about.
    pub job: Option<JobPost>,
    /// Submitted applications by applicant name.
    pub submitted: HashMap<String, JobApplicationId>,
    /// Messages returned by the last conversation fetch.
    pub last_fetch: Vec<Message>,
    /// Code of the last expected failure.
    pub last_error: Option<ErrorCode>,
}

impl MarketplaceWorld {
    /// Creates a world backed by fresh in-memory adapters.
    #[must_use]
    pub fn new() -> Self {
        let identities = Arc::new(InMemoryIdentityDirectory::new());
        let board = Arc::new(InMemoryJobBoard::new());
        let sink = Arc::new(InMemoryNotificationSink::new());
        let clock = Arc::new(DefaultClock);
        Self {
            posts: JobPostService::new(
                Arc::clone(&board),
                Arc::clone(&identities),
                Arc::clone(&clock),
            ),
            applications: ApplicationService::new(
                board,
                Arc::clone(&identities),
                Arc::clone(&sink),
                Arc::clone(&clock),
            ),
            messages: MessageLogService::new(
                Arc::new(InMemoryMessagingStore::new()),
                Arc::clone(&identities),
                sink,
                clock,
            ),
            identities,
            users: HashMap::new(),
            job: None,
            submitted: HashMap::new(),
            last_fetch: Vec::new(),
            last_error: None,
        }
    }

    /// Registers a user under a scenario name.
    pub fn register(&mut self, name: &str, role: Role) -> Result<UserId, eyre::Report> {
        let id = UserId::new();
        self.identities
            .register(UserProfile::new(id, name).with_role(role))
            .map_err(|err| eyre!("register {name}: {err}"))?;
        self.users.insert(name.to_owned(), id);
        Ok(id)
    }

    /// Looks up a user registered earlier in the scenario.
    pub fn user(&self, name: &str) -> Result<UserId, eyre::Report> {
        self.users
            .get(name)
            .copied()
            .ok_or_else(|| eyre!("no user named {name} in scenario world"))
    }

    /// Returns the job post the scenario is about.
    pub fn job(&self) -> Result<&JobPost, eyre::Report> {
        self.job
            .as_ref()
            .ok_or_else(|| eyre!("no job post in scenario world"))
    }

    /// Returns the application submitted by `name`.
    pub fn application_of(&self, name: &str) -> Result<JobApplicationId, eyre::Report> {
        self.submitted
            .get(name)
            .copied()
            .ok_or_else(|| eyre!("{name} has not applied"))
    }
}

impl Default for MarketplaceWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> MarketplaceWorld {
    MarketplaceWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
