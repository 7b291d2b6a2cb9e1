//! In-memory job board for tests and embedded use.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::identity::domain::UserId;
use crate::job::{
    domain::{
        AcceptanceDecision, AcceptanceOutcome, ApplicationStatus, JobApplication,
        JobApplicationId, JobDomainError, JobPost, JobPostId, JobPostStatus, ServiceCategory,
        resolve_acceptance,
    },
    ports::{JobBoardRepository, JobRepositoryError, JobRepositoryResult},
};

/// Thread-safe in-memory job board.
///
/// Every mutation runs under one write lock, which gives the accept cascade
/// the same all-or-nothing behaviour as the `PostgreSQL` transaction.
#[derive(Debug, Clone, Default)]
pub struct InMemoryJobBoard {
    state: Arc<RwLock<BoardState>>,
}

#[derive(Debug, Default)]
struct BoardState {
    posts: HashMap<JobPostId, Sequenced<JobPost>>,
    applications: HashMap<JobApplicationId, Sequenced<JobApplication>>,
    pair_index: HashMap<(JobPostId, UserId), JobApplicationId>,
    next_seq: u64,
}

#[derive(Debug, Clone)]
struct Sequenced<T> {
    seq: u64,
    value: T,
}

impl BoardState {
    const fn next_seq(&mut self) -> u64 {
        self.next_seq += 1;
        self.next_seq
    }

    fn applications_for_post(&self, job_post_id: JobPostId) -> Vec<JobApplication> {
        let mut entries: Vec<&Sequenced<JobApplication>> = self
            .applications
            .values()
            .filter(|entry| entry.value.job_post_id() == job_post_id)
            .collect();
        entries.sort_by_key(|entry| entry.seq);
        entries.into_iter().map(|entry| entry.value.clone()).collect()
    }

    fn replace_application(&mut self, application: JobApplication) {
        if let Some(entry) = self.applications.get_mut(&application.id()) {
            entry.value = application;
        }
    }
}

impl InMemoryJobBoard {
    /// Creates an empty board.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> JobRepositoryResult<RwLockReadGuard<'_, BoardState>> {
        self.state
            .read()
            .map_err(|err| JobRepositoryError::persistence(std::io::Error::other(err.to_string())))
    }

    fn write(&self) -> JobRepositoryResult<RwLockWriteGuard<'_, BoardState>> {
        self.state
            .write()
            .map_err(|err| JobRepositoryError::persistence(std::io::Error::other(err.to_string())))
    }
}

/// Collects posts newest first, breaking timestamp ties by insertion order.
fn newest_first<'a>(posts: impl Iterator<Item = &'a Sequenced<JobPost>>) -> Vec<JobPost> {
    let mut entries: Vec<&Sequenced<JobPost>> = posts.collect();
    entries.sort_by(|left, right| {
        right
            .value
            .created_at()
            .cmp(&left.value.created_at())
            .then(right.seq.cmp(&left.seq))
    });
    entries.into_iter().map(|entry| entry.value.clone()).collect()
}

#[async_trait]
impl JobBoardRepository for InMemoryJobBoard {
    async fn store_post(&self, post: &JobPost) -> JobRepositoryResult<()> {
        let mut state = self.write()?;
        if state.posts.contains_key(&post.id()) {
            return Err(JobRepositoryError::DuplicatePost(post.id()));
        }
        let seq = state.next_seq();
        state.posts.insert(
            post.id(),
            Sequenced {
                seq,
                value: post.clone(),
            },
        );
        Ok(())
    }

    async fn update_post(
        &self,
        post: &JobPost,
        expected_status: JobPostStatus,
    ) -> JobRepositoryResult<()> {
        let mut state = self.write()?;
        let entry = state
            .posts
            .get_mut(&post.id())
            .ok_or(JobRepositoryError::PostNotFound(post.id()))?;
        if entry.value.status() != expected_status {
            return Err(JobRepositoryError::PostConflict {
                job_post_id: post.id(),
                expected: expected_status,
            });
        }
        entry.value = post.clone();
        Ok(())
    }

    async fn find_post(&self, id: JobPostId) -> JobRepositoryResult<Option<JobPost>> {
        let state = self.read()?;
        Ok(state.posts.get(&id).map(|entry| entry.value.clone()))
    }

    async fn find_posts_by_owner(&self, owner_id: UserId) -> JobRepositoryResult<Vec<JobPost>> {
        let state = self.read()?;
        Ok(newest_first(
            state
                .posts
                .values()
                .filter(|entry| entry.value.owner_id() == owner_id),
        ))
    }

    async fn find_open_posts(
        &self,
        category: Option<&ServiceCategory>,
    ) -> JobRepositoryResult<Vec<JobPost>> {
        let state = self.read()?;
        Ok(newest_first(state.posts.values().filter(|entry| {
            entry.value.status().accepts_applications()
                && category.is_none_or(|wanted| entry.value.category() == wanted)
        })))
    }

    async fn delete_post(
        &self,
        id: JobPostId,
        expected_status: JobPostStatus,
    ) -> JobRepositoryResult<()> {
        let mut state = self.write()?;
        let entry = state
            .posts
            .get(&id)
            .ok_or(JobRepositoryError::PostNotFound(id))?;
        if entry.value.status() != expected_status || entry.value.assigned_user_id().is_some() {
            return Err(JobRepositoryError::PostConflict {
                job_post_id: id,
                expected: expected_status,
            });
        }

        state.posts.remove(&id);
        state
            .applications
            .retain(|_, application| application.value.job_post_id() != id);
        state.pair_index.retain(|(post_id, _), _| *post_id != id);
        Ok(())
    }

    async fn submit_application(&self, application: &JobApplication) -> JobRepositoryResult<()> {
        let mut state = self.write()?;
        let post_id = application.job_post_id();
        let post = state
            .posts
            .get(&post_id)
            .ok_or(JobRepositoryError::PostNotFound(post_id))?;
        post.value.ensure_open()?;

        let pair = (post_id, application.applicant_id());
        if state.pair_index.contains_key(&pair) {
            return Err(JobDomainError::DuplicateApplication {
                job_post_id: post_id,
                applicant_id: application.applicant_id(),
            }
            .into());
        }

        let seq = state.next_seq();
        state.pair_index.insert(pair, application.id());
        state.applications.insert(
            application.id(),
            Sequenced {
                seq,
                value: application.clone(),
            },
        );
        Ok(())
    }

    async fn update_application(
        &self,
        application: &JobApplication,
        expected_status: ApplicationStatus,
    ) -> JobRepositoryResult<()> {
        let mut state = self.write()?;
        let entry = state
            .applications
            .get_mut(&application.id())
            .ok_or(JobRepositoryError::ApplicationNotFound(application.id()))?;
        if entry.value.status() != expected_status {
            return Err(JobRepositoryError::ApplicationConflict {
                application_id: application.id(),
                expected: expected_status,
            });
        }
        entry.value = application.clone();
        Ok(())
    }

    async fn find_application(
        &self,
        id: JobApplicationId,
    ) -> JobRepositoryResult<Option<JobApplication>> {
        let state = self.read()?;
        Ok(state.applications.get(&id).map(|entry| entry.value.clone()))
    }

    async fn find_applications_for_post(
        &self,
        job_post_id: JobPostId,
    ) -> JobRepositoryResult<Vec<JobApplication>> {
        let state = self.read()?;
        Ok(state.applications_for_post(job_post_id))
    }

    async fn find_applications_by_applicant(
        &self,
        applicant_id: UserId,
    ) -> JobRepositoryResult<Vec<JobApplication>> {
        let state = self.read()?;
        let mut entries: Vec<&Sequenced<JobApplication>> = state
            .applications
            .values()
            .filter(|entry| entry.value.applicant_id() == applicant_id)
            .collect();
        entries.sort_by(|left, right| right.seq.cmp(&left.seq));
        Ok(entries.into_iter().map(|entry| entry.value.clone()).collect())
    }

    async fn delete_application(
        &self,
        id: JobApplicationId,
        expected_status: ApplicationStatus,
    ) -> JobRepositoryResult<()> {
        let mut state = self.write()?;
        let entry = state
            .applications
            .get(&id)
            .ok_or(JobRepositoryError::ApplicationNotFound(id))?;
        if entry.value.status() != expected_status {
            return Err(JobRepositoryError::ApplicationConflict {
                application_id: id,
                expected: expected_status,
            });
        }
        let pair = (entry.value.job_post_id(), entry.value.applicant_id());
        state.applications.remove(&id);
        state.pair_index.remove(&pair);
        Ok(())
    }

    async fn accept_application(
        &self,
        decision: AcceptanceDecision,
    ) -> JobRepositoryResult<AcceptanceOutcome> {
        let mut state = self.write()?;
        let post_id = state
            .applications
            .get(&decision.application_id)
            .map(|entry| entry.value.job_post_id())
            .ok_or(JobRepositoryError::ApplicationNotFound(decision.application_id))?;
        let post = state
            .posts
            .get(&post_id)
            .map(|entry| entry.value.clone())
            .ok_or(JobRepositoryError::PostNotFound(post_id))?;

        let applications = state.applications_for_post(post_id);
        let outcome = resolve_acceptance(&post, &applications, &decision)?;

        if let Some(entry) = state.posts.get_mut(&post_id) {
            entry.value = outcome.job_post.clone();
        }
        state.replace_application(outcome.accepted.clone());
        for rejected in &outcome.auto_rejected {
            state.replace_application(rejected.clone());
        }
        Ok(outcome)
    }
}
