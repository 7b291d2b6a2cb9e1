//! Job board behaviour against `PostgreSQL`.

use crate::postgres::helpers::{TestDatabase, test_database};
use eyre::{Result, ensure};
use hirelink::config::MarketplaceConfig;
use hirelink::error::{Coded, ErrorCode};
use hirelink::identity::domain::{Role, UserId};
use hirelink::job::{
    domain::{ApplicationStatus, JobPost, JobPostStatus, ProposedRate, WorkMode},
    ports::{JobBoardRepository, JobRepositoryError},
    services::{CreateJobPostRequest, JobPostService, SubmitApplicationRequest},
};
use mockable::DefaultClock;
use std::sync::Arc;

const RACERS: usize = 8;

async fn open_post(db: &TestDatabase, owner: UserId) -> Result<JobPost> {
    Ok(db
        .posts
        .create(
            owner,
            CreateJobPostRequest::new("Carpentry", WorkMode::FullTime, "Build shelves", "Abuja"),
        )
        .await?)
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn pair_constraint_reports_duplicate_application() -> Result<()> {
    let Some(db) = test_database() else {
        return Ok(());
    };
    let owner = db.user("Owner", Role::User);
    let helper = db.user("Helper", Role::Helper);
    let post = open_post(&db, owner).await?;
    db.applications
        .submit(SubmitApplicationRequest::new(post.id(), helper).with_message("Ready"))
        .await?;

    let err = db
        .applications
        .submit(SubmitApplicationRequest::new(post.id(), helper))
        .await
        .expect_err("second application for the pair");
    ensure!(err.code() == ErrorCode::DuplicateApplication);
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn accept_cascade_is_stored_atomically() -> Result<()> {
    let Some(db) = test_database() else {
        return Ok(());
    };
    let owner = db.user("Owner", Role::User);
    let first = db.user("First", Role::Helper);
    let second = db.user("Second", Role::Business);
    let post = open_post(&db, owner).await?;
    let winner = db
        .applications
        .submit(SubmitApplicationRequest::new(post.id(), first).with_proposed_rate(15_000))
        .await?;
    let loser = db
        .applications
        .submit(SubmitApplicationRequest::new(post.id(), second))
        .await?;

    db.applications.accept(winner.id(), owner).await?;

    let stored_post = db.posts.find(post.id()).await?;
    ensure!(stored_post.status() == JobPostStatus::Confirmed);
    ensure!(stored_post.assigned_user_id() == Some(first));
    let stored = db.applications.list_for_post(post.id(), owner).await?;
    let ids: Vec<_> = stored.iter().map(|application| application.id()).collect();
    ensure!(ids == vec![winner.id(), loser.id()]);
    let statuses: Vec<_> = stored.iter().map(|application| application.status()).collect();
    ensure!(statuses == vec![ApplicationStatus::Accepted, ApplicationStatus::Rejected]);
    ensure!(stored.iter().all(|application| application.decided_at().is_some()));
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn racing_accepts_confirm_one_application() -> Result<()> {
    let Some(db) = test_database() else {
        return Ok(());
    };
    let owner = db.user("Owner", Role::User);
    let post = open_post(&db, owner).await?;
    let mut application_ids = Vec::with_capacity(RACERS);
    for index in 0..RACERS {
        let helper = db.user(&format!("Helper {index}"), Role::Helper);
        let application = db
            .applications
            .submit(SubmitApplicationRequest::new(post.id(), helper))
            .await?;
        application_ids.push(application.id());
    }

    let handles: Vec<_> = application_ids
        .into_iter()
        .map(|application_id| {
            let applications = Arc::clone(&db.applications);
            tokio::spawn(async move { applications.accept(application_id, owner).await })
        })
        .collect();
    let mut winners = 0_usize;
    for handle in handles {
        if handle.await?.is_ok() {
            winners += 1;
        }
    }
    ensure!(winners == 1, "expected one winner, got {winners}");

    let stored = db.applications.list_for_post(post.id(), owner).await?;
    ensure!(
        stored
            .iter()
            .filter(|application| application.status() == ApplicationStatus::Accepted)
            .count()
            == 1
    );
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn stale_status_is_a_conflict() -> Result<()> {
    let Some(db) = test_database() else {
        return Ok(());
    };
    let owner = db.user("Owner", Role::User);
    let post = open_post(&db, owner).await?;
    let mut cancelled = post.clone();
    cancelled.cancel(owner, &mockable::DefaultClock)?;

    let err = db
        .board
        .update_post(&cancelled, JobPostStatus::Confirmed)
        .await
        .expect_err("stored status is pending");
    ensure!(matches!(err, JobRepositoryError::PostConflict { .. }));
    db.board.update_post(&cancelled, JobPostStatus::Pending).await?;
    ensure!(db.posts.find(post.id()).await?.status() == JobPostStatus::Cancelled);
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn assigned_post_is_cancelled_not_deleted() -> Result<()> {
    let Some(db) = test_database() else {
        return Ok(());
    };
    let owner = db.user("Owner", Role::User);
    let helper = db.user("Helper", Role::Helper);
    let post = open_post(&db, owner).await?;
    let application = db
        .applications
        .submit(SubmitApplicationRequest::new(post.id(), helper))
        .await?;
    db.applications.accept(application.id(), owner).await?;

    let err = db
        .posts
        .delete(post.id(), owner)
        .await
        .expect_err("assigned post is locked");
    ensure!(err.code() == ErrorCode::InvalidTransition);

    let cancelled = db.posts.cancel(post.id(), owner).await?;
    ensure!(cancelled.status() == JobPostStatus::Cancelled);
    ensure!(db.posts.find(post.id()).await?.assigned_user_id().is_none());
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn accept_succeeds_while_siblings_withdraw_or_delete() -> Result<()> {
    let Some(db) = test_database() else {
        return Ok(());
    };
    let owner = db.user("Owner", Role::User);
    let first = db.user("First", Role::Helper);
    let post = open_post(&db, owner).await?;
    let winner = db
        .applications
        .submit(SubmitApplicationRequest::new(post.id(), first))
        .await?;
    let mut siblings = Vec::with_capacity(RACERS);
    for index in 0..RACERS {
        let helper = db.user(&format!("Sibling {index}"), Role::Helper);
        let application = db
            .applications
            .submit(SubmitApplicationRequest::new(post.id(), helper))
            .await?;
        siblings.push((application.id(), helper));
    }

    let accept = {
        let applications = Arc::clone(&db.applications);
        let winner_id = winner.id();
        tokio::spawn(async move { applications.accept(winner_id, owner).await })
    };
    let leavers: Vec<_> = siblings
        .iter()
        .enumerate()
        .map(|(index, &(application_id, helper))| {
            let applications = Arc::clone(&db.applications);
            tokio::spawn(async move {
                if index % 2 == 0 {
                    applications.withdraw(application_id, helper).await.map(|_| ())
                } else {
                    applications.destroy(application_id, helper).await
                }
            })
        })
        .collect();

    let outcome = accept.await??;
    ensure!(outcome.accepted.id() == winner.id());
    for leaver in leavers {
        if let Err(err) = leaver.await? {
            ensure!(err.code() == ErrorCode::InvalidTransition, "unexpected {err}");
        }
    }

    let stored = db.applications.list_for_post(post.id(), owner).await?;
    for application in &stored {
        let expected: &[ApplicationStatus] = if application.id() == winner.id() {
            &[ApplicationStatus::Accepted]
        } else {
            &[ApplicationStatus::Rejected, ApplicationStatus::Withdrawn]
        };
        ensure!(expected.contains(&application.status()));
    }
    let auto_rejected: Vec<_> = outcome.auto_rejected.iter().map(|app| app.id()).collect();
    for application in stored
        .iter()
        .filter(|application| application.status() == ApplicationStatus::Rejected)
    {
        ensure!(auto_rejected.contains(&application.id()));
    }
    ensure!(db.posts.find(post.id()).await?.assigned_user_id() == Some(first));
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn values_accepted_by_the_domain_are_storable() -> Result<()> {
    let Some(db) = test_database() else {
        return Ok(());
    };
    let config = MarketplaceConfig {
        max_category_length: 250,
        ..MarketplaceConfig::default()
    };
    let posts = JobPostService::new(
        Arc::clone(&db.board),
        Arc::clone(&db.identities),
        Arc::new(DefaultClock),
    )
    .with_config(&config);
    let owner = db.user("Owner", Role::User);
    let helper = db.user("Helper", Role::Helper);
    let category = "c".repeat(250);
    let phone = "+234 ".repeat(20);

    let post = posts
        .create(
            owner,
            CreateJobPostRequest::new(category.as_str(), WorkMode::PartTime, "Tiling", "Lagos")
                .with_contact_phone(phone.as_str()),
        )
        .await?;
    let application = db
        .applications
        .submit(
            SubmitApplicationRequest::new(post.id(), helper)
                .with_proposed_rate(ProposedRate::MAX_MINOR_UNITS),
        )
        .await?;

    let stored = db.posts.find(post.id()).await?;
    ensure!(stored.category().as_str() == category);
    ensure!(stored.details().contact_phone.as_deref() == Some(phone.as_str()));
    let listed = db.applications.list_for_post(post.id(), owner).await?;
    let Some(stored_application) = listed.iter().find(|app| app.id() == application.id()) else {
        eyre::bail!("application missing");
    };
    ensure!(
        stored_application.proposed_rate().map(ProposedRate::minor_units)
            == Some(ProposedRate::MAX_MINOR_UNITS)
    );
    Ok(())
}
