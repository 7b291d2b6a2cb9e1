//! Job post lifecycle and accept cascade through the services.

use crate::in_memory::helpers::{Marketplace, marketplace};
use eyre::{Result, ensure};
use hirelink::error::{Coded, ErrorCode};
use hirelink::identity::domain::Role;
use hirelink::job::{
    domain::{ApplicationStatus, JobPostStatus},
    services::SubmitApplicationRequest,
};
use rstest::rstest;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn accept_leaves_decided_siblings_untouched(marketplace: Marketplace) -> Result<()> {
    let owner = marketplace.user("Owner", Role::User);
    let post = marketplace.post(owner).await;
    let winner = marketplace.user("Winner", Role::Helper);
    let pending = marketplace.user("Pending", Role::Helper);
    let withdrawn = marketplace.user("Withdrawn", Role::Business);
    let rejected = marketplace.user("Rejected", Role::Helper);

    let mut submitted = Vec::new();
    for applicant in [winner, pending, withdrawn, rejected] {
        let application = marketplace
            .applications
            .submit(SubmitApplicationRequest::new(post.id(), applicant))
            .await?;
        submitted.push(application);
    }
    let [winning, pending_app, withdrawn_app, rejected_app] = submitted.as_slice() else {
        eyre::bail!("expected four applications");
    };
    let withdrawn_before = marketplace
        .applications
        .withdraw(withdrawn_app.id(), withdrawn)
        .await?;
    let rejected_before = marketplace.applications.reject(rejected_app.id(), owner).await?;

    let outcome = marketplace.applications.accept(winning.id(), owner).await?;

    ensure!(outcome.job_post.status() == JobPostStatus::Confirmed);
    ensure!(outcome.job_post.assigned_user_id() == Some(winner));
    ensure!(outcome.auto_rejected.len() == 1);
    let stored = marketplace.applications.list_for_post(post.id(), owner).await?;
    for application in &stored {
        let expected = if application.id() == winning.id() {
            ApplicationStatus::Accepted
        } else if application.id() == pending_app.id() {
            ApplicationStatus::Rejected
        } else if application.id() == withdrawn_app.id() {
            ensure!(application.updated_at() == withdrawn_before.updated_at());
            ApplicationStatus::Withdrawn
        } else {
            ensure!(application.updated_at() == rejected_before.updated_at());
            ApplicationStatus::Rejected
        };
        ensure!(application.status() == expected);
    }
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn withdrawn_applicant_cannot_resubmit(marketplace: Marketplace) -> Result<()> {
    let owner = marketplace.user("Owner", Role::User);
    let post = marketplace.post(owner).await;
    let helper = marketplace.user("Helper", Role::Helper);
    let application = marketplace
        .applications
        .submit(SubmitApplicationRequest::new(post.id(), helper))
        .await?;
    marketplace.applications.withdraw(application.id(), helper).await?;

    let err = marketplace
        .applications
        .submit(SubmitApplicationRequest::new(post.id(), helper))
        .await
        .expect_err("pair already used");
    ensure!(err.code() == ErrorCode::DuplicateApplication);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn rejected_applicant_cannot_delete_and_resubmit(marketplace: Marketplace) -> Result<()> {
    let owner = marketplace.user("Owner", Role::User);
    let post = marketplace.post(owner).await;
    let helper = marketplace.user("Helper", Role::Helper);
    let application = marketplace
        .applications
        .submit(SubmitApplicationRequest::new(post.id(), helper))
        .await?;
    marketplace.applications.reject(application.id(), owner).await?;

    let destroy_err = marketplace
        .applications
        .destroy(application.id(), helper)
        .await
        .expect_err("rejected application stays on record");
    ensure!(destroy_err.code() == ErrorCode::InvalidTransition);

    let submit_err = marketplace
        .applications
        .submit(SubmitApplicationRequest::new(post.id(), helper))
        .await
        .expect_err("pair still used");
    ensure!(submit_err.code() == ErrorCode::DuplicateApplication);

    let stored = marketplace.applications.list_for_post(post.id(), owner).await?;
    ensure!(stored.len() == 1);
    ensure!(stored.iter().all(|app| app.status() == ApplicationStatus::Rejected));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn deleted_application_frees_the_pair(marketplace: Marketplace) -> Result<()> {
    let owner = marketplace.user("Owner", Role::User);
    let post = marketplace.post(owner).await;
    let helper = marketplace.user("Helper", Role::Helper);
    let application = marketplace
        .applications
        .submit(SubmitApplicationRequest::new(post.id(), helper))
        .await?;
    marketplace.applications.destroy(application.id(), helper).await?;

    let again = marketplace
        .applications
        .submit(SubmitApplicationRequest::new(post.id(), helper))
        .await?;
    ensure!(again.id() != application.id());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn owner_cannot_apply_to_own_post(marketplace: Marketplace) -> Result<()> {
    let owner = marketplace.user("Owner", Role::Business);
    let post = marketplace.post(owner).await;

    let err = marketplace
        .applications
        .submit(SubmitApplicationRequest::new(post.id(), owner))
        .await
        .expect_err("own post");
    ensure!(err.code() == ErrorCode::Forbidden);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn cancelled_post_clears_assignee_and_closes(marketplace: Marketplace) -> Result<()> {
    let owner = marketplace.user("Owner", Role::User);
    let post = marketplace.post(owner).await;
    let helper = marketplace.user("Helper", Role::Helper);
    let application = marketplace
        .applications
        .submit(SubmitApplicationRequest::new(post.id(), helper))
        .await?;
    marketplace.applications.accept(application.id(), owner).await?;

    let cancelled = marketplace.posts.cancel(post.id(), owner).await?;
    ensure!(cancelled.status() == JobPostStatus::Cancelled);
    ensure!(cancelled.assigned_user_id().is_none());

    let err = marketplace
        .posts
        .mark_completed(post.id(), owner)
        .await
        .expect_err("cancelled is terminal");
    ensure!(err.code() == ErrorCode::InvalidTransition);
    ensure!(marketplace.posts.list_open(None).await?.is_empty());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn owner_listing_is_newest_first(marketplace: Marketplace) -> Result<()> {
    let owner = marketplace.user("Owner", Role::User);
    let older = marketplace.post(owner).await;
    let newer = marketplace.post(owner).await;

    let listed = marketplace.posts.list_for_owner(owner).await?;
    let ids: Vec<_> = listed.iter().map(|post| post.id()).collect();
    ensure!(ids == vec![newer.id(), older.id()]);
    Ok(())
}
