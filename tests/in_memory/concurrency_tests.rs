//! Racing callers against the in-memory adapters.

use crate::in_memory::helpers::{Marketplace, marketplace};
use eyre::{Result, ensure};
use hirelink::error::{Coded, ErrorCode};
use hirelink::identity::domain::{Role, UserId};
use hirelink::job::{domain::ApplicationStatus, services::SubmitApplicationRequest};
use hirelink::messaging::{
    domain::ParticipantPair, ports::ConversationRepository, services::SendMessageRequest,
};
use rstest::rstest;
use std::collections::HashSet;
use std::sync::Arc;

const RACERS: usize = 16;

#[rstest]
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_accepts_leave_one_winner(marketplace: Marketplace) -> Result<()> {
    let owner = marketplace.user("Owner", Role::User);
    let post = marketplace.post(owner).await;
    let mut application_ids = Vec::with_capacity(RACERS);
    for index in 0..RACERS {
        let helper = marketplace.user(&format!("Helper {index}"), Role::Helper);
        let application = marketplace
            .applications
            .submit(SubmitApplicationRequest::new(post.id(), helper))
            .await?;
        application_ids.push(application.id());
    }

    let handles: Vec<_> = application_ids
        .iter()
        .map(|application_id| {
            let applications = Arc::clone(&marketplace.applications);
            let id = *application_id;
            tokio::spawn(async move { applications.accept(id, owner).await })
        })
        .collect();

    let mut winners = 0_usize;
    for handle in handles {
        match handle.await? {
            Ok(_) => winners += 1,
            Err(err) => ensure!(
                matches!(err.code(), ErrorCode::PostNotOpen | ErrorCode::InvalidTransition),
                "unexpected failure: {err}"
            ),
        }
    }
    ensure!(winners == 1, "expected one winner, got {winners}");

    let stored = marketplace.applications.list_for_post(post.id(), owner).await?;
    let accepted = stored
        .iter()
        .filter(|application| application.status() == ApplicationStatus::Accepted)
        .count();
    ensure!(accepted == 1);
    ensure!(stored
        .iter()
        .all(|application| application.status() != ApplicationStatus::Pending));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_first_contact_creates_one_conversation(
    marketplace: Marketplace,
) -> Result<()> {
    let first = marketplace.user("Ama", Role::User);
    let second = marketplace.user("Kwame", Role::Helper);

    let handles: Vec<_> = (0..RACERS)
        .map(|index| {
            let messages = Arc::clone(&marketplace.messages);
            let (from, to) = if index % 2 == 0 { (first, second) } else { (second, first) };
            tokio::spawn(async move { messages.directory().get_or_create(from, to).await })
        })
        .collect();

    let mut ids = HashSet::new();
    for handle in handles {
        ids.insert(handle.await??.id());
    }
    ensure!(ids.len() == 1);

    let pair = ParticipantPair::new(first, second)?;
    let stored = marketplace.store.find_conversation_by_pair(pair).await?;
    ensure!(stored.map(|conversation| conversation.id()) == ids.into_iter().next());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_sends_keep_every_message(marketplace: Marketplace) -> Result<()> {
    let first = marketplace.user("Efua", Role::User);
    let second = marketplace.user("Yaw", Role::Business);

    let handles: Vec<_> = (0..RACERS)
        .map(|index| {
            let messages = Arc::clone(&marketplace.messages);
            tokio::spawn(async move {
                messages
                    .send(SendMessageRequest::to_user(second, first, format!("message {index}")))
                    .await
            })
        })
        .collect();

    let mut created = 0_usize;
    for handle in handles {
        if handle.await??.created_conversation {
            created += 1;
        }
    }
    ensure!(created == 1);
    ensure!(marketplace.messages.unread_total(second).await? == u64::try_from(RACERS)?);
    ensure!(marketplace.messages.unread_total(UserId::new()).await? == 0);
    Ok(())
}
