//! Messaging store behaviour against `PostgreSQL`.

use crate::postgres::helpers::test_database;
use eyre::{Result, ensure};
use hirelink::identity::domain::Role;
use hirelink::messaging::{
    domain::{Message, ParticipantPair},
    ports::{ConversationRepository, MessageRepository},
    services::SendMessageRequest,
};
use std::collections::HashSet;
use std::sync::Arc;

const RACERS: usize = 12;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn racing_first_contact_yields_one_row() -> Result<()> {
    let Some(db) = test_database() else {
        return Ok(());
    };
    let first = db.user("Ada", Role::User);
    let second = db.user("Obi", Role::Helper);

    let handles: Vec<_> = (0..RACERS)
        .map(|index| {
            let messages = Arc::clone(&db.messages);
            let (from, to) = if index % 2 == 0 { (first, second) } else { (second, first) };
            tokio::spawn(async move { messages.directory().resolve(from, to).await })
        })
        .collect();

    let mut ids = HashSet::new();
    let mut created = 0_usize;
    for handle in handles {
        let (conversation, was_created) = handle.await??;
        ids.insert(conversation.id());
        if was_created {
            created += 1;
        }
    }
    ensure!(ids.len() == 1);
    ensure!(created == 1);
    let pair = ParticipantPair::new(second, first)?;
    ensure!(db.store.find_conversation_by_pair(pair).await?.is_some());
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn fetch_marks_read_in_log_order() -> Result<()> {
    let Some(db) = test_database() else {
        return Ok(());
    };
    let sender = db.user("Chidi", Role::User);
    let recipient = db.user("Nneka", Role::Helper);
    let opened = db
        .messages
        .send(SendMessageRequest::to_user(recipient, sender, "first"))
        .await?;
    let conversation_id = opened.conversation.id();
    for body in ["second", "third"] {
        db.messages
            .send(SendMessageRequest::in_conversation(conversation_id, sender, body))
            .await?;
    }
    db.messages
        .send(SendMessageRequest::in_conversation(conversation_id, recipient, "reply"))
        .await?;

    ensure!(db.store.unread_count(conversation_id, recipient).await? == 3);
    ensure!(db.messages.unread_total(sender).await? == 1);

    let log = db
        .messages
        .list_for_conversation(conversation_id, recipient)
        .await?;
    let bodies: Vec<_> = log.iter().map(|message| message.body().as_str()).collect();
    ensure!(bodies == vec!["first", "second", "third", "reply"]);
    ensure!(log
        .iter()
        .filter(|message| message.sender_id() == sender)
        .all(Message::is_read));
    ensure!(db.messages.unread_total(recipient).await? == 0);
    ensure!(db.messages.unread_total(sender).await? == 1);

    let last = db.store.last_message(conversation_id).await?;
    ensure!(last.map(|message| message.body().as_str().to_owned()) == Some("reply".to_owned()));
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn append_bumps_activity_and_inbox_order() -> Result<()> {
    let Some(db) = test_database() else {
        return Ok(());
    };
    let me = db.user("Bisi", Role::User);
    let quiet = db.user("Quiet", Role::Helper);
    let chatty = db.user("Chatty", Role::Helper);
    db.messages
        .send(SendMessageRequest::to_user(chatty, me, "hello"))
        .await?;
    db.messages
        .send(SendMessageRequest::to_user(quiet, me, "hello"))
        .await?;
    let latest = db
        .messages
        .send(SendMessageRequest::to_user(me, chatty, "back at you"))
        .await?;

    ensure!(latest.conversation.last_activity_at() == latest.message.created_at());
    let inbox = db.messages.list_conversations_for_user(me).await?;
    let others: Vec<_> = inbox.iter().map(|summary| summary.other_participant).collect();
    ensure!(others == vec![chatty, quiet]);
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn deleting_conversation_removes_messages() -> Result<()> {
    let Some(db) = test_database() else {
        return Ok(());
    };
    let first = db.user("Tobi", Role::User);
    let second = db.user("Zara", Role::Business);
    let sent = db
        .messages
        .send(SendMessageRequest::to_user(second, first, "bye"))
        .await?;

    db.messages
        .delete_conversation(sent.conversation.id(), first)
        .await?;

    ensure!(db.store.find_message(sent.message.id()).await?.is_none());
    ensure!(db.store.find_conversation(sent.conversation.id()).await?.is_none());
    ensure!(db.messages.unread_total(second).await? == 0);
    Ok(())
}
