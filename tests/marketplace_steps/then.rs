//! Then steps for marketplace BDD scenarios.

use super::world::{MarketplaceWorld, run_async};
use eyre::{WrapErr, eyre};
use rstest_bdd_macros::then;

#[then(r#"the application from "{applicant}" is "{status}""#)]
fn application_has_status(
    world: &mut MarketplaceWorld,
    applicant: String,
    status: String,
) -> Result<(), eyre::Report> {
    let applicant_id = world.user(&applicant)?;
    let applications = run_async(world.applications.list_for_applicant(applicant_id))
        .wrap_err("list applications")?;
    let application_id = world.application_of(&applicant)?;
    let application = applications
        .iter()
        .find(|application| application.id() == application_id)
        .ok_or_else(|| eyre!("application from {applicant} missing"))?;
    if application.status().as_str() != status {
        return Err(eyre!(
            "expected {applicant}'s application to be {status}, found {}",
            application.status()
        ));
    }
    Ok(())
}

#[then(r#"the job status is "{status}""#)]
fn job_has_status(world: &mut MarketplaceWorld, status: String) -> Result<(), eyre::Report> {
    let job_post_id = world.job()?.id();
    let stored = run_async(world.posts.find(job_post_id)).wrap_err("find job post")?;
    if stored.status().as_str() != status {
        return Err(eyre!("expected job to be {status}, found {}", stored.status()));
    }
    Ok(())
}

#[then(r#"the job is assigned to "{name}""#)]
fn job_is_assigned(world: &mut MarketplaceWorld, name: String) -> Result<(), eyre::Report> {
    let expected = world.user(&name)?;
    let job_post_id = world.job()?.id();
    let stored = run_async(world.posts.find(job_post_id)).wrap_err("find job post")?;
    if stored.assigned_user_id() != Some(expected) {
        return Err(eyre!(
            "expected job to be assigned to {name}, found {:?}",
            stored.assigned_user_id()
        ));
    }
    Ok(())
}

#[then(r#"the attempt fails with "{code}""#)]
fn attempt_fails_with(world: &mut MarketplaceWorld, code: String) -> Result<(), eyre::Report> {
    let actual = world
        .last_error
        .ok_or_else(|| eyre!("no failure recorded in scenario world"))?;
    if actual.as_str() != code {
        return Err(eyre!("expected failure {code}, found {actual}"));
    }
    Ok(())
}

#[then(r#"exactly one conversation joins "{first}" and "{second}""#)]
fn one_conversation_joins(
    world: &mut MarketplaceWorld,
    first: String,
    second: String,
) -> Result<(), eyre::Report> {
    let first_id = world.user(&first)?;
    let second_id = world.user(&second)?;
    let inbox = run_async(world.messages.list_conversations_for_user(first_id))
        .wrap_err("list inbox")?;
    let [summary] = inbox.as_slice() else {
        return Err(eyre!("expected one conversation, found {}", inbox.len()));
    };
    if summary.other_participant != second_id {
        return Err(eyre!("conversation does not include {second}"));
    }
    let participants = summary.conversation.participants();
    if participants.low() >= participants.high() {
        return Err(eyre!("participants are not canonically ordered"));
    }
    Ok(())
}

#[then(r#"the unread count for "{name}" is {count:u64}"#)]
fn unread_count_is(
    world: &mut MarketplaceWorld,
    name: String,
    count: u64,
) -> Result<(), eyre::Report> {
    let user_id = world.user(&name)?;
    let unread = run_async(world.messages.unread_total(user_id)).wrap_err("unread total")?;
    if unread != count {
        return Err(eyre!("expected {count} unread for {name}, found {unread}"));
    }
    Ok(())
}

#[then(r#"the message "{body}" is marked read"#)]
fn message_is_read(world: &mut MarketplaceWorld, body: String) -> Result<(), eyre::Report> {
    let message = world
        .last_fetch
        .iter()
        .find(|message| message.body().as_str() == body)
        .ok_or_else(|| eyre!("message {body} not in last fetch"))?;
    if !message.is_read() {
        return Err(eyre!("message {body} is still unread"));
    }
    Ok(())
}
