//! When steps for marketplace BDD scenarios.

use super::world::{MarketplaceWorld, run_async};
use eyre::{WrapErr, eyre};
use hirelink::error::Coded;
use hirelink::job::services::SubmitApplicationRequest;
use hirelink::messaging::services::SendMessageRequest;
use rstest_bdd_macros::when;

#[when(r#""{owner}" accepts the application from "{applicant}""#)]
fn accepts_application(
    world: &mut MarketplaceWorld,
    owner: String,
    applicant: String,
) -> Result<(), eyre::Report> {
    let owner_id = world.user(&owner)?;
    let application_id = world.application_of(&applicant)?;
    let outcome = run_async(world.applications.accept(application_id, owner_id))
        .wrap_err("accept application")?;
    world.job = Some(outcome.job_post);
    Ok(())
}

#[when(r#""{applicant}" applies to the job again"#)]
fn applies_again(world: &mut MarketplaceWorld, applicant: String) -> Result<(), eyre::Report> {
    let applicant_id = world.user(&applicant)?;
    let job_post_id = world.job()?.id();
    match run_async(
        world
            .applications
            .submit(SubmitApplicationRequest::new(job_post_id, applicant_id)),
    ) {
        Ok(application) => Err(eyre!("second application {} was accepted", application.id())),
        Err(err) => {
            world.last_error = Some(err.code());
            Ok(())
        }
    }
}

#[when(r#""{sender}" sends "{body}" to "{recipient}""#)]
fn sends_message(
    world: &mut MarketplaceWorld,
    sender: String,
    body: String,
    recipient: String,
) -> Result<(), eyre::Report> {
    let sender_id = world.user(&sender)?;
    let recipient_id = world.user(&recipient)?;
    run_async(
        world
            .messages
            .send(SendMessageRequest::to_user(recipient_id, sender_id, body)),
    )
    .wrap_err("send message")?;
    Ok(())
}

#[when(r#""{viewer}" opens the conversation with "{other}""#)]
fn opens_conversation(
    world: &mut MarketplaceWorld,
    viewer: String,
    other: String,
) -> Result<(), eyre::Report> {
    let viewer_id = world.user(&viewer)?;
    let other_id = world.user(&other)?;
    let conversation = run_async(world.messages.directory().get_or_create(viewer_id, other_id))
        .wrap_err("resolve conversation")?;
    world.last_fetch = run_async(
        world
            .messages
            .list_for_conversation(conversation.id(), viewer_id),
    )
    .wrap_err("list conversation")?;
    Ok(())
}

#[when(r#""{owner}" tries to delete the job"#)]
fn tries_to_delete(world: &mut MarketplaceWorld, owner: String) -> Result<(), eyre::Report> {
    let owner_id = world.user(&owner)?;
    let job_post_id = world.job()?.id();
    match run_async(world.posts.delete(job_post_id, owner_id)) {
        Ok(()) => Err(eyre!("assigned job post was deleted")),
        Err(err) => {
            world.last_error = Some(err.code());
            Ok(())
        }
    }
}

#[when(r#""{owner}" cancels the job"#)]
fn cancels_job(world: &mut MarketplaceWorld, owner: String) -> Result<(), eyre::Report> {
    let owner_id = world.user(&owner)?;
    let job_post_id = world.job()?.id();
    let cancelled =
        run_async(world.posts.cancel(job_post_id, owner_id)).wrap_err("cancel job post")?;
    world.job = Some(cancelled);
    Ok(())
}
