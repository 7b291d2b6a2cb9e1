//! Given steps for marketplace BDD scenarios.

use super::world::{MarketplaceWorld, run_async};
use eyre::WrapErr;
use hirelink::identity::domain::Role;
use hirelink::job::{
    domain::WorkMode,
    services::{CreateJobPostRequest, SubmitApplicationRequest},
};
use rstest_bdd_macros::given;

#[given(r#"a requester named "{name}""#)]
fn a_requester_named(world: &mut MarketplaceWorld, name: String) -> Result<(), eyre::Report> {
    world.register(&name, Role::User)?;
    Ok(())
}

#[given(r#"providers named "{first}" and "{second}""#)]
fn providers_named(
    world: &mut MarketplaceWorld,
    first: String,
    second: String,
) -> Result<(), eyre::Report> {
    world.register(&first, Role::Helper)?;
    world.register(&second, Role::Business)?;
    Ok(())
}

#[given(r#""{owner}" has posted a "{category}" job"#)]
fn has_posted_a_job(
    world: &mut MarketplaceWorld,
    owner: String,
    category: String,
) -> Result<(), eyre::Report> {
    let owner_id = world.user(&owner)?;
    let request =
        CreateJobPostRequest::new(category, WorkMode::PartTime, "Fix a leaking pipe", "Lagos");
    let post = run_async(world.posts.create(owner_id, request)).wrap_err("create job post")?;
    world.job = Some(post);
    Ok(())
}

#[given(r#""{applicant}" has applied to the job"#)]
fn has_applied(world: &mut MarketplaceWorld, applicant: String) -> Result<(), eyre::Report> {
    let applicant_id = world.user(&applicant)?;
    let job_post_id = world.job()?.id();
    let application = run_async(
        world
            .applications
            .submit(SubmitApplicationRequest::new(job_post_id, applicant_id)),
    )
    .wrap_err("submit application")?;
    world.submitted.insert(applicant, application.id());
    Ok(())
}

#[given(r#""{owner}" has accepted the application from "{applicant}""#)]
fn has_accepted(
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
