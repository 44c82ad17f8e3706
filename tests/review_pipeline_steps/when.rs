//! When steps for review pipeline BDD scenarios.

use super::world::{PipelineWorld, doi, run_async};
use eyre::WrapErr;
use rstest_bdd_macros::when;

#[when(r#"the maintainer takes in "{id}""#)]
fn takes_in(world: &mut PipelineWorld, id: String) -> Result<(), eyre::Report> {
    let requested = [doi(&id)?];
    let report = run_async(world.curator.intake(&requested)).wrap_err("intake identifier")?;
    world.last_intake = Some(report);
    Ok(())
}

#[when("the transitions run")]
fn transitions_run(world: &mut PipelineWorld) -> Result<(), eyre::Report> {
    run_async(world.curator.apply_transitions()).wrap_err("apply transitions")?;
    Ok(())
}

#[when("the references are checked")]
fn references_checked(world: &mut PipelineWorld) -> Result<(), eyre::Report> {
    run_async(world.curator.check_references()).wrap_err("check references")?;
    Ok(())
}
