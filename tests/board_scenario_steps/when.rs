//! When steps for board BDD scenarios.

use super::world::{BoardWorld, run_async};
use rstest_bdd_macros::when;

#[when(r#""{caller}" adds a task "{description}""#)]
fn adds_task(world: &mut BoardWorld, caller: String, description: String) {
    let result = run_async(world.service.create_task(&caller, description));
    world.record(result);
}

#[when(r#""{caller}" asks for the next task"#)]
fn asks_for_next_task(world: &mut BoardWorld, caller: String) {
    let result = run_async(world.service.assign_next(&caller));
    world.record(result);
}

#[when(r#""{caller}" votes for "{description}""#)]
fn votes_for(
    world: &mut BoardWorld,
    caller: String,
    description: String,
) -> Result<(), eyre::Report> {
    let id = world.task_id(&description)?;
    let result = run_async(world.service.vote(&caller, id));
    world.record(result);
    Ok(())
}

#[when(r#""{caller}" completes "{description}""#)]
fn completes(
    world: &mut BoardWorld,
    caller: String,
    description: String,
) -> Result<(), eyre::Report> {
    let id = world.task_id(&description)?;
    let result = run_async(world.service.complete(&caller, id));
    world.record(result);
    Ok(())
}

#[when(r#""{caller}" unassigns "{description}""#)]
fn unassigns(
    world: &mut BoardWorld,
    caller: String,
    description: String,
) -> Result<(), eyre::Report> {
    let id = world.task_id(&description)?;
    let result = run_async(world.service.unassign(&caller, id));
    world.record(result);
    Ok(())
}

#[when(r#""{caller}" archives "{description}""#)]
fn archives(
    world: &mut BoardWorld,
    caller: String,
    description: String,
) -> Result<(), eyre::Report> {
    let id = world.task_id(&description)?;
    let result = run_async(world.service.archive(&caller, id));
    world.record(result);
    Ok(())
}
