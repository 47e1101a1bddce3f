//! Then steps for board BDD scenarios.

use super::world::{BoardWorld, run_async};
use rstest_bdd_macros::then;
use wtdn::board::{
    domain::{BoardDomainError, Task, TaskDomainError, TaskState},
    services::BoardServiceError,
};

fn last_result(world: &BoardWorld) -> Result<&Result<Task, BoardServiceError>, eyre::Report> {
    world
        .last_result
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing request result"))
}

fn current_task(world: &BoardWorld, description: &str) -> Result<Task, eyre::Report> {
    let id = world.task_id(description)?;
    Ok(run_async(world.service.task(id))?)
}

#[then("the request succeeds")]
fn request_succeeds(world: &BoardWorld) -> Result<(), eyre::Report> {
    match last_result(world)? {
        Ok(_) => Ok(()),
        Err(err) => Err(eyre::eyre!("expected success, got {err}")),
    }
}

#[then("the request fails because the task is already completed")]
fn fails_already_completed(world: &BoardWorld) -> Result<(), eyre::Report> {
    let result = last_result(world)?;
    eyre::ensure!(
        matches!(
            result,
            Err(BoardServiceError::Domain(BoardDomainError::Task(
                TaskDomainError::AlreadyCompleted(_)
            )))
        ),
        "expected AlreadyCompleted error, got {result:?}"
    );
    Ok(())
}

#[then("the request fails because no task is unassigned")]
fn fails_no_eligible_task(world: &BoardWorld) -> Result<(), eyre::Report> {
    let result = last_result(world)?;
    eyre::ensure!(
        matches!(
            result,
            Err(BoardServiceError::Domain(BoardDomainError::NoEligibleTask))
        ),
        "expected NoEligibleTask error, got {result:?}"
    );
    Ok(())
}

#[then("the request fails because the task is not found")]
fn fails_not_found(world: &BoardWorld) -> Result<(), eyre::Report> {
    let result = last_result(world)?;
    eyre::ensure!(
        matches!(
            result,
            Err(BoardServiceError::Domain(BoardDomainError::NotFound(_)))
        ),
        "expected NotFound error, got {result:?}"
    );
    Ok(())
}

#[then("the request fails because the caller is anonymous")]
fn fails_anonymous(world: &BoardWorld) -> Result<(), eyre::Report> {
    let result = last_result(world)?;
    eyre::ensure!(
        matches!(result, Err(BoardServiceError::AnonymousCaller)),
        "expected AnonymousCaller error, got {result:?}"
    );
    Ok(())
}

#[then("the request fails because the caller is not allowed")]
fn fails_forbidden(world: &BoardWorld) -> Result<(), eyre::Report> {
    let result = last_result(world)?;
    eyre::ensure!(
        matches!(
            result,
            Err(BoardServiceError::Domain(BoardDomainError::Task(
                TaskDomainError::Forbidden { .. }
            )))
        ),
        "expected Forbidden error, got {result:?}"
    );
    Ok(())
}

#[then(r#""{description}" is assigned to "{assignee}""#)]
fn is_assigned_to(
    world: &BoardWorld,
    description: String,
    assignee: String,
) -> Result<(), eyre::Report> {
    let task = current_task(world, &description)?;
    let actual = task.assignee().map(|name| name.as_str());
    eyre::ensure!(
        actual == Some(assignee.as_str()),
        "expected {description:?} assigned to {assignee}, found {actual:?}"
    );
    Ok(())
}

#[then(r#""{description}" has {votes:usize} votes"#)]
fn has_votes(world: &BoardWorld, description: String, votes: usize) -> Result<(), eyre::Report> {
    let task = current_task(world, &description)?;
    eyre::ensure!(
        task.vote_count() == votes,
        "expected {votes} votes, found {}",
        task.vote_count()
    );
    Ok(())
}

#[then(r#""{description}" is completed"#)]
fn is_completed(world: &BoardWorld, description: String) -> Result<(), eyre::Report> {
    let task = current_task(world, &description)?;
    eyre::ensure!(
        task.state() == TaskState::Completed,
        "expected completed, found {}",
        task.state().as_str()
    );
    Ok(())
}

#[then("the board lists {count:usize} active tasks")]
fn board_lists_active(world: &BoardWorld, count: usize) -> Result<(), eyre::Report> {
    let listed = run_async(world.service.tasks()).len();
    eyre::ensure!(listed == count, "expected {count} active tasks, found {listed}");
    Ok(())
}
