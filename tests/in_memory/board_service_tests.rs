//! In-memory integration tests for board request handling.

use std::sync::Arc;

use super::helpers::{board_id, open_service, repo};
use eyre::{ensure, eyre};
use rstest::rstest;
use wtdn::board::{
    adapters::memory::InMemoryBoardRepository,
    domain::{BoardDomainError, BoardId, TaskDomainError, TaskState},
    services::BoardServiceError,
};

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn vote_assign_and_complete_flow(
    board_id: BoardId,
    repo: Arc<InMemoryBoardRepository>,
) -> Result<(), eyre::Report> {
    let service = open_service(board_id, &repo).await?;
    let task = service.create_task("alice", "Fix bug").await?;
    service.vote("bob", task.id()).await?;
    service.vote("carol", task.id()).await?;

    let assigned = service.assign_next("dave").await?;
    ensure!(assigned.id() == task.id());
    ensure!(assigned.vote_count() == 2);
    ensure!(assigned.assignee().map(|name| name.as_str()) == Some("dave"));

    let completed = service.complete("dave", task.id()).await?;
    ensure!(completed.state() == TaskState::Completed);
    ensure!(completed.log().len() == 4);

    let again = service.complete("dave", task.id()).await;
    ensure!(
        matches!(
            again,
            Err(BoardServiceError::Domain(BoardDomainError::Task(
                TaskDomainError::AlreadyCompleted(_)
            )))
        ),
        "second completion should be rejected, got {again:?}"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn listing_orders_by_votes(
    board_id: BoardId,
    repo: Arc<InMemoryBoardRepository>,
) -> Result<(), eyre::Report> {
    let service = open_service(board_id, &repo).await?;
    let quiet = service.create_task("alice", "Write docs").await?;
    let popular = service.create_task("alice", "Fix login").await?;
    let tied = service.create_task("bob", "Tidy build").await?;
    for voter in ["bob", "carol"] {
        service.vote(voter, popular.id()).await?;
    }
    service.vote("carol", quiet.id()).await?;
    service.vote("alice", tied.id()).await?;

    let order: Vec<_> = service.tasks().await.iter().map(|task| task.id()).collect();

    ensure!(order == vec![popular.id(), quiet.id(), tied.id()]);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn board_survives_reopening(
    board_id: BoardId,
    repo: Arc<InMemoryBoardRepository>,
) -> Result<(), eyre::Report> {
    let first = open_service(board_id.clone(), &repo).await?;
    let kept = first.create_task("alice", "Fix bug").await?;
    let archived = first.create_task("bob", "Old idea").await?;
    first.vote("carol", kept.id()).await?;
    first.assign_next("dave").await?;
    first.archive("bob", archived.id()).await?;
    let before = first.snapshot().await;
    drop(first);

    let reopened = open_service(board_id, &repo).await?;

    ensure!(reopened.snapshot().await == before);
    let restored = reopened.task(kept.id()).await?;
    ensure!(restored.assignee().map(|name| name.as_str()) == Some("dave"));
    ensure!(reopened.archived_tasks().await.len() == 1);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn assign_next_reports_exhausted_board(
    board_id: BoardId,
    repo: Arc<InMemoryBoardRepository>,
) -> Result<(), eyre::Report> {
    let service = open_service(board_id, &repo).await?;
    service.create_task("alice", "Fix bug").await?;
    service.assign_next("bob").await?;

    let err = service
        .assign_next("carol")
        .await
        .err()
        .ok_or_else(|| eyre!("no task should be left to assign"))?;

    ensure!(err.to_string() == "no unassigned tasks");
    ensure!(err.status_code() == 500);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn creator_assignee_can_hand_task_back(
    board_id: BoardId,
    repo: Arc<InMemoryBoardRepository>,
) -> Result<(), eyre::Report> {
    let service = open_service(board_id, &repo).await?;
    let task = service.create_task("alice", "Fix bug").await?;
    service.assign_next("alice").await?;

    let released = service.unassign("alice", task.id()).await?;
    ensure!(released.state() == TaskState::Unassigned);

    let reassigned = service.assign_next("bob").await?;
    ensure!(reassigned.id() == task.id());
    ensure!(reassigned.log().len() == 3);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn archived_task_is_no_longer_addressable(
    board_id: BoardId,
    repo: Arc<InMemoryBoardRepository>,
) -> Result<(), eyre::Report> {
    let service = open_service(board_id, &repo).await?;
    let task = service.create_task("alice", "Fix bug").await?;
    service.archive("alice", task.id()).await?;

    let lookup = service.task(task.id()).await;
    let vote = service.vote("bob", task.id()).await;

    for result in [lookup, vote] {
        let err = result
            .err()
            .ok_or_else(|| eyre!("archived task should not be found"))?;
        ensure!(err.status_code() == 404);
    }
    ensure!(service.stats().await.archived == 1);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn assigned_listing_tracks_assignment(
    board_id: BoardId,
    repo: Arc<InMemoryBoardRepository>,
) -> Result<(), eyre::Report> {
    let service = open_service(board_id, &repo).await?;
    let first = service.create_task("alice", "Fix bug").await?;
    service.create_task("alice", "Write docs").await?;
    service.vote("bob", first.id()).await?;

    ensure!(service.assigned_tasks().await.is_empty());
    service.assign_next("carol").await?;

    let assigned = service.assigned_tasks().await;
    ensure!(assigned.len() == 1);
    ensure!(assigned.first().map(|task| task.id()) == Some(first.id()));
    Ok(())
}
