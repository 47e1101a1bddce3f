//! Concurrent callers against one board.

use std::sync::Arc;

use super::helpers::{TestService, board_id, open_service, repo};
use eyre::ensure;
use rstest::rstest;
use tokio::task::JoinSet;
use wtdn::board::{
    adapters::memory::InMemoryBoardRepository,
    domain::{BoardDomainError, BoardId},
    services::BoardServiceError,
};

const CALLERS: usize = 16;

async fn shared_service(
    board_id: BoardId,
    repo: &Arc<InMemoryBoardRepository>,
) -> Result<Arc<TestService>, eyre::Report> {
    Ok(Arc::new(open_service(board_id, repo).await?))
}

#[rstest]
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn only_one_caller_wins_the_last_task(
    board_id: BoardId,
    repo: Arc<InMemoryBoardRepository>,
) -> Result<(), eyre::Report> {
    let service = shared_service(board_id, &repo).await?;
    let task = service.create_task("alice", "Fix bug").await?;

    let mut callers = JoinSet::new();
    for index in 0..CALLERS {
        let caller = Arc::clone(&service);
        callers.spawn(async move { caller.assign_next(&format!("user{index}")).await });
    }

    let mut winners = Vec::new();
    while let Some(joined) = callers.join_next().await {
        match joined? {
            Ok(assigned) => winners.push(assigned),
            Err(BoardServiceError::Domain(BoardDomainError::NoEligibleTask)) => {}
            Err(other) => return Err(other.into()),
        }
    }

    ensure!(winners.len() == 1, "expected one winner, got {}", winners.len());
    let stored = service.task(task.id()).await?;
    ensure!(stored.assignee() == winners.first().and_then(|task| task.assignee()));
    ensure!(stored.log().len() == 1);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_votes_are_all_recorded(
    board_id: BoardId,
    repo: Arc<InMemoryBoardRepository>,
) -> Result<(), eyre::Report> {
    let service = shared_service(board_id.clone(), &repo).await?;
    let task = service.create_task("alice", "Fix bug").await?;

    let mut voters = JoinSet::new();
    for index in 0..CALLERS {
        let voter = Arc::clone(&service);
        let id = task.id();
        voters.spawn(async move { voter.vote(&format!("voter{index}"), id).await });
    }
    while let Some(joined) = voters.join_next().await {
        joined??;
    }

    let voted = service.task(task.id()).await?;
    ensure!(voted.vote_count() == CALLERS);
    ensure!(voted.log().len() == CALLERS);
    let stored = repo
        .stored(&board_id)?
        .ok_or_else(|| eyre::eyre!("board should be stored"))?;
    ensure!(stored == service.snapshot().await);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn each_caller_gets_a_distinct_task(
    board_id: BoardId,
    repo: Arc<InMemoryBoardRepository>,
) -> Result<(), eyre::Report> {
    let service = shared_service(board_id, &repo).await?;
    for index in 0..CALLERS {
        service.create_task("alice", format!("Task {index}")).await?;
    }

    let mut callers = JoinSet::new();
    for index in 0..CALLERS {
        let caller = Arc::clone(&service);
        callers.spawn(async move { caller.assign_next(&format!("user{index}")).await });
    }
    let mut claimed = Vec::new();
    while let Some(joined) = callers.join_next().await {
        claimed.push(joined??.id());
    }
    claimed.sort_by_key(|id| id.into_inner());
    claimed.dedup();

    ensure!(claimed.len() == CALLERS);
    ensure!(service.stats().await.unassigned == 0);
    Ok(())
}
