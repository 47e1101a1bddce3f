//! Command-line front end for a what-to-do-next board.
//!
//! Usage:
//!
//! ```text
//! wtdn [--data-dir <dir>] [--board <id>] [--user <name>] <command>
//! ```
//!
//! Each invocation restores the board document from the data directory,
//! runs one command as the given user and saves the board when the command
//! changed it. A missing document starts a fresh board; an unreadable one
//! aborts with a non-zero exit code.

use camino::Utf8PathBuf;
use clap::Parser;
use mockable::DefaultClock;
use serde::Serialize;
use std::fmt::Write as _;
use std::io::{self, Write as _};
use std::process::ExitCode;
use std::sync::Arc;
use thiserror::Error;
use wtdn::board::{
    adapters::file::FileBoardRepository,
    domain::{Task, TaskSnapshot},
    services::{BoardService, BoardServiceError},
};
use wtdn::config::{AppConfig, CliArgs, Command, ConfigError};

type Service = BoardService<FileBoardRepository, DefaultClock>;

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("failed to open data directory {path}: {source}")]
    DataDir {
        path: Utf8PathBuf,
        #[source]
        source: io::Error,
    },
    #[error(transparent)]
    Board(#[from] BoardServiceError),
    #[error("failed to encode output: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("failed to format output: {0}")]
    Format(#[from] std::fmt::Error),
    #[error("failed to write output: {0}")]
    Output(#[from] io::Error),
}

/// JSON shape of `wtdn list --json`.
#[derive(Debug, Serialize)]
struct TaskListView {
    tasks: Vec<TaskSnapshot>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = CliArgs::parse();

    let config = match AppConfig::load(&cli) {
        Ok(config) => config,
        Err(err) => {
            report(&CliError::from(err));
            return ExitCode::FAILURE;
        }
    };

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .init();

    match run(&config, &cli.command).await {
        Ok(output) => match io::stdout().lock().write_all(output.as_bytes()) {
            Ok(()) => ExitCode::SUCCESS,
            Err(err) => {
                report(&CliError::from(err));
                ExitCode::FAILURE
            }
        },
        Err(err) => {
            tracing::debug!(error = %err, "command failed");
            report(&err);
            ExitCode::FAILURE
        }
    }
}

fn report(err: &CliError) {
    let mut stderr = io::stderr().lock();
    if writeln!(stderr, "error: {err}").is_err() {
        tracing::error!(error = %err, "unable to report error");
    }
}

async fn run(config: &AppConfig, command: &Command) -> Result<String, CliError> {
    let repository =
        FileBoardRepository::open(&config.data_dir).map_err(|source| CliError::DataDir {
            path: config.data_dir.clone(),
            source,
        })?;
    tracing::debug!(board = %config.board_id, data_dir = %config.data_dir, "opening board");
    let service = Service::open(
        config.board_id.clone(),
        Arc::new(repository),
        Arc::new(DefaultClock),
    )
    .await?;

    execute(&service, &config.user, command).await
}

async fn execute(service: &Service, user: &str, command: &Command) -> Result<String, CliError> {
    let mut out = String::new();
    match command {
        Command::Add { description } => {
            let task = service.create_task(user, description.as_str()).await?;
            writeln!(out, "{}", task.id())?;
        }
        Command::List { json: true } => {
            let view = TaskListView {
                tasks: service.tasks().await.iter().map(Task::to_snapshot).collect(),
            };
            out = serde_json::to_string_pretty(&view)?;
            out.push('\n');
        }
        Command::List { json: false } => render_list(&mut out, &service.tasks().await)?,
        Command::Assigned => render_list(&mut out, &service.assigned_tasks().await)?,
        Command::Archived => render_list(&mut out, &service.archived_tasks().await)?,
        Command::Show { id } => render_task(&mut out, &service.task(*id).await?)?,
        Command::Vote { id } => render_line(&mut out, &service.vote(user, *id).await?)?,
        Command::AssignNext => render_line(&mut out, &service.assign_next(user).await?)?,
        Command::Unassign { id } => render_line(&mut out, &service.unassign(user, *id).await?)?,
        Command::Complete { id } => render_line(&mut out, &service.complete(user, *id).await?)?,
        Command::Archive { id } => render_line(&mut out, &service.archive(user, *id).await?)?,
        Command::Stats => {
            let stats = service.stats().await;
            writeln!(
                out,
                "active: {}\nunassigned: {}\nassigned: {}\ncompleted: {}\narchived: {}",
                stats.active, stats.unassigned, stats.assigned, stats.completed, stats.archived
            )?;
        }
    }
    Ok(out)
}

fn render_list(out: &mut String, tasks: &[Task]) -> std::fmt::Result {
    if tasks.is_empty() {
        return writeln!(out, "no tasks");
    }
    tasks.iter().try_for_each(|task| render_line(out, task))
}

fn render_line(out: &mut String, task: &Task) -> std::fmt::Result {
    let assignee = task.assignee().map_or("-", |name| name.as_str());
    writeln!(
        out,
        "{}  {:>3} votes  {:<10}  {:<12}  {}",
        task.id(),
        task.vote_count(),
        task.state().as_str(),
        assignee,
        task.description()
    )
}

fn render_task(out: &mut String, task: &Task) -> std::fmt::Result {
    writeln!(out, "{}", task.description())?;
    writeln!(out, "  id:        {}", task.id())?;
    writeln!(out, "  creator:   {}", task.creator())?;
    writeln!(out, "  created:   {}", task.created_at().to_rfc3339())?;
    writeln!(out, "  state:     {}", task.state().as_str())?;
    if let (Some(assignee), Some(at)) = (task.assignee(), task.assigned_at()) {
        writeln!(out, "  assigned:  {assignee} at {}", at.to_rfc3339())?;
    }
    if let Some(at) = task.completed_at() {
        writeln!(out, "  completed: {}", at.to_rfc3339())?;
    }
    let voters: Vec<&str> = task.voters().iter().map(|voter| voter.as_str()).collect();
    writeln!(out, "  voters:    {}", voters.join(", "))?;
    writeln!(out, "  log:")?;
    task.log()
        .iter()
        .try_for_each(|entry| writeln!(out, "    {}  {}", entry.at.to_rfc3339(), entry.message))
}
