//! Command-line and file configuration for the `wtdn` binary.
//!
//! Settings are layered with the following priority (highest first):
//! 1. CLI arguments
//! 2. Environment variables (via clap `env` attribute)
//! 3. TOML config file (`<config dir>/wtdn/config.toml`)
//! 4. Compiled defaults

use crate::board::domain::{BoardId, TaskDomainError, TaskId, UserName};
use camino::{Utf8Path, Utf8PathBuf};
use serde::Deserialize;

/// Board identifier used when none is configured.
pub const DEFAULT_BOARD_ID: &str = "wtdn_prod";

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file.
    #[error("failed to read config file {path}: {source}")]
    ReadFile {
        /// Path that was attempted.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Failed to parse the TOML configuration.
    #[error("failed to parse config file: {0}")]
    ParseToml(#[from] toml::de::Error),

    /// The configured board identifier is not usable.
    #[error(transparent)]
    InvalidBoard(#[from] TaskDomainError),
}

/// Top-level TOML config file structure.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ConfigFile {
    board: BoardFileConfig,
}

/// `[board]` section of the config file.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct BoardFileConfig {
    id: Option<String>,
    data_dir: Option<String>,
}

/// CLI arguments for the `wtdn` binary.
#[derive(clap::Parser, Debug)]
#[command(version, about = "Shared what-to-do-next task board")]
pub struct CliArgs {
    /// Directory holding board documents.
    #[arg(short, long, env = "WTDN_DATA_DIR")]
    pub data_dir: Option<Utf8PathBuf>,

    /// Identifier of the board to operate on.
    #[arg(short, long, env = "WTDN_BOARD")]
    pub board: Option<String>,

    /// Identity of the caller.
    #[arg(short, long, env = "WTDN_USER", default_value = UserName::ANONYMOUS)]
    pub user: String,

    /// Path to config file (default: `<config dir>/wtdn/config.toml`).
    #[arg(short, long)]
    pub config: Option<Utf8PathBuf>,

    /// Log level filter (trace, debug, info, warn, error).
    #[arg(long, default_value = "info", env = "WTDN_LOG")]
    pub log_level: String,

    /// Operation to perform.
    #[command(subcommand)]
    pub command: Command,
}

/// Board operations exposed on the command line.
#[derive(clap::Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Add a task created by the caller.
    Add {
        /// Task description.
        description: String,
    },
    /// List active tasks, most votes first.
    List {
        /// Print the task list as JSON.
        #[arg(long)]
        json: bool,
    },
    /// List assigned tasks, most votes first.
    Assigned,
    /// List archived tasks.
    Archived,
    /// Show one task with its activity log.
    Show {
        /// Task identifier.
        id: TaskId,
    },
    /// Vote for a task.
    Vote {
        /// Task identifier.
        id: TaskId,
    },
    /// Take the most-voted unassigned task.
    AssignNext,
    /// Release a task you created and hold.
    Unassign {
        /// Task identifier.
        id: TaskId,
    },
    /// Mark a task as completed.
    Complete {
        /// Task identifier.
        id: TaskId,
    },
    /// Move a task into the archive.
    Archive {
        /// Task identifier.
        id: TaskId,
    },
    /// Show board counts.
    Stats,
}

/// Fully resolved configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Directory holding board documents.
    pub data_dir: Utf8PathBuf,
    /// Board to operate on.
    pub board_id: BoardId,
    /// Caller identity, as given.
    pub user: String,
    /// Log level filter string.
    pub log_level: String,
}

impl AppConfig {
    /// Load configuration by merging CLI args, env vars, and a TOML file.
    ///
    /// If `--config` is given and the file does not exist, returns an error.
    /// If no `--config` is given, the default path is tried and a missing
    /// file is treated as empty config.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the explicit config file cannot be read or
    /// parsed, or the resolved board identifier is invalid.
    pub fn load(cli: &CliArgs) -> Result<Self, ConfigError> {
        let file = load_config_file(cli.config.as_deref())?;
        Self::resolve(cli, &file)
    }

    /// Priority: CLI > file > default.
    fn resolve(cli: &CliArgs, file: &ConfigFile) -> Result<Self, ConfigError> {
        let board_id = cli
            .board
            .clone()
            .or_else(|| file.board.id.clone())
            .unwrap_or_else(|| DEFAULT_BOARD_ID.to_owned());
        let data_dir = cli
            .data_dir
            .clone()
            .or_else(|| file.board.data_dir.as_deref().map(Utf8PathBuf::from))
            .unwrap_or_else(default_data_dir);

        Ok(Self {
            data_dir,
            board_id: BoardId::new(board_id)?,
            user: cli.user.clone(),
            log_level: cli.log_level.clone(),
        })
    }
}

fn default_data_dir() -> Utf8PathBuf {
    dirs::data_dir()
        .and_then(|dir| Utf8PathBuf::from_path_buf(dir.join("wtdn")).ok())
        .unwrap_or_else(|| Utf8PathBuf::from("data"))
}

fn load_config_file(explicit_path: Option<&Utf8Path>) -> Result<ConfigFile, ConfigError> {
    if let Some(path) = explicit_path {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
            path: path.to_owned(),
            source,
        })?;
        return Ok(toml::from_str(&contents)?);
    }

    let Some(path) = dirs::config_dir()
        .and_then(|dir| Utf8PathBuf::from_path_buf(dir.join("wtdn").join("config.toml")).ok())
    else {
        return Ok(ConfigFile::default());
    };

    match std::fs::read_to_string(&path) {
        Ok(contents) => Ok(toml::from_str(&contents)?),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(ConfigFile::default()),
        Err(source) => Err(ConfigError::ReadFile { path, source }),
    }
}
