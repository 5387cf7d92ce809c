//! Command-line interface for taskboard
//!
//! This module defines the CLI structure using clap derive macros.
//! Command implementations live in submodules.

use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDate, Utc};
use clap::{Parser, Subcommand};

use crate::actor;
use crate::board::Board;
use crate::config::Config;
use crate::dataset::Dataset;
use crate::error::{Error, Result};

mod notify;
mod task;

/// taskboard - in-memory task board
///
/// Filter, sort and summarize tasks, and simulate due-soon reminders over a
/// demo seed or a JSON dataset.
#[derive(Parser, Debug)]
#[command(name = "taskboard")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Directory holding .taskboard.toml (defaults to current directory)
    #[arg(long, global = true, env = "TASKBOARD_DIR")]
    pub dir: Option<PathBuf>,

    /// Dataset JSON file (defaults to the built-in demo seed)
    #[arg(long, global = true)]
    pub data: Option<PathBuf>,

    /// Acting user id
    #[arg(long, global = true, env = "TASKBOARD_ACTOR")]
    pub actor: Option<String>,

    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List tasks through the filter and sort pipeline
    List {
        /// Status filter (repeatable): not-started, in-progress, completed, on-hold
        #[arg(long)]
        status: Vec<String>,

        /// Priority filter (repeatable): high, medium, low
        #[arg(long)]
        priority: Vec<String>,

        /// Assignee user id filter (repeatable)
        #[arg(long)]
        assignee: Vec<String>,

        /// Only overdue tasks
        #[arg(long)]
        overdue: bool,

        /// Case-insensitive text search over title and description
        #[arg(long)]
        search: Option<String>,

        /// Earliest due date (RFC 3339 or YYYY-MM-DD), inclusive
        #[arg(long)]
        due_from: Option<String>,

        /// Latest due date (RFC 3339 or YYYY-MM-DD), inclusive
        #[arg(long)]
        due_to: Option<String>,

        /// Sort field: created_at, due_date, priority, title, status
        #[arg(long)]
        sort: Option<String>,

        /// Sort ascending
        #[arg(long, conflicts_with = "desc")]
        asc: bool,

        /// Sort descending
        #[arg(long)]
        desc: bool,

        /// Maximum number of tasks to show
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Show one task with its status history
    Show {
        /// Task id
        id: String,
    },

    /// Board-wide statistics
    Stats,

    /// List the user directory
    Users,

    /// Run one reminder scan and list notifications
    Notifications {
        /// Only unread notifications
        #[arg(long)]
        unread: bool,
    },

    /// Run the periodic reminder scan
    Watch {
        /// Seconds between scans (defaults to reminders.interval_secs)
        #[arg(long)]
        interval_secs: Option<u64>,

        /// Stop after this many scans
        #[arg(long)]
        ticks: Option<u64>,
    },

    /// Apply a JSON-lines operation script to the board
    Apply {
        /// Script path
        script: PathBuf,
    },
}

impl Commands {
    /// Subcommand name as typed on the command line.
    pub fn name(&self) -> &'static str {
        match self {
            Commands::List { .. } => "list",
            Commands::Show { .. } => "show",
            Commands::Stats => "stats",
            Commands::Users => "users",
            Commands::Notifications { .. } => "notifications",
            Commands::Watch { .. } => "watch",
            Commands::Apply { .. } => "apply",
        }
    }
}

/// Loaded configuration plus the board it configured.
pub(crate) struct Context {
    pub config: Config,
    pub board: Board,
}

pub(crate) struct ContextOptions {
    pub dir: Option<PathBuf>,
    pub data: Option<PathBuf>,
    pub actor: Option<String>,
}

pub(crate) fn load_context(options: ContextOptions) -> Result<Context> {
    let dir = match options.dir {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };
    let config = Config::load_from_dir(&dir)?;
    let dataset = match options.data.as_deref() {
        Some(path) => Dataset::load(path)?,
        None => Dataset::seed(Utc::now()),
    };
    let store = dataset
        .into_store()
        .with_id_prefix(config.tasks.id_prefix.trim());
    let actor = actor::resolve_actor(options.actor.as_deref(), &config, store.users())?;
    tracing::debug!(actor = %actor, tasks = store.len(), "board loaded");

    let board = Board::new(store, actor)
        .with_sort_options(config.view.sort_options()?)
        .with_reminder_policy(config.reminders.policy());
    Ok(Context { config, board })
}

/// Accept RFC 3339 timestamps or plain dates. Plain dates snap to the start
/// of the day, or to its last second when `end_of_day` is set.
pub(crate) fn parse_timestamp(
    flag: &str,
    value: Option<&str>,
    end_of_day: bool,
) -> Result<Option<DateTime<Utc>>> {
    let Some(raw) = value.map(str::trim).filter(|raw| !raw.is_empty()) else {
        return Ok(None);
    };
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Ok(Some(parsed.with_timezone(&Utc)));
    }
    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| {
        Error::InvalidArgument(format!(
            "--{flag}: expected RFC 3339 timestamp or YYYY-MM-DD, got '{raw}'"
        ))
    })?;
    let time = if end_of_day {
        date.and_hms_opt(23, 59, 59)
    } else {
        date.and_hms_opt(0, 0, 0)
    };
    time.map(|naive| Some(naive.and_utc()))
        .ok_or_else(|| Error::InvalidArgument(format!("--{flag}: invalid date '{raw}'")))
}

pub(crate) fn display_path(path: &Path) -> String {
    path.to_string_lossy().to_string()
}

impl Cli {
    /// Execute the CLI command
    pub fn run(self) -> Result<()> {
        let context = ContextOptions {
            dir: self.dir,
            data: self.data,
            actor: self.actor,
        };
        let json = self.json;
        let quiet = self.quiet;

        match self.command {
            Commands::List {
                status,
                priority,
                assignee,
                overdue,
                search,
                due_from,
                due_to,
                sort,
                asc,
                desc,
                limit,
            } => task::run_list(task::ListOptions {
                context,
                status,
                priority,
                assignee,
                overdue,
                search,
                due_from,
                due_to,
                sort,
                asc,
                desc,
                limit,
                json,
                quiet,
            }),
            Commands::Show { id } => task::run_show(task::ShowOptions {
                context,
                id,
                json,
                quiet,
            }),
            Commands::Stats => task::run_stats(task::StatsOptions {
                context,
                json,
                quiet,
            }),
            Commands::Users => task::run_users(task::UsersOptions {
                context,
                json,
                quiet,
            }),
            Commands::Apply { script } => task::run_apply(task::ApplyOptions {
                context,
                script,
                json,
                quiet,
            }),
            Commands::Notifications { unread } => {
                notify::run_notifications(notify::NotificationsOptions {
                    context,
                    unread,
                    json,
                    quiet,
                })
            }
            Commands::Watch {
                interval_secs,
                ticks,
            } => notify::run_watch(notify::WatchOptions {
                context,
                interval_secs,
                ticks,
                json,
                quiet,
            }),
        }
    }
}
