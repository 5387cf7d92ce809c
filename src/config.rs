//! Configuration loading and management
//!
//! Handles parsing of `.taskboard.toml` configuration files.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::notification::{ReminderPolicy, DEFAULT_REMINDER_LEAD_HOURS};
use crate::sort::SortOptions;
use crate::store::DEFAULT_TASK_ID_PREFIX;

pub const CONFIG_FILENAME: &str = ".taskboard.toml";

/// One leap year.
pub const MAX_REMINDER_LEAD_HOURS: i64 = 366 * 24;

/// Main configuration structure
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    /// Actor configuration
    #[serde(default)]
    pub actor: ActorConfig,

    /// Task store configuration
    #[serde(default)]
    pub tasks: TasksConfig,

    /// Reminder scan configuration
    #[serde(default)]
    pub reminders: RemindersConfig,

    /// Default view settings
    #[serde(default)]
    pub view: ViewConfig,
}

/// Actor-related configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ActorConfig {
    /// User id acting when none is specified
    #[serde(default = "default_actor")]
    pub default: String,
}

fn default_actor() -> String {
    "u-1".to_string()
}

impl Default for ActorConfig {
    fn default() -> Self {
        Self {
            default: default_actor(),
        }
    }
}

/// Task store configuration
#[derive(Debug, Clone, Deserialize)]
pub struct TasksConfig {
    /// Prefix for generated task ids
    #[serde(default = "default_task_id_prefix")]
    pub id_prefix: String,
}

fn default_task_id_prefix() -> String {
    DEFAULT_TASK_ID_PREFIX.to_string()
}

impl Default for TasksConfig {
    fn default() -> Self {
        Self {
            id_prefix: default_task_id_prefix(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RemindersConfig {
    /// Run the reminder scan at all
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Seconds between scans
    #[serde(default = "default_reminder_interval_secs")]
    pub interval_secs: u64,

    /// Remind when a task is due within this many hours
    #[serde(default = "default_reminder_lead_time_hours")]
    pub lead_time_hours: i64,
}

fn default_true() -> bool {
    true
}

fn default_reminder_interval_secs() -> u64 {
    60
}

fn default_reminder_lead_time_hours() -> i64 {
    DEFAULT_REMINDER_LEAD_HOURS
}

impl Default for RemindersConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval_secs: default_reminder_interval_secs(),
            lead_time_hours: default_reminder_lead_time_hours(),
        }
    }
}

impl RemindersConfig {
    /// Lead times past `MAX_REMINDER_LEAD_HOURS` are clamped to it.
    pub fn policy(&self) -> ReminderPolicy {
        let hours = self.lead_time_hours.min(MAX_REMINDER_LEAD_HOURS);
        let lead_time = chrono::Duration::try_hours(hours)
            .unwrap_or_else(|| chrono::Duration::hours(DEFAULT_REMINDER_LEAD_HOURS));
        ReminderPolicy::new(lead_time)
    }

    pub fn interval(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.interval_secs)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ViewConfig {
    /// created_at, due_date, priority, title or status
    #[serde(default = "default_sort_field")]
    pub sort_field: String,

    /// asc or desc
    #[serde(default = "default_sort_direction")]
    pub sort_direction: String,
}

fn default_sort_field() -> String {
    "created_at".to_string()
}

fn default_sort_direction() -> String {
    "desc".to_string()
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            sort_field: default_sort_field(),
            sort_direction: default_sort_direction(),
        }
    }
}

impl ViewConfig {
    pub fn sort_options(&self) -> Result<SortOptions> {
        SortOptions::parse(&self.sort_field, &self.sort_direction)
            .map_err(|err| Error::InvalidConfig(format!("view: {err}")))
    }
}

impl Config {
    /// Load configuration from a `.taskboard.toml` file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a directory, or return defaults when the
    /// file is absent
    pub fn load_from_dir(dir: &Path) -> Result<Self> {
        let config_path = Self::path_in(dir);
        if config_path.exists() {
            Self::load(&config_path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn path_in(dir: &Path) -> PathBuf {
        dir.join(CONFIG_FILENAME)
    }

    fn validate(&self) -> Result<()> {
        if self.actor.default.trim().is_empty() {
            return Err(Error::InvalidConfig(
                "actor.default cannot be empty".to_string(),
            ));
        }
        self.tasks.validate()?;
        self.reminders.validate()?;
        self.view.sort_options()?;
        Ok(())
    }
}

impl TasksConfig {
    fn validate(&self) -> Result<()> {
        let prefix = self.id_prefix.trim();
        if prefix.is_empty() {
            return Err(Error::InvalidConfig(
                "tasks.id_prefix cannot be empty".to_string(),
            ));
        }
        if !prefix.chars().all(|ch| ch.is_ascii_alphanumeric()) {
            return Err(Error::InvalidConfig(
                "tasks.id_prefix must be alphanumeric".to_string(),
            ));
        }
        Ok(())
    }
}

impl RemindersConfig {
    fn validate(&self) -> Result<()> {
        if self.interval_secs == 0 {
            return Err(Error::InvalidConfig(
                "reminders.interval_secs must be > 0".to_string(),
            ));
        }
        if self.lead_time_hours <= 0 {
            return Err(Error::InvalidConfig(
                "reminders.lead_time_hours must be > 0".to_string(),
            ));
        }
        if self.lead_time_hours > MAX_REMINDER_LEAD_HOURS {
            return Err(Error::InvalidConfig(format!(
                "reminders.lead_time_hours must be <= {MAX_REMINDER_LEAD_HOURS}"
            )));
        }
        Ok(())
    }
}
