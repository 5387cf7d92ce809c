//! Error types for taskboard
//!
//! Exit codes:
//! - 0: Success
//! - 2: User error (bad args, unknown ids, invalid filters or config)
//! - 4: Operation failed (I/O, malformed data files)

use std::path::PathBuf;
use thiserror::Error;

/// Exit codes for the taskboard CLI
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const USER_ERROR: i32 = 2;
    pub const OPERATION_FAILED: i32 = 4;
}

/// Main error type for taskboard operations
#[derive(Error, Debug)]
pub enum Error {
    // User errors (exit code 2)
    #[error("Task not found: {0}")]
    TaskNotFound(String),

    #[error("Notification not found: {0}")]
    NotificationNotFound(String),

    #[error("Unknown user: {0}")]
    UnknownUser(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid filter: {0}")]
    InvalidFilter(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // Operation failures (exit code 4)
    #[error("Invalid data in {path}: {message}")]
    InvalidData { path: PathBuf, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
}

impl Error {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::TaskNotFound(_)
            | Error::NotificationNotFound(_)
            | Error::UnknownUser(_)
            | Error::InvalidArgument(_)
            | Error::InvalidFilter(_)
            | Error::InvalidConfig(_) => exit_codes::USER_ERROR,

            Error::InvalidData { .. }
            | Error::Io(_)
            | Error::Json(_)
            | Error::TomlParse(_) => exit_codes::OPERATION_FAILED,
        }
    }

    /// Structured context attached to JSON error output.
    pub fn details(&self) -> Option<serde_json::Value> {
        match self {
            Error::TaskNotFound(id) => Some(serde_json::json!({ "task_id": id })),
            Error::NotificationNotFound(id) => {
                Some(serde_json::json!({ "notification_id": id }))
            }
            Error::UnknownUser(id) => Some(serde_json::json!({ "user_id": id })),
            Error::InvalidData { path, .. } => {
                Some(serde_json::json!({ "path": path.to_string_lossy() }))
            }
            _ => None,
        }
    }

    /// Stable machine-readable category for JSON error output.
    pub fn kind(&self) -> &'static str {
        match self {
            Error::TaskNotFound(_) | Error::NotificationNotFound(_) => "not_found",
            Error::UnknownUser(_) => "unknown_user",
            Error::InvalidArgument(_) => "invalid_argument",
            Error::InvalidFilter(_) => "invalid_filter",
            Error::InvalidConfig(_) | Error::TomlParse(_) => "invalid_config",
            Error::InvalidData { .. } | Error::Json(_) => "invalid_data",
            Error::Io(_) => "io",
        }
    }
}

/// Result type alias for taskboard operations
pub type Result<T> = std::result::Result<T, Error>;
