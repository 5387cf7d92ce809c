//! Board operation scripts.
//!
//! Scripts are JSON lines, one operation per line, tagged by `op`:
//!
//! ```text
//! {"op":"create","draft":{"title":"Call Northwind","assigneeId":"u-2"}}
//! {"op":"update","id":"task-1","patch":{"status":"Completed"}}
//! {"op":"delete","id":"task-3"}
//! {"op":"tick"}
//! ```
//!
//! Blank lines and lines starting with `#` are ignored.

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::error::{Error, Result};
use crate::model::{TaskDraft, TaskPatch};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Operation {
    Create { draft: TaskDraft },
    Update { id: String, patch: TaskPatch },
    Delete { id: String },
    MarkRead { id: String },
    MarkAllRead,
    Tick,
}

impl Operation {
    pub fn name(&self) -> &'static str {
        match self {
            Operation::Create { .. } => "create",
            Operation::Update { .. } => "update",
            Operation::Delete { .. } => "delete",
            Operation::MarkRead { .. } => "mark_read",
            Operation::MarkAllRead => "mark_all_read",
            Operation::Tick => "tick",
        }
    }
}

/// What a single operation did, for reporting.
#[derive(Debug, Clone, Serialize)]
pub struct OperationResult {
    pub op: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_id: Option<String>,
    /// Whether the operation changed anything.
    pub applied: bool,
    pub notifications_created: usize,
}

pub fn parse_script(content: &str) -> Result<Vec<Operation>> {
    let mut ops = Vec::new();
    for (index, line) in content.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let op: Operation = serde_json::from_str(trimmed).map_err(|err| {
            Error::InvalidArgument(format!("script line {}: {err}", index + 1))
        })?;
        ops.push(op);
    }
    Ok(ops)
}

pub fn load_script(path: &Path) -> Result<Vec<Operation>> {
    let content = std::fs::read_to_string(path)?;
    parse_script(&content)
}

/// Apply operations in order, stopping at the first failure.
pub fn apply(
    board: &mut Board,
    ops: Vec<Operation>,
    now: DateTime<Utc>,
) -> Result<Vec<OperationResult>> {
    let mut results = Vec::with_capacity(ops.len());
    for op in ops {
        let name = op.name();
        let before = board.notification_log().len();
        let (task_id, applied) = match op {
            Operation::Create { draft } => {
                let task = board.create_task_at(draft, now)?;
                (Some(task.id), true)
            }
            Operation::Update { id, patch } => {
                let task = board.update_task_at(&id, patch, now)?;
                (Some(task.id), true)
            }
            Operation::Delete { id } => {
                let removed = board.delete_task(&id).is_some();
                (Some(id), removed)
            }
            Operation::MarkRead { id } => {
                board.mark_notification_as_read(&id)?;
                (None, true)
            }
            Operation::MarkAllRead => {
                let flipped = board.mark_all_notifications_as_read();
                (None, flipped > 0)
            }
            Operation::Tick => {
                let created = board.tick_at(now);
                (None, !created.is_empty())
            }
        };
        let notifications_created = board.notification_log().len() - before;
        tracing::debug!(op = name, applied, notifications_created, "operation applied");
        results.push(OperationResult {
            op: name,
            task_id,
            applied,
            notifications_created,
        });
    }
    Ok(results)
}
