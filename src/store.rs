//! In-memory task store.
//!
//! The mutation methods are the only write path. Each mutation returns the
//! resulting task together with the notifications it produced; the caller
//! decides where those notifications go.

use chrono::{DateTime, Utc};
use serde::Serialize;
use ulid::Ulid;

use crate::error::{Error, Result};
use crate::model::{StatusChange, Task, TaskDraft, TaskPatch, UserDirectory};
use crate::notification::Notification;

pub const DEFAULT_TASK_ID_PREFIX: &str = "task";

/// A task after a mutation plus the side-effect notifications.
#[derive(Debug, Clone, Serialize)]
pub struct MutationOutcome {
    pub task: Task,
    pub notifications: Vec<Notification>,
}

#[derive(Debug, Clone)]
pub struct TaskStore {
    // Insertion order is the natural order of the unsorted view.
    tasks: Vec<Task>,
    users: UserDirectory,
    id_prefix: String,
}

impl TaskStore {
    pub fn new(users: UserDirectory) -> Self {
        Self {
            tasks: Vec::new(),
            users,
            id_prefix: DEFAULT_TASK_ID_PREFIX.to_string(),
        }
    }

    /// Build a store around existing records. Records are taken as-is;
    /// validation belongs to the loader that produced them.
    pub fn with_tasks(users: UserDirectory, tasks: Vec<Task>) -> Self {
        Self {
            tasks,
            users,
            id_prefix: DEFAULT_TASK_ID_PREFIX.to_string(),
        }
    }

    pub fn with_id_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.id_prefix = prefix.into();
        self
    }

    pub fn users(&self) -> &UserDirectory {
        &self.users
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn create(
        &mut self,
        draft: TaskDraft,
        actor: &str,
        now: DateTime<Utc>,
    ) -> Result<MutationOutcome> {
        let title = draft.title.trim();
        if title.is_empty() {
            return Err(Error::InvalidArgument("task title cannot be empty".to_string()));
        }
        let assignee = self.users.require(&draft.assignee_id)?;

        let task = Task {
            id: self.generate_task_id(),
            title: title.to_string(),
            description: draft.description,
            assignee_id: assignee.id.clone(),
            assignee_name: assignee.name.clone(),
            due_date: draft.due_date,
            priority: draft.priority,
            status: draft.status,
            created_at: now,
            updated_at: now,
            status_history: vec![StatusChange {
                status: draft.status,
                timestamp: now,
                actor: actor.to_string(),
            }],
        };

        let mut notifications = Vec::new();
        if task.assignee_id != actor {
            notifications.push(Notification::assignment(&task, now));
        }

        tracing::info!(id = %task.id, title = %task.title, "task created");
        self.tasks.push(task.clone());
        Ok(MutationOutcome {
            task,
            notifications,
        })
    }

    /// Merge `patch` into the task `id`.
    ///
    /// Unknown ids fail with `TaskNotFound` and leave the store untouched.
    /// All checks run before any field is written.
    pub fn update(
        &mut self,
        id: &str,
        patch: TaskPatch,
        actor: &str,
        now: DateTime<Utc>,
    ) -> Result<MutationOutcome> {
        let Some(index) = self.tasks.iter().position(|task| task.id == id) else {
            tracing::warn!(id, "update for unknown task");
            return Err(Error::TaskNotFound(id.to_string()));
        };

        let title = match patch.title.as_deref() {
            Some(raw) => {
                let trimmed = raw.trim();
                if trimmed.is_empty() {
                    return Err(Error::InvalidArgument(
                        "task title cannot be empty".to_string(),
                    ));
                }
                Some(trimmed.to_string())
            }
            None => None,
        };
        let reassigned = match patch.assignee_id.as_deref() {
            Some(assignee_id) if assignee_id != self.tasks[index].assignee_id => {
                let user = self.users.require(assignee_id)?;
                Some((user.id.clone(), user.name.clone()))
            }
            _ => None,
        };

        let task = &mut self.tasks[index];
        let previous_status = task.status;

        if let Some(title) = title {
            task.title = title;
        }
        if let Some(description) = patch.description {
            task.description = description;
        }
        if let Some((assignee_id, assignee_name)) = reassigned.as_ref() {
            task.assignee_id = assignee_id.clone();
            task.assignee_name = assignee_name.clone();
        }
        if let Some(due_date) = patch.due_date {
            task.due_date = due_date;
        }
        if let Some(priority) = patch.priority {
            task.priority = priority;
        }
        let status_changed = match patch.status {
            Some(status) if status != previous_status => {
                task.status = status;
                task.status_history.push(StatusChange {
                    status,
                    timestamp: now,
                    actor: actor.to_string(),
                });
                true
            }
            _ => false,
        };
        task.updated_at = now;

        let mut notifications = Vec::new();
        if reassigned.is_some() && task.assignee_id != actor {
            notifications.push(Notification::assignment(task, now));
        }
        if status_changed {
            notifications.push(Notification::status_change(task, previous_status, now));
        }

        tracing::info!(id, status_changed, "task updated");
        Ok(MutationOutcome {
            task: task.clone(),
            notifications,
        })
    }

    /// Remove a task. Absent ids are not an error.
    pub fn delete(&mut self, id: &str) -> Option<Task> {
        let index = self.tasks.iter().position(|task| task.id == id)?;
        tracing::info!(id, "task deleted");
        Some(self.tasks.remove(index))
    }

    fn generate_task_id(&self) -> String {
        loop {
            let candidate = format!(
                "{}-{}",
                self.id_prefix.trim(),
                Ulid::new().to_string().to_lowercase()
            );
            if self.get(&candidate).is_none() {
                return candidate;
            }
        }
    }
}
