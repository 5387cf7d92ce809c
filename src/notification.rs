//! Notifications and the due-soon reminder scan.
//!
//! Notifications are produced as side effects of task mutations
//! (assignment, status change) and by the periodic reminder scan. Once
//! created they are only ever mutated to flip `read` from false to true.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::model::{Status, Task};

pub const DEFAULT_REMINDER_LEAD_HOURS: i64 = 24;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Reminder,
    Assignment,
    StatusChange,
}

impl NotificationKind {
    pub fn as_str(self) -> &'static str {
        match self {
            NotificationKind::Reminder => "reminder",
            NotificationKind::Assignment => "assignment",
            NotificationKind::StatusChange => "status_change",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: String,
    pub task_id: String,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
    pub read: bool,
}

impl Notification {
    pub fn new(
        kind: NotificationKind,
        task_id: impl Into<String>,
        title: impl Into<String>,
        message: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            task_id: task_id.into(),
            kind,
            title: title.into(),
            message: message.into(),
            created_at,
            read: false,
        }
    }

    pub fn assignment(task: &Task, now: DateTime<Utc>) -> Self {
        Self::new(
            NotificationKind::Assignment,
            &task.id,
            "New task assigned",
            format!(
                "{} was assigned \"{}\"",
                task.assignee_name, task.title
            ),
            now,
        )
    }

    pub fn status_change(task: &Task, previous: Status, now: DateTime<Utc>) -> Self {
        Self::new(
            NotificationKind::StatusChange,
            &task.id,
            "Task status updated",
            format!(
                "\"{}\" moved from {} to {}",
                task.title, previous, task.status
            ),
            now,
        )
    }

    pub fn reminder(task: &Task, due: DateTime<Utc>, now: DateTime<Utc>) -> Self {
        Self::new(
            NotificationKind::Reminder,
            &task.id,
            "Task due soon",
            format!("\"{}\" is due {}", task.title, describe_time_left(due - now)),
            now,
        )
    }
}

fn describe_time_left(left: Duration) -> String {
    let hours = left.num_hours();
    if hours >= 1 {
        let unit = if hours == 1 { "hour" } else { "hours" };
        format!("in {hours} {unit}")
    } else {
        let minutes = left.num_minutes().max(1);
        let unit = if minutes == 1 { "minute" } else { "minutes" };
        format!("in {minutes} {unit}")
    }
}

/// Ordered notification feed; newest entries are listed first.
#[derive(Debug, Clone, Default)]
pub struct NotificationLog {
    // Kept oldest-first; reversed on read.
    entries: Vec<Notification>,
}

impl NotificationLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, notification: Notification) {
        tracing::debug!(
            id = %notification.id,
            task_id = %notification.task_id,
            kind = ?notification.kind,
            "notification created"
        );
        self.entries.push(notification);
    }

    /// Notifications, newest first.
    pub fn list(&self) -> Vec<&Notification> {
        self.entries.iter().rev().collect()
    }

    pub fn unread(&self) -> Vec<&Notification> {
        self.entries.iter().rev().filter(|entry| !entry.read).collect()
    }

    pub fn unread_count(&self) -> usize {
        self.entries.iter().filter(|entry| !entry.read).count()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Notification> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    pub fn for_task(&self, task_id: &str) -> Vec<&Notification> {
        self.entries
            .iter()
            .rev()
            .filter(|entry| entry.task_id == task_id)
            .collect()
    }

    pub fn has(&self, task_id: &str, kind: NotificationKind) -> bool {
        self.entries
            .iter()
            .any(|entry| entry.task_id == task_id && entry.kind == kind)
    }

    /// Marks one notification read. Repeated calls are no-ops.
    pub fn mark_read(&mut self, id: &str) -> Result<()> {
        let entry = self
            .entries
            .iter_mut()
            .find(|entry| entry.id == id)
            .ok_or_else(|| Error::NotificationNotFound(id.to_string()))?;
        entry.read = true;
        Ok(())
    }

    /// Returns how many notifications flipped to read.
    pub fn mark_all_read(&mut self) -> usize {
        let mut flipped = 0;
        for entry in self.entries.iter_mut().filter(|entry| !entry.read) {
            entry.read = true;
            flipped += 1;
        }
        flipped
    }
}

/// Decides which tasks are due soon enough to deserve a reminder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReminderPolicy {
    pub lead_time: Duration,
}

impl Default for ReminderPolicy {
    fn default() -> Self {
        Self {
            lead_time: Duration::hours(DEFAULT_REMINDER_LEAD_HOURS),
        }
    }
}

impl ReminderPolicy {
    pub fn new(lead_time: Duration) -> Self {
        Self { lead_time }
    }

    /// Due in `(now, now + lead_time]` and not completed. A window whose
    /// end overflows the calendar is unbounded.
    pub fn is_due_soon(&self, task: &Task, now: DateTime<Utc>) -> bool {
        if task.status == Status::Completed {
            return false;
        }
        let Some(due) = task.due_date else {
            return false;
        };
        if due <= now {
            return false;
        }
        now.checked_add_signed(self.lead_time)
            .map_or(true, |limit| due <= limit)
    }

    /// Issues one reminder per due-soon task that has never had one.
    ///
    /// Existing reminders are never retracted, even if the due date later
    /// moves out of the window.
    pub fn scan<'a>(
        &self,
        tasks: impl IntoIterator<Item = &'a Task>,
        log: &mut NotificationLog,
        now: DateTime<Utc>,
    ) -> Vec<Notification> {
        let mut created = Vec::new();
        for task in tasks {
            if !self.is_due_soon(task, now) {
                continue;
            }
            if log.has(&task.id, NotificationKind::Reminder) {
                continue;
            }
            let Some(due) = task.due_date else {
                continue;
            };
            let notification = Notification::reminder(task, due, now);
            log.push(notification.clone());
            created.push(notification);
        }
        tracing::debug!(created = created.len(), "reminder scan finished");
        created
    }
}
