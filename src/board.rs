//! Host-facing task board.
//!
//! The board owns the task store, the notification feed, and the view
//! settings (filters and sort options). Host events go through the
//! mutation methods; the filtered + sorted view and the statistics are
//! derived on demand. Everything happens on one logical thread, so a
//! reminder tick and a user mutation can never overlap.

use chrono::{DateTime, Local, Utc};

use crate::error::Result;
use crate::filter::TaskFilter;
use crate::model::{Task, TaskDraft, TaskPatch, UserDirectory};
use crate::notification::{Notification, NotificationLog, ReminderPolicy};
use crate::sort::{sort_tasks, SortOptions};
use crate::stats::{self, TaskStats};
use crate::store::{MutationOutcome, TaskStore};

#[derive(Debug, Clone)]
pub struct Board {
    store: TaskStore,
    notifications: NotificationLog,
    actor: String,
    filters: TaskFilter,
    sort: SortOptions,
    reminders: ReminderPolicy,
}

impl Board {
    pub fn new(store: TaskStore, actor: impl Into<String>) -> Self {
        Self {
            store,
            notifications: NotificationLog::new(),
            actor: actor.into(),
            filters: TaskFilter::default(),
            sort: SortOptions::default(),
            reminders: ReminderPolicy::default(),
        }
    }

    pub fn with_sort_options(mut self, sort: SortOptions) -> Self {
        self.sort = sort;
        self
    }

    pub fn with_reminder_policy(mut self, reminders: ReminderPolicy) -> Self {
        self.reminders = reminders;
        self
    }

    pub fn actor(&self) -> &str {
        &self.actor
    }

    pub fn users(&self) -> &UserDirectory {
        self.store.users()
    }

    pub fn store(&self) -> &TaskStore {
        &self.store
    }

    pub fn task(&self, id: &str) -> Option<&Task> {
        self.store.get(id)
    }

    pub fn filters(&self) -> &TaskFilter {
        &self.filters
    }

    pub fn sort_options(&self) -> SortOptions {
        self.sort
    }

    pub fn create_task(&mut self, draft: TaskDraft) -> Result<Task> {
        self.create_task_at(draft, Utc::now())
    }

    pub fn create_task_at(&mut self, draft: TaskDraft, now: DateTime<Utc>) -> Result<Task> {
        let outcome = self.store.create(draft, &self.actor, now)?;
        Ok(self.absorb(outcome))
    }

    pub fn update_task(&mut self, id: &str, patch: TaskPatch) -> Result<Task> {
        self.update_task_at(id, patch, Utc::now())
    }

    pub fn update_task_at(
        &mut self,
        id: &str,
        patch: TaskPatch,
        now: DateTime<Utc>,
    ) -> Result<Task> {
        let outcome = self.store.update(id, patch, &self.actor, now)?;
        Ok(self.absorb(outcome))
    }

    /// Returns the removed task, or `None` when `id` was not present.
    pub fn delete_task(&mut self, id: &str) -> Option<Task> {
        self.store.delete(id)
    }

    pub fn set_filters(&mut self, filters: TaskFilter) {
        tracing::debug!(?filters, "filters changed");
        self.filters = filters;
    }

    pub fn clear_filters(&mut self) {
        self.filters = TaskFilter::default();
    }

    pub fn set_sort_options(&mut self, sort: SortOptions) {
        tracing::debug!(field = %sort.field, direction = sort.direction.as_str(), "sort changed");
        self.sort = sort;
    }

    /// Filtered and sorted view using the current settings.
    pub fn tasks(&self) -> Vec<Task> {
        self.tasks_at(Utc::now())
    }

    pub fn tasks_at(&self, now: DateTime<Utc>) -> Vec<Task> {
        let mut view = self.filters.apply(self.store.tasks(), now);
        sort_tasks(&mut view, self.sort);
        view
    }

    /// Global statistics with day boundaries in local time.
    pub fn stats(&self) -> TaskStats {
        stats::compute(self.store.tasks(), &Local::now())
    }

    pub fn stats_at<Tz: chrono::TimeZone>(&self, now: &DateTime<Tz>) -> TaskStats {
        stats::compute(self.store.tasks(), now)
    }

    /// Notifications, newest first.
    pub fn notifications(&self) -> Vec<&Notification> {
        self.notifications.list()
    }

    pub fn notification_log(&self) -> &NotificationLog {
        &self.notifications
    }

    pub fn unread_count(&self) -> usize {
        self.notifications.unread_count()
    }

    pub fn mark_notification_as_read(&mut self, id: &str) -> Result<()> {
        self.notifications.mark_read(id)
    }

    pub fn mark_all_notifications_as_read(&mut self) -> usize {
        self.notifications.mark_all_read()
    }

    /// One reminder scan over every task.
    pub fn tick(&mut self) -> Vec<Notification> {
        self.tick_at(Utc::now())
    }

    pub fn tick_at(&mut self, now: DateTime<Utc>) -> Vec<Notification> {
        self.reminders
            .scan(self.store.tasks(), &mut self.notifications, now)
    }

    fn absorb(&mut self, outcome: MutationOutcome) -> Task {
        for notification in outcome.notifications {
            self.notifications.push(notification);
        }
        outcome.task
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Priority, Status, User};
    use crate::notification::NotificationKind;
    use crate::sort::{SortDirection, SortField};
    use chrono::Duration;

    fn board() -> Board {
        let users = UserDirectory::new(vec![
            User {
                id: "u-1".to_string(),
                name: "Ada Lovelace".to_string(),
                email: "ada@example.com".to_string(),
                avatar: "AL".to_string(),
            },
            User {
                id: "u-2".to_string(),
                name: "Grace Hopper".to_string(),
                email: "grace@example.com".to_string(),
                avatar: "GH".to_string(),
            },
        ]);
        Board::new(TaskStore::new(users), "u-1")
    }

    #[test]
    fn view_applies_filters_then_sort() {
        let mut board = board();
        let now = Utc::now();
        board
            .create_task_at(TaskDraft::new("Low", "u-1").priority(Priority::Low), now)
            .expect("create");
        board
            .create_task_at(TaskDraft::new("High", "u-1").priority(Priority::High), now)
            .expect("create");
        board
            .create_task_at(
                TaskDraft::new("Done", "u-1")
                    .priority(Priority::High)
                    .status(Status::Completed),
                now,
            )
            .expect("create");

        board.set_filters(TaskFilter::new().with_statuses([Status::NotStarted]));
        board.set_sort_options(SortOptions::new(SortField::Priority, SortDirection::Desc));

        let titles: Vec<String> = board.tasks_at(now).into_iter().map(|t| t.title).collect();
        assert_eq!(titles, vec!["High", "Low"]);

        board.clear_filters();
        assert_eq!(board.tasks_at(now).len(), 3);
    }

    #[test]
    fn stats_ignore_active_filters() {
        let mut board = board();
        board.create_task(TaskDraft::new("A", "u-1")).expect("create");
        board
            .create_task(TaskDraft::new("B", "u-1").status(Status::Completed))
            .expect("create");
        board.set_filters(TaskFilter::new().with_statuses([Status::Completed]));

        assert_eq!(board.tasks().len(), 1);
        let stats = board.stats_at(&Utc::now());
        assert_eq!(stats.total, 2);
        assert_eq!(stats.completion_rate, 50.0);
    }

    #[test]
    fn mutations_feed_notifications() {
        let mut board = board();
        let task = board
            .create_task(TaskDraft::new("Delegate", "u-2"))
            .expect("create");
        board
            .update_task(&task.id, TaskPatch::status(Status::OnHold))
            .expect("update");

        let kinds: Vec<NotificationKind> =
            board.notifications().iter().map(|entry| entry.kind).collect();
        assert_eq!(
            kinds,
            vec![NotificationKind::StatusChange, NotificationKind::Assignment]
        );
        assert_eq!(board.unread_count(), 2);
        assert_eq!(board.mark_all_notifications_as_read(), 2);
        assert_eq!(board.unread_count(), 0);
    }

    #[test]
    fn tick_deduplicates_reminders() {
        let mut board = board();
        let now = Utc::now();
        let task = board
            .create_task_at(
                TaskDraft::new("Soon", "u-1")
                    .status(Status::InProgress)
                    .due(now + Duration::hours(12)),
                now,
            )
            .expect("create");

        assert_eq!(board.tick_at(now).len(), 1);
        assert!(board.tick_at(now + Duration::minutes(1)).is_empty());
        let reminders: Vec<&Notification> = board
            .notification_log()
            .for_task(&task.id)
            .into_iter()
            .filter(|entry| entry.kind == NotificationKind::Reminder)
            .collect();
        assert_eq!(reminders.len(), 1);
    }

    #[test]
    fn delete_keeps_notifications_for_removed_task() {
        let mut board = board();
        let task = board.create_task(TaskDraft::new("Temp", "u-2")).expect("create");
        assert!(board.delete_task(&task.id).is_some());
        assert!(board.delete_task(&task.id).is_none());
        assert_eq!(board.notifications().len(), 1);
    }
}
