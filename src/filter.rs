//! Conjunctive task filters.
//!
//! A task passes when it satisfies every constraint that is present.
//! Multi-value constraints match when the task's value is any member of the
//! set. Absent (or empty) constraints do not restrict anything.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::{Priority, Status, Task};

/// Inclusive due-date window; a missing side is unbounded.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DateRange {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<DateTime<Utc>>,
}

impl DateRange {
    pub fn contains(&self, value: DateTime<Utc>) -> bool {
        self.start.map_or(true, |start| value >= start)
            && self.end.map_or(true, |end| value <= end)
    }

    pub fn is_inverted(&self) -> bool {
        matches!((self.start, self.end), (Some(start), Some(end)) if start > end)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TaskFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<BTreeSet<Status>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<BTreeSet<Priority>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee: Option<BTreeSet<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overdue: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_query: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date_range: Option<DateRange>,
}

impl TaskFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_statuses(mut self, statuses: impl IntoIterator<Item = Status>) -> Self {
        self.status = Some(statuses.into_iter().collect());
        self
    }

    pub fn with_priorities(mut self, priorities: impl IntoIterator<Item = Priority>) -> Self {
        self.priority = Some(priorities.into_iter().collect());
        self
    }

    pub fn with_assignees<S: Into<String>>(mut self, assignees: impl IntoIterator<Item = S>) -> Self {
        self.assignee = Some(assignees.into_iter().map(Into::into).collect());
        self
    }

    pub fn overdue_only(mut self) -> Self {
        self.overdue = Some(true);
        self
    }

    pub fn with_search(mut self, query: impl Into<String>) -> Self {
        self.search_query = Some(query.into());
        self
    }

    pub fn with_due_range(
        mut self,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    ) -> Self {
        self.due_date_range = Some(DateRange { start, end });
        self
    }

    /// True when no dimension constrains anything.
    pub fn is_empty(&self) -> bool {
        set_is_unconstrained(&self.status)
            && set_is_unconstrained(&self.priority)
            && set_is_unconstrained(&self.assignee)
            && self.overdue != Some(true)
            && self.query().is_none()
            && self.due_date_range.is_none()
    }

    /// Reject configurations that can never match.
    ///
    /// Evaluation itself never fails; an inverted range simply matches
    /// nothing. Callers that prefer a hard error call this first.
    pub fn validate(&self) -> Result<()> {
        if let Some(range) = self.due_date_range {
            if range.is_inverted() {
                return Err(Error::InvalidFilter(
                    "due date range start is after its end".to_string(),
                ));
            }
        }
        Ok(())
    }

    pub fn matches(&self, task: &Task, now: DateTime<Utc>) -> bool {
        if !set_allows(&self.status, &task.status) {
            return false;
        }
        if !set_allows(&self.priority, &task.priority) {
            return false;
        }
        if !set_allows(&self.assignee, &task.assignee_id) {
            return false;
        }
        if self.overdue == Some(true) && !task.is_overdue(now) {
            return false;
        }
        if let Some(query) = self.query() {
            let haystack = format!("{} {}", task.title, task.description).to_lowercase();
            if !haystack.contains(&query.to_lowercase()) {
                return false;
            }
        }
        if let Some(range) = self.due_date_range {
            match task.due_date {
                Some(due) if range.contains(due) => {}
                _ => return false,
            }
        }
        true
    }

    /// Clones of passing tasks, in input order.
    pub fn apply(&self, tasks: &[Task], now: DateTime<Utc>) -> Vec<Task> {
        tasks
            .iter()
            .filter(|task| self.matches(task, now))
            .cloned()
            .collect()
    }

    fn query(&self) -> Option<&str> {
        self.search_query
            .as_deref()
            .map(str::trim)
            .filter(|query| !query.is_empty())
    }
}

fn set_is_unconstrained<T>(set: &Option<BTreeSet<T>>) -> bool {
    set.as_ref().map_or(true, BTreeSet::is_empty)
}

fn set_allows<T: Ord>(set: &Option<BTreeSet<T>>, value: &T) -> bool {
    match set {
        Some(values) if !values.is_empty() => values.contains(value),
        _ => true,
    }
}
