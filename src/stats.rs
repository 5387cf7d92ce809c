//! Board-wide statistics.
//!
//! Always computed over the entire store, never the filtered view.

use chrono::{DateTime, Days, NaiveDate, TimeZone, Utc};
use serde::Serialize;

use crate::model::{Priority, Status, Task};

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct StatusCount {
    pub status: Status,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct PriorityCount {
    pub priority: Priority,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TaskStats {
    pub total: usize,
    pub by_status: Vec<StatusCount>,
    pub by_priority: Vec<PriorityCount>,
    pub overdue: usize,
    pub due_today: usize,
    pub due_tomorrow: usize,
    /// Percentage in `[0, 100]`, two decimals; 0 for an empty board.
    pub completion_rate: f64,
}

impl TaskStats {
    pub fn status_count(&self, status: Status) -> usize {
        self.by_status
            .iter()
            .find(|entry| entry.status == status)
            .map(|entry| entry.count)
            .unwrap_or(0)
    }

    pub fn priority_count(&self, priority: Priority) -> usize {
        self.by_priority
            .iter()
            .find(|entry| entry.priority == priority)
            .map(|entry| entry.count)
            .unwrap_or(0)
    }
}

/// Single pass over `tasks`. Day boundaries follow the timezone of `now`.
pub fn compute<Tz: TimeZone>(tasks: &[Task], now: &DateTime<Tz>) -> TaskStats {
    let tz = now.timezone();
    let today = now.date_naive();
    let start_today = start_of_day(&tz, today);
    let start_tomorrow = today
        .checked_add_days(Days::new(1))
        .and_then(|day| start_of_day(&tz, day));
    let start_day_after = today
        .checked_add_days(Days::new(2))
        .and_then(|day| start_of_day(&tz, day));
    let now_utc = now.with_timezone(&Utc);

    let mut status_counts = [0usize; 4];
    let mut priority_counts = [0usize; 3];
    let mut overdue = 0;
    let mut due_today = 0;
    let mut due_tomorrow = 0;

    for task in tasks {
        status_counts[status_index(task.status)] += 1;
        priority_counts[priority_index(task.priority)] += 1;
        if task.is_overdue(now_utc) {
            overdue += 1;
        }
        if let Some(due) = task.due_date {
            if in_window(due, start_today, start_tomorrow) {
                due_today += 1;
            } else if in_window(due, start_tomorrow, start_day_after) {
                due_tomorrow += 1;
            }
        }
    }

    let total = tasks.len();
    let completed = status_counts[status_index(Status::Completed)];

    TaskStats {
        total,
        by_status: Status::ALL
            .iter()
            .map(|status| StatusCount {
                status: *status,
                count: status_counts[status_index(*status)],
            })
            .collect(),
        by_priority: Priority::ALL
            .iter()
            .map(|priority| PriorityCount {
                priority: *priority,
                count: priority_counts[priority_index(*priority)],
            })
            .collect(),
        overdue,
        due_today,
        due_tomorrow,
        completion_rate: ratio_pct(completed as f64, total as f64),
    }
}

fn start_of_day<Tz: TimeZone>(tz: &Tz, day: NaiveDate) -> Option<DateTime<Utc>> {
    let midnight = day.and_hms_opt(0, 0, 0)?;
    tz.from_local_datetime(&midnight)
        .earliest()
        .map(|value| value.with_timezone(&Utc))
}

fn in_window(
    value: DateTime<Utc>,
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
) -> bool {
    match (start, end) {
        (Some(start), Some(end)) => value >= start && value < end,
        _ => false,
    }
}

fn status_index(status: Status) -> usize {
    match status {
        Status::NotStarted => 0,
        Status::InProgress => 1,
        Status::Completed => 2,
        Status::OnHold => 3,
    }
}

fn priority_index(priority: Priority) -> usize {
    match priority {
        Priority::High => 0,
        Priority::Medium => 1,
        Priority::Low => 2,
    }
}

fn ratio_pct(numerator: f64, denominator: f64) -> f64 {
    if denominator <= f64::EPSILON {
        0.0
    } else {
        round2((numerator / denominator) * 100.0)
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
