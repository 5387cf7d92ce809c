//! taskboard task command implementations.

use std::path::PathBuf;

use chrono::Utc;
use serde::Serialize;

use crate::cli::{display_path, load_context, parse_timestamp, ContextOptions};
use crate::error::{Error, Result};
use crate::filter::TaskFilter;
use crate::model::{Priority, Status, Task, User};
use crate::notification::Notification;
use crate::ops::{self, OperationResult};
use crate::output::{emit, OutputMode, Report};
use crate::sort::{SortDirection, SortOptions};
use crate::stats::TaskStats;

pub struct ListOptions {
    pub context: ContextOptions,
    pub status: Vec<String>,
    pub priority: Vec<String>,
    pub assignee: Vec<String>,
    pub overdue: bool,
    pub search: Option<String>,
    pub due_from: Option<String>,
    pub due_to: Option<String>,
    pub sort: Option<String>,
    pub asc: bool,
    pub desc: bool,
    pub limit: Option<usize>,
    pub json: bool,
    pub quiet: bool,
}

pub struct ShowOptions {
    pub context: ContextOptions,
    pub id: String,
    pub json: bool,
    pub quiet: bool,
}

pub struct StatsOptions {
    pub context: ContextOptions,
    pub json: bool,
    pub quiet: bool,
}

pub struct UsersOptions {
    pub context: ContextOptions,
    pub json: bool,
    pub quiet: bool,
}

pub struct ApplyOptions {
    pub context: ContextOptions,
    pub script: PathBuf,
    pub json: bool,
    pub quiet: bool,
}

#[derive(Serialize)]
struct TaskListOutput {
    total: usize,
    shown: usize,
    filters: TaskFilter,
    sort: SortOptions,
    tasks: Vec<Task>,
}

#[derive(Serialize)]
struct TaskShowOutput<'a> {
    task: &'a Task,
    overdue: bool,
    notifications: Vec<&'a Notification>,
}

#[derive(Serialize)]
struct ApplyOutput {
    script: String,
    operations: Vec<OperationResult>,
    tasks_total: usize,
    unread_notifications: usize,
    stats: TaskStats,
}

pub fn run_list(options: ListOptions) -> Result<()> {
    let mut ctx = load_context(options.context)?;
    let filters = build_filter(
        &options.status,
        &options.priority,
        &options.assignee,
        options.overdue,
        options.search,
        options.due_from.as_deref(),
        options.due_to.as_deref(),
    )?;
    filters.validate()?;

    let mut sort = ctx.board.sort_options();
    if let Some(field) = options.sort.as_deref() {
        sort.field = field.parse()?;
    }
    if options.asc {
        sort.direction = SortDirection::Asc;
    } else if options.desc {
        sort.direction = SortDirection::Desc;
    }

    ctx.board.set_filters(filters.clone());
    ctx.board.set_sort_options(sort);

    let mut tasks = ctx.board.tasks();
    let total = tasks.len();
    if let Some(limit) = options.limit {
        if limit == 0 {
            return Err(Error::InvalidArgument("--limit must be > 0".to_string()));
        }
        tasks.truncate(limit);
    }

    let mut report = Report::new("Tasks");
    report.fact("Total", total.to_string());
    if tasks.len() < total {
        report.fact("Shown", tasks.len().to_string());
    }
    report.fact(
        "Sort",
        format!("{} {}", sort.field, sort.direction.as_str()),
    );
    let now = Utc::now();
    for task in &tasks {
        report.row(task_line(task, now));
    }
    if total == 0 && !filters.is_empty() {
        report.hint("taskboard list (without filters)");
    }

    let output = TaskListOutput {
        total,
        shown: tasks.len(),
        filters,
        sort,
        tasks,
    };

    emit(
        OutputMode {
            json: options.json,
            quiet: options.quiet,
        },
        "list",
        &output,
        &report,
    )
}

pub fn run_show(options: ShowOptions) -> Result<()> {
    let ctx = load_context(options.context)?;
    let id = options.id.trim();
    let task = ctx
        .board
        .task(id)
        .ok_or_else(|| Error::TaskNotFound(id.to_string()))?;
    let now = Utc::now();

    let mut report = Report::new(format!("Task {}", task.id));
    report.fact("Title", task.title.clone());
    report.fact("Status", task.status.to_string());
    report.fact("Priority", task.priority.to_string());
    report.fact(
        "Assignee",
        format!("{} ({})", task.assignee_name, task.assignee_id),
    );
    report.fact(
        "Due",
        task.due_date
            .map(|due| due.to_rfc3339())
            .unwrap_or_else(|| "none".to_string()),
    );
    if task.is_overdue(now) {
        report.warn("task is overdue");
    }
    if !task.description.is_empty() {
        report.row(task.description.clone());
    }
    for entry in &task.status_history {
        report.row(format!(
            "{} {} by {}",
            entry.timestamp.to_rfc3339(),
            entry.status,
            entry.actor
        ));
    }

    let output = TaskShowOutput {
        task,
        overdue: task.is_overdue(now),
        notifications: ctx.board.notification_log().for_task(&task.id),
    };

    emit(
        OutputMode {
            json: options.json,
            quiet: options.quiet,
        },
        "show",
        &output,
        &report,
    )
}

pub fn run_stats(options: StatsOptions) -> Result<()> {
    let ctx = load_context(options.context)?;
    let stats = ctx.board.stats();

    let mut report = Report::new("Board stats");
    push_stats_summary(&mut report, &stats);
    report.row(format!(
        "Statuses: {}",
        Status::ALL
            .iter()
            .map(|status| format!("{status}={}", stats.status_count(*status)))
            .collect::<Vec<_>>()
            .join(", ")
    ));
    report.row(format!(
        "Priorities: {}",
        Priority::ALL
            .iter()
            .map(|priority| format!("{priority}={}", stats.priority_count(*priority)))
            .collect::<Vec<_>>()
            .join(", ")
    ));

    emit(
        OutputMode {
            json: options.json,
            quiet: options.quiet,
        },
        "stats",
        &stats,
        &report,
    )
}

pub fn run_users(options: UsersOptions) -> Result<()> {
    let ctx = load_context(options.context)?;
    let users: &[User] = ctx.board.users().users();

    let mut report = Report::new("Users");
    report.fact("Total", users.len().to_string());
    report.fact("Acting as", ctx.board.actor().to_string());
    for user in users {
        report.row(format!(
            "[{}] {} {} <{}>",
            user.avatar, user.id, user.name, user.email
        ));
    }

    emit(
        OutputMode {
            json: options.json,
            quiet: options.quiet,
        },
        "users",
        &users,
        &report,
    )
}

pub fn run_apply(options: ApplyOptions) -> Result<()> {
    let mut ctx = load_context(options.context)?;
    let ops = ops::load_script(&options.script)?;
    let operations = ops::apply(&mut ctx.board, ops, Utc::now())?;
    let stats = ctx.board.stats();

    let mut report = Report::new("Script applied");
    report.fact("Script", display_path(&options.script));
    report.fact("Operations", operations.len().to_string());
    report.fact("Tasks", ctx.board.store().len().to_string());
    report.fact("Unread notifications", ctx.board.unread_count().to_string());
    for result in &operations {
        let mut line = result.op.to_string();
        if let Some(task_id) = result.task_id.as_ref() {
            line.push_str(&format!(" {task_id}"));
        }
        if !result.applied {
            line.push_str(" (no change)");
        }
        if result.notifications_created > 0 {
            line.push_str(&format!(" (+{} notifications)", result.notifications_created));
        }
        report.row(line);
    }
    if !ctx.config.reminders.enabled {
        report.warn("reminders are disabled in config; tick operations still scan");
    }

    let output = ApplyOutput {
        script: display_path(&options.script),
        operations,
        tasks_total: ctx.board.store().len(),
        unread_notifications: ctx.board.unread_count(),
        stats,
    };

    emit(
        OutputMode {
            json: options.json,
            quiet: options.quiet,
        },
        "apply",
        &output,
        &report,
    )
}

fn build_filter(
    statuses: &[String],
    priorities: &[String],
    assignees: &[String],
    overdue: bool,
    search: Option<String>,
    due_from: Option<&str>,
    due_to: Option<&str>,
) -> Result<TaskFilter> {
    let mut filter = TaskFilter::new();
    if !statuses.is_empty() {
        let parsed = statuses
            .iter()
            .map(|value| value.parse::<Status>())
            .collect::<Result<Vec<_>>>()?;
        filter = filter.with_statuses(parsed);
    }
    if !priorities.is_empty() {
        let parsed = priorities
            .iter()
            .map(|value| value.parse::<Priority>())
            .collect::<Result<Vec<_>>>()?;
        filter = filter.with_priorities(parsed);
    }
    if !assignees.is_empty() {
        filter = filter.with_assignees(assignees.iter().map(|value| value.trim().to_string()));
    }
    if overdue {
        filter = filter.overdue_only();
    }
    if let Some(query) = search {
        filter = filter.with_search(query);
    }
    let start = parse_timestamp("due-from", due_from, false)?;
    let end = parse_timestamp("due-to", due_to, true)?;
    if start.is_some() || end.is_some() {
        filter = filter.with_due_range(start, end);
    }
    Ok(filter)
}

fn task_line(task: &Task, now: chrono::DateTime<Utc>) -> String {
    let mut line = format!(
        "[{}][{}] {} {} ({})",
        task.priority, task.status, task.id, task.title, task.assignee_name
    );
    if let Some(due) = task.due_date {
        line.push_str(&format!(" due {}", due.format("%Y-%m-%d %H:%M")));
        if task.is_overdue(now) {
            line.push_str(" OVERDUE");
        }
    }
    line
}

fn push_stats_summary(report: &mut Report, stats: &TaskStats) {
    report.fact("Tasks", stats.total.to_string());
    report.fact("Completion", format!("{:.2}%", stats.completion_rate));
    report.fact("Overdue", stats.overdue.to_string());
    report.fact("Due today", stats.due_today.to_string());
    report.fact("Due tomorrow", stats.due_tomorrow.to_string());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_filter_parses_every_dimension() {
        let filter = build_filter(
            &["in-progress".to_string()],
            &["High".to_string(), "low".to_string()],
            &[" u-2 ".to_string()],
            true,
            Some("renewal".to_string()),
            Some("2026-01-01"),
            None,
        )
        .expect("filter");

        assert_eq!(filter.status.as_ref().map(|set| set.len()), Some(1));
        assert_eq!(filter.priority.as_ref().map(|set| set.len()), Some(2));
        assert!(filter
            .assignee
            .as_ref()
            .is_some_and(|set| set.contains("u-2")));
        assert_eq!(filter.overdue, Some(true));
        assert_eq!(filter.search_query.as_deref(), Some("renewal"));
        let range = filter.due_date_range.expect("range");
        assert!(range.start.is_some());
        assert!(range.end.is_none());
    }

    #[test]
    fn build_filter_rejects_unknown_status() {
        let err = build_filter(&["blocked".to_string()], &[], &[], false, None, None, None)
            .expect_err("unknown status");
        assert!(matches!(err, Error::InvalidArgument(_)));
    }
}
