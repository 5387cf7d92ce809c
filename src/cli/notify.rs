//! Notification and reminder commands.

use serde::Serialize;

use crate::cli::{load_context, ContextOptions};
use crate::error::{Error, Result};
use crate::notification::Notification;
use crate::output::{emit, OutputMode, Report};
use crate::scheduler::{ReminderScheduler, WatchSummary};

pub struct NotificationsOptions {
    pub context: ContextOptions,
    pub unread: bool,
    pub json: bool,
    pub quiet: bool,
}

pub struct WatchOptions {
    pub context: ContextOptions,
    pub interval_secs: Option<u64>,
    pub ticks: Option<u64>,
    pub json: bool,
    pub quiet: bool,
}

#[derive(Serialize)]
struct NotificationsOutput<'a> {
    total: usize,
    unread: usize,
    notifications: Vec<&'a Notification>,
}

#[derive(Serialize)]
struct WatchOutput {
    interval_secs: u64,
    #[serde(flatten)]
    summary: WatchSummary,
}

pub fn run_notifications(options: NotificationsOptions) -> Result<()> {
    let mut ctx = load_context(options.context)?;
    let mut report = Report::new("Notifications");

    if ctx.config.reminders.enabled {
        ctx.board.tick();
    } else {
        report.warn("reminders are disabled in config; no scan was run");
    }

    let log = ctx.board.notification_log();
    let notifications = if options.unread {
        log.unread()
    } else {
        log.list()
    };

    report.fact("Total", log.len().to_string());
    report.fact("Unread", log.unread_count().to_string());
    for notification in &notifications {
        report.row(notification_line(notification));
    }

    let output = NotificationsOutput {
        total: log.len(),
        unread: log.unread_count(),
        notifications,
    };

    emit(
        OutputMode {
            json: options.json,
            quiet: options.quiet,
        },
        "notifications",
        &output,
        &report,
    )
}

pub fn run_watch(options: WatchOptions) -> Result<()> {
    let mut ctx = load_context(options.context)?;
    if let Some(secs) = options.interval_secs {
        if secs == 0 {
            return Err(Error::InvalidArgument(
                "--interval-secs must be > 0".to_string(),
            ));
        }
        ctx.config.reminders.interval_secs = secs;
    }
    let interval = ctx.config.reminders.interval();
    let output_mode = OutputMode {
        json: options.json,
        quiet: options.quiet,
    };

    if !ctx.config.reminders.enabled {
        let mut report = Report::new("Reminder watch");
        report.warn("reminders are disabled in config; nothing to do");
        report.hint("set [reminders] enabled = true in .taskboard.toml");
        let output = WatchOutput {
            interval_secs: interval.as_secs(),
            summary: WatchSummary::default(),
        };
        return emit(output_mode, "watch", &output, &report);
    }

    let mut scheduler = ReminderScheduler::new(interval);
    if let Some(ticks) = options.ticks {
        scheduler = scheduler.with_max_ticks(ticks);
    }

    // One logical thread of control for the whole loop.
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let stream = !output_mode.json && !output_mode.quiet;
    let summary = runtime.block_on(scheduler.run(&mut ctx.board, interrupted(), |tick| {
        if !stream {
            return;
        }
        for notification in &tick.created {
            println!("tick {}: {}", tick.tick, notification_line(notification));
        }
    }));

    let mut report = Report::new("Reminder watch");
    report.fact("Interval", format!("{}s", interval.as_secs()));
    report.fact("Ticks", summary.ticks.to_string());
    report.fact("Reminders created", summary.reminders_created.to_string());
    if summary.interrupted {
        report.warn("stopped by interrupt");
    }

    let output = WatchOutput {
        interval_secs: interval.as_secs(),
        summary,
    };
    emit(output_mode, "watch", &output, &report)
}

/// Resolves on Ctrl-C. Never resolves if the handler cannot be installed.
async fn interrupted() {
    if tokio::signal::ctrl_c().await.is_err() {
        std::future::pending::<()>().await;
    }
}

fn notification_line(notification: &Notification) -> String {
    let marker = if notification.read { " " } else { "*" };
    format!(
        "{marker} [{}] {}: {} ({})",
        notification.kind.as_str(),
        notification.title,
        notification.message,
        notification.task_id
    )
}
