//! Periodic reminder scan.
//!
//! The scheduler borrows the board mutably for as long as it runs, so a
//! scan and a mutation can only interleave at tick boundaries.

use std::future::Future;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::time::{interval, MissedTickBehavior};

use crate::board::Board;
use crate::notification::Notification;

#[derive(Debug, Clone, Serialize)]
pub struct TickReport {
    pub tick: u64,
    pub scanned_at: DateTime<Utc>,
    pub created: Vec<Notification>,
}

/// Totals for a scheduler run. Only ticks that created reminders keep
/// their report, so an open-ended run stays bounded by the task count.
#[derive(Debug, Clone, Default, Serialize)]
pub struct WatchSummary {
    pub ticks: u64,
    pub reminders_created: usize,
    pub interrupted: bool,
    pub reports: Vec<TickReport>,
}

#[derive(Debug, Clone, Copy)]
pub struct ReminderScheduler {
    period: Duration,
    max_ticks: Option<u64>,
}

impl ReminderScheduler {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            max_ticks: None,
        }
    }

    /// Stop after `ticks` scans instead of running until shutdown.
    pub fn with_max_ticks(mut self, ticks: u64) -> Self {
        self.max_ticks = Some(ticks);
        self
    }

    /// Run scans until the tick budget is spent or `shutdown` resolves.
    /// The first scan happens immediately. `on_tick` sees every report as
    /// it is produced.
    pub async fn run<F, S>(&self, board: &mut Board, shutdown: S, mut on_tick: F) -> WatchSummary
    where
        F: FnMut(&TickReport),
        S: Future<Output = ()>,
    {
        let mut ticker = interval(self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tokio::pin!(shutdown);

        let mut summary = WatchSummary::default();
        loop {
            if self.max_ticks.is_some_and(|max| summary.ticks >= max) {
                break;
            }
            tokio::select! {
                biased;
                () = &mut shutdown => {
                    tracing::debug!(ticks = summary.ticks, "reminder watch interrupted");
                    summary.interrupted = true;
                    break;
                }
                _ = ticker.tick() => {}
            }
            summary.ticks += 1;

            let scanned_at = Utc::now();
            let created = board.tick_at(scanned_at);
            tracing::debug!(tick = summary.ticks, created = created.len(), "reminder tick");
            let report = TickReport {
                tick: summary.ticks,
                scanned_at,
                created,
            };
            on_tick(&report);
            if !report.created.is_empty() {
                summary.reminders_created += report.created.len();
                summary.reports.push(report);
            }
        }
        summary
    }
}
