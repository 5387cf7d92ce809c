//! taskboard - in-memory task board engine
//!
//! This library provides the core of the taskboard CLI: a task store with
//! status history, a filter and sort pipeline for board views, global
//! statistics, and due-soon reminder notifications.
//!
//! # Core Concepts
//!
//! - **Tasks**: records with priority, status, due date and an append-only
//!   status history whose last entry always matches the current status
//! - **Views**: the store passed through a conjunctive filter and a stable
//!   single-key sort
//! - **Stats**: counts and completion rate over the whole store, never the
//!   filtered view
//! - **Notifications**: assignment and status-change side effects plus
//!   reminders for tasks due within the lead time
//!
//! # Module Organization
//!
//! - `model`: tasks, users, drafts and patches
//! - `store`: the task store and its mutation API
//! - `filter`: task filters
//! - `sort`: sort options and the stable comparator
//! - `stats`: statistics aggregation
//! - `notification`: notification feed and reminder policy
//! - `board`: host-facing facade tying the pieces together
//! - `scheduler`: periodic reminder scans
//! - `dataset`: demo seed and JSON dataset loading
//! - `ops`: JSON-lines operation scripts
//! - `config`: configuration loading from `.taskboard.toml`
//! - `actor`: acting user resolution
//! - `cli`: command-line interface using clap
//! - `output`: shared CLI output formatting
//! - `error`: error types and result aliases

pub mod actor;
pub mod board;
pub mod cli;
pub mod config;
pub mod dataset;
pub mod error;
pub mod filter;
pub mod model;
pub mod notification;
pub mod ops;
pub mod output;
pub mod scheduler;
pub mod sort;
pub mod stats;
pub mod store;

pub use error::{Error, Result};
