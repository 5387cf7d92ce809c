//! Rendering of command results.
//!
//! Every command produces a serializable payload plus a [`Report`] for
//! people. `--json` prints the payload inside a versioned envelope;
//! otherwise the report is printed unless `--quiet` is set.

use serde::Serialize;

use crate::error::{Error, Result};

pub const SCHEMA_VERSION: &str = "taskboard.v1";

#[derive(Debug, Clone, Copy, Default)]
pub struct OutputMode {
    pub json: bool,
    pub quiet: bool,
}

/// Human-readable rendering of one command result.
#[derive(Debug, Clone)]
pub struct Report {
    title: String,
    facts: Vec<(String, String)>,
    rows: Vec<String>,
    warnings: Vec<String>,
    hints: Vec<String>,
}

impl Report {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            facts: Vec::new(),
            rows: Vec::new(),
            warnings: Vec::new(),
            hints: Vec::new(),
        }
    }

    /// A `key: value` line under the title.
    pub fn fact(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.facts.push((key.into(), value.into()));
    }

    /// One task, notification or history line.
    pub fn row(&mut self, row: impl Into<String>) {
        self.rows.push(row.into());
    }

    pub fn warn(&mut self, warning: impl Into<String>) {
        self.warnings.push(warning.into());
    }

    /// A follow-up command worth running.
    pub fn hint(&mut self, hint: impl Into<String>) {
        self.hints.push(hint.into());
    }

    pub fn render(&self) -> String {
        let mut out = vec![self.title.clone()];
        for (key, value) in &self.facts {
            out.push(format!("  {key}: {value}"));
        }
        if !self.rows.is_empty() {
            out.push(String::new());
            out.extend(self.rows.iter().map(|row| format!("  {row}")));
        }
        if !self.warnings.is_empty() || !self.hints.is_empty() {
            out.push(String::new());
        }
        out.extend(self.warnings.iter().map(|warning| format!("warning: {warning}")));
        out.extend(self.hints.iter().map(|hint| format!("hint: {hint}")));
        out.join("\n")
    }
}

#[derive(Serialize)]
struct Envelope<'a, T: Serialize> {
    schema_version: &'static str,
    command: &'a str,
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<&'a T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<ErrorBody>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    warnings: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    hints: Vec<String>,
}

#[derive(Serialize)]
struct ErrorBody {
    kind: &'static str,
    message: String,
    exit_code: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<serde_json::Value>,
}

/// Print a successful result in the requested mode.
pub fn emit<T: Serialize>(mode: OutputMode, command: &str, data: &T, report: &Report) -> Result<()> {
    if mode.json {
        let envelope = Envelope {
            schema_version: SCHEMA_VERSION,
            command,
            status: "success",
            data: Some(data),
            error: None,
            warnings: report.warnings.clone(),
            hints: report.hints.clone(),
        };
        println!("{}", serde_json::to_string_pretty(&envelope)?);
    } else if !mode.quiet {
        println!("{}", report.render());
    }
    Ok(())
}

/// Print a failure. JSON goes to stdout like any other envelope; plain
/// errors go to stderr.
pub fn emit_error(command: &str, err: &Error, json: bool) -> Result<()> {
    let hints = error_hints(err);
    if json {
        let envelope: Envelope<'_, ()> = Envelope {
            schema_version: SCHEMA_VERSION,
            command,
            status: "error",
            data: None,
            error: Some(ErrorBody {
                kind: err.kind(),
                message: err.to_string(),
                exit_code: err.exit_code(),
                details: err.details(),
            }),
            warnings: Vec::new(),
            hints: hints.clone(),
        };
        println!("{}", serde_json::to_string_pretty(&envelope)?);
        return Ok(());
    }

    eprintln!("error: {err}");
    for hint in &hints {
        eprintln!("hint: {hint}");
    }
    Ok(())
}

fn error_hints(err: &Error) -> Vec<String> {
    let hint = match err {
        Error::TaskNotFound(_) => "taskboard list",
        Error::UnknownUser(_) => "taskboard users",
        Error::NotificationNotFound(_) => "taskboard notifications",
        Error::InvalidConfig(_) | Error::TomlParse(_) => "fix .taskboard.toml then retry",
        Error::InvalidFilter(_) => "check --due-from is not after --due-to",
        Error::InvalidData { .. } => "check the --data file or drop it to use the demo seed",
        _ => return Vec::new(),
    };
    vec![hint.to_string()]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn report_lists_facts_rows_and_notes() {
        let mut report = Report::new("Board stats");
        report.fact("Tasks", "8");
        report.fact("Completion", "25.00%");
        report.row("[High][Not Started] task-1 Call");
        report.warn("reminders disabled");

        let rendered = report.render();
        assert!(rendered.starts_with("Board stats\n"));
        assert!(rendered.contains("  Tasks: 8\n"));
        assert!(rendered.contains("  Completion: 25.00%"));
        assert!(rendered.contains("\n  [High][Not Started] task-1 Call"));
        assert!(rendered.ends_with("warning: reminders disabled"));
        assert!(!rendered.contains("hint:"));
    }

    #[test]
    fn bare_report_is_only_its_title() {
        assert_eq!(Report::new("Users").render(), "Users");
    }

    #[test]
    fn hints_follow_error_kind() {
        assert_eq!(
            error_hints(&Error::TaskNotFound("x".to_string())),
            vec!["taskboard list".to_string()]
        );
        let bad_data = Error::InvalidData {
            path: PathBuf::from("board.json"),
            message: "duplicate task id".to_string(),
        };
        assert_eq!(bad_data.kind(), "invalid_data");
        assert_eq!(error_hints(&bad_data).len(), 1);
        assert!(error_hints(&Error::InvalidArgument("x".to_string())).is_empty());
    }
}
