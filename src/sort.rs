//! Single-key stable ordering of task views.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::Task;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    #[default]
    CreatedAt,
    DueDate,
    Priority,
    Title,
    Status,
}

impl SortField {
    pub fn as_str(self) -> &'static str {
        match self {
            SortField::CreatedAt => "created_at",
            SortField::DueDate => "due_date",
            SortField::Priority => "priority",
            SortField::Title => "title",
            SortField::Status => "status",
        }
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortField {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "created_at" | "created" | "createdat" => Ok(SortField::CreatedAt),
            "due_date" | "due" | "duedate" => Ok(SortField::DueDate),
            "priority" => Ok(SortField::Priority),
            "title" => Ok(SortField::Title),
            "status" => Ok(SortField::Status),
            other => Err(Error::InvalidArgument(format!(
                "unknown sort field '{other}' (expected created_at|due_date|priority|title|status)"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

impl FromStr for SortDirection {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(SortDirection::Asc),
            "desc" | "descending" => Ok(SortDirection::Desc),
            other => Err(Error::InvalidArgument(format!(
                "unknown sort direction '{other}' (expected asc|desc)"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct SortOptions {
    pub field: SortField,
    pub direction: SortDirection,
}

impl SortOptions {
    pub fn new(field: SortField, direction: SortDirection) -> Self {
        Self { field, direction }
    }

    pub fn parse(field: &str, direction: &str) -> Result<Self> {
        Ok(Self::new(field.parse()?, direction.parse()?))
    }

    pub fn compare(&self, left: &Task, right: &Task) -> Ordering {
        let ordering = compare_field(self.field, left, right);
        match self.direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    }
}

/// Stable in-place sort; ties keep their relative order.
pub fn sort_tasks(tasks: &mut [Task], options: SortOptions) {
    tasks.sort_by(|left, right| options.compare(left, right));
}

fn compare_field(field: SortField, left: &Task, right: &Task) -> Ordering {
    match field {
        SortField::CreatedAt => left.created_at.cmp(&right.created_at),
        // Undated tasks behave as if due infinitely late.
        SortField::DueDate => match (left.due_date, right.due_date) {
            (Some(a), Some(b)) => a.cmp(&b),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        },
        SortField::Priority => left.priority.rank().cmp(&right.priority.rank()),
        SortField::Title => left
            .title
            .to_lowercase()
            .cmp(&right.title.to_lowercase()),
        // Label order, not workflow order.
        SortField::Status => left.status.label().cmp(right.status.label()),
    }
}
