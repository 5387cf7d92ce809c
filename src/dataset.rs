//! Board datasets: the built-in demo seed and JSON dataset files.

use std::collections::HashSet;
use std::path::Path;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::{Priority, Status, StatusChange, Task, User, UserDirectory};
use crate::store::TaskStore;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Dataset {
    #[serde(default)]
    pub users: Vec<User>,
    #[serde(default)]
    pub tasks: Vec<Task>,
}

impl Dataset {
    /// Load and validate a dataset JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let dataset: Dataset = serde_json::from_str(&content)?;
        dataset.validate().map_err(|message| Error::InvalidData {
            path: path.to_path_buf(),
            message,
        })?;
        tracing::debug!(
            path = %path.display(),
            users = dataset.users.len(),
            tasks = dataset.tasks.len(),
            "dataset loaded"
        );
        Ok(dataset)
    }

    pub fn into_store(self) -> TaskStore {
        TaskStore::with_tasks(UserDirectory::new(self.users), self.tasks)
    }

    fn validate(&self) -> std::result::Result<(), String> {
        let mut user_ids = HashSet::new();
        for user in &self.users {
            if user.id.trim().is_empty() {
                return Err("user id cannot be empty".to_string());
            }
            if !user_ids.insert(user.id.as_str()) {
                return Err(format!("duplicate user id '{}'", user.id));
            }
        }

        let mut task_ids = HashSet::new();
        for task in &self.tasks {
            if task.id.trim().is_empty() {
                return Err("task id cannot be empty".to_string());
            }
            if !task_ids.insert(task.id.as_str()) {
                return Err(format!("duplicate task id '{}'", task.id));
            }
            if task.title.trim().is_empty() {
                return Err(format!("task '{}' has an empty title", task.id));
            }
            if !user_ids.contains(task.assignee_id.as_str()) {
                return Err(format!(
                    "task '{}' is assigned to unknown user '{}'",
                    task.id, task.assignee_id
                ));
            }
            if !task.history_consistent() {
                return Err(format!(
                    "task '{}' status history does not end with its status",
                    task.id
                ));
            }
        }
        Ok(())
    }

    /// Fixed demo board with due dates relative to `now`.
    pub fn seed(now: DateTime<Utc>) -> Self {
        let users = vec![
            seed_user("u-1", "Jordan Diaz", "jordan.diaz@example.com", "JD"),
            seed_user("u-2", "Priya Raman", "priya.raman@example.com", "PR"),
            seed_user("u-3", "Marcus Chen", "marcus.chen@example.com", "MC"),
            seed_user("u-4", "Elena Petrova", "elena.petrova@example.com", "EP"),
            seed_user("u-5", "Samuel Okafor", "samuel.okafor@example.com", "SO"),
        ];

        let seeds = [
            SeedTask {
                id: "task-1",
                title: "Follow up with Northwind on renewal",
                description: "Confirm pricing tier and send the updated contract.",
                assignee: 0,
                due_hours: Some(-30),
                priority: Priority::High,
                history: &[(Status::NotStarted, -96), (Status::InProgress, -72)],
            },
            SeedTask {
                id: "task-2",
                title: "Prepare Q3 pipeline review",
                description: "Aggregate open opportunities by stage for the sales sync.",
                assignee: 1,
                due_hours: Some(6),
                priority: Priority::High,
                history: &[(Status::NotStarted, -48), (Status::InProgress, -20)],
            },
            SeedTask {
                id: "task-3",
                title: "Onboard Contoso support contacts",
                description: "Create customer records and assign an account owner.",
                assignee: 2,
                due_hours: Some(30),
                priority: Priority::Medium,
                history: &[(Status::NotStarted, -24)],
            },
            SeedTask {
                id: "task-4",
                title: "Clean up duplicate customer records",
                description: "Merge duplicates flagged by the import job.",
                assignee: 3,
                due_hours: Some(-72),
                priority: Priority::Low,
                history: &[
                    (Status::NotStarted, -200),
                    (Status::InProgress, -150),
                    (Status::Completed, -80),
                ],
            },
            SeedTask {
                id: "task-5",
                title: "Schedule demo for Fabrikam",
                description: "Coordinate with solutions engineering for a slot.",
                assignee: 4,
                due_hours: Some(96),
                priority: Priority::Medium,
                history: &[(Status::NotStarted, -10), (Status::OnHold, -5)],
            },
            SeedTask {
                id: "task-6",
                title: "Draft onboarding email sequence",
                description: "",
                assignee: 1,
                due_hours: None,
                priority: Priority::Low,
                history: &[(Status::NotStarted, -6)],
            },
            SeedTask {
                id: "task-7",
                title: "Resolve billing escalation for Adventure Works",
                description: "Customer was double charged; coordinate refund with finance.",
                assignee: 0,
                due_hours: Some(-2),
                priority: Priority::High,
                history: &[(Status::NotStarted, -30)],
            },
            SeedTask {
                id: "task-8",
                title: "Update account health dashboard",
                description: "Add churn-risk column from the latest survey.",
                assignee: 2,
                due_hours: Some(20),
                priority: Priority::Medium,
                history: &[
                    (Status::NotStarted, -60),
                    (Status::InProgress, -40),
                    (Status::Completed, -1),
                ],
            },
        ];

        let tasks = seeds
            .iter()
            .map(|seed| seed.build(&users, now))
            .collect();

        Self { users, tasks }
    }
}

fn seed_user(id: &str, name: &str, email: &str, avatar: &str) -> User {
    User {
        id: id.to_string(),
        name: name.to_string(),
        email: email.to_string(),
        avatar: avatar.to_string(),
    }
}

struct SeedTask {
    id: &'static str,
    title: &'static str,
    description: &'static str,
    assignee: usize,
    due_hours: Option<i64>,
    priority: Priority,
    /// (status, hours relative to now), oldest first.
    history: &'static [(Status, i64)],
}

impl SeedTask {
    fn build(&self, users: &[User], now: DateTime<Utc>) -> Task {
        let user = &users[self.assignee];
        let status_history: Vec<StatusChange> = self
            .history
            .iter()
            .map(|(status, hours)| StatusChange {
                status: *status,
                timestamp: now + Duration::hours(*hours),
                actor: user.id.clone(),
            })
            .collect();
        let created_at = status_history
            .first()
            .map(|entry| entry.timestamp)
            .unwrap_or(now);
        let (status, updated_at) = status_history
            .last()
            .map(|entry| (entry.status, entry.timestamp))
            .unwrap_or((Status::NotStarted, now));

        Task {
            id: self.id.to_string(),
            title: self.title.to_string(),
            description: self.description.to_string(),
            assignee_id: user.id.clone(),
            assignee_name: user.name.clone(),
            due_date: self.due_hours.map(|hours| now + Duration::hours(hours)),
            priority: self.priority,
            status,
            created_at,
            updated_at,
            status_history,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn seed_is_internally_consistent() {
        let dataset = Dataset::seed(Utc::now());
        assert_eq!(dataset.users.len(), 5);
        assert_eq!(dataset.tasks.len(), 8);
        assert!(dataset.validate().is_ok());
        for status in Status::ALL {
            assert!(dataset.tasks.iter().any(|task| task.status == status));
        }
    }

    #[test]
    fn load_round_trips_seed_file() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("board.json");
        let dataset = Dataset::seed(Utc::now());
        std::fs::write(&path, serde_json::to_string_pretty(&dataset).expect("json"))
            .expect("write");

        let loaded = Dataset::load(&path).expect("load");
        assert_eq!(loaded.tasks, dataset.tasks);
        assert_eq!(loaded.users, dataset.users);
    }

    #[test]
    fn load_rejects_inconsistent_history() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("board.json");
        let mut dataset = Dataset::seed(Utc::now());
        dataset.tasks[0].status = Status::Completed;
        std::fs::write(&path, serde_json::to_string(&dataset).expect("json")).expect("write");

        match Dataset::load(&path) {
            Err(Error::InvalidData { message, .. }) => {
                assert!(message.contains("status history"))
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn load_rejects_unknown_assignee() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("board.json");
        let mut dataset = Dataset::seed(Utc::now());
        dataset.users.retain(|user| user.id != "u-5");
        std::fs::write(&path, serde_json::to_string(&dataset).expect("json")).expect("write");

        assert!(matches!(
            Dataset::load(&path),
            Err(Error::InvalidData { .. })
        ));
    }
}
