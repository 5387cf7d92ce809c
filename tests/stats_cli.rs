mod support;

use predicates::str::contains;
use serde_json::Value;

use support::{run_json, TestBoard};

fn status_count(stats: &Value, status: &str) -> u64 {
    stats["by_status"]
        .as_array()
        .expect("status array")
        .iter()
        .find(|entry| entry["status"].as_str() == Some(status))
        .and_then(|entry| entry["count"].as_u64())
        .unwrap_or(0)
}

fn priority_count(stats: &Value, priority: &str) -> u64 {
    stats["by_priority"]
        .as_array()
        .expect("priority array")
        .iter()
        .find(|entry| entry["priority"].as_str() == Some(priority))
        .and_then(|entry| entry["count"].as_u64())
        .unwrap_or(0)
}

#[test]
fn stats_reports_seed_metrics() -> Result<(), Box<dyn std::error::Error>> {
    let board = TestBoard::new()?;

    let mut cmd = board.cmd();
    cmd.arg("stats");
    let value = run_json(cmd)?;
    let stats = &value["data"];

    assert_eq!(stats["total"], 8);
    assert_eq!(status_count(stats, "Not Started"), 3);
    assert_eq!(status_count(stats, "In Progress"), 2);
    assert_eq!(status_count(stats, "Completed"), 2);
    assert_eq!(status_count(stats, "On Hold"), 1);
    assert_eq!(priority_count(stats, "High"), 3);
    assert_eq!(priority_count(stats, "Medium"), 3);
    assert_eq!(priority_count(stats, "Low"), 2);
    assert_eq!(stats["overdue"], 2);
    assert_eq!(stats["completion_rate"], 25.0);
    Ok(())
}

#[test]
fn stats_ignore_list_filters() -> Result<(), Box<dyn std::error::Error>> {
    let board = TestBoard::new()?;

    // Filters only exist on `list`; stats always see the whole store.
    let mut list = board.cmd();
    list.args(["list", "--status", "completed"]);
    let listed = run_json(list)?;
    assert_eq!(listed["data"]["total"], 2);

    let mut stats = board.cmd();
    stats.arg("stats");
    let value = run_json(stats)?;
    assert_eq!(value["data"]["total"], 8);
    Ok(())
}

#[test]
fn stats_human_output() -> Result<(), Box<dyn std::error::Error>> {
    let board = TestBoard::new()?;

    board
        .cmd()
        .arg("stats")
        .assert()
        .success()
        .stdout(contains("Board stats"))
        .stdout(contains("Completion: 25.00%"))
        .stdout(contains("Not Started=3"));
    Ok(())
}

#[test]
fn quiet_suppresses_human_output() -> Result<(), Box<dyn std::error::Error>> {
    let board = TestBoard::new()?;

    let output = board
        .cmd()
        .args(["stats", "--quiet"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    assert!(output.is_empty());
    Ok(())
}
