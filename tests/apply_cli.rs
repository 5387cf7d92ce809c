mod support;

use predicates::str::contains;
use serde_json::Value;

use support::{run_json, TestBoard};

const SCRIPT: &str = r#"# new task for Priya, then close out the billing escalation
{"op":"create","draft":{"title":"Call Northwind","assigneeId":"u-2","priority":"High"}}
{"op":"update","id":"task-7","patch":{"status":"Completed"}}

{"op":"delete","id":"task-3"}
{"op":"delete","id":"task-3"}
{"op":"tick"}
"#;

#[test]
fn apply_runs_script_and_reports_side_effects() -> Result<(), Box<dyn std::error::Error>> {
    let board = TestBoard::new()?;
    let script = board.write_file("ops.jsonl", SCRIPT)?;

    let mut cmd = board.cmd();
    cmd.arg("apply").arg(&script);
    let value = run_json(cmd)?;
    let data = &value["data"];

    let ops = data["operations"].as_array().expect("operations");
    let names: Vec<&str> = ops.iter().filter_map(|op| op["op"].as_str()).collect();
    assert_eq!(names, vec!["create", "update", "delete", "delete", "tick"]);

    let created_id = ops[0]["task_id"].as_str().expect("created id");
    assert!(created_id.starts_with("task-"));
    assert_eq!(ops[0]["notifications_created"], 1);
    assert_eq!(ops[1]["notifications_created"], 1);
    assert_eq!(ops[2]["applied"], true);
    assert_eq!(ops[3]["applied"], false);
    assert_eq!(ops[4]["notifications_created"], 1);

    assert_eq!(data["tasks_total"], 8);
    assert_eq!(data["unread_notifications"], 3);
    assert_eq!(data["stats"]["completion_rate"], 37.5);
    Ok(())
}

#[test]
fn apply_uses_configured_id_prefix() -> Result<(), Box<dyn std::error::Error>> {
    let board = TestBoard::new()?;
    board.write_config("[tasks]\nid_prefix = \"crm\"\n")?;
    let script = board.write_file(
        "ops.jsonl",
        r#"{"op":"create","draft":{"title":"Log call","assigneeId":"u-1"}}"#,
    )?;

    let mut cmd = board.cmd();
    cmd.arg("apply").arg(&script);
    let value = run_json(cmd)?;
    let op = &value["data"]["operations"][0];

    assert!(op["task_id"]
        .as_str()
        .is_some_and(|id| id.starts_with("crm-")));
    // Self-assignment raises no notification.
    assert_eq!(op["notifications_created"], 0);
    Ok(())
}

#[test]
fn apply_stops_at_unknown_task() -> Result<(), Box<dyn std::error::Error>> {
    let board = TestBoard::new()?;
    let script = board.write_file(
        "ops.jsonl",
        r#"{"op":"update","id":"task-404","patch":{"title":"Nope"}}"#,
    )?;

    let output = board
        .cmd()
        .arg("apply")
        .arg(&script)
        .arg("--json")
        .assert()
        .code(2)
        .get_output()
        .stdout
        .clone();
    let value: Value = serde_json::from_slice(&output)?;
    assert_eq!(value["error"]["details"]["task_id"], "task-404");
    Ok(())
}

#[test]
fn apply_rejects_malformed_line() -> Result<(), Box<dyn std::error::Error>> {
    let board = TestBoard::new()?;
    let script = board.write_file("ops.jsonl", "{\"op\":\"tick\"}\n{\"op\":\"explode\"}\n")?;

    board
        .cmd()
        .arg("apply")
        .arg(&script)
        .assert()
        .code(2)
        .stderr(contains("script line 2"));
    Ok(())
}

#[test]
fn apply_rejects_unknown_assignee() -> Result<(), Box<dyn std::error::Error>> {
    let board = TestBoard::new()?;
    let script = board.write_file(
        "ops.jsonl",
        r#"{"op":"create","draft":{"title":"Orphan","assigneeId":"u-42"}}"#,
    )?;

    board
        .cmd()
        .arg("apply")
        .arg(&script)
        .assert()
        .code(2)
        .stderr(contains("Unknown user: u-42"));
    Ok(())
}
