mod support;

use predicates::str::contains;

use support::{run_json, TestBoard};

#[test]
fn notifications_scan_issues_due_soon_reminder() -> Result<(), Box<dyn std::error::Error>> {
    let board = TestBoard::new()?;

    let mut cmd = board.cmd();
    cmd.arg("notifications");
    let value = run_json(cmd)?;
    let data = &value["data"];

    // task-2 is the only open task due within 24 hours.
    assert_eq!(data["total"], 1);
    assert_eq!(data["unread"], 1);
    let first = &data["notifications"][0];
    assert_eq!(first["taskId"], "task-2");
    assert_eq!(first["type"], "reminder");
    assert_eq!(first["read"], false);
    Ok(())
}

#[test]
fn notifications_respect_lead_time() -> Result<(), Box<dyn std::error::Error>> {
    let board = TestBoard::new()?;
    board.write_config("[reminders]\nlead_time_hours = 48\n")?;

    let mut cmd = board.cmd();
    cmd.args(["notifications", "--unread"]);
    let value = run_json(cmd)?;

    // task-2 (+6h) and task-3 (+30h); task-8 is completed.
    assert_eq!(value["data"]["total"], 2);
    Ok(())
}

#[test]
fn oversized_lead_time_is_a_config_error() -> Result<(), Box<dyn std::error::Error>> {
    let board = TestBoard::new()?;
    board.write_config("[reminders]\nlead_time_hours = 1000000000000\n")?;

    board
        .cmd()
        .arg("notifications")
        .assert()
        .code(2)
        .stderr(contains("lead_time_hours"));
    Ok(())
}

#[test]
fn notifications_skip_scan_when_disabled() -> Result<(), Box<dyn std::error::Error>> {
    let board = TestBoard::new()?;
    board.write_config("[reminders]\nenabled = false\n")?;

    let mut cmd = board.cmd();
    cmd.arg("notifications");
    let value = run_json(cmd)?;

    assert_eq!(value["data"]["total"], 0);
    assert!(value["warnings"][0]
        .as_str()
        .is_some_and(|warning| warning.contains("disabled")));
    Ok(())
}

#[test]
fn watch_runs_bounded_ticks() -> Result<(), Box<dyn std::error::Error>> {
    let board = TestBoard::new()?;

    let mut cmd = board.cmd();
    cmd.args(["watch", "--ticks", "2", "--interval-secs", "1"]);
    let value = run_json(cmd)?;
    let data = &value["data"];

    assert_eq!(data["ticks"], 2);
    assert_eq!(data["interval_secs"], 1);
    assert_eq!(data["reminders_created"], 1);
    assert_eq!(data["interrupted"], false);
    // Only the tick that created a reminder is kept.
    let reports = data["reports"].as_array().expect("reports");
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0]["tick"], 1);
    assert_eq!(reports[0]["created"].as_array().map(Vec::len), Some(1));
    Ok(())
}

#[test]
fn watch_streams_reminders_in_human_mode() -> Result<(), Box<dyn std::error::Error>> {
    let board = TestBoard::new()?;

    board
        .cmd()
        .args(["watch", "--ticks", "1", "--interval-secs", "1"])
        .assert()
        .success()
        .stdout(contains("tick 1: * [reminder]"))
        .stdout(contains("Reminders created: 1"));
    Ok(())
}

#[test]
fn watch_rejects_zero_interval() -> Result<(), Box<dyn std::error::Error>> {
    let board = TestBoard::new()?;

    board
        .cmd()
        .args(["watch", "--ticks", "1", "--interval-secs", "0"])
        .assert()
        .code(2)
        .stderr(contains("--interval-secs"));
    Ok(())
}
