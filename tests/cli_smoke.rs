use assert_cmd::Command;
use predicates::str::contains;

#[test]
fn taskboard_help_works() {
    Command::cargo_bin("taskboard")
        .expect("binary")
        .arg("--help")
        .assert()
        .success()
        .stdout(contains("in-memory task board"));
}

#[test]
fn subcommand_help_works() {
    let subcommands = [
        "list",
        "show",
        "stats",
        "users",
        "notifications",
        "watch",
        "apply",
    ];

    for cmd in subcommands {
        Command::cargo_bin("taskboard")
            .expect("binary")
            .arg(cmd)
            .arg("--help")
            .assert()
            .success();
    }
}
