#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use chrono::Utc;
use serde_json::Value;
use taskboard::dataset::Dataset;
use tempfile::TempDir;

/// Scratch directory acting as the taskboard working directory.
pub struct TestBoard {
    dir: TempDir,
}

impl TestBoard {
    pub fn new() -> std::io::Result<Self> {
        Ok(Self {
            dir: tempfile::tempdir()?,
        })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn write_file(&self, rel_path: &str, contents: &str) -> std::io::Result<PathBuf> {
        let path = self.dir.path().join(rel_path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, contents)?;
        Ok(path)
    }

    pub fn write_config(&self, contents: &str) -> std::io::Result<PathBuf> {
        self.write_file(".taskboard.toml", contents)
    }

    /// Write the demo seed to `board.json` and return its path.
    pub fn write_seed(&self) -> Result<PathBuf, Box<dyn std::error::Error>> {
        let dataset = Dataset::seed(Utc::now());
        let json = serde_json::to_string_pretty(&dataset)?;
        Ok(self.write_file("board.json", &json)?)
    }

    pub fn cmd(&self) -> Command {
        let mut cmd = taskboard_cmd();
        cmd.current_dir(self.path());
        cmd
    }
}

pub fn taskboard_cmd() -> Command {
    let mut cmd = Command::cargo_bin("taskboard").expect("taskboard binary");
    cmd.env_remove("TASKBOARD_ACTOR")
        .env_remove("TASKBOARD_DIR")
        .env_remove("RUST_LOG");
    cmd
}

/// Run a command with `--json` and return the parsed envelope.
pub fn run_json(mut cmd: Command) -> Result<Value, Box<dyn std::error::Error>> {
    let output = cmd.arg("--json").assert().success().get_output().stdout.clone();
    Ok(serde_json::from_slice(&output)?)
}

pub fn task_ids(value: &Value) -> Vec<String> {
    value["data"]["tasks"]
        .as_array()
        .map(|tasks| {
            tasks
                .iter()
                .filter_map(|task| task["id"].as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}
