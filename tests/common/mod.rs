#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use serde_json::Value;
use tempfile::{TempDir, tempdir};

/// Scratch component data directory (`config.json`, `in/`, `out/`) that
/// cleans up on drop.
pub struct TestWorkspace {
    temp_dir: TempDir,
}

impl TestWorkspace {
    pub fn new() -> Self {
        let temp_dir = tempdir().expect("temp dir");
        fs::create_dir_all(temp_dir.path().join("in").join("tables")).expect("in/tables");
        Self { temp_dir }
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn write_config(&self, config: &Value) -> PathBuf {
        let path = self.path().join("config.json");
        fs::write(&path, serde_json::to_string_pretty(config).expect("config json"))
            .expect("write config");
        path
    }

    pub fn write_input(&self, contents: &str) -> PathBuf {
        let path = self.path().join("in").join("tables").join("input.csv");
        fs::write(&path, contents).expect("write input table");
        path
    }

    pub fn output_path(&self) -> PathBuf {
        self.path().join("out").join("tables").join("output.csv")
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.path()
            .join("out")
            .join("tables")
            .join("output.csv.manifest")
    }

    pub fn state_path(&self) -> PathBuf {
        self.path().join("out").join("state.json")
    }

    pub fn read_output(&self) -> String {
        fs::read_to_string(self.output_path()).expect("read output table")
    }

    pub fn read_json(&self, path: &Path) -> Value {
        serde_json::from_str(&fs::read_to_string(path).expect("read json")).expect("parse json")
    }

    /// Binary invocation pointed at this workspace with a clean log filter.
    pub fn command(&self) -> Command {
        let mut cmd = Command::cargo_bin("csv-row-index").expect("binary exists");
        cmd.env_remove("RUST_LOG")
            .env_remove("KBC_DATADIR")
            .arg("--data-dir")
            .arg(self.path());
        cmd
    }
}
