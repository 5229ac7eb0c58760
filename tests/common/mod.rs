//! Shared helpers for the integration and unit suites.

#![allow(dead_code)]

use assert_cmd::Command;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A throwaway working directory with its own settings location.
///
/// Commands run from it never see the developer's real `config.json`.
pub struct TestSandbox {
    temp: TempDir,
}

impl TestSandbox {
    pub fn new() -> Self {
        Self {
            temp: TempDir::new().expect("create temp dir"),
        }
    }

    pub fn path(&self) -> &Path {
        self.temp.path()
    }

    pub fn config_dir(&self) -> PathBuf {
        self.temp.path().join("config")
    }

    pub fn config_path(&self) -> PathBuf {
        self.config_dir().join("config.json")
    }

    pub fn report_path(&self) -> PathBuf {
        self.config_dir().join("update-report.txt")
    }

    pub fn write_config(&self, json: &str) {
        std::fs::create_dir_all(self.config_dir()).expect("create config dir");
        std::fs::write(self.config_path(), json).expect("write config");
    }

    pub fn write_report(&self, reason: &str) {
        std::fs::create_dir_all(self.config_dir()).expect("create config dir");
        std::fs::write(self.report_path(), reason).expect("write report");
    }

    /// `locres-studio` with the sandbox as working directory and settings location.
    pub fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("locres-studio").expect("binary built");
        cmd.current_dir(self.path())
            .env("LOCRES_STUDIO_CONFIG", self.config_path())
            .env("NO_COLOR", "1")
            .env_remove("LOCRES_STUDIO_NO_UPDATE")
            .env_remove("RUST_LOG");
        cmd
    }
}

/// Whether every tool is on `PATH`; prints a skip notice otherwise.
pub fn tools_available(tools: &[&str]) -> bool {
    match tools.iter().find(|tool| which::which(tool).is_err()) {
        Some(missing) => {
            eprintln!("skipping: {missing} not found in PATH");
            false
        }
        None => true,
    }
}
