//! Test fixtures for integration tests.
//!
//! Provides helpers for:
//! - Creating temporary projects with a `.claude` directory
//! - Running the binary with a stdin payload

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tempfile::TempDir;

/// A temporary project with a `.claude` directory.
pub struct TestProject {
    /// The temporary directory containing the project.
    pub temp_dir: TempDir,
    /// Path to the project root.
    pub path: PathBuf,
}

impl TestProject {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().to_path_buf();
        std::fs::create_dir_all(path.join(".claude")).expect("Failed to create .claude");
        Self { temp_dir, path }
    }

    /// A project with the `parallel` feature switched on through the CLI.
    pub fn with_parallel() -> Self {
        let project = Self::new();
        let out = run_cli(&["enable", "parallel"], &project.path);
        assert_eq!(out.code, 0, "enable failed: {}", out.stderr);
        project
    }

    pub fn claude_dir(&self) -> PathBuf {
        self.path.join(".claude")
    }

    /// Session directories created under `.claude/tasks`.
    pub fn session_dirs(&self) -> Vec<PathBuf> {
        match std::fs::read_dir(self.claude_dir().join("tasks")) {
            Ok(entries) => entries
                .filter_map(|e| e.ok())
                .map(|e| e.path())
                .filter(|p| p.is_dir())
                .collect(),
            Err(_) => Vec::new(),
        }
    }
}

/// Captured result of one binary invocation.
#[derive(Debug)]
pub struct RunOutput {
    pub code: i32,
    pub stdout: String,
    pub stderr: String,
}

/// Run a hook subcommand with `stdin` piped in, from `cwd`.
///
/// `HOME` points at `cwd` so the log file stays inside the temp dir.
pub fn run_hook(args: &[&str], stdin: &str, cwd: &Path) -> RunOutput {
    let mut child = Command::new(env!("CARGO_BIN_EXE_claudook"))
        .args(args)
        .current_dir(cwd)
        .env("HOME", cwd)
        .env_remove("CLAUDOOK_DEBUG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to spawn claudook");

    child
        .stdin
        .take()
        .expect("stdin piped")
        .write_all(stdin.as_bytes())
        .expect("Failed to write stdin");

    let output = child.wait_with_output().expect("Failed to wait for claudook");
    RunOutput {
        code: output.status.code().unwrap_or(-1),
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    }
}

/// Run a non-hook subcommand with empty stdin.
pub fn run_cli(args: &[&str], cwd: &Path) -> RunOutput {
    run_hook(args, "", cwd)
}

/// A scratch directory with no `.claude` anywhere inside it.
pub fn bare_dir() -> TempDir {
    TempDir::new().expect("Failed to create temp directory")
}
