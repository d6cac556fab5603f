//! Hook handlers invoked by the host around tool-use events.
//!
//! # Contract
//!
//! - Each handler takes the raw stdin payload and returns a
//!   `Result<HookOutcome>`; it never prints or exits itself.
//! - Only `HookOutcome::Block` maps to a non-zero exit. Errors are logged
//!   by the caller and treated as "continue".

pub mod analyzer;
pub mod event;
pub mod guard;
pub mod orchestrator;

use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::project::find_project_root;
use crate::{clog_warn, Result};

pub use analyzer::analyze_dependencies;
pub use guard::security_guard;
pub use orchestrator::orchestrate;

/// Text a hook wants shown to the host.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Output {
    pub stdout: Vec<String>,
    pub stderr: Vec<String>,
}

impl Output {
    pub fn stdout(lines: Vec<String>) -> Self {
        Self {
            stdout: lines,
            stderr: Vec::new(),
        }
    }

    pub fn stderr(lines: Vec<String>) -> Self {
        Self {
            stdout: Vec::new(),
            stderr: lines,
        }
    }

    pub fn emit(&self) {
        for line in &self.stdout {
            println!("{}", line);
        }
        for line in &self.stderr {
            eprintln!("{}", line);
        }
    }
}

/// Result of running a hook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HookOutcome {
    /// Nothing to do; the operation proceeds silently.
    Pass,
    /// Advisory output; the operation proceeds.
    Report(Output),
    /// The operation must not proceed.
    Block(Output),
}

impl HookOutcome {
    pub fn exit_code(&self) -> u8 {
        match self {
            HookOutcome::Block(_) => 1,
            HookOutcome::Pass | HookOutcome::Report(_) => 0,
        }
    }

    pub fn is_block(&self) -> bool {
        matches!(self, HookOutcome::Block(_))
    }

    pub fn output(&self) -> Option<&Output> {
        match self {
            HookOutcome::Pass => None,
            HookOutcome::Report(out) | HookOutcome::Block(out) => Some(out),
        }
    }

    pub fn emit(&self) {
        if let Some(out) = self.output() {
            out.emit();
        }
    }
}

/// Project root and its configuration, when a `.claude` directory exists.
///
/// A broken config file is logged and replaced by defaults so that a
/// typo never disables the guard outright.
pub fn project_config(start: &Path) -> Option<(PathBuf, Config)> {
    let root = find_project_root(start).ok()?;
    let config = load_or_default(&root);
    Some((root, config))
}

fn load_or_default(root: &Path) -> Config {
    match Config::load(root) {
        Ok(config) => config,
        Err(e) => {
            clog_warn!("Ignoring unreadable config in {}: {}", root.display(), e);
            Config::default()
        }
    }
}

/// Resolve the project root strictly, for hooks that write state.
pub fn require_project(start: &Path) -> Result<(PathBuf, Config)> {
    let root = find_project_root(start)?;
    let config = Config::load(&root)?;
    Ok((root, config))
}
