//! Command and file-path screening.
//!
//! The guard is illustrative, not a sandbox: it catches a short list of
//! well-known destructive commands and warns on obviously sensitive files.

pub mod rules;

pub use rules::{RuleTable, SecurityRule};

use crate::config::SecurityConfig;
use crate::Result;

/// Generic advice printed alongside every blocked command.
pub const SAFER_ALTERNATIVES: &[&str] = &[
    "Use specific paths instead of /",
    "Create backups before deletion",
    "Use trash instead of rm for recovery",
];

#[derive(Debug, Clone)]
pub struct SecurityGuard {
    commands: RuleTable,
    sensitive_paths: RuleTable,
}

impl SecurityGuard {
    /// Guard with only the built-in tables.
    pub fn builtin() -> Result<Self> {
        Ok(Self {
            commands: RuleTable::builtin_commands()?,
            sensitive_paths: RuleTable::builtin_sensitive_paths()?,
        })
    }

    /// Built-in tables with the configured user rules appended.
    pub fn from_config(config: &SecurityConfig) -> Result<Self> {
        let mut guard = Self::builtin()?;
        guard.commands.extend_from_specs(&config.command_rules)?;
        guard
            .sensitive_paths
            .extend_from_specs(&config.sensitive_paths)?;
        Ok(guard)
    }

    /// First command rule that matches, if any. `None` means "not blocked",
    /// not "verified safe".
    pub fn check_command(&self, command: &str) -> Option<&SecurityRule> {
        if command.trim().is_empty() {
            return None;
        }
        self.commands.first_match(command)
    }

    pub fn check_path(&self, path: &str) -> Option<&SecurityRule> {
        if path.trim().is_empty() {
            return None;
        }
        self.sensitive_paths.first_match(path)
    }

    pub fn command_rules(&self) -> &RuleTable {
        &self.commands
    }
}
