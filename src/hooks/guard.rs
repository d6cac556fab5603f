//! Security guard hook.
//!
//! `Bash` commands matching a command rule are blocked. `Read`, `Edit`
//! and `Write` on a sensitive path produce a warning but proceed.

use std::path::Path;

use super::event::ToolEvent;
use super::{project_config, HookOutcome, Output};
use crate::security::{SecurityGuard, SAFER_ALTERNATIVES};
use crate::{clog, clog_debug, clog_warn, Result};

const FILE_TOOLS: &[&str] = &["Edit", "Write", "Read"];

pub fn security_guard(input: &str, cwd: &Path) -> Result<HookOutcome> {
    let event = ToolEvent::parse(input)?;
    let start = event.cwd.as_deref().unwrap_or(cwd);

    let guard = match project_config(start) {
        Some((_, config)) => SecurityGuard::from_config(&config.security).or_else(|e| {
            clog_warn!("Invalid user security rule, using built-ins only: {}", e);
            SecurityGuard::builtin()
        })?,
        None => SecurityGuard::builtin()?,
    };

    Ok(evaluate(&guard, &event))
}

/// Apply the guard to an already decoded event.
pub fn evaluate(guard: &SecurityGuard, event: &ToolEvent) -> HookOutcome {
    if event.tool_name == "Bash" {
        let Some(command) = event.tool_input.command.as_deref() else {
            return HookOutcome::Pass;
        };
        return match guard.check_command(command) {
            Some(rule) => {
                clog!("Blocked command ({}): {}", rule.reason(), command);
                HookOutcome::Block(Output::stderr(block_message(rule.reason(), command)))
            }
            None => {
                clog_debug!("Command allowed: {}", command);
                HookOutcome::Pass
            }
        };
    }

    if FILE_TOOLS.contains(&event.tool_name.as_str()) {
        if let Some(path) = event.tool_input.file_path.as_deref() {
            if let Some(rule) = guard.check_path(path) {
                clog!("Sensitive file access via {} ({}): {}", event.tool_name, rule.reason(), path);
                return HookOutcome::Report(Output::stdout(vec![
                    format!("⚠️ WARNING: Accessing sensitive file: {}", path),
                    format!("Detected: {}", rule.reason()),
                    "Please ensure this operation is intentional".to_string(),
                ]));
            }
        }
    }

    HookOutcome::Pass
}

fn block_message(reason: &str, command: &str) -> Vec<String> {
    let mut lines = vec![
        format!("⛔ SECURITY BLOCK: {}", reason),
        format!("Dangerous command detected: {}", command),
        String::new(),
        "Suggested safer alternatives:".to_string(),
    ];
    lines.extend(SAFER_ALTERNATIVES.iter().map(|s| format!("- {}", s)));
    lines
}
