//! Markdown and JSON reports for an orchestration session.
//!
//! Reports are human-facing dashboards. Only `tasks.json` is meant to be
//! read back by tools.

use chrono::{DateTime, Utc};
use serde_json::json;
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::{Priority, Schedule, Task, TaskDAG, TaskId, TaskStatus};
use crate::{clog_debug, Result};

const PROGRESS_BAR_WIDTH: usize = 20;

/// Paths written by [`SessionReport::write`].
#[derive(Debug, Clone)]
pub struct ReportPaths {
    pub session_dir: PathBuf,
    pub master: PathBuf,
    pub dashboard: PathBuf,
    pub github: PathBuf,
    pub snapshot: PathBuf,
    /// Copy of the master list at the top of the tasks directory.
    pub latest_master: PathBuf,
}

pub struct SessionReport<'a> {
    session_id: String,
    created_at: DateTime<Utc>,
    dag: &'a TaskDAG,
    schedule: &'a Schedule,
}

impl<'a> SessionReport<'a> {
    pub fn new(session_id: &str, dag: &'a TaskDAG, schedule: &'a Schedule) -> Self {
        Self {
            session_id: session_id.to_string(),
            created_at: Utc::now(),
            dag,
            schedule,
        }
    }

    fn deps_suffix(&self, task: &Task) -> String {
        let mut deps: Vec<String> = self
            .dag
            .dependencies_of(&task.id)
            .iter()
            .map(|id| id.to_string())
            .collect();
        deps.extend(
            self.dag
                .missing_references(&task.id)
                .iter()
                .map(|id| format!("{} (missing)", id)),
        );
        if deps.is_empty() {
            String::new()
        } else {
            format!(" (depends on: {})", deps.join(", "))
        }
    }

    fn title_of(&self, id: &TaskId) -> String {
        self.dag
            .get_task(id)
            .map(|t| t.title.clone())
            .unwrap_or_else(|| id.to_string())
    }

    pub fn master_markdown(&self) -> String {
        let tasks = self.dag.all_tasks();
        let mut out = String::from("# Master Task List\n\n");
        let _ = writeln!(out, "**Session:** {}", self.session_id);
        let _ = writeln!(out, "**Created:** {}", self.created_at.to_rfc3339());
        let _ = writeln!(out, "**Total Tasks:** {}\n", tasks.len());

        for priority in [Priority::High, Priority::Medium, Priority::Low] {
            let group: Vec<&&Task> = tasks.iter().filter(|t| t.priority == priority).collect();
            if group.is_empty() {
                continue;
            }
            let label = match priority {
                Priority::High => "High",
                Priority::Medium => "Medium",
                Priority::Low => "Low",
            };
            let _ = writeln!(out, "## {} Priority\n", label);
            for task in group {
                let checkbox = if task.is_finished() { "[x]" } else { "[ ]" };
                let _ = writeln!(out, "- {} **{}**{}", checkbox, task.title, self.deps_suffix(task));
                let _ = writeln!(out, "  - ID: {}", task.id);
                if !task.description.is_empty() {
                    let _ = writeln!(out, "  - {}", task.description);
                }
                out.push('\n');
            }
        }

        if !self.schedule.groups.is_empty() {
            out.push_str("## Parallel Execution Plan\n\n");
            for group in &self.schedule.groups {
                let _ = writeln!(out, "### Stage {}", group.stage + 1);
                out.push_str(if group.is_parallel() {
                    "Tasks that can run in parallel:\n"
                } else {
                    "Sequential:\n"
                });
                for id in &group.tasks {
                    let _ = writeln!(out, "- {}", self.title_of(id));
                }
                out.push('\n');
            }
        }

        if !self.schedule.is_complete() {
            out.push_str("## ⚠️ Circular or Unresolved Dependencies\n\n");
            out.push_str("These tasks could not be scheduled:\n");
            for id in &self.schedule.unresolved {
                let _ = writeln!(out, "- {} ({})", self.title_of(id), id);
            }
            out.push('\n');
        }

        out
    }

    pub fn dashboard_markdown(&self) -> String {
        let tasks = self.dag.all_tasks();
        let count = |status: TaskStatus| tasks.iter().filter(|t| t.status == status).count();
        let pending = count(TaskStatus::Pending);
        let in_progress = count(TaskStatus::InProgress);
        let completed = count(TaskStatus::Completed);

        let mut out = String::from("# Execution Dashboard\n\n");
        let _ = writeln!(out, "**Session:** {}", self.session_id);
        let _ = writeln!(out, "**Last Updated:** {}\n", self.created_at.to_rfc3339());

        out.push_str("## Status Overview\n\n```\n");
        let _ = writeln!(out, "📋 Pending:     {}", pending);
        let _ = writeln!(out, "🔄 In Progress: {}", in_progress);
        let _ = writeln!(out, "✅ Completed:   {}", completed);
        out.push_str("```\n\n");

        let progress = progress_percent(completed, tasks.len());
        let _ = writeln!(out, "## Progress\n\n{} {}%\n", progress_bar(progress), progress);

        let current = self.schedule.groups.iter().find(|g| {
            g.tasks.iter().any(|id| {
                self.dag
                    .get_task(id)
                    .is_some_and(|t| t.status == TaskStatus::InProgress)
            })
        });
        if let Some(stage) = current {
            let _ = writeln!(out, "## Current Stage: {}\n", stage.stage + 1);
            out.push_str("Running in parallel:\n");
            for id in &stage.tasks {
                if let Some(task) = self.dag.get_task(id) {
                    let icon = match task.status {
                        TaskStatus::Completed => "✅",
                        TaskStatus::InProgress => "🔄",
                        TaskStatus::Pending => "⏳",
                    };
                    let _ = writeln!(out, "- {} {}", icon, task.title);
                }
            }
            out.push('\n');
        }

        out.push_str("## Task Details\n\n");
        for task in &tasks {
            let _ = writeln!(out, "### {} {}", task.status.icon(), task.title);
            let _ = writeln!(out, "- **ID:** {}", task.id);
            let _ = writeln!(out, "- **Status:** {}", task.status);
            let _ = writeln!(out, "- **Priority:** {}", task.priority);
            let deps = self.dag.dependencies_of(&task.id);
            if !deps.is_empty() {
                let deps: Vec<&str> = deps.iter().map(|d| d.as_str()).collect();
                let _ = writeln!(out, "- **Dependencies:** {}", deps.join(", "));
            }
            out.push('\n');
        }

        out
    }

    pub fn github_markdown(&self) -> String {
        let mut out = String::from("# GitHub Task List\n\nCopy this to your GitHub issue or PR:\n\n---\n\n");
        for task in self.dag.all_tasks() {
            let checkbox = if task.is_finished() { "- [x]" } else { "- [ ]" };
            let lower = task.title.to_lowercase();
            let mut labels = Vec::new();
            if task.priority == Priority::High {
                labels.push("priority:high");
            }
            if lower.contains("bug") {
                labels.push("bug");
            }
            if lower.contains("feature") {
                labels.push("enhancement");
            }
            let labels = if labels.is_empty() {
                String::new()
            } else {
                format!(" [{}]", labels.join(", "))
            };
            let _ = writeln!(out, "{} {}{}", checkbox, task.title, labels);
        }
        out
    }

    pub fn snapshot_json(&self) -> Result<String> {
        let tasks: Vec<serde_json::Value> = self
            .dag
            .all_tasks()
            .into_iter()
            .map(|task| -> Result<serde_json::Value> {
                let mut value = serde_json::to_value(task)?;
                value["dependencies"] = serde_json::to_value(self.dag.dependencies_of(&task.id))?;
                Ok(value)
            })
            .collect::<Result<_>>()?;

        let snapshot = json!({
            "session": self.session_id,
            "created": self.created_at.to_rfc3339(),
            "tasks": tasks,
            "groups": self.schedule.groups,
            "unresolved": self.schedule.unresolved,
            "cycles": self.schedule.cycles,
        });
        Ok(serde_json::to_string_pretty(&snapshot)?)
    }

    /// Write all reports under `tasks_dir/session_<id>/` and refresh the
    /// top-level master copy.
    pub fn write(&self, tasks_dir: &Path) -> Result<ReportPaths> {
        let session_dir = tasks_dir.join(format!("session_{}", self.session_id));
        fs::create_dir_all(&session_dir)?;

        let paths = ReportPaths {
            master: session_dir.join("MASTER_TASKS.md"),
            dashboard: session_dir.join("EXECUTION_DASHBOARD.md"),
            github: session_dir.join("GITHUB_TASKS.md"),
            snapshot: session_dir.join("tasks.json"),
            latest_master: tasks_dir.join("MASTER_TASKS.md"),
            session_dir,
        };

        let master = self.master_markdown();
        fs::write(&paths.master, &master)?;
        fs::write(&paths.dashboard, self.dashboard_markdown())?;
        fs::write(&paths.github, self.github_markdown())?;
        fs::write(&paths.snapshot, self.snapshot_json()?)?;
        fs::write(&paths.latest_master, master)?;

        clog_debug!("Reports written to {}", paths.session_dir.display());
        Ok(paths)
    }
}

fn progress_percent(done: usize, total: usize) -> usize {
    if total == 0 {
        0
    } else {
        (done * 100 + total / 2) / total
    }
}

fn progress_bar(percent: usize) -> String {
    let filled = (percent * PROGRESS_BAR_WIDTH + 50) / 100;
    format!(
        "[{}{}]",
        "█".repeat(filled),
        "░".repeat(PROGRESS_BAR_WIDTH - filled)
    )
}
