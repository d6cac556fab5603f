//! Task orchestrator hook.
//!
//! Turns a TodoWrite list or a user prompt into tasks, schedules them
//! into parallel stages and writes the session reports. Does nothing
//! unless the `parallel` feature is enabled for the project.

use chrono::Local;
use regex::Regex;
use std::path::Path;

use super::event::{event_cwd, parse_object, task_source, TaskSource, Todo};
use super::{require_project, HookOutcome, Output};
use crate::config::Feature;
use crate::core::{Task, TaskDAG, TaskId, TaskStatus};
use crate::report::SessionReport;
use crate::{clog, clog_debug, Error, Result};

const ACTION_PATTERN: &str = r"(?i)\b(?:implement|create|build|update|fix|add|test|document)\s+[\w\s]+";

const COMPLEX_KEYWORDS: &[&str] = &["implement", "create", "build", "refactor", "integrate", "deploy"];
const MEDIUM_KEYWORDS: &[&str] = &["update", "modify", "fix", "add", "change"];

/// Minimum number of tasks a prompt must yield before anything is written.
const MIN_PROMPT_TASKS: usize = 2;

/// Rough size of a request: 3 complex, 2 medium, 1 simple.
pub fn analyze_complexity(prompt: &str) -> u8 {
    let lower = prompt.to_lowercase();
    if COMPLEX_KEYWORDS.iter().any(|k| lower.contains(k)) {
        3
    } else if MEDIUM_KEYWORDS.iter().any(|k| lower.contains(k)) {
        2
    } else {
        1
    }
}

/// Split a prompt into one task per action phrase.
///
/// Simple prompts (complexity 1) yield no tasks.
pub fn decompose(prompt: &str) -> Result<Vec<Task>> {
    if analyze_complexity(prompt) < 2 {
        return Ok(Vec::new());
    }

    let re = Regex::new(ACTION_PATTERN).map_err(|source| Error::InvalidPattern {
        pattern: ACTION_PATTERN.to_string(),
        source,
    })?;

    Ok(re
        .find_iter(prompt)
        .map(|m| m.as_str().trim())
        .filter(|action| !action.is_empty())
        .map(|action| {
            Task::new(TaskId::generate(), action).with_description(&format!("Task: {}", action))
        })
        .collect())
}

/// Convert TodoWrite entries into tasks with fresh ids.
pub fn todos_to_tasks(todos: &[Todo]) -> Vec<Task> {
    todos
        .iter()
        .map(|todo| {
            let title = todo
                .content
                .as_deref()
                .or(todo.title.as_deref())
                .filter(|t| !t.trim().is_empty())
                .unwrap_or("Task");
            let description = todo
                .active_form
                .as_deref()
                .or(todo.content.as_deref())
                .unwrap_or_default();

            let mut task = Task::new(TaskId::generate(), title).with_description(description);
            if let Some(status) = todo.status.as_deref().and_then(TaskStatus::parse) {
                task.set_status(status);
            }
            task
        })
        .collect()
}

pub fn orchestrate(input: &str, cwd: &Path) -> Result<HookOutcome> {
    let value = parse_object(input)?;
    let start = event_cwd(&value).unwrap_or_else(|| cwd.to_path_buf());
    let (root, config) = require_project(&start)?;

    if !config.is_enabled(Feature::Parallel) {
        clog_debug!("Parallel feature disabled; orchestrator idle");
        return Ok(HookOutcome::Pass);
    }

    let tasks = match task_source(&value) {
        Some(TaskSource::Todos(todos)) => todos_to_tasks(&todos),
        Some(TaskSource::Prompt(prompt)) => {
            let tasks = decompose(&prompt)?;
            if tasks.len() < MIN_PROMPT_TASKS {
                clog_debug!("Prompt yielded {} task(s); nothing to orchestrate", tasks.len());
                return Ok(HookOutcome::Pass);
            }
            tasks
        }
        None => return Ok(HookOutcome::Pass),
    };

    let dag = TaskDAG::from_tasks(tasks);
    let schedule = dag.schedule();
    let session_id = Local::now().format("%Y%m%d_%H%M%S").to_string();
    let paths = SessionReport::new(&session_id, &dag, &schedule).write(&config.tasks_dir(&root))?;

    clog!(
        "Session {}: {} tasks in {} stages",
        session_id,
        dag.task_count(),
        schedule.groups.len()
    );

    let mut lines = vec![
        format!("📋 Task Orchestrator: Created {} tasks", dag.task_count()),
        format!("📁 Tasks saved to: {}/", paths.session_dir.display()),
        format!("🚀 Parallel execution groups: {}", schedule.groups.len()),
    ];
    if !schedule.is_complete() {
        lines.push(format!(
            "⚠️ {} task(s) could not be scheduled",
            schedule.unresolved.len()
        ));
    }
    Ok(HookOutcome::Report(Output::stdout(lines)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{toggle_feature, Config};
    use serde_json::json;
    use std::fs;
    use tempfile::TempDir;

    fn project(parallel: bool) -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join(".claude")).unwrap();
        if parallel {
            toggle_feature(dir.path(), Feature::Parallel, true).unwrap();
        }
        dir
    }

    fn session_dirs(root: &Path) -> Vec<std::path::PathBuf> {
        let tasks_dir = Config::load(root).unwrap().tasks_dir(root);
        match fs::read_dir(tasks_dir) {
            Ok(entries) => entries
                .filter_map(|e| e.ok())
                .map(|e| e.path())
                .filter(|p| p.is_dir())
                .collect(),
            Err(_) => Vec::new(),
        }
    }

    #[test]
    fn test_analyze_complexity() {
        assert_eq!(analyze_complexity("Implement the parser"), 3);
        assert_eq!(analyze_complexity("please DEPLOY it"), 3);
        assert_eq!(analyze_complexity("fix the typo"), 2);
        assert_eq!(analyze_complexity("what time is it"), 1);
    }

    #[test]
    fn test_decompose_action_phrases() {
        let tasks =
            decompose("Implement user authentication, create tests, and document the API").unwrap();
        let titles: Vec<&str> = tasks.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(
            titles,
            vec!["Implement user authentication", "create tests", "document the API"]
        );
        assert_eq!(tasks[0].description, "Task: Implement user authentication");
        assert_ne!(tasks[0].id, tasks[1].id);
    }

    #[test]
    fn test_decompose_simple_prompt_is_empty() {
        assert!(decompose("test the thing").unwrap().is_empty());
        assert!(decompose("hello there").unwrap().is_empty());
    }

    #[test]
    fn test_decompose_ignores_mid_word_matches() {
        // "fix" inside "prefix" must not start an action phrase.
        let tasks = decompose("Implement search, prefix tests").unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].title, "Implement search");
    }

    #[test]
    fn test_todos_to_tasks() {
        let todos = vec![
            Todo {
                content: Some("Write parser".into()),
                active_form: Some("Writing parser".into()),
                status: Some("in_progress".into()),
                ..Default::default()
            },
            Todo {
                title: Some("Fallback title".into()),
                ..Default::default()
            },
            Todo::default(),
        ];
        let tasks = todos_to_tasks(&todos);
        assert_eq!(tasks[0].title, "Write parser");
        assert_eq!(tasks[0].description, "Writing parser");
        assert_eq!(tasks[0].status, TaskStatus::InProgress);
        assert_eq!(tasks[1].title, "Fallback title");
        assert_eq!(tasks[1].status, TaskStatus::Pending);
        assert_eq!(tasks[2].title, "Task");
        assert_eq!(tasks[2].description, "");
    }

    #[test]
    fn test_orchestrate_disabled_is_noop() {
        let dir = project(false);
        let input = json!({"prompt": "Implement login and create tests"});
        let outcome = orchestrate(&input.to_string(), dir.path()).unwrap();
        assert_eq!(outcome, HookOutcome::Pass);
        assert!(session_dirs(dir.path()).is_empty());
    }

    #[test]
    fn test_orchestrate_todos_writes_reports() {
        let dir = project(true);
        let input = json!({
            "tool": "TodoWrite",
            "params": {"todos": [
                {"content": "Implement login", "status": "pending"},
                {"content": "Test login", "status": "pending"},
                {"content": "Document login", "status": "pending"}
            ]}
        });
        let outcome = orchestrate(&input.to_string(), dir.path()).unwrap();
        let stdout = outcome.output().unwrap().stdout.join("\n");
        assert!(stdout.contains("Created 3 tasks"));
        assert!(stdout.contains("Parallel execution groups: 2"));

        let sessions = session_dirs(dir.path());
        assert_eq!(sessions.len(), 1);
        let name = sessions[0].file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("session_"));
        assert!(sessions[0].join("EXECUTION_DASHBOARD.md").exists());
        assert!(dir.path().join(".claude/tasks/MASTER_TASKS.md").exists());
    }

    #[test]
    fn test_orchestrate_single_action_prompt_writes_nothing() {
        let dir = project(true);
        let input = json!({"type": "user_prompt", "content": "fix the login bug"});
        let outcome = orchestrate(&input.to_string(), dir.path()).unwrap();
        assert_eq!(outcome, HookOutcome::Pass);
        assert!(session_dirs(dir.path()).is_empty());
    }

    #[test]
    fn test_orchestrate_event_cwd_wins() {
        let dir = project(true);
        let input = json!({
            "cwd": dir.path(),
            "prompt": "Implement search, then add tests"
        });
        let outcome = orchestrate(&input.to_string(), Path::new("/")).unwrap();
        assert!(outcome.output().unwrap().stdout[0].contains("Created 2 tasks"));
    }

    #[test]
    fn test_orchestrate_without_project_is_error() {
        let dir = TempDir::new().unwrap();
        let result = orchestrate(r#"{"prompt": "Implement x and add y"}"#, dir.path());
        assert!(matches!(result, Err(Error::ProjectRootNotFound(_))));
    }
}
