//! Task orchestrator tests.

use crate::fixtures::{run_hook, TestProject};
use serde_json::{json, Value};

#[test]
fn test_disabled_project_writes_nothing() {
    let project = TestProject::new();
    let payload = json!({"prompt": "Implement search and add tests"});
    let out = run_hook(&["orchestrate"], &payload.to_string(), &project.path);
    assert_eq!(out.code, 0);
    assert!(out.stdout.is_empty());
    assert!(project.session_dirs().is_empty());
}

#[test]
fn test_todo_write_generates_reports() {
    let project = TestProject::with_parallel();
    let payload = json!({
        "tool_name": "TodoWrite",
        "tool_input": {"todos": [
            {"content": "Implement user authentication", "activeForm": "Implementing auth", "status": "completed"},
            {"content": "Test authentication", "status": "in_progress"},
            {"content": "Document the API", "status": "pending"}
        ]}
    });
    let out = run_hook(&["orchestrate"], &payload.to_string(), &project.path);
    assert_eq!(out.code, 0);
    assert!(out.stdout.contains("Created 3 tasks"));
    assert!(out.stdout.contains("Parallel execution groups: 2"));

    let sessions = project.session_dirs();
    assert_eq!(sessions.len(), 1);
    let session = &sessions[0];
    for file in ["MASTER_TASKS.md", "EXECUTION_DASHBOARD.md", "GITHUB_TASKS.md", "tasks.json"] {
        assert!(session.join(file).exists(), "{} missing", file);
    }

    let master = std::fs::read_to_string(project.claude_dir().join("tasks/MASTER_TASKS.md"))
        .expect("top-level master copy");
    assert!(master.contains("- [x] **Implement user authentication**"));

    let snapshot: Value =
        serde_json::from_str(&std::fs::read_to_string(session.join("tasks.json")).unwrap()).unwrap();
    let tasks = snapshot["tasks"].as_array().unwrap();
    assert_eq!(tasks.len(), 3);
    assert_eq!(tasks[0]["description"], "Implementing auth");
    assert_eq!(tasks[1]["status"], "in_progress");
    assert_eq!(tasks[1]["dependencies"], json!([tasks[0]["id"]]));
}

#[test]
fn test_prompt_decomposition() {
    let project = TestProject::with_parallel();
    let payload = json!({
        "type": "user_prompt",
        "content": "Implement user authentication, create tests, and document the API"
    });
    let out = run_hook(&["orchestrate"], &payload.to_string(), &project.path);
    assert_eq!(out.code, 0);
    assert!(out.stdout.contains("Created 3 tasks"));

    let dashboard =
        std::fs::read_to_string(project.session_dirs()[0].join("EXECUTION_DASHBOARD.md")).unwrap();
    assert!(dashboard.contains("📋 Pending:     3"));
}

#[test]
fn test_simple_prompt_writes_nothing() {
    let project = TestProject::with_parallel();
    let out = run_hook(&["orchestrate"], r#"{"prompt": "explain this function"}"#, &project.path);
    assert_eq!(out.code, 0);
    assert!(out.stdout.is_empty());
    assert!(project.session_dirs().is_empty());
}

#[test]
fn test_outside_project_continues() {
    let dir = crate::fixtures::bare_dir();
    let out = run_hook(&["orchestrate"], r#"{"prompt": "Implement x and add y"}"#, dir.path());
    assert_eq!(out.code, 0);
    assert!(out.stdout.is_empty());
}
