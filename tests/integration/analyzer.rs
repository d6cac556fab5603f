//! Dependency analyzer tests.

use crate::fixtures::{bare_dir, run_hook};
use serde_json::{json, Value};

fn analyze(tasks: Value) -> (i32, Value, String) {
    let dir = bare_dir();
    let payload = json!({"type": "analyze_dependencies", "tasks": tasks});
    let out = run_hook(&["analyze-deps"], &payload.to_string(), dir.path());
    let parsed = serde_json::from_str(&out.stdout).expect("stdout is JSON");
    (out.code, parsed, out.stderr)
}

#[test]
fn test_implement_then_test_and_document() {
    let (code, report, stderr) = analyze(json!([
        {"id": 1, "title": "Implement login"},
        {"id": 2, "title": "Test login"},
        {"id": 3, "title": "Document login"}
    ]));
    assert_eq!(code, 0);
    assert!(stderr.is_empty());
    assert_eq!(report["dependencies"]["2"], json!(["1"]));
    assert_eq!(report["dependencies"]["3"], json!(["1"]));
    assert_eq!(
        report["groups"],
        json!([
            {"id": 0, "tasks": ["1"], "canParallelize": false},
            {"id": 1, "tasks": ["2", "3"], "canParallelize": true}
        ])
    );
    assert_eq!(report["unresolved"], json!([]));
    assert_eq!(report["criticalPath"], json!({"tasks": ["1", "2"], "length": 2}));
}

#[test]
fn test_deploy_waits_for_tests() {
    let (_, report, _) = analyze(json!([
        {"id": "d", "title": "Deploy to production"},
        {"id": "t", "title": "Verify checkout flow"},
        {"id": "i", "title": "Build checkout"}
    ]));
    assert_eq!(report["executionOrder"], json!(["i", "t", "d"]));
}

#[test]
fn test_explicit_cycle_reported() {
    let (code, report, stderr) = analyze(json!([
        {"id": "a", "title": "Alpha", "dependencies": ["b"]},
        {"id": "b", "title": "Beta", "dependencies": ["a"]},
        {"id": "c", "title": "Gamma"}
    ]));
    assert_eq!(code, 0);
    assert!(stderr.contains("Circular dependency"));
    assert!(!stderr.contains("Missing dependency"));
    assert_eq!(report["groups"], json!([{"id": 0, "tasks": ["c"], "canParallelize": false}]));
    assert_eq!(report["unresolved"], json!(["a", "b"]));
    assert_eq!(report["cycles"], json!([["a", "b"]]));
}

#[test]
fn test_other_event_is_silent() {
    let dir = bare_dir();
    let out = run_hook(&["analyze-deps"], r#"{"type": "session_start"}"#, dir.path());
    assert_eq!(out.code, 0);
    assert!(out.stdout.is_empty());
}
