//! Feature toggle tests.

use crate::fixtures::{bare_dir, run_cli, TestProject};

#[test]
fn test_enable_then_disable() {
    let project = TestProject::new();

    let out = run_cli(&["enable", "tests"], &project.path);
    assert_eq!(out.code, 0);
    assert!(out.stdout.contains("Automatic testing enabled"));
    let config = std::fs::read_to_string(project.claude_dir().join("claudook.toml")).unwrap();
    assert!(config.contains("tests = true"));

    let out = run_cli(&["status"], &project.path);
    assert!(out.stdout.contains("✅ Automatic testing: enabled"));
    assert!(out.stdout.contains("⬜ Parallel task execution: disabled"));

    let out = run_cli(&["disable", "tests"], &project.path);
    assert_eq!(out.code, 0);
    let out = run_cli(&["status"], &project.path);
    assert!(out.stdout.contains("⬜ Automatic testing: disabled"));
}

#[test]
fn test_legacy_marker_file_honored_and_removed() {
    let project = TestProject::new();
    std::fs::write(project.claude_dir().join("parallel_enabled"), "").unwrap();

    let out = run_cli(&["status"], &project.path);
    assert!(out.stdout.contains("✅ Parallel task execution: enabled"));

    run_cli(&["disable", "parallel"], &project.path);
    assert!(!project.claude_dir().join("parallel_enabled").exists());
    let out = run_cli(&["status"], &project.path);
    assert!(out.stdout.contains("⬜ Parallel task execution: disabled"));
}

#[test]
fn test_toggle_from_subdirectory() {
    let project = TestProject::new();
    let nested = project.path.join("src/deep");
    std::fs::create_dir_all(&nested).unwrap();

    let out = run_cli(&["enable", "choices"], &nested);
    assert_eq!(out.code, 0);
    assert!(project.claude_dir().join("claudook.toml").exists());
}

#[test]
fn test_toggle_without_project_fails() {
    let dir = bare_dir();
    let out = run_cli(&["enable", "parallel"], dir.path());
    assert_eq!(out.code, 1);
    assert!(out.stderr.contains("No .claude directory"));
}
