//! Integration test suite for claudook.
//!
//! These tests run the compiled binary the way the host does: a JSON
//! payload on stdin, a project directory as the working directory, and
//! assertions on stdout, stderr and the exit code.
//!
//! # Test Categories
//!
//! - `security`: command blocking and sensitive-path warnings
//! - `analyzer`: dependency analysis JSON output
//! - `orchestrator`: task decomposition and report files
//! - `toggles`: `enable`, `disable` and `status`

mod fixtures;

mod analyzer;
mod orchestrator;
mod security;
mod toggles;
