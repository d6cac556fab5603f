//! Decoding of the JSON events the host pipes to stdin.
//!
//! Every decoder returns a typed `Result`: `Error::MalformedInput` means
//! the payload itself was unusable, while a successfully decoded event
//! that carries nothing relevant is for the handler to ignore.

use serde::Deserialize;
use serde_json::Value;
use std::io::Read;
use std::path::PathBuf;

use crate::{Error, Result};

/// Read stdin to end-of-stream.
pub fn read_stdin() -> Result<String> {
    let mut input = String::new();
    std::io::stdin().read_to_string(&mut input)?;
    Ok(input)
}

/// Parse a payload into a JSON object.
pub fn parse_object(input: &str) -> Result<Value> {
    if input.trim().is_empty() {
        return Err(Error::MalformedInput("empty input".to_string()));
    }
    let value: Value =
        serde_json::from_str(input).map_err(|e| Error::MalformedInput(e.to_string()))?;
    if !value.is_object() {
        return Err(Error::MalformedInput("expected a JSON object".to_string()));
    }
    Ok(value)
}

/// The fields of `tool_input` the guard inspects.
#[derive(Debug, Clone, Default)]
pub struct ToolInput {
    pub command: Option<String>,
    pub file_path: Option<String>,
}

/// A tool-use event (`PreToolUse`/`PostToolUse`).
///
/// Each field is read on its own, so an odd shape in one field (or in
/// any field not listed here) never hides the others.
#[derive(Debug, Clone, Default)]
pub struct ToolEvent {
    pub tool_name: String,
    pub tool_input: ToolInput,
    pub cwd: Option<PathBuf>,
}

impl ToolEvent {
    pub fn parse(input: &str) -> Result<Self> {
        let value = parse_object(input)?;
        Ok(Self::from_value(&value))
    }

    pub fn from_value(value: &Value) -> Self {
        let text = |pointer: &str| {
            value
                .pointer(pointer)
                .and_then(Value::as_str)
                .map(str::to_string)
        };
        Self {
            tool_name: text("/tool_name").unwrap_or_default(),
            tool_input: ToolInput {
                command: text("/tool_input/command"),
                file_path: text("/tool_input/file_path"),
            },
            cwd: event_cwd(value),
        }
    }
}

/// Working directory named by an event, if any.
pub fn event_cwd(value: &Value) -> Option<PathBuf> {
    value.get("cwd").and_then(Value::as_str).map(PathBuf::from)
}

/// `{ "type": "analyze_dependencies", "tasks": [...] }`
///
/// Returns `None` for any other event shape.
pub fn analyze_request(value: &Value) -> Option<&[Value]> {
    if value.get("type").and_then(Value::as_str) != Some("analyze_dependencies") {
        return None;
    }
    value.get("tasks").and_then(Value::as_array).map(Vec::as_slice)
}

/// One TodoWrite entry.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Todo {
    pub content: Option<String>,
    pub title: Option<String>,
    #[serde(rename = "activeForm")]
    pub active_form: Option<String>,
    pub status: Option<String>,
}

/// What the orchestrator was handed to plan from.
#[derive(Debug, Clone)]
pub enum TaskSource {
    Todos(Vec<Todo>),
    Prompt(String),
}

/// Recognize the payload shapes the orchestrator accepts:
/// - `{ "tool": "TodoWrite", "params": { "todos": [...] } }`
/// - `{ "tool_name": "TodoWrite", "tool_input": { "todos": [...] } }`
/// - `{ "type": "user_prompt", "content": "..." }`
/// - `{ "prompt": "..." }`
pub fn task_source(value: &Value) -> Option<TaskSource> {
    let todos = if value.get("tool").and_then(Value::as_str) == Some("TodoWrite") {
        value.pointer("/params/todos")
    } else if value.get("tool_name").and_then(Value::as_str) == Some("TodoWrite") {
        value.pointer("/tool_input/todos")
    } else {
        None
    };

    if let Some(list) = todos.and_then(Value::as_array) {
        let todos: Vec<Todo> = list
            .iter()
            .filter_map(|t| serde_json::from_value(t.clone()).ok())
            .collect();
        return (!todos.is_empty()).then_some(TaskSource::Todos(todos));
    }

    let prompt = if value.get("type").and_then(Value::as_str) == Some("user_prompt") {
        value.get("content")
    } else {
        value.get("prompt")
    };
    prompt
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(|p| TaskSource::Prompt(p.to_string()))
}
