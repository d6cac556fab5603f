//! Task data model for dependency analysis.
//!
//! Tasks arrive from the host as loosely shaped JSON records. Decoding
//! is lenient: records missing an id or title are dropped rather than
//! failing the whole batch.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use uuid::Uuid;

/// Identifier for a task within one analysis run.
///
/// Host-supplied ids are kept verbatim; generated ids are 16 hex chars.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(pub String);

impl TaskId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a fresh random id.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().simple().to_string()[..16].to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Return at most the first 8 characters for display.
    pub fn short(&self) -> &str {
        match self.0.char_indices().nth(8) {
            Some((idx, _)) => &self.0[..idx],
            None => &self.0,
        }
    }

    /// Decode an id from a JSON string or number.
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) if !s.trim().is_empty() => Some(Self(s.trim().to_string())),
            Value::Number(n) => Some(Self(n.to_string())),
            _ => None,
        }
    }
}

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for TaskId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Task status in its lifecycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
}

impl TaskStatus {
    /// Lenient parse; unknown strings yield `None`.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "pending" => Some(Self::Pending),
            "in_progress" => Some(Self::InProgress),
            "completed" | "done" => Some(Self::Completed),
            _ => None,
        }
    }

    /// Dashboard icon for the status.
    pub fn icon(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "📋",
            TaskStatus::InProgress => "🔄",
            TaskStatus::Completed => "✅",
        }
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TaskStatus::Pending => write!(f, "pending"),
            TaskStatus::InProgress => write!(f, "in_progress"),
            TaskStatus::Completed => write!(f, "completed"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "low" => Some(Self::Low),
            "medium" => Some(Self::Medium),
            "high" => Some(Self::High),
            _ => None,
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Priority::Low => write!(f, "low"),
            Priority::Medium => write!(f, "medium"),
            Priority::High => write!(f, "high"),
        }
    }
}

/// A single unit of work in an analysis run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
    pub priority: Priority,
    /// Explicit dependencies supplied by the host.
    pub dependencies: Vec<TaskId>,
    #[serde(rename = "created")]
    pub created_at: DateTime<Utc>,
}

impl Task {
    /// Create a pending, medium-priority task with no explicit dependencies.
    pub fn new(id: impl Into<TaskId>, title: &str) -> Self {
        Self {
            id: id.into(),
            title: title.to_string(),
            description: String::new(),
            status: TaskStatus::Pending,
            priority: Priority::Medium,
            dependencies: Vec::new(),
            created_at: Utc::now(),
        }
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    pub fn with_dependencies(mut self, deps: &[&str]) -> Self {
        self.dependencies = deps.iter().map(|d| TaskId::from(*d)).collect();
        self
    }

    pub fn set_status(&mut self, status: TaskStatus) {
        self.status = status;
    }

    pub fn is_finished(&self) -> bool {
        self.status == TaskStatus::Completed
    }

    /// Decode one host record. Returns `None` for anything without a
    /// usable id and title.
    pub fn from_record(record: &Value) -> Option<Self> {
        let obj = record.as_object()?;
        let id = obj.get("id").and_then(TaskId::from_value)?;
        let title = obj
            .get("title")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|t| !t.is_empty())?;

        let mut task = Task::new(id, title);
        if let Some(description) = obj.get("description").and_then(Value::as_str) {
            task.description = description.to_string();
        }
        if let Some(status) = obj
            .get("status")
            .and_then(Value::as_str)
            .and_then(TaskStatus::parse)
        {
            task.status = status;
        }
        if let Some(priority) = obj
            .get("priority")
            .and_then(Value::as_str)
            .and_then(Priority::parse)
        {
            task.priority = priority;
        }
        if let Some(deps) = obj.get("dependencies").and_then(Value::as_array) {
            task.dependencies = deps.iter().filter_map(TaskId::from_value).collect();
        }
        if let Some(created) = obj
            .get("created")
            .and_then(Value::as_str)
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        {
            task.created_at = created.with_timezone(&Utc);
        }
        Some(task)
    }

    /// Decode a batch, skipping malformed records and repeated ids
    /// (first occurrence wins).
    pub fn from_records(records: &[Value]) -> Vec<Self> {
        let mut seen = HashSet::new();
        records
            .iter()
            .filter_map(Task::from_record)
            .filter(|task| seen.insert(task.id.clone()))
            .collect()
    }
}
