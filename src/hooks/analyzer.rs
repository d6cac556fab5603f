//! Dependency analyzer hook.
//!
//! Input: `{ "type": "analyze_dependencies", "tasks": [...] }`.
//! Output: a pretty-printed JSON plan on stdout. Cycles and missing
//! references add warnings on stderr but never block.

use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

use super::event::{analyze_request, parse_object};
use super::{HookOutcome, Output};
use crate::core::{CriticalPath, Schedule, Task, TaskDAG, TaskId};
use crate::{clog, clog_warn, Result};

/// Tasks directly blocking more than this many others are flagged.
pub const BOTTLENECK_THRESHOLD: usize = 3;

/// Parallel efficiency (percent) below which a suggestion is made.
const LOW_EFFICIENCY: f64 = 50.0;

/// Critical paths longer than this many tasks get a suggestion.
const LONG_CRITICAL_PATH: usize = 5;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupReport {
    pub id: usize,
    pub tasks: Vec<TaskId>,
    pub can_parallelize: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct Bottleneck {
    pub task: TaskId,
    pub blocks: usize,
}

/// A hint for restructuring the plan.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Suggestion {
    Efficiency {
        message: String,
        suggestion: String,
    },
    CriticalPath {
        message: String,
        suggestion: String,
        path: Vec<TaskId>,
    },
    Bottleneck {
        message: String,
        suggestion: String,
        #[serde(rename = "blockedTasks")]
        blocked_tasks: Vec<TaskId>,
    },
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    pub dependencies: BTreeMap<TaskId, Vec<TaskId>>,
    pub groups: Vec<GroupReport>,
    pub unresolved: Vec<TaskId>,
    pub cycles: Vec<Vec<TaskId>>,
    /// Explicit dependencies naming unknown tasks.
    pub missing: BTreeMap<TaskId, Vec<TaskId>>,
    pub execution_order: Vec<TaskId>,
    pub parallel_efficiency: f64,
    /// `null` when the graph has a cycle.
    pub critical_path: Option<CriticalPath>,
    pub bottlenecks: Vec<Bottleneck>,
    pub suggestions: Vec<Suggestion>,
    /// Records dropped for lacking an id or title, or repeating an id.
    pub skipped: usize,
}

impl AnalysisReport {
    pub fn is_complete(&self) -> bool {
        self.unresolved.is_empty()
    }

    /// Warning lines for stderr, one per cause.
    pub fn warnings(&self) -> Vec<String> {
        let mut lines = Vec::new();
        if !self.cycles.is_empty() {
            let cycles: Vec<String> = self.cycles.iter().map(|c| join_ids(c)).collect();
            lines.push(format!(
                "⚠️ Circular dependency detected: {}",
                cycles.join("; ")
            ));
        }
        for (task, deps) in &self.missing {
            lines.push(format!(
                "⚠️ Missing dependency: {} depends on unknown {}",
                task,
                join_ids(deps)
            ));
        }
        if !self.is_complete() {
            lines.push(format!("Unresolved tasks: {}", join_ids(&self.unresolved)));
        }
        lines
    }
}

fn join_ids(ids: &[TaskId]) -> String {
    ids.iter().map(TaskId::as_str).collect::<Vec<_>>().join(", ")
}

/// Restructuring hints: low parallelism, long sequential chains and
/// tasks that block many others.
pub fn suggest(dag: &TaskDAG, schedule: &Schedule, critical: Option<&CriticalPath>) -> Vec<Suggestion> {
    let mut suggestions = Vec::new();

    let efficiency = schedule.parallel_efficiency();
    if schedule.total_tasks > 1 && efficiency < LOW_EFFICIENCY {
        suggestions.push(Suggestion::Efficiency {
            message: format!("Low parallel efficiency ({:.1}%)", efficiency),
            suggestion: "Consider breaking down large tasks or removing unnecessary dependencies"
                .to_string(),
        });
    }

    if let Some(path) = critical.filter(|p| p.length > LONG_CRITICAL_PATH) {
        suggestions.push(Suggestion::CriticalPath {
            message: format!("Long critical path with {} sequential tasks", path.length),
            suggestion: "Consider if some tasks can be made independent".to_string(),
            path: path.tasks.clone(),
        });
    }

    for (task, blocks) in dag.bottlenecks(BOTTLENECK_THRESHOLD) {
        suggestions.push(Suggestion::Bottleneck {
            message: format!("Task {} is blocking {} other tasks", task, blocks),
            suggestion: "Consider splitting this task or starting it earlier".to_string(),
            blocked_tasks: dag.dependents_of(&task),
        });
    }

    suggestions
}

/// Build the dependency plan for a batch of raw task records.
pub fn analyze(records: &[Value]) -> AnalysisReport {
    let tasks = Task::from_records(records);
    let skipped = records.len() - tasks.len();
    let dag = TaskDAG::from_tasks(tasks);
    let schedule = dag.schedule();
    let critical_path = dag.critical_path();
    let suggestions = suggest(&dag, &schedule, critical_path.as_ref());

    AnalysisReport {
        dependencies: dag.dependency_map(),
        groups: schedule
            .groups
            .iter()
            .map(|g| GroupReport {
                id: g.stage,
                tasks: g.tasks.clone(),
                can_parallelize: g.is_parallel(),
            })
            .collect(),
        unresolved: schedule.unresolved.clone(),
        cycles: schedule.cycles.clone(),
        missing: dag.missing_dependencies(),
        execution_order: schedule.execution_order(),
        parallel_efficiency: schedule.parallel_efficiency(),
        critical_path,
        bottlenecks: dag
            .bottlenecks(BOTTLENECK_THRESHOLD)
            .into_iter()
            .map(|(task, blocks)| Bottleneck { task, blocks })
            .collect(),
        suggestions,
        skipped,
    }
}

pub fn analyze_dependencies(input: &str) -> Result<HookOutcome> {
    let value = parse_object(input)?;
    let Some(records) = analyze_request(&value) else {
        return Ok(HookOutcome::Pass);
    };

    let report = analyze(records);
    clog!(
        "Analyzed {} tasks into {} groups ({} unresolved, {} skipped)",
        report.execution_order.len() + report.unresolved.len(),
        report.groups.len(),
        report.unresolved.len(),
        report.skipped
    );

    let mut output = Output::stdout(vec![serde_json::to_string_pretty(&report)?]);
    if !report.is_complete() {
        clog_warn!("Unresolved tasks: {}", join_ids(&report.unresolved));
        output.stderr = report.warnings();
    }
    Ok(HookOutcome::Report(output))
}
