//! Task dependency graph and parallel grouping.
//!
//! `TaskDAG` holds tasks as nodes of a petgraph `DiGraph`. An edge
//! `prerequisite -> dependent` means the dependent cannot start until
//! the prerequisite is done. Despite the name, the graph may contain
//! cycles: input is not trusted, so cycles are detected and reported by
//! [`TaskDAG::schedule`] instead of being rejected up front.

use crate::core::classify::{classify, Category};
use crate::core::task::{Task, TaskId};
use crate::error::{Error, Result};
use petgraph::algo::{is_cyclic_directed, tarjan_scc, toposort};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};

/// Why one task depends on another.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum DependencyType {
    /// Listed in the task's own `dependencies` field.
    Explicit,
    /// Inferred from the categories of both titles.
    Inferred {
        dependent: Category,
        prerequisite: Category,
    },
}

impl std::fmt::Display for DependencyType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DependencyType::Explicit => write!(f, "explicit"),
            DependencyType::Inferred {
                dependent,
                prerequisite,
            } => write!(f, "inferred: {} after {}", dependent, prerequisite),
        }
    }
}

/// A task of category `dependent` depends on every task whose category
/// is one of `prerequisites`.
#[derive(Debug, Clone, Copy)]
pub struct DependencyRule {
    pub dependent: Category,
    pub prerequisites: &'static [Category],
}

impl DependencyRule {
    pub fn applies(&self, dependent: Category, prerequisite: Category) -> bool {
        self.dependent == dependent && self.prerequisites.contains(&prerequisite)
    }
}

/// Documentation waits only on implementation work, not on every
/// earlier task, so it can run alongside tests.
pub const DEFAULT_RULES: &[DependencyRule] = &[
    DependencyRule {
        dependent: Category::Test,
        prerequisites: &[Category::Implementation],
    },
    DependencyRule {
        dependent: Category::Documentation,
        prerequisites: &[Category::Implementation],
    },
    DependencyRule {
        dependent: Category::Deployment,
        prerequisites: &[Category::Test],
    },
    DependencyRule {
        dependent: Category::Feature,
        prerequisites: &[Category::Refactor],
    },
];

/// One stage of the plan. Every task in it can run concurrently.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParallelGroup {
    pub stage: usize,
    pub tasks: Vec<TaskId>,
}

impl ParallelGroup {
    pub fn is_parallel(&self) -> bool {
        self.tasks.len() > 1
    }
}

/// Output of [`TaskDAG::schedule`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    pub groups: Vec<ParallelGroup>,
    /// Tasks that could not be placed, in input order.
    pub unresolved: Vec<TaskId>,
    /// Strongly connected components that form dependency cycles.
    pub cycles: Vec<Vec<TaskId>>,
    pub total_tasks: usize,
}

impl Schedule {
    /// True when every task landed in a group.
    pub fn is_complete(&self) -> bool {
        self.unresolved.is_empty()
    }

    pub fn has_cycles(&self) -> bool {
        !self.cycles.is_empty()
    }

    /// Stages flattened into one valid execution order.
    pub fn execution_order(&self) -> Vec<TaskId> {
        self.groups
            .iter()
            .flat_map(|g| g.tasks.iter().cloned())
            .collect()
    }

    /// Percentage of tasks that share a stage with at least one other task.
    pub fn parallel_efficiency(&self) -> f64 {
        if self.total_tasks == 0 {
            return 0.0;
        }
        let parallel: usize = self
            .groups
            .iter()
            .filter(|g| g.is_parallel())
            .map(|g| g.tasks.len())
            .sum();
        parallel as f64 / self.total_tasks as f64 * 100.0
    }

    pub fn stage_of(&self, id: &TaskId) -> Option<usize> {
        self.groups
            .iter()
            .find(|g| g.tasks.contains(id))
            .map(|g| g.stage)
    }
}

/// Longest dependency chain through the graph.
///
/// Tasks carry no estimates, so every task counts as one unit and
/// `length` is also the minimum number of sequential steps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CriticalPath {
    pub tasks: Vec<TaskId>,
    pub length: usize,
}

/// The task dependency graph.
pub struct TaskDAG {
    graph: DiGraph<Task, DependencyType>,
    task_index: HashMap<TaskId, NodeIndex>,
    /// Explicit dependencies naming tasks that are not in the graph.
    missing: HashMap<TaskId, Vec<TaskId>>,
}

impl TaskDAG {
    pub fn new() -> Self {
        Self {
            graph: DiGraph::new(),
            task_index: HashMap::new(),
            missing: HashMap::new(),
        }
    }

    /// Build a graph from tasks using [`DEFAULT_RULES`].
    pub fn from_tasks(tasks: Vec<Task>) -> Self {
        Self::with_rules(tasks, DEFAULT_RULES)
    }

    /// Build a graph from tasks, merging explicit dependencies with the
    /// edges inferred by `rules`.
    ///
    /// Every qualifying pair becomes an edge; transitively implied edges
    /// are kept.
    pub fn with_rules(tasks: Vec<Task>, rules: &[DependencyRule]) -> Self {
        let mut dag = Self::new();
        for task in tasks {
            dag.add_task(task);
        }

        let entries: Vec<(NodeIndex, TaskId, Category, Vec<TaskId>)> = dag
            .graph
            .node_indices()
            .map(|index| {
                let t = &dag.graph[index];
                (index, t.id.clone(), classify(&t.title), t.dependencies.clone())
            })
            .collect();

        for (index, id, _, explicit) in &entries {
            for dep in explicit {
                if dep == id {
                    continue;
                }
                match dag.task_index.get(dep).copied() {
                    Some(from) => dag.add_edge(from, *index, DependencyType::Explicit),
                    None => dag.missing.entry(id.clone()).or_default().push(dep.clone()),
                }
            }
        }

        for (a, _, cat_a, _) in &entries {
            for (b, _, cat_b, _) in &entries {
                if a == b {
                    continue;
                }
                if rules.iter().any(|rule| rule.applies(*cat_a, *cat_b)) {
                    dag.add_edge(
                        *b,
                        *a,
                        DependencyType::Inferred {
                            dependent: *cat_a,
                            prerequisite: *cat_b,
                        },
                    );
                }
            }
        }

        dag
    }

    /// Add a task. If the id is already present the existing node is
    /// returned and the new task is discarded.
    pub fn add_task(&mut self, task: Task) -> NodeIndex {
        if let Some(&index) = self.task_index.get(&task.id) {
            return index;
        }
        let id = task.id.clone();
        let index = self.graph.add_node(task);
        self.task_index.insert(id, index);
        index
    }

    /// Record that `task` depends on `depends_on`.
    ///
    /// An existing edge between the pair is left as is. Cycles are
    /// allowed; self-dependencies are not.
    ///
    /// # Errors
    /// Returns an error if either task is unknown or both ids are equal.
    pub fn add_dependency(
        &mut self,
        task: &TaskId,
        depends_on: &TaskId,
        dep_type: DependencyType,
    ) -> Result<()> {
        if task == depends_on {
            return Err(Error::Validation(format!(
                "Task {} cannot depend on itself",
                task
            )));
        }
        let to = self.node(task)?;
        let from = self.node(depends_on)?;
        self.add_edge(from, to, dep_type);
        Ok(())
    }

    /// Edge from prerequisite `from` to dependent `to`, unless one exists.
    fn add_edge(&mut self, from: NodeIndex, to: NodeIndex, dep_type: DependencyType) {
        if self.graph.find_edge(from, to).is_none() {
            self.graph.add_edge(from, to, dep_type);
        }
    }

    fn node(&self, id: &TaskId) -> Result<NodeIndex> {
        self.task_index
            .get(id)
            .copied()
            .ok_or_else(|| Error::Validation(format!("Task {} not found in DAG", id)))
    }

    pub fn get_task(&self, id: &TaskId) -> Option<&Task> {
        self.task_index
            .get(id)
            .and_then(|&index| self.graph.node_weight(index))
    }

    pub fn task_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn dependency_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    pub fn contains_task(&self, id: &TaskId) -> bool {
        self.task_index.contains_key(id)
    }

    pub fn has_dependency(&self, task: &TaskId, depends_on: &TaskId) -> bool {
        match (self.task_index.get(depends_on), self.task_index.get(task)) {
            (Some(&from), Some(&to)) => self.graph.find_edge(from, to).is_some(),
            _ => false,
        }
    }

    pub fn get_dependency(&self, task: &TaskId, depends_on: &TaskId) -> Option<&DependencyType> {
        let from = self.task_index.get(depends_on)?;
        let to = self.task_index.get(task)?;
        let edge = self.graph.find_edge(*from, *to)?;
        self.graph.edge_weight(edge)
    }

    /// Tasks in insertion order.
    pub fn all_tasks(&self) -> Vec<&Task> {
        self.graph.node_weights().collect()
    }

    /// Direct prerequisites of a task, in input order.
    pub fn dependencies_of(&self, id: &TaskId) -> Vec<TaskId> {
        self.neighbors(id, Direction::Incoming)
    }

    /// Tasks that directly depend on this one, in input order.
    pub fn dependents_of(&self, id: &TaskId) -> Vec<TaskId> {
        self.neighbors(id, Direction::Outgoing)
    }

    fn neighbors(&self, id: &TaskId, direction: Direction) -> Vec<TaskId> {
        let Some(&index) = self.task_index.get(id) else {
            return Vec::new();
        };
        let mut nodes: Vec<NodeIndex> = self.graph.neighbors_directed(index, direction).collect();
        nodes.sort();
        nodes
            .into_iter()
            .map(|n| self.graph[n].id.clone())
            .collect()
    }

    /// Explicit dependencies that point at tasks not in the graph.
    pub fn missing_references(&self, id: &TaskId) -> &[TaskId] {
        self.missing.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Full dependency map, keyed by task id.
    pub fn dependency_map(&self) -> BTreeMap<TaskId, Vec<TaskId>> {
        self.graph
            .node_weights()
            .map(|task| {
                let mut deps = self.dependencies_of(&task.id);
                deps.extend(self.missing_references(&task.id).iter().cloned());
                (task.id.clone(), deps)
            })
            .collect()
    }

    pub fn has_cycle(&self) -> bool {
        is_cyclic_directed(&self.graph)
    }

    /// Tasks whose dependencies are all in `completed`, in input order.
    ///
    /// Tasks with a missing reference never become ready.
    pub fn ready_tasks<'a>(&'a self, completed: &HashSet<TaskId>) -> Vec<&'a Task> {
        self.graph
            .node_indices()
            .filter_map(|index| {
                let task = self.graph.node_weight(index)?;
                if completed.contains(&task.id) || self.missing.contains_key(&task.id) {
                    return None;
                }
                let deps_satisfied = self
                    .graph
                    .neighbors_directed(index, Direction::Incoming)
                    .all(|dep| completed.contains(&self.graph[dep].id));
                deps_satisfied.then_some(task)
            })
            .collect()
    }

    /// Group tasks into stages that can run concurrently.
    ///
    /// Stage N holds every remaining task whose dependencies all sit in
    /// stages 0..N. Grouping stops as soon as no task is ready; anything
    /// left is reported in `unresolved`.
    pub fn schedule(&self) -> Schedule {
        let mut completed: HashSet<TaskId> = HashSet::new();
        let mut groups = Vec::new();

        loop {
            let ready: Vec<TaskId> = self
                .ready_tasks(&completed)
                .into_iter()
                .map(|t| t.id.clone())
                .collect();
            if ready.is_empty() {
                break;
            }
            completed.extend(ready.iter().cloned());
            groups.push(ParallelGroup {
                stage: groups.len(),
                tasks: ready,
            });
        }

        let unresolved = self
            .graph
            .node_weights()
            .filter(|t| !completed.contains(&t.id))
            .map(|t| t.id.clone())
            .collect();

        Schedule {
            groups,
            unresolved,
            cycles: self.cycles(),
            total_tasks: self.task_count(),
        }
    }

    /// Each dependency cycle, as its member ids in input order.
    pub fn cycles(&self) -> Vec<Vec<TaskId>> {
        let mut components: Vec<Vec<NodeIndex>> = tarjan_scc(&self.graph)
            .into_iter()
            .filter(|scc| scc.len() > 1)
            .map(|mut scc| {
                scc.sort();
                scc
            })
            .collect();
        components.sort();
        components
            .into_iter()
            .map(|scc| scc.into_iter().map(|n| self.graph[n].id.clone()).collect())
            .collect()
    }

    /// Every task with unknown explicit dependencies, keyed by task id.
    pub fn missing_dependencies(&self) -> BTreeMap<TaskId, Vec<TaskId>> {
        self.missing
            .iter()
            .map(|(id, deps)| (id.clone(), deps.clone()))
            .collect()
    }

    /// Longest prerequisite chain, or `None` for an empty or cyclic graph.
    ///
    /// Ties go to the earliest task in input order.
    pub fn critical_path(&self) -> Option<CriticalPath> {
        let order = toposort(&self.graph, None).ok()?;

        // Chain length ending at each node, and the predecessor on that chain.
        let mut best: HashMap<NodeIndex, (usize, Option<NodeIndex>)> = HashMap::new();
        for &node in &order {
            let mut preds: Vec<NodeIndex> = self
                .graph
                .neighbors_directed(node, Direction::Incoming)
                .collect();
            preds.sort();
            let mut entry = (1, None);
            for pred in preds {
                let len = best.get(&pred).map_or(1, |(l, _)| *l) + 1;
                if len > entry.0 {
                    entry = (len, Some(pred));
                }
            }
            best.insert(node, entry);
        }

        let mut end: Option<(NodeIndex, usize)> = None;
        for node in self.graph.node_indices() {
            let len = best.get(&node).map_or(0, |(l, _)| *l);
            if end.map_or(true, |(_, l)| len > l) {
                end = Some((node, len));
            }
        }
        let (mut node, length) = end?;

        let mut tasks = vec![self.graph[node].id.clone()];
        while let Some(pred) = best.get(&node).and_then(|(_, p)| *p) {
            tasks.push(self.graph[pred].id.clone());
            node = pred;
        }
        tasks.reverse();
        Some(CriticalPath { tasks, length })
    }

    /// Tasks that directly block more than `threshold` others.
    pub fn bottlenecks(&self, threshold: usize) -> Vec<(TaskId, usize)> {
        self.graph
            .node_indices()
            .filter_map(|index| {
                let count = self
                    .graph
                    .neighbors_directed(index, Direction::Outgoing)
                    .count();
                (count > threshold).then(|| (self.graph[index].id.clone(), count))
            })
            .collect()
    }
}

impl Default for TaskDAG {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for TaskDAG {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskDAG")
            .field("tasks", &self.task_count())
            .field("dependencies", &self.dependency_count())
            .finish()
    }
}
