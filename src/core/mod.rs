//! Core domain models: tasks, the title classifier, and the dependency DAG.

pub mod classify;
pub mod dag;
pub mod task;

pub use classify::{classify, Category};
pub use dag::{
    CriticalPath, DependencyRule, DependencyType, ParallelGroup, Schedule, TaskDAG, DEFAULT_RULES,
};
pub use task::{Priority, Task, TaskId, TaskStatus};
