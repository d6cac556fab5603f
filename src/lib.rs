pub mod config;
pub mod core;
pub mod error;
pub mod hooks;
pub mod log;
pub mod project;
pub mod report;
pub mod security;

pub use error::{Error, Result};
pub use hooks::{HookOutcome, Output};
