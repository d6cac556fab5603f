use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use claudook::config::{toggle_feature, Config, Feature};
use claudook::hooks::event::read_stdin;
use claudook::hooks::{analyze_dependencies, orchestrate, security_guard};
use claudook::project::find_project_root;
use claudook::{clog, clog_error, clog_trace, clog_warn, Error, HookOutcome, Result};

/// Claudook - safety and planning hooks for Claude tool-use events
#[derive(Parser, Debug)]
#[command(name = "claudook")]
#[command(version, about, long_about = None)]
#[command(after_help = "ENVIRONMENT:\n    CLAUDOOK_DEBUG=1     Enable debug logging (alternative to --debug)")]
pub struct Cli {
    /// Enable debug logging (writes to ~/.claudook/claudook.log)
    #[arg(short = 'd', long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Block dangerous shell commands and flag sensitive file access (reads stdin)
    SecurityGuard,

    /// Compute dependencies and parallel stages for a task list (reads stdin)
    AnalyzeDeps,

    /// Decompose todos or a prompt into scheduled tasks (reads stdin)
    Orchestrate,

    /// Enable a feature for the current project
    Enable {
        #[arg(value_enum)]
        feature: Feature,
    },

    /// Disable a feature for the current project
    Disable {
        #[arg(value_enum)]
        feature: Feature,
    },

    /// Show which features are enabled
    Status,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    claudook::log::init_with_debug(cli.debug);

    match cli.command {
        Command::SecurityGuard => run_hook("security-guard", security_guard),
        Command::AnalyzeDeps => run_hook("analyze-deps", |input, _| analyze_dependencies(input)),
        Command::Orchestrate => run_hook("orchestrate", orchestrate),
        Command::Enable { feature } => run_toggle(feature, true),
        Command::Disable { feature } => run_toggle(feature, false),
        Command::Status => run_status(),
    }
}

/// Run a stdin hook. Errors never block: they are logged and the host
/// continues.
fn run_hook(name: &str, handler: impl Fn(&str, &Path) -> Result<HookOutcome>) -> ExitCode {
    let outcome = current_dir().and_then(|cwd| {
        let input = read_stdin()?;
        clog_trace!("{} payload: {}", name, input);
        handler(&input, &cwd)
    });

    match outcome {
        Ok(outcome) => {
            outcome.emit();
            ExitCode::from(outcome.exit_code())
        }
        Err(e) => {
            log_hook_failure(name, &e);
            ExitCode::SUCCESS
        }
    }
}

/// Unreadable input is the host's problem; anything else is ours.
fn log_hook_failure(name: &str, error: &Error) {
    match error {
        Error::MalformedInput(_) | Error::ProjectRootNotFound(_) => {
            clog_warn!("{} hook skipped: {}", name, error)
        }
        _ => clog_error!("{} hook failed: {}", name, error),
    }
}

fn current_dir() -> Result<PathBuf> {
    Ok(std::env::current_dir()?)
}

fn run_toggle(feature: Feature, enabled: bool) -> ExitCode {
    let result = current_dir()
        .and_then(|cwd| find_project_root(&cwd))
        .and_then(|root| toggle_feature(&root, feature, enabled));

    match result {
        Ok(_) => {
            let state = if enabled { "enabled" } else { "disabled" };
            clog!("{:?} {}", feature, state);
            println!("{} {}", feature.label(), state);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run_status() -> ExitCode {
    let result = current_dir()
        .and_then(|cwd| find_project_root(&cwd))
        .and_then(|root| Config::load(&root));

    match result {
        Ok(config) => {
            println!("Claudook features:");
            for feature in Feature::ALL {
                let (icon, state) = if config.is_enabled(feature) {
                    ("✅", "enabled")
                } else {
                    ("⬜", "disabled")
                };
                println!("  {} {}: {}", icon, feature.label(), state);
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
