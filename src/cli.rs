// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// Command-line arguments for `siteplan`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "siteplan",
    version,
    about = "Construction task dependencies, verification lifecycle and auto-scheduling.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the project file (TOML).
    ///
    /// Default: `SITEPLAN_PROJECT`, or `Siteplan.toml` in the current directory.
    #[arg(long, value_name = "PATH", global = true)]
    pub project: Option<PathBuf>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `SITEPLAN_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL", global = true)]
    pub log_level: Option<LogLevel>,

    /// Run the command but don't write the project file back.
    #[arg(long, global = true)]
    pub dry_run: bool,

    /// Identity recorded as `verified_by`.
    #[arg(long, value_name = "NAME", default_value = "cli", global = true)]
    pub actor: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Validate the project file and print a summary.
    Check,

    /// List a task's predecessors and successors.
    Deps { task: String },

    /// Add a dependency: TARGET waits on SOURCE.
    AddDep {
        #[arg(long)]
        source: String,
        #[arg(long)]
        target: String,
        #[arg(long = "type", value_name = "TYPE", default_value = "finish_to_start")]
        dependency_type: String,
        /// Lag in days; negative for lead time.
        #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
        lag: i32,
    },

    /// Remove a dependency.
    RemoveDep {
        #[arg(long)]
        source: String,
        #[arg(long)]
        target: String,
    },

    /// Change a task's status (not_started, in_progress, worker_complete, verified).
    Transition {
        task: String,
        status: String,
        /// Verification photo reference.
        #[arg(long)]
        photo: Option<String>,
        /// Verification notes, or the reason for rework.
        #[arg(long)]
        notes: Option<String>,
    },

    /// Materialize a template's tasks and dependencies for each location.
    ApplyTemplate {
        template: String,
        #[arg(required = true)]
        locations: Vec<String>,
    },

    /// Re-run downstream date propagation for a task.
    Reschedule { task: String },
}

impl Command {
    /// Whether the command can change the project.
    pub fn mutates(&self) -> bool {
        !matches!(self, Command::Check | Command::Deps { .. })
    }
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
