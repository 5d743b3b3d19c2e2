// src/cli.rs

//! CLI argument parsing using `clap`.
//!
//! Every flag is optional here; defaults live in the config layer so that a
//! `Watchrun.toml` file can supply them and flags can override the file (see
//! [`crate::config::settings`]).

use clap::{Parser, ValueEnum};

/// Command-line arguments for `watchrun`.
#[derive(Debug, Clone, Default, Parser)]
#[command(
    name = "watchrun",
    version,
    about = "Watch a source tree, rebuild after changes, restart the program on success.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to an optional config file (TOML).
    ///
    /// Default: `Watchrun.toml` in the current working directory, if present.
    #[arg(long, value_name = "PATH")]
    pub config: Option<String>,

    /// Directory to watch for changes.
    #[arg(long, value_name = "DIR")]
    pub directory: Option<String>,

    /// Watch only the top-level directory, not subdirectories.
    #[arg(long)]
    pub no_recursive: bool,

    /// Regex a changed path must match to trigger a build.
    #[arg(long, value_name = "REGEX")]
    pub pattern: Option<String>,

    /// Watch files whose basename matches this glob (repeatable).
    #[arg(long, value_name = "GLOB")]
    pub include: Vec<String>,

    /// Ignore files whose basename matches this glob (repeatable).
    #[arg(long, value_name = "GLOB")]
    pub exclude: Vec<String>,

    /// Ignore changes under directories matching this glob (repeatable).
    #[arg(long, value_name = "GLOB")]
    pub exclude_dir: Vec<String>,

    /// Command to rebuild after changes.
    #[arg(long, value_name = "CMD")]
    pub build: Option<String>,

    /// Command to run and restart after each successful build.
    ///
    /// Parsed as whitespace-separated tokens; no shell quoting. If omitted,
    /// watchrun runs in build-only mode.
    #[arg(long, value_name = "CMD")]
    pub command: Option<String>,

    /// Quiet period in milliseconds before a build is triggered.
    #[arg(long, value_name = "MS")]
    pub delay: Option<u64>,

    /// Kill the managed process immediately instead of sending a
    /// termination request first.
    #[arg(long)]
    pub hard_kill: bool,

    /// Disable colorized output.
    #[arg(long)]
    pub no_color: bool,

    /// Disable the stdout/stderr label on managed process output.
    #[arg(long)]
    pub no_prefix: bool,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `WATCHRUN_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,
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
