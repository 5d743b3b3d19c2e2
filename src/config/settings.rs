// src/config/settings.rs

//! Resolved runtime settings.
//!
//! Three layers, weakest first: built-in defaults, the optional
//! `Watchrun.toml` file, CLI flags. Scalars take the strongest layer that
//! set them; the repeatable list flags (`--include`, `--exclude`,
//! `--exclude-dir`) append to the file's lists rather than replacing them.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;

use crate::cli::CliArgs;
use crate::config::loader;
use crate::config::model::FileConfig;
use crate::config::validate::validate_settings;
use crate::watch::patterns::FilterSpec;

/// Everything the rest of the daemon consumes, fully resolved.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Watched root; also the working directory of the build command.
    pub directory: PathBuf,
    pub recursive: bool,
    pub filter: FilterSpec,

    /// Raw build command string; empty means "no build step".
    pub build_command: String,
    pub quiet_period: Duration,

    /// Whitespace-split run command; `None` means build-only mode.
    pub run_command: Option<Vec<String>>,
    pub graceful_kill: bool,

    pub color: bool,
    pub prefix: bool,
}

impl Settings {
    /// Load the file layer, resolve against CLI flags, and validate.
    pub fn load(args: &CliArgs) -> Result<Self> {
        let file = loader::load_file_layer(args.config.as_deref())?;
        let settings = Self::resolve(args, file);
        validate_settings(&settings)?;
        Ok(settings)
    }

    /// Pure resolution of CLI flags over the file layer.
    pub fn resolve(args: &CliArgs, file: FileConfig) -> Self {
        let directory = args
            .directory
            .clone()
            .unwrap_or(file.watch.directory)
            .into();

        let mut include = file.watch.include;
        include.extend(args.include.iter().cloned());
        let mut exclude = file.watch.exclude;
        exclude.extend(args.exclude.iter().cloned());
        let mut exclude_dir = file.watch.exclude_dir;
        exclude_dir.extend(args.exclude_dir.iter().cloned());

        let run_command = args
            .command
            .clone()
            .unwrap_or(file.run.command)
            .split_whitespace()
            .map(str::to_string)
            .collect::<Vec<_>>();

        Self {
            directory,
            recursive: file.watch.recursive && !args.no_recursive,
            filter: FilterSpec {
                pattern: args.pattern.clone().unwrap_or(file.watch.pattern),
                include,
                exclude,
                exclude_dir,
            },
            build_command: args.build.clone().unwrap_or(file.build.command),
            quiet_period: Duration::from_millis(args.delay.unwrap_or(file.build.delay_ms)),
            run_command: if run_command.is_empty() {
                None
            } else {
                Some(run_command)
            },
            graceful_kill: file.run.graceful_kill && !args.hard_kill,
            color: file.log.color && !args.no_color,
            prefix: file.log.prefix && !args.no_prefix,
        }
    }
}
