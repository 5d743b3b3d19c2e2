// src/config/validate.rs

use anyhow::{anyhow, Context, Result};
use tracing::warn;

use crate::config::settings::Settings;
use crate::exec::terminate;
use crate::watch::patterns::WatchFilter;

/// Run semantic validation against resolved settings.
///
/// This checks:
/// - the watched directory exists
/// - the quiet period is at least 1 ms
/// - the pattern regex and all globs compile
/// - graceful termination is available on this platform when requested
///
/// An empty build command is accepted (every "build" succeeds immediately)
/// but is surfaced as a warning, since it is more often a typo than an
/// intentional opt-out.
pub fn validate_settings(settings: &Settings) -> Result<()> {
    ensure_directory(settings)?;
    ensure_quiet_period(settings)?;
    ensure_filter_compiles(settings)?;
    ensure_graceful_available(settings)?;
    warn_empty_build_command(settings);
    Ok(())
}

fn ensure_directory(settings: &Settings) -> Result<()> {
    if !settings.directory.is_dir() {
        return Err(anyhow!(
            "watched directory {:?} does not exist or is not a directory",
            settings.directory
        ));
    }
    Ok(())
}

fn ensure_quiet_period(settings: &Settings) -> Result<()> {
    if settings.quiet_period.is_zero() {
        return Err(anyhow!("quiet period must be at least 1 ms (got 0)"));
    }
    Ok(())
}

fn ensure_filter_compiles(settings: &Settings) -> Result<()> {
    WatchFilter::new(&settings.filter)
        .context("invalid watch filter configuration")
        .map(|_| ())
}

fn ensure_graceful_available(settings: &Settings) -> Result<()> {
    if settings.run_command.is_some()
        && settings.graceful_kill
        && !terminate::graceful_supported()
    {
        return Err(anyhow!(
            "graceful termination is not supported on this platform; pass --hard-kill"
        ));
    }
    Ok(())
}

fn warn_empty_build_command(settings: &Settings) {
    if settings.build_command.split_whitespace().next().is_none() {
        warn!("build command is empty; every change will count as a successful build");
    }
}
