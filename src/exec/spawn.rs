// src/exec/spawn.rs

//! Starting the managed process.

use std::process::Stdio;

use anyhow::{Context, Result};
use tokio::process::{Child, Command};
use tracing::info;

/// Start the run command with piped stdout/stderr.
///
/// `tokens` is the whitespace-split run command: first token is the
/// executable, the rest are literal arguments (no shell quoting support).
/// Failure here is fatal to the daemon; a restart loop whose target cannot
/// start has no recovery path, so callers propagate the error to `main`.
pub fn start_process(tokens: &[String]) -> Result<Child> {
    let (program, args) = tokens
        .split_first()
        .context("run command has no executable token")?;

    let child = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .with_context(|| format!("could not start run command '{program}'"))?;

    info!(pid = ?child.id(), command = %program, "managed process started");

    Ok(child)
}
