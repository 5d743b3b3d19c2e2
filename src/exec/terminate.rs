// src/exec/terminate.rs

//! Stopping the managed process.
//!
//! Two strategies:
//!
//! - hard: unconditional kill, then wait for the exit to be reaped;
//! - graceful: SIGTERM, then race the wait against [`GRACE_TIMEOUT`] and
//!   escalate to a hard stop if the process ignores the request.
//!
//! Failing to kill or to reap is fatal to the whole daemon: continuing after
//! a stop we cannot confirm risks piling up orphaned children, one per
//! rebuild. Callers propagate these errors to `main` rather than retrying.

use std::time::Duration;

use anyhow::{Context, Result};
use tokio::process::Child;
use tokio::time;
use tracing::{info, warn};

/// How long a gracefully-stopped process gets before the hard kill.
pub const GRACE_TIMEOUT: Duration = Duration::from_secs(3);

/// Whether this platform can deliver a cooperative termination request.
///
/// Checked at configuration time; graceful mode is rejected up front on
/// platforms without it instead of silently degrading to hard kills.
pub fn graceful_supported() -> bool {
    cfg!(unix)
}

/// Stop the process, blocking until it is confirmed terminated and reaped.
pub async fn stop(child: &mut Child, graceful: bool) -> Result<()> {
    if graceful {
        stop_with_grace(child, GRACE_TIMEOUT).await
    } else {
        stop_hard(child).await
    }
}

/// Graceful stop with an explicit grace period (tests shorten it).
pub async fn stop_with_grace(child: &mut Child, grace: Duration) -> Result<()> {
    info!("gracefully stopping the managed process");

    request_termination(child)?;

    // `Child::wait` is cancel-safe: losing the race does not lose the exit
    // status, so the escalation path can wait again and still reap.
    match time::timeout(grace, child.wait()).await {
        Ok(status) => {
            status.context("could not reap managed process after termination request")?;
            Ok(())
        }
        Err(_) => {
            warn!(
                grace_ms = grace.as_millis() as u64,
                "managed process ignored termination request, escalating to hard stop"
            );
            stop_hard(child).await
        }
    }
}

async fn stop_hard(child: &mut Child) -> Result<()> {
    info!("hard stopping the managed process");

    child
        .start_kill()
        .context("could not kill managed process")?;
    child
        .wait()
        .await
        .context("could not reap managed process after kill")?;

    Ok(())
}

#[cfg(unix)]
fn request_termination(child: &Child) -> Result<()> {
    use anyhow::anyhow;

    // `id()` is None once the child has been reaped; we have not waited yet,
    // so a None here means the kernel already cleaned up and wait() below
    // will return immediately.
    let Some(pid) = child.id() else {
        return Ok(());
    };

    let rc = unsafe { libc::kill(pid as libc::pid_t, libc::SIGTERM) };
    if rc != 0 {
        let err = std::io::Error::last_os_error();
        return Err(anyhow!(err).context("could not send SIGTERM to managed process"));
    }

    Ok(())
}

#[cfg(not(unix))]
fn request_termination(_child: &Child) -> Result<()> {
    // Unreachable in practice: config validation rejects graceful mode on
    // platforms where it is unsupported.
    anyhow::bail!("graceful termination is not supported on this platform")
}
