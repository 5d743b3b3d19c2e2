// src/engine/supervisor.rs

//! Process supervisor: restarts the managed process once per successful
//! build.
//!
//! The single child handle is owned exclusively by this task; all access is
//! serialized through its event loop. On each build-done signal the previous
//! child is stopped and reaped *before* the replacement is spawned, so there
//! is never a window with two live managed processes.

use anyhow::{Context, Result};
use tokio::process::Child;
use tokio::sync::mpsc;
use tracing::debug;

use crate::engine::BuildDone;
use crate::exec::{spawn, terminate};
use crate::output;
use crate::output::sink::{LogLine, StreamKind};

pub struct Supervisor {
    command: Vec<String>,
    graceful: bool,
    sink: mpsc::Sender<LogLine>,
    current: Option<Child>,
}

impl Supervisor {
    /// `command` is the whitespace-split run command; must be non-empty
    /// (build-only mode uses [`drain`] instead of a supervisor).
    pub fn new(command: Vec<String>, graceful: bool, sink: mpsc::Sender<LogLine>) -> Self {
        Self {
            command,
            graceful,
            sink,
            current: None,
        }
    }

    /// Loop over build-done signals until the channel closes.
    ///
    /// Any `Err` out of here is fatal: a run command that cannot start, or a
    /// stop that cannot be confirmed, leaves no consistent state to continue
    /// from.
    pub async fn run(mut self, mut done_rx: mpsc::Receiver<BuildDone>) -> Result<()> {
        while done_rx.recv().await.is_some() {
            self.restart().await?;
        }

        debug!("supervisor loop ended");
        Ok(())
    }

    /// Stop the previous child (if any), then start and register a fresh one.
    pub async fn restart(&mut self) -> Result<()> {
        if let Some(mut child) = self.current.take() {
            terminate::stop(&mut child, self.graceful)
                .await
                .context("stopping previous managed process")?;
        }

        let _ = self
            .sink
            .send(LogLine::new(StreamKind::Status, "restarting the run command"))
            .await;

        let mut child = spawn::start_process(&self.command)?;

        let stdout = child
            .stdout
            .take()
            .context("managed process has no stdout pipe")?;
        let stderr = child
            .stderr
            .take()
            .context("managed process has no stderr pipe")?;
        output::attach(stdout, stderr, self.sink.clone());

        self.current = Some(child);
        Ok(())
    }

    /// Pid of the currently managed process, if one is running.
    pub fn current_pid(&self) -> Option<u32> {
        self.current.as_ref().and_then(Child::id)
    }
}

/// Build-only mode: no run command is configured, so build-done signals are
/// consumed and no process management happens.
pub async fn drain(mut done_rx: mpsc::Receiver<BuildDone>) -> Result<()> {
    while done_rx.recv().await.is_some() {
        debug!("build done (build-only mode)");
    }
    Ok(())
}
