// src/lib.rs

pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod logging;
pub mod output;
pub mod watch;

use std::future::Future;
use std::pin::Pin;

use anyhow::{Context, Result};
use tokio::sync::mpsc;
use tracing::info;

use crate::cli::CliArgs;
use crate::config::Settings;
use crate::engine::{supervisor, BuildDone, ChangeEvent, Debouncer, Supervisor};
use crate::exec::CommandBuild;
use crate::output::sink::{spawn_sink, SinkOptions};
use crate::watch::{spawn_watcher, WatchFilter};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config resolution (file + flags) and validation
/// - the presentation sink
/// - the file watcher feeding the debounce loop
/// - the debounce loop feeding the supervisor (or the build-only drain)
/// - Ctrl-C handling
///
/// Runs until Ctrl-C, or until a component hits a fatal condition, in which
/// case the error is returned and the process exits. Managed children are
/// spawned with `kill_on_drop`, so teardown on any of these paths does not
/// leak a process.
pub async fn run(args: CliArgs) -> Result<()> {
    let settings = Settings::load(&args)?;

    let (sink_tx, _sink_task) = spawn_sink(SinkOptions {
        color: settings.color,
        prefix: settings.prefix,
    });

    // Unbounded: fed from the notify callback side, consumed by the
    // debouncer; a notification arriving mid-build waits here for the next
    // cycle.
    let (jobs_tx, jobs_rx) = mpsc::unbounded_channel::<ChangeEvent>();

    // Capacity 1: the debouncer hands a build-done directly to the
    // supervisor and waits while a restart is still in progress, keeping
    // signals ordered.
    let (done_tx, done_rx) = mpsc::channel::<BuildDone>(1);

    let filter = WatchFilter::new(&settings.filter)?;
    let _watcher = spawn_watcher(
        settings.directory.clone(),
        settings.recursive,
        filter,
        jobs_tx,
    )?;

    let builder = CommandBuild::new(&settings.build_command, &settings.directory);
    let debouncer = Debouncer::new(settings.quiet_period, builder, sink_tx.clone());

    let supervise: Pin<Box<dyn Future<Output = Result<()>> + Send>> =
        match settings.run_command.clone() {
            Some(command) => {
                let sup = Supervisor::new(command, settings.graceful_kill, sink_tx.clone());
                Box::pin(sup.run(done_rx))
            }
            None => Box::pin(supervisor::drain(done_rx)),
        };

    info!("watchrun started");

    tokio::select! {
        res = debouncer.run(jobs_rx, done_tx) => res,
        res = supervise => res,
        ctrl = tokio::signal::ctrl_c() => {
            ctrl.context("listening for Ctrl+C")?;
            info!("shutdown requested");
            Ok(())
        }
    }
}
