// src/watch/watcher.rs

use std::path::{Path, PathBuf};

use anyhow::Result;
use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::engine::ChangeEvent;
use crate::watch::patterns::WatchFilter;

/// Handle for the filesystem watcher.
///
/// Exists mainly so the underlying `RecommendedWatcher` is kept alive for as
/// long as needed. Dropping this handle stops file watching.
pub struct WatcherHandle {
    _inner: RecommendedWatcher,
}

impl std::fmt::Debug for WatcherHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WatcherHandle").finish()
    }
}

/// Spawn a filesystem watcher on `root` and forward filtered change
/// notifications to the debounce loop.
///
/// - `recursive` selects whole-tree vs top-level-only watching.
/// - `filter` decides which changed paths count (see [`WatchFilter`]).
/// - `jobs_tx` is the channel into the debouncer; unbounded because the
///   notify callback runs on a non-async thread and must not block.
///
/// Watch errors are reported and the loop continues; transient failures from
/// the OS notification layer never take the daemon down.
pub fn spawn_watcher(
    root: impl Into<PathBuf>,
    recursive: bool,
    filter: WatchFilter,
    jobs_tx: mpsc::UnboundedSender<ChangeEvent>,
) -> Result<WatcherHandle> {
    let root = root.into();
    let root = root.canonicalize().unwrap_or_else(|_| root.clone()); // best-effort

    // Channel from the blocking notify callback into the async world.
    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<Event>();

    // Closure called synchronously by notify whenever an event arrives.
    let mut watcher = RecommendedWatcher::new(
        move |res: notify::Result<Event>| match res {
            Ok(event) => {
                if let Err(err) = event_tx.send(event) {
                    // Can't log via tracing here easily, so fall back to stderr.
                    eprintln!("watchrun: failed to forward notify event: {err}");
                }
            }
            Err(err) => {
                eprintln!("watchrun: file watch error: {err}");
            }
        },
        Config::default(),
    )?;

    let mode = if recursive {
        RecursiveMode::Recursive
    } else {
        RecursiveMode::NonRecursive
    };
    watcher.watch(&root, mode)?;

    info!("file watcher started on {:?}", root);

    // Async task that consumes notify events and forwards matching changes.
    let async_root = root.clone();
    tokio::spawn(async move {
        while let Some(event) = event_rx.recv().await {
            debug!("received notify event: {:?}", event);

            for path in &event.paths {
                let Some(rel_str) = relative_str(&async_root, path) else {
                    debug!(
                        "could not relativize path {:?} against root {:?}",
                        path, async_root
                    );
                    continue;
                };

                if !filter.matches(&rel_str) {
                    continue;
                }

                debug!(path = %rel_str, "watch match -> change notification");
                if jobs_tx
                    .send(ChangeEvent { path: path.clone() })
                    .is_err()
                {
                    // Debouncer is gone; no point keeping this loop alive.
                    return;
                }
            }
        }

        debug!("file watcher loop ended");
    });

    Ok(WatcherHandle { _inner: watcher })
}

/// Convert a path into a string relative to `root`, with forward slashes.
///
/// Returns `None` if the path is not under `root` and cannot be relativized.
fn relative_str(root: &Path, path: &Path) -> Option<String> {
    let rel = path.strip_prefix(root).ok()?;
    let s = rel.to_string_lossy().replace('\\', "/");
    Some(s)
}
