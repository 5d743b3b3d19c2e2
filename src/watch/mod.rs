// src/watch/mod.rs

pub mod patterns;
pub mod watcher;

pub use patterns::{FilterSpec, WatchFilter};
pub use watcher::{spawn_watcher, WatcherHandle};
