// src/output/mod.rs

pub mod mux;
pub mod sink;

pub use mux::attach;
pub use sink::{spawn_sink, LogLine, SinkOptions, StreamKind};
