// src/watch/patterns.rs

//! Include/exclude filtering of changed paths.
//!
//! A change is forwarded to the debounce loop when:
//!
//! - no ancestor directory name matches an `exclude_dir` glob, and
//! - the basename does not match an `exclude` glob, and
//! - the basename matches an `include` glob OR the whole (root-relative)
//!   path matches the `pattern` regex.
//!
//! Globs match basenames / directory names; the regex sees the relative path
//! with forward slashes.

use std::path::Path;

use anyhow::{Context, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};
use regex::Regex;

/// Raw filter configuration, as resolved from the CLI and config file.
#[derive(Debug, Clone)]
pub struct FilterSpec {
    /// Regex a relative path must match to be watched.
    pub pattern: String,
    /// Basename globs that are watched regardless of `pattern`.
    pub include: Vec<String>,
    /// Basename globs that are never watched.
    pub exclude: Vec<String>,
    /// Directory-name globs whose subtrees are ignored entirely.
    pub exclude_dir: Vec<String>,
}

/// Compiled filter used by the watcher task.
#[derive(Debug, Clone)]
pub struct WatchFilter {
    pattern: Regex,
    include: GlobSet,
    exclude: GlobSet,
    exclude_dir: GlobSet,
}

impl WatchFilter {
    pub fn new(spec: &FilterSpec) -> Result<Self> {
        let pattern = Regex::new(&spec.pattern)
            .with_context(|| format!("invalid watch pattern regex: {}", spec.pattern))?;

        Ok(Self {
            pattern,
            include: build_globset(&spec.include).context("building include globset")?,
            exclude: build_globset(&spec.exclude).context("building exclude globset")?,
            exclude_dir: build_globset(&spec.exclude_dir).context("building exclude-dir globset")?,
        })
    }

    /// Decide whether a changed path (relative to the watch root, forward
    /// slashes) should trigger a build.
    pub fn matches(&self, rel_path: &str) -> bool {
        let path = Path::new(rel_path);

        let Some(base) = path.file_name().and_then(|n| n.to_str()) else {
            return false;
        };

        // notify's recursive mode has no per-subtree opt-out, so excluded
        // directories are filtered per event on the path's components.
        if let Some(parent) = path.parent() {
            for component in parent.components() {
                if let Some(name) = component.as_os_str().to_str() {
                    if self.exclude_dir.is_match(name) {
                        return false;
                    }
                }
            }
        }

        if self.exclude.is_match(base) {
            return false;
        }

        self.include.is_match(base) || self.pattern.is_match(rel_path)
    }
}

fn build_globset(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pat in patterns {
        let glob = Glob::new(pat).with_context(|| format!("invalid glob pattern: {pat}"))?;
        builder.add(glob);
    }
    Ok(builder.build()?)
}
