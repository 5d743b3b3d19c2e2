// src/config/model.rs

use serde::Deserialize;

/// Default regex for files that trigger a build.
pub const DEFAULT_PATTERN: &str = r"(.+\.rs|.+\.toml)$";

/// Default build command.
pub const DEFAULT_BUILD_COMMAND: &str = "cargo build";

/// Default quiet period in milliseconds.
pub const DEFAULT_DELAY_MS: u64 = 900;

/// Top-level configuration as read from `Watchrun.toml`.
///
/// ```toml
/// [watch]
/// directory = "."
/// pattern = '(.+\.rs|.+\.toml)$'
/// exclude_dir = [".git", "target"]
///
/// [build]
/// command = "cargo build"
/// delay_ms = 900
///
/// [run]
/// command = "./target/debug/server --port 8080"
/// ```
///
/// All sections are optional and have reasonable defaults; CLI flags
/// override anything set here.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FileConfig {
    #[serde(default)]
    pub watch: WatchSection,

    #[serde(default)]
    pub build: BuildSection,

    #[serde(default)]
    pub run: RunSection,

    #[serde(default)]
    pub log: LogSection,
}

/// `[watch]` section: what to observe and which changes count.
#[derive(Debug, Clone, Deserialize)]
pub struct WatchSection {
    /// Directory to watch for changes.
    #[serde(default = "default_directory")]
    pub directory: String,

    /// Watch subdirectories too.
    #[serde(default = "default_true")]
    pub recursive: bool,

    /// Regex a changed (root-relative) path must match.
    #[serde(default = "default_pattern")]
    pub pattern: String,

    /// Basename globs watched regardless of `pattern`.
    #[serde(default)]
    pub include: Vec<String>,

    /// Basename globs never watched.
    #[serde(default)]
    pub exclude: Vec<String>,

    /// Directory-name globs whose subtrees are ignored.
    #[serde(default)]
    pub exclude_dir: Vec<String>,
}

impl Default for WatchSection {
    fn default() -> Self {
        Self {
            directory: default_directory(),
            recursive: true,
            pattern: default_pattern(),
            include: Vec::new(),
            exclude: Vec::new(),
            exclude_dir: Vec::new(),
        }
    }
}

/// `[build]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct BuildSection {
    /// Command to rebuild after changes. An empty string skips building and
    /// counts as an always-successful build.
    #[serde(default = "default_build_command")]
    pub command: String,

    /// Quiet period before a build is triggered, in milliseconds.
    #[serde(default = "default_delay_ms")]
    pub delay_ms: u64,
}

impl Default for BuildSection {
    fn default() -> Self {
        Self {
            command: default_build_command(),
            delay_ms: default_delay_ms(),
        }
    }
}

/// `[run]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct RunSection {
    /// Command to run and restart after each successful build. Empty means
    /// build-only mode.
    #[serde(default)]
    pub command: String,

    /// Request termination and wait before killing, instead of killing
    /// outright. Only available on platforms with a cooperative termination
    /// signal.
    #[serde(default = "default_true")]
    pub graceful_kill: bool,
}

impl Default for RunSection {
    fn default() -> Self {
        Self {
            command: String::new(),
            graceful_kill: true,
        }
    }
}

/// `[log]` section: presentation of build and child output.
#[derive(Debug, Clone, Deserialize)]
pub struct LogSection {
    /// Colorize output by stream kind.
    #[serde(default = "default_true")]
    pub color: bool,

    /// Label managed-process lines with their stream.
    #[serde(default = "default_true")]
    pub prefix: bool,
}

impl Default for LogSection {
    fn default() -> Self {
        Self {
            color: true,
            prefix: true,
        }
    }
}

fn default_directory() -> String {
    ".".to_string()
}

fn default_pattern() -> String {
    DEFAULT_PATTERN.to_string()
}

fn default_build_command() -> String {
    DEFAULT_BUILD_COMMAND.to_string()
}

fn default_delay_ms() -> u64 {
    DEFAULT_DELAY_MS
}

fn default_true() -> bool {
    true
}
