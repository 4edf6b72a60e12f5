//! Configuration for the HD scanner

use serde::{Deserialize, Serialize};
use std::path::{Component, Path, PathBuf};
use std::time::Duration;

use crate::error::ScanError;

/// Default deadline for one external probe invocation
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(60);

/// Default video metadata tool
pub const DEFAULT_MEDIAINFO_PROGRAM: &str = "mediainfo";

/// Configuration for a scan
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Absolute root directory to scan
    pub root: PathBuf,

    /// Number of probe workers
    /// 0 means auto-detect (available parallelism)
    pub num_threads: usize,

    /// Deadline for each external probe call
    pub probe_timeout: Duration,

    /// Program name or path of the video metadata tool
    pub mediainfo_program: String,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::new(),
            num_threads: 0,
            probe_timeout: DEFAULT_PROBE_TIMEOUT,
            mediainfo_program: DEFAULT_MEDIAINFO_PROGRAM.to_string(),
        }
    }
}

impl ScanConfig {
    /// Create a new config for the given root
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            ..Default::default()
        }
    }

    /// Create a config builder
    pub fn builder() -> ScanConfigBuilder {
        ScanConfigBuilder::new()
    }

    /// Clean a user-supplied search root and require it to be absolute
    pub fn resolve_root(raw: &Path) -> Result<PathBuf, ScanError> {
        let cleaned = clean_path(raw);
        if !cleaned.is_absolute() {
            return Err(ScanError::invalid_path(cleaned));
        }
        Ok(cleaned)
    }

    /// Get the effective number of threads
    pub fn effective_threads(&self) -> usize {
        if self.num_threads == 0 {
            std::thread::available_parallelism()
                .map(|p| p.get())
                .unwrap_or(4)
        } else {
            self.num_threads
        }
    }
}

/// Lexically normalize a path.
///
/// Drops `.` components, resolves `..` against the preceding component and
/// removes redundant or trailing separators. Does not touch the filesystem.
/// An empty result becomes `.`.
pub fn clean_path(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                // `..` at the root stays at the root
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(".."),
            },
            other => out.push(other.as_os_str()),
        }
    }
    if out.as_os_str().is_empty() {
        out.push(".");
    }
    out
}

/// Builder for ScanConfig
#[derive(Debug, Default)]
pub struct ScanConfigBuilder {
    config: ScanConfig,
}

impl ScanConfigBuilder {
    /// Create a new builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the root directory
    pub fn root(mut self, root: PathBuf) -> Self {
        self.config.root = root;
        self
    }

    /// Set the number of threads
    pub fn num_threads(mut self, threads: usize) -> Self {
        self.config.num_threads = threads;
        self
    }

    /// Set the per-probe deadline
    pub fn probe_timeout(mut self, timeout: Duration) -> Self {
        self.config.probe_timeout = timeout;
        self
    }

    /// Set the video metadata tool
    pub fn mediainfo_program(mut self, program: impl Into<String>) -> Self {
        self.config.mediainfo_program = program.into();
        self
    }

    /// Build the config
    pub fn build(self) -> ScanConfig {
        self.config
    }
}
