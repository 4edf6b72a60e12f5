//! Error types for the HD scanner

use std::path::PathBuf;
use std::process::ExitStatus;
use std::time::Duration;
use thiserror::Error;

/// Error kinds that abort a scan (startup or walk failures)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanErrorKind {
    /// Permission denied when accessing a file or directory
    PermissionDenied,
    /// File or directory not found
    NotFound,
    /// I/O error during traversal
    IoError,
    /// Search root is empty or not absolute
    InvalidPath,
    /// Required external tool is not on the search path
    ToolNotFound,
    /// Worker pool could not be created
    ThreadPool,
}

/// Represents an error that stops the whole scan
#[derive(Debug, Error)]
#[error("{kind:?}: {message} (path: {path:?})")]
pub struct ScanError {
    /// The kind of error
    pub kind: ScanErrorKind,
    /// The path where the error occurred
    pub path: Option<PathBuf>,
    /// Human-readable error message
    pub message: String,
}

impl ScanError {
    /// Create a new scan error
    pub fn new(kind: ScanErrorKind, path: Option<PathBuf>, message: impl Into<String>) -> Self {
        Self {
            kind,
            path,
            message: message.into(),
        }
    }

    /// Create an invalid search root error
    pub fn invalid_path(path: PathBuf) -> Self {
        Self::new(
            ScanErrorKind::InvalidPath,
            Some(path.clone()),
            format!("Invalid search path({})", path.display()),
        )
    }

    /// Create a missing tool error
    pub fn tool_not_found(tool: &str) -> Self {
        Self::new(
            ScanErrorKind::ToolNotFound,
            None,
            format!("{} is not installed or not on PATH", tool),
        )
    }
}

impl From<std::io::Error> for ScanError {
    fn from(err: std::io::Error) -> Self {
        let kind = match err.kind() {
            std::io::ErrorKind::PermissionDenied => ScanErrorKind::PermissionDenied,
            std::io::ErrorKind::NotFound => ScanErrorKind::NotFound,
            _ => ScanErrorKind::IoError,
        };
        Self::new(kind, None, err.to_string())
    }
}

impl From<walkdir::Error> for ScanError {
    fn from(err: walkdir::Error) -> Self {
        let path = err.path().map(|p| p.to_path_buf());
        let kind = match err.io_error().map(|e| e.kind()) {
            Some(std::io::ErrorKind::PermissionDenied) => ScanErrorKind::PermissionDenied,
            Some(std::io::ErrorKind::NotFound) => ScanErrorKind::NotFound,
            _ => ScanErrorKind::IoError,
        };
        Self::new(kind, path, err.to_string())
    }
}

/// Failure to probe a single asset. Never aborts the scan.
#[derive(Debug, Error)]
pub enum ProbeError {
    /// The asset could not be opened
    #[error("failed to open {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The image content could not be decoded
    #[error("decode error: {0}")]
    Decode(#[from] image::ImageError),

    /// No probe handles this extension
    #[error("unsupported format: {0:?}")]
    UnsupportedFormat(String),

    /// The external tool could not be started or exited unsuccessfully
    #[error("{tool} failed: {message}")]
    ToolFailed { tool: String, message: String },

    /// The external tool did not finish before its deadline
    #[error("{tool} timed out after {timeout:?}")]
    Timeout { tool: String, timeout: Duration },

    /// The external tool produced output we cannot map
    #[error("invalid probe output: {0}")]
    InvalidOutput(String),

    /// Zero or several video tracks
    #[error("Unknown video type ({tracks} video tracks)")]
    UnknownVideoType { tracks: usize },
}

impl ProbeError {
    /// Create a tool failure from a finished process
    pub fn exit_status(tool: &str, status: ExitStatus, stderr: &str) -> Self {
        Self::ToolFailed {
            tool: tool.to_string(),
            message: format!("exited with {}: {}", status, stderr.trim()),
        }
    }
}
