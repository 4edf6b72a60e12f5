//! Batch HD-compliance checker for media libraries
//!
//! Walks a directory tree, probes every recognized video and image asset in
//! parallel, and classifies each one against 1920x1080 (and, for video,
//! 60 or 59.94 fps).

pub mod classifier;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod models;
pub mod probe;
pub mod scanner;

pub use classifier::{classify_image, classify_video};
pub use config::{clean_path, ScanConfig};
pub use error::{ProbeError, ScanError, ScanErrorKind};
pub use models::{
    AssetReport, Classification, ImageFormat, MediaType, ScanReport, ScanSummary, VideoFormat,
    Violation,
};
pub use probe::{probe_image, MediaInfoProbe, VideoProbe};
pub use scanner::scan;
