//! Core data models for the HD scanner

use chrono::{DateTime, Local};
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::probe::image::ImageCodec;

/// Canonical HD width in pixels
pub const HD_WIDTH: u32 = 1920;

/// Canonical HD height in pixels
pub const HD_HEIGHT: u32 = 1080;

/// Accepted video frame rates, compared exactly
pub const HD_FRAMERATES: [f64; 2] = [60.0, 59.94];

/// Extensions routed to the video probe (lowercase, without dot)
pub const VIDEO_EXTENSIONS: &[&str] = &[
    "avi", "wmv", "asf", "mpg", "vob", "mkv", "dvr-ms", "mp4", "mov", "dat", "m2ts", "mts", "qt",
    "mxf", "m4v", "gif",
];

/// Lowercased text after the last `.` of the file name.
///
/// A dotfile such as `.mp4` counts as having the extension `mp4`. Names
/// without a dot, or ending in one, have no extension.
pub fn extension_of(path: &Path) -> Option<String> {
    let name = path.file_name()?.to_string_lossy();
    let (_, ext) = name.rsplit_once('.')?;
    if ext.is_empty() {
        return None;
    }
    Some(ext.to_lowercase())
}

/// Media family of an asset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    /// Probed with the external metadata tool
    Video,
    /// Decoded in-process
    Image,
}

impl MediaType {
    /// Every media family an extension belongs to.
    ///
    /// Comparison is case-insensitive and exact. The lists are disjoint today,
    /// but an extension present in both yields both families.
    pub fn from_extension(ext: &str) -> Vec<MediaType> {
        let ext_lower = ext.to_lowercase();
        let mut types = Vec::new();
        if VIDEO_EXTENSIONS.contains(&ext_lower.as_str()) {
            types.push(MediaType::Video);
        }
        if ImageCodec::from_extension(&ext_lower).is_some() {
            types.push(MediaType::Image);
        }
        types
    }

    /// Get the string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaType::Video => "video",
            MediaType::Image => "image",
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Probed characteristics of one video asset
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct VideoFormat {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Frames per second
    pub framerate: f64,
    /// Bits per second, 0 when the tool does not report one
    pub bitrate: u64,
}

/// Probed geometry of one still image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ImageFormat {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

/// The first HD rule an asset breaks, with the offending value
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "field", content = "actual", rename_all = "lowercase")]
pub enum Violation {
    Width(u32),
    Height(u32),
    Framerate(f64),
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::Width(w) => write!(f, "Invalid width size({})", w),
            Violation::Height(h) => write!(f, "Invalid height size({})", h),
            Violation::Framerate(fps) => write!(f, "Invalid frame rate({})", fps),
        }
    }
}

/// Outcome for one dispatched asset
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "reason", rename_all = "snake_case")]
pub enum Classification {
    Compliant,
    NonCompliant(Violation),
    ProbeFailed(String),
}

impl Classification {
    pub fn is_compliant(&self) -> bool {
        matches!(self, Classification::Compliant)
    }
}

/// Result of probing and classifying one asset
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssetReport {
    /// Full path to the asset
    pub path: PathBuf,
    /// Family the asset was probed as
    pub media_type: MediaType,
    /// Classification outcome
    pub classification: Classification,
}

/// Result of a scan operation
#[derive(Debug, Clone, Serialize)]
pub struct ScanReport {
    /// Root the walk started from
    pub root: PathBuf,
    /// Local time the scan started
    pub started_at: DateTime<Local>,
    /// Total number of directories traversed
    pub total_dirs: u64,
    /// Total number of non-directory entries seen
    pub total_files: u64,
    /// One report per dispatched asset, in completion order
    pub assets: Vec<AssetReport>,
    /// Total scan duration in milliseconds
    pub duration_ms: u64,
}

impl ScanReport {
    /// Aggregate counts for this scan
    pub fn summary(&self) -> ScanSummary {
        let mut summary = ScanSummary {
            dispatched: self.assets.len() as u64,
            total_dirs: self.total_dirs,
            total_files: self.total_files,
            duration_ms: self.duration_ms,
            ..Default::default()
        };
        for asset in &self.assets {
            match asset.classification {
                Classification::Compliant => summary.compliant += 1,
                Classification::NonCompliant(_) => summary.non_compliant += 1,
                Classification::ProbeFailed(_) => summary.failed += 1,
            }
        }
        summary
    }
}

/// Counts of classification outcomes
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScanSummary {
    /// Assets handed to a probe
    pub dispatched: u64,
    pub compliant: u64,
    pub non_compliant: u64,
    pub failed: u64,
    pub total_dirs: u64,
    pub total_files: u64,
    pub duration_ms: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_media_type_from_extension() {
        // Video extensions
        assert_eq!(MediaType::from_extension("mp4"), vec![MediaType::Video]);
        assert_eq!(MediaType::from_extension("MKV"), vec![MediaType::Video]);
        assert_eq!(MediaType::from_extension("dvr-ms"), vec![MediaType::Video]);
        assert_eq!(MediaType::from_extension("m2ts"), vec![MediaType::Video]);
        assert_eq!(MediaType::from_extension("gif"), vec![MediaType::Video]);

        // Image extensions
        assert_eq!(MediaType::from_extension("jpg"), vec![MediaType::Image]);
        assert_eq!(MediaType::from_extension("JPEG"), vec![MediaType::Image]);
        assert_eq!(MediaType::from_extension("Tiff"), vec![MediaType::Image]);
        assert_eq!(MediaType::from_extension("bmp"), vec![MediaType::Image]);

        // Not recognized
        assert!(MediaType::from_extension("txt").is_empty());
        assert!(MediaType::from_extension("tif").is_empty());
        assert!(MediaType::from_extension("webm").is_empty());
        assert!(MediaType::from_extension("m2ts,").is_empty());
        assert!(MediaType::from_extension("").is_empty());
    }

    #[test]
    fn test_extension_of() {
        assert_eq!(extension_of(Path::new("/m/clip.MP4")), Some("mp4".to_string()));
        assert_eq!(extension_of(Path::new("/m/a.b.Jpeg")), Some("jpeg".to_string()));
        assert_eq!(extension_of(Path::new("/m/.mp4")), Some("mp4".to_string()));
        assert_eq!(extension_of(Path::new("/m/.hidden.jpg")), Some("jpg".to_string()));
        assert_eq!(extension_of(Path::new("/m/v1.0/README")), None);
        assert_eq!(extension_of(Path::new("/m/trailing.")), None);
        assert_eq!(extension_of(Path::new("/")), None);
    }

    #[test]
    fn test_extension_lists_are_disjoint() {
        for ext in VIDEO_EXTENSIONS {
            assert!(ImageCodec::from_extension(ext).is_none(), "{ext} in both lists");
        }
    }

    #[test]
    fn test_violation_messages() {
        assert_eq!(Violation::Width(1280).to_string(), "Invalid width size(1280)");
        assert_eq!(Violation::Height(720).to_string(), "Invalid height size(720)");
        assert_eq!(Violation::Framerate(30.0).to_string(), "Invalid frame rate(30)");
        assert_eq!(Violation::Framerate(59.941).to_string(), "Invalid frame rate(59.941)");
    }

    #[test]
    fn test_scan_report_summary() {
        let report = ScanReport {
            root: PathBuf::from("/media"),
            started_at: Local::now(),
            total_dirs: 2,
            total_files: 5,
            assets: vec![
                AssetReport {
                    path: PathBuf::from("/media/a.jpg"),
                    media_type: MediaType::Image,
                    classification: Classification::Compliant,
                },
                AssetReport {
                    path: PathBuf::from("/media/b.mp4"),
                    media_type: MediaType::Video,
                    classification: Classification::NonCompliant(Violation::Width(1280)),
                },
                AssetReport {
                    path: PathBuf::from("/media/c.mov"),
                    media_type: MediaType::Video,
                    classification: Classification::ProbeFailed("boom".to_string()),
                },
            ],
            duration_ms: 12,
        };

        let summary = report.summary();
        assert_eq!(summary.dispatched, 3);
        assert_eq!(summary.compliant, 1);
        assert_eq!(summary.non_compliant, 1);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.total_dirs, 2);
        assert_eq!(summary.total_files, 5);
    }

    #[test]
    fn test_classification_serialization() {
        let json = serde_json::to_value(Classification::NonCompliant(Violation::Height(720))).unwrap();
        assert_eq!(json["status"], "non_compliant");
        assert_eq!(json["reason"]["field"], "height");
        assert_eq!(json["reason"]["actual"], 720);

        let json = serde_json::to_value(Classification::Compliant).unwrap();
        assert_eq!(json["status"], "compliant");
    }
}
