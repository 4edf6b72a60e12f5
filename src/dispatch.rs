//! Asset dispatch: route a path to its probe, classify, and report

use std::path::Path;

use crate::classifier::{classify_image, classify_video};
use crate::models::{extension_of, AssetReport, Classification, MediaType};
use crate::probe::{probe_image, VideoProbe};

/// Media families a walked entry should be probed as.
///
/// Directories and entries without a recognized extension yield nothing.
pub fn media_types(path: &Path, is_dir: bool) -> Vec<MediaType> {
    if is_dir {
        return Vec::new();
    }
    match extension_of(path) {
        Some(ext) => MediaType::from_extension(&ext),
        None => Vec::new(),
    }
}

/// Probe and classify one asset, logging exactly one outcome line
pub fn process_asset(
    path: &Path,
    media_type: MediaType,
    video_probe: &dyn VideoProbe,
) -> AssetReport {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string());
    let ext = extension_of(path).unwrap_or_default();
    log::debug!("Process {} as ext {} file...", name, ext);

    let probed = match media_type {
        MediaType::Video => video_probe.probe(path).map(|f| classify_video(&f)),
        MediaType::Image => probe_image(path).map(|f| classify_image(&f)),
    };

    let classification = match probed {
        Ok(classification) => classification,
        Err(e) => Classification::ProbeFailed(e.to_string()),
    };

    match &classification {
        Classification::Compliant => log::info!("File {} is recommended HD format!", name),
        Classification::NonCompliant(violation) => {
            log::warn!("File {} is not recommended HD format: {}", name, violation)
        }
        Classification::ProbeFailed(reason) => {
            log::warn!("Failed to parse {}: {}", path.display(), reason)
        }
    }

    AssetReport {
        path: path.to_path_buf(),
        media_type,
        classification,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProbeError;
    use crate::models::{VideoFormat, Violation};
    use image::RgbImage;
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::TempDir;

    struct FixedProbe {
        result: Option<VideoFormat>,
        calls: AtomicUsize,
    }

    impl FixedProbe {
        fn returning(result: Option<VideoFormat>) -> Self {
            Self {
                result,
                calls: AtomicUsize::new(0),
            }
        }
    }

    impl VideoProbe for FixedProbe {
        fn name(&self) -> &'static str {
            "fixed"
        }

        fn probe(&self, _path: &Path) -> Result<VideoFormat, ProbeError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.result.ok_or(ProbeError::UnknownVideoType { tracks: 0 })
        }
    }

    #[test]
    fn test_media_types() {
        assert_eq!(
            media_types(Path::new("/m/clip.MP4"), false),
            vec![MediaType::Video]
        );
        assert_eq!(
            media_types(Path::new("/m/still.Jpeg"), false),
            vec![MediaType::Image]
        );
        assert_eq!(
            media_types(Path::new("/m/rec.dvr-ms"), false),
            vec![MediaType::Video]
        );
        assert!(media_types(Path::new("/m/notes.txt"), false).is_empty());
        assert!(media_types(Path::new("/m/README"), false).is_empty());
        assert!(media_types(Path::new("/m/trailing."), false).is_empty());
        // Dotfiles are dispatched by the text after the dot
        assert_eq!(media_types(Path::new("/m/.mp4"), false), vec![MediaType::Video]);
        assert_eq!(
            media_types(Path::new("/m/.hidden.jpg"), false),
            vec![MediaType::Image]
        );
        assert!(media_types(Path::new("/m/album.jpg"), true).is_empty());
    }

    #[test]
    fn test_video_compliant() {
        let probe = FixedProbe::returning(Some(VideoFormat {
            width: 1920,
            height: 1080,
            framerate: 60.0,
            bitrate: 0,
        }));
        let report = process_asset(Path::new("/m/hd.mkv"), MediaType::Video, &probe);

        assert_eq!(report.classification, Classification::Compliant);
        assert_eq!(report.media_type, MediaType::Video);
        assert_eq!(report.path, PathBuf::from("/m/hd.mkv"));
        assert_eq!(probe.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_video_non_compliant() {
        let probe = FixedProbe::returning(Some(VideoFormat {
            width: 1280,
            height: 720,
            framerate: 30.0,
            bitrate: 0,
        }));
        let report = process_asset(Path::new("/m/sd.mp4"), MediaType::Video, &probe);

        assert_eq!(
            report.classification,
            Classification::NonCompliant(Violation::Width(1280))
        );
    }

    #[test]
    fn test_probe_failure_becomes_classification() {
        let probe = FixedProbe::returning(None);
        let report = process_asset(Path::new("/m/odd.mov"), MediaType::Video, &probe);

        match report.classification {
            Classification::ProbeFailed(reason) => assert!(reason.contains("Unknown video type")),
            other => panic!("expected ProbeFailed, got {:?}", other),
        }
    }

    #[test]
    fn test_image_does_not_touch_video_probe() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("thumb.png");
        RgbImage::new(320, 180).save(&path).unwrap();
        let probe = FixedProbe::returning(None);

        let report = process_asset(&path, MediaType::Image, &probe);
        assert_eq!(
            report.classification,
            Classification::NonCompliant(Violation::Width(320))
        );
        assert_eq!(probe.calls.load(Ordering::SeqCst), 0);
    }
}
