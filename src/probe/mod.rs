//! Format probes, one per media family
//!
//! Video assets go through an external metadata tool behind the
//! [`VideoProbe`] trait so the coordinator can run against any backend.
//! Images are decoded in-process by [`probe_image`].

pub mod command;
pub mod image;
pub mod video;

use std::path::Path;

use crate::error::ProbeError;
use crate::models::VideoFormat;

pub use self::image::{probe_image, ImageCodec};
pub use self::video::MediaInfoProbe;

/// Extracts a [`VideoFormat`] from a video asset.
///
/// Implementations are shared by every probe worker, so they must be
/// `Send + Sync` and must not hold per-call state.
pub trait VideoProbe: Send + Sync {
    /// Short name used in log lines
    fn name(&self) -> &'static str;

    /// Probe one asset. Yields a fully populated descriptor or an error.
    fn probe(&self, path: &Path) -> Result<VideoFormat, ProbeError>;
}
