//! In-process image probe

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::config::clean_path;
use crate::error::ProbeError;
use crate::models::{extension_of, ImageFormat};

/// Decoders available to the image probe.
///
/// This table is also what the dispatcher uses to recognize images, so the
/// two can never disagree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageCodec {
    Jpeg,
    Png,
    Tiff,
    Bmp,
}

impl ImageCodec {
    /// Codec for a file extension (case-insensitive, without dot)
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "jpg" | "jpeg" => Some(ImageCodec::Jpeg),
            "png" => Some(ImageCodec::Png),
            "tiff" => Some(ImageCodec::Tiff),
            "bmp" => Some(ImageCodec::Bmp),
            _ => None,
        }
    }

    fn format(self) -> image::ImageFormat {
        match self {
            ImageCodec::Jpeg => image::ImageFormat::Jpeg,
            ImageCodec::Png => image::ImageFormat::Png,
            ImageCodec::Tiff => image::ImageFormat::Tiff,
            ImageCodec::Bmp => image::ImageFormat::Bmp,
        }
    }
}

/// Decode an image and report its pixel bounds.
///
/// The decoder is chosen from the extension alone; content in another
/// format fails to decode.
pub fn probe_image(path: &Path) -> Result<ImageFormat, ProbeError> {
    let path = clean_path(path);
    let ext = extension_of(&path).unwrap_or_default();
    let codec = ImageCodec::from_extension(&ext).ok_or(ProbeError::UnsupportedFormat(ext))?;

    let file = File::open(&path).map_err(|source| ProbeError::Io {
        path: path.clone(),
        source,
    })?;
    let decoded = image::load(BufReader::new(file), codec.format())?;

    Ok(ImageFormat {
        width: decoded.width(),
        height: decoded.height(),
    })
}
