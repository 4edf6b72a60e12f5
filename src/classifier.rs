//! HD compliance rules
//!
//! Checks run in a fixed order (width, height, then framerate) and the first
//! failing check is the one reported.

use crate::models::{
    Classification, ImageFormat, VideoFormat, Violation, HD_FRAMERATES, HD_HEIGHT, HD_WIDTH,
};

/// Classify a probed video against 1920x1080 at 60 or 59.94 fps
pub fn classify_video(format: &VideoFormat) -> Classification {
    let violation =
        check_geometry(format.width, format.height).or_else(|| check_framerate(format.framerate));
    match violation {
        Some(violation) => Classification::NonCompliant(violation),
        None => Classification::Compliant,
    }
}

/// Classify a probed image against 1920x1080
pub fn classify_image(format: &ImageFormat) -> Classification {
    match check_geometry(format.width, format.height) {
        Some(violation) => Classification::NonCompliant(violation),
        None => Classification::Compliant,
    }
}

fn check_geometry(width: u32, height: u32) -> Option<Violation> {
    if width != HD_WIDTH {
        return Some(Violation::Width(width));
    }
    if height != HD_HEIGHT {
        return Some(Violation::Height(height));
    }
    None
}

// Exact equality: 59.94 is only accepted as the parsed literal, not 60000/1001.
#[allow(clippy::float_cmp)]
fn check_framerate(framerate: f64) -> Option<Violation> {
    if HD_FRAMERATES.iter().any(|&accepted| framerate == accepted) {
        None
    } else {
        Some(Violation::Framerate(framerate))
    }
}
