//! MediaInfo-backed [`VideoProbe`].
//!
//! Shells out to `mediainfo --Output=JSON <file>` and maps the single video
//! track into a [`VideoFormat`].

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use super::command::ToolCommand;
use super::VideoProbe;
use crate::config::{clean_path, ScanConfig};
use crate::error::{ProbeError, ScanError};
use crate::models::VideoFormat;

/// A prober backed by the `mediainfo` CLI
#[derive(Debug, Clone)]
pub struct MediaInfoProbe {
    mediainfo_path: PathBuf,
    timeout: Duration,
}

impl MediaInfoProbe {
    /// Create a probe for an already located mediainfo binary
    pub fn new(mediainfo_path: PathBuf, timeout: Duration) -> Self {
        Self {
            mediainfo_path,
            timeout,
        }
    }

    /// Locate `program` on `PATH` (or check it, if it is a path).
    ///
    /// A missing tool is a startup failure, not a per-file one.
    pub fn locate(program: &str, timeout: Duration) -> Result<Self, ScanError> {
        let path = which::which(program).map_err(|_| ScanError::tool_not_found(program))?;
        log::debug!("Using {} at {}", program, path.display());
        Ok(Self::new(path, timeout))
    }

    /// Locate the tool named by a scan config
    pub fn from_config(config: &ScanConfig) -> Result<Self, ScanError> {
        Self::locate(&config.mediainfo_program, config.probe_timeout)
    }
}

impl VideoProbe for MediaInfoProbe {
    fn name(&self) -> &'static str {
        "mediainfo"
    }

    fn probe(&self, path: &Path) -> Result<VideoFormat, ProbeError> {
        let path = clean_path(path);
        let mut cmd = ToolCommand::new(self.mediainfo_path.clone(), self.timeout);
        cmd.arg("--Output=JSON");
        cmd.arg(path.as_os_str());

        let output = cmd.execute()?;
        parse_output(&output.stdout)
    }
}

// ---------------------------------------------------------------------------
// JSON structures
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct MiOutput {
    media: Option<MiMedia>,
}

#[derive(Debug, Deserialize)]
struct MiMedia {
    #[serde(default)]
    track: Vec<MiTrack>,
}

#[derive(Debug, Deserialize)]
struct MiTrack {
    #[serde(rename = "@type")]
    track_type: String,

    #[serde(rename = "Width")]
    width: Option<String>,

    #[serde(rename = "Height")]
    height: Option<String>,

    #[serde(rename = "FrameRate")]
    frame_rate: Option<String>,

    #[serde(rename = "BitRate")]
    bit_rate: Option<String>,

    #[serde(rename = "OverallBitRate")]
    overall_bit_rate: Option<String>,
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

/// Map raw mediainfo JSON to a descriptor
pub fn parse_output(json: &str) -> Result<VideoFormat, ProbeError> {
    let mi: MiOutput = serde_json::from_str(json)
        .map_err(|e| ProbeError::InvalidOutput(format!("mediainfo JSON parse error: {}", e)))?;
    let tracks = mi.media.map(|m| m.track).unwrap_or_default();

    let general = tracks.iter().find(|t| t.track_type == "General");
    let videos: Vec<&MiTrack> = tracks.iter().filter(|t| t.track_type == "Video").collect();
    let [video] = videos.as_slice() else {
        return Err(ProbeError::UnknownVideoType {
            tracks: videos.len(),
        });
    };

    let width = required(video.width.as_deref(), "video width")?;
    let height = required(video.height.as_deref(), "video height")?;
    let framerate = general
        .and_then(|g| g.frame_rate.as_deref())
        .or(video.frame_rate.as_deref());
    let framerate = required(framerate, "frame rate")?;
    let bitrate = video
        .bit_rate
        .as_deref()
        .or_else(|| general.and_then(|g| g.overall_bit_rate.as_deref()))
        .and_then(parse_numeric)
        .unwrap_or(0);

    Ok(VideoFormat {
        width,
        height,
        framerate,
        bitrate,
    })
}

fn required<T: std::str::FromStr>(value: Option<&str>, field: &str) -> Result<T, ProbeError> {
    value
        .and_then(parse_numeric)
        .ok_or_else(|| ProbeError::InvalidOutput(format!("missing or invalid {}", field)))
}

fn parse_numeric<T: std::str::FromStr>(s: &str) -> Option<T> {
    s.split_whitespace().next().and_then(|n| n.parse().ok())
}
