//! Parse the single JSON document printed by `yt-dlp --dump-single-json`.

use serde::Deserialize;
use std::collections::HashMap;

use super::{ExtractError, StreamDescriptor, VideoInfo};

#[derive(Debug, Deserialize)]
struct RawInfo {
    #[serde(default)]
    id: String,
    #[serde(default)]
    title: String,
    uploader: Option<String>,
    channel: Option<String>,
    duration: Option<f64>,
    #[serde(default)]
    formats: Vec<RawFormat>,
}

#[derive(Debug, Deserialize)]
struct RawFormat {
    format_id: Option<String>,
    url: Option<String>,
    #[serde(default)]
    ext: String,
    width: Option<u32>,
    height: Option<u32>,
    fps: Option<f64>,
    vcodec: Option<String>,
    acodec: Option<String>,
    filesize: Option<u64>,
    filesize_approx: Option<u64>,
    #[serde(default)]
    http_headers: HashMap<String, String>,
}

/// A codec of "none" means the track is absent. Missing codec fields count as absent too.
fn has_track(codec: Option<&str>) -> bool {
    matches!(codec, Some(c) if !c.is_empty() && c != "none")
}

impl RawFormat {
    fn into_stream(self) -> Option<StreamDescriptor> {
        let format_id = self.format_id?;
        let url = self.url?;
        Some(StreamDescriptor {
            format_id,
            url,
            ext: self.ext,
            width: self.width,
            height: self.height,
            fps: self.fps,
            filesize: self.filesize.or(self.filesize_approx),
            has_video: has_track(self.vcodec.as_deref()),
            has_audio: has_track(self.acodec.as_deref()),
            http_headers: self.http_headers,
        })
    }
}

/// Parse extractor JSON into [`VideoInfo`]. Formats without a URL or id are dropped.
pub fn parse_info_json(data: &[u8]) -> Result<VideoInfo, ExtractError> {
    let raw: RawInfo = serde_json::from_slice(data)?;
    let streams = raw
        .formats
        .into_iter()
        .filter_map(RawFormat::into_stream)
        .collect();
    Ok(VideoInfo {
        id: raw.id,
        title: raw.title,
        author: raw.uploader.or(raw.channel),
        duration_secs: raw
            .duration
            .filter(|d| d.is_finite() && *d >= 0.0)
            .map(|d| d.round() as u64),
        streams,
    })
}
