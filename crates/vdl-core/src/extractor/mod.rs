//! Extractor interface for turning a video page URL into downloadable streams.
//!
//! The download pipeline only depends on the [`Extractor`] trait and does not
//! know how a page is resolved. [`YtDlpExtractor`] delegates to the `yt-dlp`
//! executable.

mod parse;
mod ytdlp;

pub use parse::parse_info_json;
pub use ytdlp::YtDlpExtractor;

use std::collections::HashMap;
use url::Url;

/// One downloadable encoding of a video.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StreamDescriptor {
    pub format_id: String,
    /// Direct media URL.
    pub url: String,
    /// File extension of the container (e.g. "mp4").
    pub ext: String,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub fps: Option<f64>,
    /// Exact or approximate size in bytes, when the extractor knows it.
    pub filesize: Option<u64>,
    pub has_video: bool,
    pub has_audio: bool,
    /// Headers the GET for `url` must carry.
    pub http_headers: HashMap<String, String>,
}

impl StreamDescriptor {
    /// Audio and video in a single file.
    pub fn is_progressive(&self) -> bool {
        self.has_video && self.has_audio
    }

    /// Resolution label such as "720p".
    pub fn resolution(&self) -> Option<String> {
        self.height.map(|h| format!("{h}p"))
    }
}

/// Metadata and streams for one video.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VideoInfo {
    pub id: String,
    pub title: String,
    pub author: Option<String>,
    pub duration_secs: Option<u64>,
    pub streams: Vec<StreamDescriptor>,
}

#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error("extractor executable {0:?} not found; install yt-dlp or set ytdlp_path in config")]
    NotInstalled(String),
    #[error("failed to run extractor: {0}")]
    Spawn(#[source] std::io::Error),
    #[error("extractor failed: {0}")]
    Failed(String),
    #[error("could not read extractor output: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Resolves a video page URL into its metadata and stream list.
pub trait Extractor {
    fn extract(&self, url: &Url) -> Result<VideoInfo, ExtractError>;
}
