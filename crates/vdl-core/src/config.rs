use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::resolution::Resolution;

/// Global configuration loaded from `~/.config/vdl/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VdlConfig {
    /// Path or command name of the yt-dlp executable.
    #[serde(default = "default_ytdlp_path")]
    pub ytdlp_path: PathBuf,
    /// Default destination directory when `--output` is not given (None = current directory).
    #[serde(default)]
    pub output_dir: Option<PathBuf>,
    /// Default resolution selector when `--resolution` is not given.
    #[serde(default)]
    pub resolution: Option<Resolution>,
    /// Socket timeout handed to yt-dlp while it resolves the video page.
    #[serde(default = "default_socket_timeout_secs")]
    pub socket_timeout_secs: u64,
    /// Connect timeout for the stream transfer.
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
    /// Abort the transfer if it stays below 1 KiB/s for this many seconds.
    #[serde(default = "default_low_speed_time_secs")]
    pub low_speed_time_secs: u64,
    /// User-Agent for the transfer when the extractor does not supply one.
    #[serde(default)]
    pub user_agent: Option<String>,
}

fn default_ytdlp_path() -> PathBuf {
    PathBuf::from("yt-dlp")
}

fn default_socket_timeout_secs() -> u64 {
    15
}

fn default_connect_timeout_secs() -> u64 {
    30
}

fn default_low_speed_time_secs() -> u64 {
    60
}

impl Default for VdlConfig {
    fn default() -> Self {
        Self {
            ytdlp_path: default_ytdlp_path(),
            output_dir: None,
            resolution: None,
            socket_timeout_secs: default_socket_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
            low_speed_time_secs: default_low_speed_time_secs(),
            user_agent: None,
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("vdl")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<VdlConfig> {
    load_or_init_at(&config_path()?)
}

/// Same as [`load_or_init`] for an explicit path.
pub fn load_or_init_at(path: &Path) -> Result<VdlConfig> {
    if !path.exists() {
        let default_cfg = VdlConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(path)?;
    let cfg: VdlConfig =
        toml::from_str(&data).with_context(|| format!("invalid config {}", path.display()))?;
    Ok(cfg)
}
