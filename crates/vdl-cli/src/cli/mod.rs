//! CLI for vdl: download one video at a chosen resolution.

mod download;
mod prompt;
mod report;

use anyhow::Result;
use clap::builder::{PossibleValuesParser, TypedValueParser};
use clap::{ArgAction, Parser};
use std::io;
use std::path::PathBuf;
use vdl_core::config::{self, VdlConfig};
use vdl_core::job::DownloadRequest;
use vdl_core::resolution::Resolution;

pub use download::RunStatus;

/// `-r/--resolution`: the fixed choices, listed in `--help`, parsed into [`Resolution`].
fn resolution_parser() -> impl TypedValueParser<Value = Resolution> {
    PossibleValuesParser::new(Resolution::ALL.map(Resolution::as_str))
        .try_map(|s| s.parse::<Resolution>())
}

/// Top-level CLI for vdl.
#[derive(Debug, Parser)]
#[command(name = "vdl", version, disable_version_flag = true)]
#[command(about = "Download a video from its page URL", long_about = None)]
pub struct Cli {
    /// Video page URL. Prompted for when omitted.
    pub url: Option<String>,

    /// Directory to save the video in (created if missing). Defaults to the current directory.
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Stream resolution; falls back to the highest when the requested one is unavailable.
    #[arg(short, long, value_name = "RES", value_parser = resolution_parser())]
    pub resolution: Option<Resolution>,

    /// Custom filename; the stream's extension is appended when missing.
    #[arg(short, long, value_name = "NAME")]
    pub filename: Option<String>,

    /// Print version.
    #[arg(short = 'v', long = "version", action = ArgAction::Version)]
    version: Option<bool>,
}

impl Cli {
    /// Builds the download request. Flags win over config; resolution defaults to highest.
    pub fn request(&self, url: String, cfg: &VdlConfig) -> DownloadRequest {
        DownloadRequest {
            url,
            output_dir: self.output.clone().or_else(|| cfg.output_dir.clone()),
            resolution: self.resolution.or(cfg.resolution).unwrap_or_default(),
            filename: self.filename.clone(),
        }
    }
}

pub async fn run_from_args() -> Result<RunStatus> {
    let cli = Cli::parse();
    let cfg = config::load_or_init().unwrap_or_else(|e| {
        tracing::warn!("could not load config, using defaults: {:#}", e);
        eprintln!("warning: ignoring config file: {:#}", e);
        VdlConfig::default()
    });
    tracing::debug!("loaded config: {:?}", cfg);

    let url = match cli.url.clone() {
        Some(url) => url,
        None => prompt::read_url(&mut io::stdin().lock(), &mut io::stdout())?,
    };

    let request = cli.request(url, &cfg);
    let status = download::run_download(&cfg, request).await;

    println!("Program finished");
    Ok(status)
}

#[cfg(test)]
mod tests;
