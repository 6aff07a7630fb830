//! The download flow: resolve, show details, transfer, summarize.
//!
//! Blocking work (yt-dlp, curl) runs on `spawn_blocking`; the async side
//! races it against Ctrl-C and prints progress.

use std::io::Write;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tokio::task::{JoinError, JoinHandle};
use vdl_core::cancel::CancelToken;
use vdl_core::config::VdlConfig;
use vdl_core::error::DownloadError;
use vdl_core::extractor::YtDlpExtractor;
use vdl_core::job::{self, DownloadOutcome, DownloadRequest};
use vdl_core::transfer::{ProgressStats, TransferOptions};
use vdl_core::url_model::validate_video_url;

use super::report;

const PROGRESS_INTERVAL: Duration = Duration::from_millis(500);

/// How a run ended; maps to the process exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Completed,
    Failed,
    Interrupted,
}

impl RunStatus {
    pub fn exit_code(self) -> i32 {
        match self {
            RunStatus::Completed => 0,
            RunStatus::Failed => 1,
            RunStatus::Interrupted => 130,
        }
    }

    fn from_error(err: &DownloadError) -> Self {
        if err.is_interrupted() {
            RunStatus::Interrupted
        } else {
            RunStatus::Failed
        }
    }
}

/// Result of a task that was cancelled while running: a task that had
/// already succeeded keeps its result, anything else counts as interrupted.
fn after_interrupt<T>(
    joined: Result<Result<T, DownloadError>, JoinError>,
) -> Result<T, DownloadError> {
    match joined {
        Ok(Ok(value)) => Ok(value),
        _ => Err(DownloadError::Interrupted),
    }
}

/// Awaits a blocking task, or sets `cancel` on Ctrl-C and waits for the task
/// to wind down (so temp files are removed) before reporting the interrupt.
async fn until_interrupted<T>(
    mut task: JoinHandle<Result<T, DownloadError>>,
    cancel: &CancelToken,
) -> Result<T, DownloadError> {
    tokio::select! {
        joined = &mut task => joined.map_err(|e| DownloadError::Other(e.into()))?,
        Ok(()) = tokio::signal::ctrl_c() => {
            tracing::info!("interrupt received, cancelling");
            cancel.cancel();
            after_interrupt(task.await)
        }
    }
}

/// The opening status line, only for input that passes URL validation.
fn fetching_line(url: &str) -> Result<String, DownloadError> {
    let url = validate_video_url(url)?;
    Ok(format!("Fetching video information: {url}"))
}

fn spawn_progress_printer(mut rx: mpsc::Receiver<ProgressStats>) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut last_print: Option<Instant> = None;
        let mut printed = false;
        while let Some(stats) = rx.recv().await {
            let now = Instant::now();
            let due = last_print.map_or(true, |t| now.duration_since(t) >= PROGRESS_INTERVAL);
            if due || stats.is_complete() {
                print!("\r{}   ", report::progress_line(&stats));
                let _ = std::io::stdout().flush();
                last_print = Some(now);
                printed = true;
            }
        }
        if printed {
            println!();
        }
    })
}

async fn transfer(
    prepared: job::PreparedDownload,
    cancel: &CancelToken,
    opts: TransferOptions,
) -> Result<DownloadOutcome, DownloadError> {
    let (progress_tx, progress_rx) = mpsc::channel::<ProgressStats>(16);
    let printer = spawn_progress_printer(progress_rx);

    let task = tokio::task::spawn_blocking({
        let cancel = cancel.clone();
        move || prepared.run(&cancel, Some(&progress_tx), &opts)
    });
    let result = until_interrupted(task, cancel).await;

    // The sender lives in the blocking task, so the printer ends once it has finished.
    let _ = printer.await;
    result
}

/// Runs one download end to end, printing status as it goes.
pub async fn run_download(cfg: &VdlConfig, request: DownloadRequest) -> RunStatus {
    match fetching_line(&request.url) {
        Ok(line) => println!("{line}"),
        Err(e) => {
            println!("{}", report::error_line(&e));
            return RunStatus::from_error(&e);
        }
    }
    let cancel = CancelToken::new();
    let requested = request.resolution;

    let extractor =
        YtDlpExtractor::new(&cfg.ytdlp_path).with_socket_timeout(cfg.socket_timeout_secs);
    let prepare_task = tokio::task::spawn_blocking(move || job::prepare(&request, &extractor));
    let prepared = match until_interrupted(prepare_task, &cancel).await {
        Ok(p) => p,
        Err(e) => {
            tracing::warn!("prepare failed: {}", e);
            println!("{}", report::error_line(&e));
            return RunStatus::from_error(&e);
        }
    };

    for line in report::info_lines(&prepared.info) {
        println!("{line}");
    }
    if prepared.fell_back {
        println!("Resolution {requested} not available. Using the highest available.");
    }
    let res = prepared
        .stream
        .resolution()
        .unwrap_or_else(|| "unknown resolution".to_string());
    println!("Downloading video ({res})...");

    match transfer(prepared, &cancel, TransferOptions::from(cfg)).await {
        Ok(outcome) => {
            for line in report::summary_lines(&outcome) {
                println!("{line}");
            }
            RunStatus::Completed
        }
        Err(e) => {
            tracing::warn!("download failed: {}", e);
            println!("{}", report::error_line(&e));
            RunStatus::from_error(&e)
        }
    }
}
