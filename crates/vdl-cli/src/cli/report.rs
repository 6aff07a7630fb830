//! Text shown to the user: video details, progress and the final summary.

use vdl_core::error::DownloadError;
use vdl_core::extractor::VideoInfo;
use vdl_core::job::DownloadOutcome;
use vdl_core::transfer::ProgressStats;

const MIB: f64 = 1_048_576.0;

/// Size in MiB with two decimals, e.g. "12.34 MB".
pub fn format_size_mb(bytes: u64) -> String {
    format!("{:.2} MB", bytes as f64 / MIB)
}

pub fn info_lines(info: &VideoInfo) -> Vec<String> {
    let duration = match info.duration_secs {
        Some(secs) => format!("Duration: {secs} seconds"),
        None => "Duration: unknown".to_string(),
    };
    vec![
        format!("Title: {}", info.title),
        format!("Author: {}", info.author.as_deref().unwrap_or("unknown")),
        duration,
    ]
}

pub fn progress_line(stats: &ProgressStats) -> String {
    let done_mib = stats.bytes_done as f64 / MIB;
    let rate_mib = stats.bytes_per_sec() / MIB;
    let eta = stats
        .eta_secs()
        .map(|s| format!("{:.0}s", s))
        .unwrap_or_else(|| "?".to_string());
    match (stats.total_bytes, stats.fraction()) {
        (Some(total), Some(fraction)) => format!(
            "  {:.1} / {:.1} MiB ({:.1}%)  {:.2} MiB/s  ETA {}",
            done_mib,
            total as f64 / MIB,
            fraction * 100.0,
            rate_mib,
            eta
        ),
        _ => format!("  {:.1} MiB  {:.2} MiB/s", done_mib, rate_mib),
    }
}

pub fn summary_lines(outcome: &DownloadOutcome) -> Vec<String> {
    let name = outcome
        .path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    vec![
        "Download completed successfully:".to_string(),
        format!("- File: {name}"),
        format!("- Size: {}", format_size_mb(outcome.bytes)),
        format!("- Location: {}", outcome.path.display()),
    ]
}

/// One line for a failed download, split the same way the errors are classified.
pub fn error_line(err: &DownloadError) -> String {
    if err.is_interrupted() {
        "Download interrupted by user".to_string()
    } else if err.is_expected() {
        format!("Error: {err}")
    } else {
        format!("Unexpected error during download: {err}")
    }
}
