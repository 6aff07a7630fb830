//! Single-stream HTTP GET of a selected media stream.
//!
//! Writes the response body sequentially into a [`StorageWriter`], reports
//! progress over a channel and stops when the [`CancelToken`] is set.

mod progress;

pub use progress::ProgressStats;

use std::collections::HashMap;
use std::time::{Duration, Instant};
use tokio::sync::mpsc::Sender;

use crate::cancel::CancelToken;
use crate::config::VdlConfig;
use crate::storage::StorageWriter;

/// Timeouts and defaults applied to the GET.
#[derive(Debug, Clone)]
pub struct TransferOptions {
    pub connect_timeout: Duration,
    /// Abort when the rate stays under 1 KiB/s for this long.
    pub low_speed_time: Duration,
    /// Used only when the stream's own headers carry no User-Agent.
    pub user_agent: Option<String>,
}

impl Default for TransferOptions {
    fn default() -> Self {
        Self::from(&VdlConfig::default())
    }
}

impl From<&VdlConfig> for TransferOptions {
    fn from(cfg: &VdlConfig) -> Self {
        Self {
            connect_timeout: Duration::from_secs(cfg.connect_timeout_secs),
            low_speed_time: Duration::from_secs(cfg.low_speed_time_secs),
            user_agent: cfg.user_agent.clone(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TransferError {
    #[error("transfer failed: {0}")]
    Curl(#[source] curl::Error),
    #[error("server returned HTTP {0}")]
    Http(u32),
    #[error("partial transfer: expected {expected} bytes, got {received}")]
    PartialTransfer { expected: u64, received: u64 },
    #[error("could not write to disk: {0}")]
    Storage(#[source] std::io::Error),
    #[error("transfer interrupted")]
    Interrupted,
}

/// Minimum interval between progress messages.
const PROGRESS_EVERY: Duration = Duration::from_millis(200);

fn header_lines(
    headers: &HashMap<String, String>,
    user_agent: Option<&str>,
) -> Result<curl::easy::List, curl::Error> {
    let mut list = curl::easy::List::new();
    for (k, v) in headers {
        list.append(&format!("{}: {}", k.trim(), v.trim()))?;
    }
    let has_ua = headers.keys().any(|k| k.trim().eq_ignore_ascii_case("user-agent"));
    if let (false, Some(ua)) = (has_ua, user_agent) {
        list.append(&format!("User-Agent: {}", ua.trim()))?;
    }
    Ok(list)
}

/// Downloads `url` with a single GET, appending the body to `storage`.
/// Returns the number of bytes written.
///
/// `expected_len` is a size hint (e.g. the extractor's filesize) used for
/// progress until the response announces its own length. When the response
/// carries `Content-Length`, a short body is a [`TransferError::PartialTransfer`].
/// Runs in the current thread; call from `spawn_blocking` if used from async code.
pub fn download_to(
    url: &str,
    headers: &HashMap<String, String>,
    storage: &mut StorageWriter,
    expected_len: Option<u64>,
    cancel: &CancelToken,
    progress_tx: Option<&Sender<ProgressStats>>,
    opts: &TransferOptions,
) -> Result<u64, TransferError> {
    if cancel.is_cancelled() {
        return Err(TransferError::Interrupted);
    }

    let mut easy = curl::easy::Easy::new();
    easy.url(url).map_err(TransferError::Curl)?;
    easy.follow_location(true).map_err(TransferError::Curl)?;
    easy.max_redirections(10).map_err(TransferError::Curl)?;
    easy.fail_on_error(true).map_err(TransferError::Curl)?;
    easy.connect_timeout(opts.connect_timeout)
        .map_err(TransferError::Curl)?;
    easy.low_speed_limit(1024).map_err(TransferError::Curl)?;
    easy.low_speed_time(opts.low_speed_time)
        .map_err(TransferError::Curl)?;
    easy.progress(true).map_err(TransferError::Curl)?;

    let list = header_lines(headers, opts.user_agent.as_deref()).map_err(TransferError::Curl)?;
    easy.http_headers(list).map_err(TransferError::Curl)?;

    let started = Instant::now();
    let mut write_error: Option<std::io::Error> = None;
    let mut last_sent: Option<Instant> = None;

    let performed = {
        let mut transfer = easy.transfer();
        transfer
            .write_function(|data| match storage.write_chunk(data) {
                Ok(()) => Ok(data.len()),
                Err(e) => {
                    tracing::warn!("stream write failed: {}", e);
                    write_error = Some(e);
                    Ok(0) // abort transfer
                }
            })
            .map_err(TransferError::Curl)?;
        transfer
            .progress_function(|dltotal, dlnow, _, _| {
                if cancel.is_cancelled() {
                    return false; // abort transfer
                }
                if let Some(tx) = progress_tx {
                    let now = Instant::now();
                    if last_sent.map_or(true, |t| now.duration_since(t) >= PROGRESS_EVERY) {
                        let total = if dltotal > 0.0 {
                            Some(dltotal as u64)
                        } else {
                            expected_len
                        };
                        // A full channel just drops this sample.
                        let _ = tx.try_send(ProgressStats {
                            bytes_done: dlnow as u64,
                            total_bytes: total,
                            elapsed_secs: started.elapsed().as_secs_f64(),
                        });
                        last_sent = Some(now);
                    }
                }
                true
            })
            .map_err(TransferError::Curl)?;
        transfer.perform()
    };

    if let Err(e) = performed {
        if cancel.is_cancelled() {
            return Err(TransferError::Interrupted);
        }
        if let Some(io) = write_error {
            return Err(TransferError::Storage(io));
        }
        if e.is_http_returned_error() {
            let code = easy.response_code().unwrap_or(0);
            return Err(TransferError::Http(code));
        }
        return Err(TransferError::Curl(e));
    }

    let code = easy.response_code().map_err(TransferError::Curl)?;
    if !(200..300).contains(&code) {
        return Err(TransferError::Http(code));
    }

    let written = storage.written();
    let announced = easy
        .content_length_download()
        .ok()
        .filter(|n| *n >= 0.0)
        .map(|n| n as u64);
    if let Some(expected) = announced {
        if written != expected {
            return Err(TransferError::PartialTransfer {
                expected,
                received: written,
            });
        }
    }

    if let Some(tx) = progress_tx {
        let _ = tx.try_send(ProgressStats {
            bytes_done: written,
            total_bytes: Some(written),
            elapsed_secs: started.elapsed().as_secs_f64(),
        });
    }
    tracing::info!(bytes = written, url = %url, "transfer complete");
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(list: &curl::easy::List) -> Vec<String> {
        list.iter()
            .map(|l| String::from_utf8_lossy(l).into_owned())
            .collect()
    }

    #[test]
    fn user_agent_added_when_missing() {
        let headers = HashMap::new();
        let list = header_lines(&headers, Some("vdl-test/1.0")).unwrap();
        assert_eq!(lines(&list), ["User-Agent: vdl-test/1.0"]);
    }

    #[test]
    fn stream_user_agent_wins() {
        let mut headers = HashMap::new();
        headers.insert("user-agent".to_string(), "Stream/2.0".to_string());
        let list = header_lines(&headers, Some("vdl-test/1.0")).unwrap();
        assert_eq!(lines(&list), ["user-agent: Stream/2.0"]);
    }

    #[test]
    fn options_follow_config() {
        let mut cfg = VdlConfig::default();
        cfg.connect_timeout_secs = 7;
        cfg.user_agent = Some("UA".to_string());
        let opts = TransferOptions::from(&cfg);
        assert_eq!(opts.connect_timeout, Duration::from_secs(7));
        assert_eq!(opts.low_speed_time, Duration::from_secs(60));
        assert_eq!(opts.user_agent.as_deref(), Some("UA"));
    }
}
