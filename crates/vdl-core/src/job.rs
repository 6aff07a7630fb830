//! The download pipeline: request → prepared download → outcome.
//!
//! [`prepare`] does everything up to the transfer (URL check, extraction,
//! stream selection, destination path) so the caller can show the video
//! details before any bytes move. [`PreparedDownload::run`] performs the
//! transfer and leaves either the finished file or nothing.

use std::path::{Path, PathBuf};
use tokio::sync::mpsc::Sender;

use crate::cancel::CancelToken;
use crate::error::DownloadError;
use crate::extractor::{Extractor, StreamDescriptor, VideoInfo};
use crate::resolution::Resolution;
use crate::select::select_stream;
use crate::storage::{self, StorageWriter};
use crate::transfer::{self, ProgressStats, TransferOptions};
use crate::url_model::{output_filename, validate_video_url};

/// What the user asked for.
#[derive(Debug, Clone, Default)]
pub struct DownloadRequest {
    pub url: String,
    /// Destination directory; the current directory when `None`.
    pub output_dir: Option<PathBuf>,
    pub resolution: Resolution,
    /// Filename override; the extension is added when missing.
    pub filename: Option<String>,
}

/// A resolved download, ready to transfer.
#[derive(Debug, Clone)]
pub struct PreparedDownload {
    pub info: VideoInfo,
    pub stream: StreamDescriptor,
    /// The requested resolution was not offered and the highest was chosen instead.
    pub fell_back: bool,
    pub destination: PathBuf,
}

/// A finished download.
#[derive(Debug, Clone)]
pub struct DownloadOutcome {
    /// Absolute path of the saved file.
    pub path: PathBuf,
    /// Size of the saved file in bytes.
    pub bytes: u64,
    pub stream: StreamDescriptor,
}

/// Converts a storage failure into an I/O error when that is what it is.
fn storage_error(e: anyhow::Error) -> DownloadError {
    let context = e.to_string();
    match e.downcast::<std::io::Error>() {
        Ok(io) => DownloadError::io(context, io),
        Err(e) => DownloadError::Other(e),
    }
}

fn destination_dir(output_dir: Option<&Path>) -> Result<PathBuf, DownloadError> {
    match output_dir {
        Some(dir) => {
            if !dir.exists() {
                std::fs::create_dir_all(dir).map_err(|e| {
                    DownloadError::io(format!("could not create {}", dir.display()), e)
                })?;
                tracing::info!("created output directory {}", dir.display());
            }
            Ok(dir.to_path_buf())
        }
        None => std::env::current_dir()
            .map_err(|e| DownloadError::io("could not read current directory", e)),
    }
}

/// Validates the URL, extracts the video, selects a stream and computes the destination.
/// Creates the output directory when it does not exist.
pub fn prepare(
    request: &DownloadRequest,
    extractor: &dyn Extractor,
) -> Result<PreparedDownload, DownloadError> {
    let url = validate_video_url(&request.url)?;
    let info = extractor.extract(&url)?;
    let selection = select_stream(&info.streams, request.resolution)?;

    let dir = destination_dir(request.output_dir.as_deref())?;
    let filename = output_filename(
        &info.title,
        &selection.stream.ext,
        request.filename.as_deref(),
    );
    let destination = dir.join(filename);
    tracing::debug!(destination = %destination.display(), "prepared download");

    Ok(PreparedDownload {
        info,
        stream: selection.stream,
        fell_back: selection.fell_back,
        destination,
    })
}

impl PreparedDownload {
    /// Transfers the stream to `<destination>.part` and renames it to the destination.
    /// On any failure, including cancellation, the temp file is removed.
    pub fn run(
        &self,
        cancel: &CancelToken,
        progress_tx: Option<&Sender<ProgressStats>>,
        opts: &TransferOptions,
    ) -> Result<DownloadOutcome, DownloadError> {
        let temp = storage::temp_path(&self.destination);
        let mut writer = StorageWriter::create(&temp).map_err(storage_error)?;

        let result = transfer::download_to(
            &self.stream.url,
            &self.stream.http_headers,
            &mut writer,
            self.stream.filesize,
            cancel,
            progress_tx,
            opts,
        );

        if let Err(e) = result {
            writer.discard();
            tracing::warn!("download of {} failed: {}", self.destination.display(), e);
            return Err(e.into());
        }

        if let Err(e) = writer.sync() {
            writer.discard();
            return Err(storage_error(e));
        }
        writer.finalize(&self.destination).map_err(storage_error)?;

        let path = std::fs::canonicalize(&self.destination)
            .unwrap_or_else(|_| self.destination.clone());
        let bytes = std::fs::metadata(&path)
            .map_err(|e| DownloadError::io(format!("could not stat {}", path.display()), e))?
            .len();
        tracing::info!(bytes, path = %path.display(), "download saved");

        Ok(DownloadOutcome {
            path,
            bytes,
            stream: self.stream.clone(),
        })
    }
}
