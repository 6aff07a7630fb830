//! Error taxonomy for the download pipeline.

use crate::extractor::ExtractError;
use crate::select::SelectError;
use crate::transfer::TransferError;
use crate::url_model::InvalidUrl;

#[derive(Debug, thiserror::Error)]
pub enum DownloadError {
    #[error(transparent)]
    InvalidUrl(#[from] InvalidUrl),
    #[error(transparent)]
    Extract(#[from] ExtractError),
    #[error(transparent)]
    Select(#[from] SelectError),
    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Transfer(TransferError),
    #[error("download interrupted by user")]
    Interrupted,
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<TransferError> for DownloadError {
    fn from(e: TransferError) -> Self {
        match e {
            TransferError::Interrupted => DownloadError::Interrupted,
            other => DownloadError::Transfer(other),
        }
    }
}

impl DownloadError {
    pub(crate) fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        DownloadError::Io {
            context: context.into(),
            source,
        }
    }

    /// True for failures with a known cause (bad input, I/O, extractor or
    /// network trouble). False for interrupts and anything unclassified.
    pub fn is_expected(&self) -> bool {
        !matches!(self, DownloadError::Interrupted | DownloadError::Other(_))
    }

    pub fn is_interrupted(&self) -> bool {
        matches!(self, DownloadError::Interrupted)
    }
}
