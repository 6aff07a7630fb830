//! Sequential writer for a temp download file.

use anyhow::{Context, Result};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Writer for a temp download file. Bytes are appended in arrival order.
pub struct StorageWriter {
    file: File,
    temp_path: PathBuf,
    written: u64,
}

impl StorageWriter {
    /// Create a new temp file at `temp_path` (e.g. `destination.part`).
    /// Overwrites if the path already exists.
    pub fn create(temp_path: &Path) -> Result<Self> {
        let file = File::options()
            .write(true)
            .create(true)
            .truncate(true)
            .open(temp_path)
            .with_context(|| format!("failed to create temp file: {}", temp_path.display()))?;
        Ok(StorageWriter {
            file,
            temp_path: temp_path.to_path_buf(),
            written: 0,
        })
    }

    /// Append `data` to the file.
    pub fn write_chunk(&mut self, data: &[u8]) -> std::io::Result<()> {
        self.file.write_all(data)?;
        self.written += data.len() as u64;
        Ok(())
    }

    /// Bytes written so far.
    pub fn written(&self) -> u64 {
        self.written
    }

    /// Sync file data to disk. Call before `finalize` for durability.
    pub fn sync(&self) -> Result<()> {
        self.file.sync_all().context("storage sync failed")?;
        Ok(())
    }

    /// Atomically rename the temp file to the final path. Consumes the writer and closes the file.
    /// Fails if `final_path` is on a different filesystem or is an existing directory;
    /// the temp file is removed in that case.
    pub fn finalize(self, final_path: &Path) -> Result<()> {
        let StorageWriter {
            file, temp_path, ..
        } = self;
        drop(file);

        if let Err(e) = std::fs::rename(&temp_path, final_path) {
            if let Err(rm) = std::fs::remove_file(&temp_path) {
                tracing::warn!("could not remove temp file {}: {}", temp_path.display(), rm);
            }
            return Err(e).with_context(|| {
                format!(
                    "failed to rename {} to {}",
                    temp_path.display(),
                    final_path.display()
                )
            });
        }
        Ok(())
    }

    /// Close and delete the temp file. Errors are logged, not returned.
    pub fn discard(self) {
        let StorageWriter {
            file, temp_path, ..
        } = self;
        drop(file);
        if let Err(e) = std::fs::remove_file(&temp_path) {
            tracing::warn!("could not remove temp file {}: {}", temp_path.display(), e);
        }
    }
}
