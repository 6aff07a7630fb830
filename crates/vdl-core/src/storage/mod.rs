//! Temp-file lifecycle for a download.
//!
//! Bytes land in `<destination>.part`; only a completed transfer is renamed to
//! the destination, so an interrupted or failed download never leaves a
//! truncated file under the final name.

mod writer;

pub use writer::StorageWriter;

/// Temporary file suffix used before atomic rename.
pub const TEMP_SUFFIX: &str = ".part";

/// Path for the temp file: appends `.part` to the final path (e.g. `clip.mp4` → `clip.mp4.part`).
pub fn temp_path(final_path: &std::path::Path) -> std::path::PathBuf {
    let mut o = final_path.as_os_str().to_owned();
    o.push(TEMP_SUFFIX);
    std::path::PathBuf::from(o)
}
