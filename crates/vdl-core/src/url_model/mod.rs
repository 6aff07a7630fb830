//! URL validation and output filename derivation.
//!
//! Checks that user input looks like a video page URL before handing it to
//! the extractor, and turns a video title or user override into a safe
//! local filename carrying the stream's extension.

mod sanitize;
mod validate;

pub use sanitize::sanitize_filename;
pub use validate::{validate_video_url, InvalidUrl};

/// Stem used when both the override and the title sanitize to nothing.
const DEFAULT_STEM: &str = "video";

/// Derives the filename for a downloaded stream.
///
/// With an override, the override is sanitized and `.<ext>` is appended unless
/// it already ends with it. Without one, the sanitized title is used.
///
/// # Examples
///
/// - `output_filename("My Clip", "mp4", None)` → `"My Clip.mp4"`
/// - `output_filename("ignored", "mp4", Some("holiday"))` → `"holiday.mp4"`
/// - `output_filename("ignored", "mp4", Some("holiday.mp4"))` → `"holiday.mp4"`
pub fn output_filename(title: &str, ext: &str, filename_override: Option<&str>) -> String {
    let ext = ext.trim_start_matches('.');
    let suffix = format!(".{ext}");

    let stem = match filename_override {
        Some(name) => {
            let name = sanitize_filename(name);
            if !ext.is_empty() && name.ends_with(&suffix) && name.len() > suffix.len() {
                return name;
            }
            name
        }
        None => sanitize_filename(title),
    };

    let stem = if stem.is_empty() {
        DEFAULT_STEM.to_string()
    } else {
        stem
    };

    if ext.is_empty() {
        stem
    } else {
        format!("{stem}{suffix}")
    }
}
