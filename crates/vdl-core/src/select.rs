//! Stream selection by resolution.
//!
//! Only progressive streams (audio and video in one file) are candidates, so
//! the saved file plays without a muxing step. A concrete resolution that is
//! not offered falls back to the highest one.

use std::cmp::Ordering;

use crate::extractor::StreamDescriptor;
use crate::resolution::Resolution;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectError {
    #[error("no stream with both audio and video is available for this video")]
    NoProgressiveStream,
}

/// The chosen stream and whether the requested resolution had to be replaced.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub stream: StreamDescriptor,
    pub fell_back: bool,
}

/// Orders two streams of equal height: mp4 first, then larger known size.
fn tie_break(a: &StreamDescriptor, b: &StreamDescriptor) -> Ordering {
    let mp4 = |s: &StreamDescriptor| s.ext.eq_ignore_ascii_case("mp4");
    mp4(a)
        .cmp(&mp4(b))
        .then_with(|| a.filesize.unwrap_or(0).cmp(&b.filesize.unwrap_or(0)))
}

/// Best stream by `key`, where the greatest key wins and the earliest stream
/// wins among equals.
fn best_by<'a, K, F>(candidates: &[&'a StreamDescriptor], key: F) -> Option<&'a StreamDescriptor>
where
    K: Ord,
    F: Fn(&StreamDescriptor) -> K,
{
    let mut best: Option<&'a StreamDescriptor> = None;
    for &s in candidates {
        best = match best {
            None => Some(s),
            Some(b) => {
                let ord = key(s).cmp(&key(b)).then_with(|| tie_break(s, b));
                if ord == Ordering::Greater {
                    Some(s)
                } else {
                    Some(b)
                }
            }
        };
    }
    best
}

fn highest<'a>(candidates: &[&'a StreamDescriptor]) -> Option<&'a StreamDescriptor> {
    best_by(candidates, |s| s.height.unwrap_or(0))
}

fn lowest<'a>(candidates: &[&'a StreamDescriptor]) -> Option<&'a StreamDescriptor> {
    best_by(candidates, |s| std::cmp::Reverse(s.height.unwrap_or(u32::MAX)))
}

/// Picks a progressive stream for `resolution`.
///
/// `Highest`/`Lowest` pick by height. A concrete resolution picks a stream of
/// exactly that height, or falls back to the highest with `fell_back = true`.
/// Equal heights prefer mp4, then the larger known filesize, then extractor order.
pub fn select_stream(
    streams: &[StreamDescriptor],
    resolution: Resolution,
) -> Result<Selection, SelectError> {
    let candidates: Vec<&StreamDescriptor> = streams.iter().filter(|s| s.is_progressive()).collect();

    let (chosen, fell_back) = match resolution {
        Resolution::Highest => (highest(&candidates), false),
        Resolution::Lowest => (lowest(&candidates), false),
        concrete => {
            let wanted = concrete.height();
            let exact: Vec<&StreamDescriptor> = candidates
                .iter()
                .copied()
                .filter(|s| s.height.is_some() && s.height == wanted)
                .collect();
            match highest(&exact) {
                Some(s) => (Some(s), false),
                None => (highest(&candidates), true),
            }
        }
    };

    let stream = chosen.ok_or(SelectError::NoProgressiveStream)?;
    tracing::debug!(
        format_id = %stream.format_id,
        height = ?stream.height,
        ext = %stream.ext,
        fell_back,
        "selected stream for {}",
        resolution
    );
    Ok(Selection {
        stream: stream.clone(),
        fell_back,
    })
}
