//! Progress snapshots for a running transfer (bytes done, rate, ETA).

/// Snapshot of transfer progress, sent to the CLI for display.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressStats {
    /// Bytes written so far.
    pub bytes_done: u64,
    /// Total size in bytes, once known from the response or the extractor.
    pub total_bytes: Option<u64>,
    /// Elapsed time since the transfer started (seconds).
    pub elapsed_secs: f64,
}

impl ProgressStats {
    /// Download rate in bytes per second (0 if elapsed is 0).
    pub fn bytes_per_sec(&self) -> f64 {
        if self.elapsed_secs <= 0.0 {
            return 0.0;
        }
        self.bytes_done as f64 / self.elapsed_secs
    }

    /// Estimated seconds remaining (None if total is unknown or rate is 0).
    pub fn eta_secs(&self) -> Option<f64> {
        let total = self.total_bytes?;
        let remaining = total.saturating_sub(self.bytes_done);
        if remaining == 0 {
            return Some(0.0);
        }
        let rate = self.bytes_per_sec();
        if rate <= 0.0 {
            return None;
        }
        Some(remaining as f64 / rate)
    }

    /// Fraction complete in [0.0, 1.0], if the total is known.
    pub fn fraction(&self) -> Option<f64> {
        match self.total_bytes? {
            0 => Some(1.0),
            total => Some((self.bytes_done as f64 / total as f64).min(1.0)),
        }
    }

    pub fn is_complete(&self) -> bool {
        matches!(self.total_bytes, Some(t) if self.bytes_done >= t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats(done: u64, total: Option<u64>, secs: f64) -> ProgressStats {
        ProgressStats {
            bytes_done: done,
            total_bytes: total,
            elapsed_secs: secs,
        }
    }

    #[test]
    fn rate_and_eta() {
        let s = stats(500, Some(1500), 5.0);
        assert!((s.bytes_per_sec() - 100.0).abs() < 1e-9);
        assert!((s.eta_secs().unwrap() - 10.0).abs() < 1e-9);
        assert!((s.fraction().unwrap() - 1.0 / 3.0).abs() < 1e-9);
        assert!(!s.is_complete());
    }

    #[test]
    fn unknown_total() {
        let s = stats(500, None, 5.0);
        assert_eq!(s.eta_secs(), None);
        assert_eq!(s.fraction(), None);
        assert!(!s.is_complete());
    }

    #[test]
    fn zero_elapsed_has_no_eta() {
        let s = stats(0, Some(10), 0.0);
        assert_eq!(s.bytes_per_sec(), 0.0);
        assert_eq!(s.eta_secs(), None);
    }

    #[test]
    fn complete() {
        let s = stats(10, Some(10), 1.0);
        assert!(s.is_complete());
        assert_eq!(s.eta_secs(), Some(0.0));
        assert_eq!(s.fraction(), Some(1.0));
    }
}
