use std::time::Instant;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

/// Unix-anchored monotonic clock for rate limiter state.
///
/// Captures the wall clock once at construction and advances it with
/// `Instant`, so reported timestamps are Unix milliseconds but never move
/// backwards when the system clock steps.
#[derive(Debug, Clone, Copy)]
pub(crate) struct TimeSource {
    /// Epoch for relative time measurements
    epoch: Instant,

    /// Unix milliseconds at `epoch`
    unix_base_ms: u64,
}

impl TimeSource {
    pub fn new() -> Self {
        let unix_base_ms = SystemTime::now().duration_since(UNIX_EPOCH).map(|d| d.as_millis() as u64).unwrap_or(0);
        Self { epoch: Instant::now(), unix_base_ms }
    }

    /// Current time in Unix milliseconds.
    #[inline(always)]
    pub fn now_millis(&self) -> u64 {
        self.unix_base_ms + self.epoch.elapsed().as_millis() as u64
    }
}

impl Default for TimeSource {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_monotonic() {
        let ts = TimeSource::new();
        let t1 = ts.now_millis();
        std::thread::sleep(std::time::Duration::from_millis(10));
        let t2 = ts.now_millis();

        assert!(t2 > t1);
        assert!(t2 - t1 >= 10);
    }

    #[test]
    fn test_unix_anchored() {
        let ts = TimeSource::new();
        // Sanity: past 2020-01-01 in Unix milliseconds
        assert!(ts.now_millis() > 1_577_836_800_000);
    }
}
