use std::time::Duration;

/// Default request allowance per window.
pub const DEFAULT_MAX_REQUESTS: u32 = 100;

/// Default replenishment window.
pub const DEFAULT_WINDOW: Duration = Duration::from_millis(60_000);

/// Throttling policy: `max_requests` credits fully replenish over `window`.
///
/// Replenishment is proportional to elapsed time rather than aligned to
/// wall-clock window boundaries, so a caller that pauses mid-window earns
/// back a matching fraction of its allowance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitPolicy {
    max_requests: u32,
    window: Duration,
}

impl RateLimitPolicy {
    /// Create a policy. Out-of-range values fall back to the defaults
    /// silently.
    ///
    /// Windows shorter than one millisecond count as out-of-range: elapsed
    /// time is tracked in milliseconds, so they would truncate to an empty
    /// window.
    pub fn new(max_requests: u32, window: Duration) -> Self {
        let max_requests = if max_requests == 0 { DEFAULT_MAX_REQUESTS } else { max_requests };
        let window = if window.as_millis() == 0 { DEFAULT_WINDOW } else { window };
        Self { max_requests, window }
    }

    /// Maximum requests admitted per full window.
    #[inline]
    pub fn max_requests(&self) -> u32 {
        self.max_requests
    }

    /// Replenishment window.
    #[inline]
    pub fn window(&self) -> Duration {
        self.window
    }

    #[inline]
    pub(crate) fn window_millis(&self) -> u64 {
        self.window.as_millis() as u64
    }
}

impl Default for RateLimitPolicy {
    fn default() -> Self {
        Self { max_requests: DEFAULT_MAX_REQUESTS, window: DEFAULT_WINDOW }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let policy = RateLimitPolicy::default();
        assert_eq!(policy.max_requests(), 100);
        assert_eq!(policy.window(), Duration::from_secs(60));
    }

    #[test]
    fn test_zero_values_fall_back() {
        let policy = RateLimitPolicy::new(0, Duration::ZERO);
        assert_eq!(policy.max_requests(), DEFAULT_MAX_REQUESTS);
        assert_eq!(policy.window(), DEFAULT_WINDOW);
    }

    #[test]
    fn test_sub_millisecond_window_falls_back() {
        let policy = RateLimitPolicy::new(5, Duration::from_micros(500));
        assert_eq!(policy.window(), DEFAULT_WINDOW);
        assert_eq!(policy.max_requests(), 5);
    }

    #[test]
    fn test_explicit_values_kept() {
        let policy = RateLimitPolicy::new(3, Duration::from_millis(1000));
        assert_eq!(policy.max_requests(), 3);
        assert_eq!(policy.window_millis(), 1000);
    }
}
