use std::time::Duration;

use dashmap::DashMap;

use crate::bucket::Bucket;
use crate::policy::RateLimitPolicy;
use crate::time::TimeSource;

/// Outcome of a single rate limit check.
///
/// Exhaustion is a normal return value, not an error: callers branch on
/// [`success`](RateLimitResult::success) and translate rejections into
/// whatever their transport uses (HTTP middleware sends 429).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitResult {
    /// Whether the request was admitted
    pub success: bool,

    /// Configured allowance for the window
    pub limit: u32,

    /// Credits left after this check
    pub remaining: u32,

    /// Unix seconds at which the bucket's window boundary falls
    pub reset: u64,

    /// Seconds until the window boundary, measured against the store's own
    /// clock so it stays consistent with `reset` even if the wall clock steps
    pub retry_after: u64,
}

/// Storage seam for rate limiter state.
///
/// The in-memory store covers a single process. A distributed deployment
/// swaps in a backend over a shared cache behind this trait without touching
/// call sites.
pub trait RateLimitBackend: Send + Sync {
    /// Admit or reject one request for `identifier` under `policy`.
    ///
    /// The bucket for `identifier` is created lazily with a full allowance.
    /// Any string is a valid key; empty identifiers collapse to one shared
    /// bucket.
    fn check(&self, identifier: &str, policy: &RateLimitPolicy) -> RateLimitResult;

    /// Drop all state for `identifier`; the next check starts fresh.
    fn clear(&self, identifier: &str);

    /// Evict buckets idle past the retention window. Returns the eviction
    /// count. Intended to run from a recurring background task.
    fn cleanup(&self) -> usize;
}

/// Retention for idle buckets, independent of any per-call window.
pub const DEFAULT_RETENTION: Duration = Duration::from_secs(60 * 60);

/// In-process bucket store keyed by identifier.
pub struct MemoryStore {
    buckets: DashMap<String, Bucket>,
    retention_ms: u64,
    clock: TimeSource,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::with_retention(DEFAULT_RETENTION)
    }

    /// Create a store that evicts buckets idle longer than `retention`.
    pub fn with_retention(retention: Duration) -> Self {
        Self { buckets: DashMap::new(), retention_ms: retention.as_millis() as u64, clock: TimeSource::new() }
    }

    /// Number of live buckets.
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Shift a bucket's last refill into the past to simulate idleness.
    #[cfg(test)]
    pub(crate) fn backdate(&self, identifier: &str, by: Duration) {
        if let Some(bucket) = self.buckets.get(identifier) {
            bucket.backdate(by.as_millis() as u64);
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl RateLimitBackend for MemoryStore {
    fn check(&self, identifier: &str, policy: &RateLimitPolicy) -> RateLimitResult {
        let now_ms = self.clock.now_millis();

        // Holds the shard lock for the refill + consume sequence, so two
        // checks for one identifier cannot interleave their read-modify-write
        let bucket = self.buckets.entry(identifier.to_string()).or_insert_with(|| Bucket::new(policy.max_requests(), now_ms));

        bucket.refill(policy, now_ms);

        let (success, remaining) = match bucket.try_consume() {
            Some(remaining) => (true, remaining),
            None => (false, 0),
        };

        let reset_ms = bucket.last_refill_millis() + policy.window_millis();
        let reset = reset_ms / 1_000;
        let retry_after = reset_ms.saturating_sub(now_ms).div_ceil(1_000);

        RateLimitResult { success, limit: policy.max_requests(), remaining, reset, retry_after }
    }

    fn clear(&self, identifier: &str) {
        self.buckets.remove(identifier);
    }

    fn cleanup(&self) -> usize {
        let now_ms = self.clock.now_millis();
        let mut evicted = 0;

        self.buckets.retain(|_, bucket| {
            let keep = now_ms.saturating_sub(bucket.last_refill_millis()) <= self.retention_ms;
            if !keep {
                evicted += 1;
            }
            keep
        });

        if evicted > 0 {
            tracing::debug!(evicted, "Evicted idle rate limit buckets");
        }

        evicted
    }
}
