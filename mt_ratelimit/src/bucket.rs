use std::sync::atomic::AtomicU32;
use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;

use crate::policy::RateLimitPolicy;

/// Per-identifier throttling state using lock-free atomic operations.
///
/// Tokens replenish proportionally to elapsed time and are consumed one per
/// admitted request. All mutation goes through CAS loops so concurrent checks
/// for the same identifier never lose updates.
pub struct Bucket {
    /// Available request credits, always within `[0, max_requests]`
    tokens: AtomicU32,

    /// Unix milliseconds of the last replenishment; never decreases
    last_refill: AtomicU64,
}

impl Bucket {
    /// Create a full bucket stamped at `now_ms`.
    pub fn new(max_requests: u32, now_ms: u64) -> Self {
        Self { tokens: AtomicU32::new(max_requests), last_refill: AtomicU64::new(now_ms) }
    }

    /// Replenish tokens for the time elapsed since the last refill.
    ///
    /// `tokens_to_add = floor(elapsed_ms * max_requests / window_ms)`. The
    /// floor is deliberate: a partial window worth less than one full token
    /// adds nothing and leaves `last_refill` untouched, so short gaps keep
    /// accumulating until they are worth at least one token.
    #[inline(always)]
    pub fn refill(&self, policy: &RateLimitPolicy, now_ms: u64) {
        let last = self.last_refill.load(Ordering::Relaxed);

        let elapsed = now_ms.saturating_sub(last);
        if elapsed == 0 {
            return;
        }

        let tokens_to_add = elapsed.saturating_mul(u64::from(policy.max_requests())) / policy.window_millis();
        if tokens_to_add == 0 {
            return;
        }

        // The winner of this CAS owns the token addition; losers observe the
        // advanced timestamp and add nothing
        if self.last_refill.compare_exchange(last, now_ms, Ordering::Release, Ordering::Relaxed).is_ok() {
            let add = u32::try_from(tokens_to_add).unwrap_or(u32::MAX);

            loop {
                let current = self.tokens.load(Ordering::Acquire);

                // Cap at the policy allowance
                let new_tokens = current.saturating_add(add).min(policy.max_requests());
                if current == new_tokens {
                    break;
                }

                match self.tokens.compare_exchange_weak(current, new_tokens, Ordering::Release, Ordering::Relaxed) {
                    Ok(_) => break,
                    Err(_) => continue, // Retry on contention
                }
            }
        }
    }

    /// Consume one token. Returns the count remaining after the decrement,
    /// or `None` when the bucket is exhausted.
    #[inline]
    pub fn try_consume(&self) -> Option<u32> {
        loop {
            let current = self.tokens.load(Ordering::Acquire);

            if current == 0 {
                return None;
            }

            match self.tokens.compare_exchange_weak(current, current - 1, Ordering::Release, Ordering::Relaxed) {
                Ok(_) => return Some(current - 1),
                Err(_) => continue, // CAS failed due to contention, retry
            }
        }
    }

    /// Currently available tokens.
    #[inline]
    pub fn tokens(&self) -> u32 {
        self.tokens.load(Ordering::Relaxed)
    }

    /// Unix milliseconds of the last replenishment.
    #[inline]
    pub fn last_refill_millis(&self) -> u64 {
        self.last_refill.load(Ordering::Relaxed)
    }

    /// Shift `last_refill` into the past to simulate an idle bucket.
    #[cfg(test)]
    pub(crate) fn backdate(&self, by_ms: u64) {
        let last = self.last_refill.load(Ordering::Relaxed);
        self.last_refill.store(last.saturating_sub(by_ms), Ordering::Relaxed);
    }
}
