//! Pre-configured throttling policies for the MedTrack API surface.
//!
//! Different endpoint groups warrant different allowances: anonymous browsing
//! is cheap, report generation is expensive, and login attempts need a strict
//! ceiling against credential stuffing.

use std::time::Duration;

use crate::policy::RateLimitPolicy;

/// Unauthenticated endpoints (catalog browsing, public lookups).
///
/// 60 requests per minute per client IP.
pub fn public_api() -> RateLimitPolicy {
    RateLimitPolicy::new(60, Duration::from_secs(60))
}

/// Authenticated CRUD endpoints (inventory, employees, payroll, leaves).
///
/// 100 requests per minute per user, matching the platform default.
pub fn authenticated_api() -> RateLimitPolicy {
    RateLimitPolicy::new(100, Duration::from_secs(60))
}

/// Login and password-reset endpoints.
///
/// 5 attempts per 15 minutes per client; replenishes one attempt every 3
/// minutes rather than unlocking all at once.
pub fn login() -> RateLimitPolicy {
    RateLimitPolicy::new(5, Duration::from_secs(15 * 60))
}

/// Report and analytics endpoints backed by expensive aggregation queries.
///
/// 10 requests per minute per user.
pub fn reports() -> RateLimitPolicy {
    RateLimitPolicy::new(10, Duration::from_secs(60))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_is_strictest() {
        assert!(login().max_requests() < public_api().max_requests());
        assert!(login().max_requests() < reports().max_requests());
        assert!(login().window() > authenticated_api().window());
    }

    #[test]
    fn test_authenticated_matches_platform_default() {
        assert_eq!(authenticated_api(), RateLimitPolicy::default());
    }
}
