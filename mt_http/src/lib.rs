//! HTTP surface for the MedTrack rate limiter.
//!
//! Wraps API routes in axum middleware that checks the caller's quota before
//! the handler runs, and reports the outcome through `X-RateLimit-*` headers.

pub mod identity;
pub mod middleware;

pub use middleware::RateLimitState;
pub use middleware::rate_limit_middleware;
