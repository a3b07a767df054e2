use std::sync::Arc;

use axum::extract::Request;
use axum::extract::State;
use axum::http::HeaderValue;
use axum::http::StatusCode;
use axum::http::header::RETRY_AFTER;
use axum::middleware::Next;
use axum::response::IntoResponse;
use axum::response::Response;
use mt_ratelimit::RateLimitBackend;
use mt_ratelimit::RateLimitPolicy;
use mt_ratelimit::RateLimitResult;

use crate::identity;

pub const LIMIT_HEADER: &str = "x-ratelimit-limit";
pub const REMAINING_HEADER: &str = "x-ratelimit-remaining";
pub const RESET_HEADER: &str = "x-ratelimit-reset";

/// Shared state for the rate limiting middleware.
#[derive(Clone)]
pub struct RateLimitState {
    /// Backend holding per-identifier buckets
    pub backend: Arc<dyn RateLimitBackend>,

    /// Policy applied to every request passing through this layer
    pub policy: RateLimitPolicy,
}

impl RateLimitState {
    pub fn new(backend: Arc<dyn RateLimitBackend>, policy: RateLimitPolicy) -> Self {
        Self { backend, policy }
    }
}

/// Check the caller's quota before running the wrapped handler.
///
/// Rejected requests get `429 Too Many Requests` with `Retry-After`; both
/// outcomes carry `X-RateLimit-Limit`, `X-RateLimit-Remaining` and
/// `X-RateLimit-Reset` headers. Retry behavior is left to the caller.
pub async fn rate_limit_middleware(State(state): State<RateLimitState>, req: Request, next: Next) -> Response {
    let identifier = identity::from_request(&req);
    let result = state.backend.check(&identifier, &state.policy);

    if !result.success {
        tracing::debug!(%identifier, reset = result.reset, "Request rejected by rate limiter");

        let mut response = StatusCode::TOO_MANY_REQUESTS.into_response();
        apply_headers(&mut response, &result);

        // The limiter measures this against its own clock, keeping it
        // consistent with the reset header if the wall clock steps
        response.headers_mut().insert(RETRY_AFTER, numeric_header(result.retry_after.max(1)));

        return response;
    }

    let mut response = next.run(req).await;
    apply_headers(&mut response, &result);
    response
}

fn apply_headers(response: &mut Response, result: &RateLimitResult) {
    let headers = response.headers_mut();
    headers.insert(LIMIT_HEADER, numeric_header(u64::from(result.limit)));
    headers.insert(REMAINING_HEADER, numeric_header(u64::from(result.remaining)));
    headers.insert(RESET_HEADER, numeric_header(result.reset));
}

fn numeric_header(value: u64) -> HeaderValue {
    HeaderValue::from_str(&value.to_string()).unwrap_or(HeaderValue::from_static("0"))
}
