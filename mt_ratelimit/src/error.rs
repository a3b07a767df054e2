use thiserror::Error;

/// Errors surfaced by rate limiter lifecycle operations.
///
/// Checks themselves never fail: quota exhaustion is reported through
/// [`RateLimitResult::success`](crate::RateLimitResult), not as an error.
#[derive(Error, Debug)]
pub enum RateLimitError {
    /// The background sweeper task panicked or was aborted
    #[error("Sweeper task failed: {0}")]
    Sweeper(#[from] tokio::task::JoinError),
}
