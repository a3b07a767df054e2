use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::error::RateLimitError;
use crate::store::RateLimitBackend;

/// How often idle buckets are swept by default.
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(5 * 60);

/// Background eviction task for a rate limit backend.
///
/// Owned by the application lifecycle: started once during service startup
/// and shut down during graceful exit, so no timer outlives the process or
/// leaks into tests.
pub struct Sweeper {
    shutdown: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

impl Sweeper {
    /// Spawn the sweep loop on the current tokio runtime.
    pub fn start(backend: Arc<dyn RateLimitBackend>, interval: Duration) -> Self {
        let (shutdown, mut rx) = watch::channel(false);

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            // The first tick fires immediately; skip it so a freshly built
            // store is not swept at startup
            ticker.tick().await;

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        backend.cleanup();
                    }
                    changed = rx.changed() => {
                        if changed.is_err() || *rx.borrow() {
                            break;
                        }
                    }
                }
            }

            tracing::debug!("Rate limit sweeper stopped");
        });

        Self { shutdown, handle }
    }

    /// Signal the task to stop and wait for it to finish.
    pub async fn shutdown(self) -> Result<(), RateLimitError> {
        let _ = self.shutdown.send(true);
        self.handle.await?;
        Ok(())
    }
}
