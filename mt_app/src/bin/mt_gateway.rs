use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::middleware::from_fn_with_state;
use axum::routing::get;
use mt_app::config_loader;
use mt_app::tracing_setup;
use mt_http::RateLimitState;
use mt_http::rate_limit_middleware;
use mt_ratelimit::MemoryStore;
use mt_ratelimit::RateLimitBackend;
use mt_ratelimit::Sweeper;
use tracing::info;
use tracing::warn;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    let _guard = tracing_setup::init("mt_gateway", "./logs", tracing::Level::INFO);

    // Load gateway configuration from file (with fallback to defaults)
    let config = config_loader::load_gateway_config_or_default("config/gateway.toml");

    let policy = config.rate_limit.policy();

    info!("Starting MedTrack gateway on {}", config.listen_addr);
    info!(
        "Rate limit policy: {} requests per {:?}, sweep every {}s, retention {}s",
        policy.max_requests(),
        policy.window(),
        config.sweep_interval_secs,
        config.retention_secs
    );

    let backend: Arc<dyn RateLimitBackend> = Arc::new(MemoryStore::with_retention(Duration::from_secs(config.retention_secs)));

    // Sweeper is owned here and stopped during graceful shutdown
    let sweeper = Sweeper::start(Arc::clone(&backend), Duration::from_secs(config.sweep_interval_secs));

    let state = RateLimitState::new(backend, policy);
    let app = Router::new()
        .route("/api/ping", get(ping))
        .layer(from_fn_with_state(state, rate_limit_middleware))
        // Health endpoint stays outside the rate limited surface
        .route("/health", get(health));

    let listener = tokio::net::TcpListener::bind(&config.listen_addr).await?;
    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped, shutting down sweeper");
    sweeper.shutdown().await?;

    Ok(())
}

async fn ping() -> &'static str {
    "pong"
}

async fn health() -> &'static str {
    "ok"
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {err}");
        return;
    }
    info!("Shutdown signal received");
}
