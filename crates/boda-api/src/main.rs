//! Wedding site API server entry point.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use boda_api::config::AppConfig;
use boda_api::error::AppError;
use boda_api::state::AppState;
use boda_core::clock::SystemClock;
use boda_core::store::JsonFileStore;
use boda_endpoint::http_submitter::HttpFormSubmitter;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

const IDLE_SWEEP_EVERY: Duration = Duration::from_secs(60);

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // Initialize tracing subscriber.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .init();

    tracing::info!("Starting wedding site API server");

    // Read configuration from environment.
    let config = AppConfig::from_env()?;
    let addr: SocketAddr = config
        .bind_address()
        .parse()
        .map_err(|e| AppError::Config(format!("invalid HOST:PORT combination: {e}")))?;

    // Open the persisted flag store.
    let store = JsonFileStore::open(&config.store_path)?;
    tracing::info!(path = %config.store_path.display(), "flag store opened");

    // Build application state.
    let app_state = AppState::new(
        config.wedding,
        Arc::new(HttpFormSubmitter::new()),
        Arc::new(SystemClock),
        Arc::new(store),
    )
    .with_flow_idle_ttl(config.flow_idle_ttl);

    // Sweep abandoned flows even when nobody creates new ones.
    let sweeper = app_state.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(IDLE_SWEEP_EVERY);
        loop {
            interval.tick().await;
            sweeper.evict_idle_flows();
        }
    });

    // Build router.
    // TODO: Replace CorsLayer::permissive() with the site's origin once it is deployed.
    let app = boda_api::app(app_state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    // Start server.
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app).await?;

    Ok(())
}
