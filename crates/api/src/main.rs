//! Shopfront API server binary entrypoint.

use std::net::SocketAddr;
use std::time::Duration;

use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use shopfront_common::config::AppConfig;
use shopfront_common::db::{create_pool, run_migrations};
use shopfront_notifier::NotificationDispatcher;

use shopfront_api::routes::create_router;
use shopfront_api::state::AppState;

const NOTIFY_DRAIN_TIMEOUT: Duration = Duration::from_secs(10);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new("shopfront_api=debug,shopfront_notifier=debug,tower_http=debug")
        }))
        .init();

    tracing::info!("Starting Shopfront API server...");

    // Load configuration
    let config = AppConfig::from_env()?;

    // Create database connection pool
    let pool = create_pool(&config.database_url, config.db_max_connections).await?;
    run_migrations(&pool).await?;

    // Notification dispatcher is built once from the startup config
    let notifier = NotificationDispatcher::from_config(&config.notifier)?;
    tracing::info!(
        enabled = config.notifier.is_enabled(),
        base_url = %config.notifier.base_url,
        "Order notifications configured"
    );

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let state = AppState::new(pool, config, notifier);
    let tasks = state.tasks.clone();

    // Build router
    let app = create_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    // Start server
    tracing::info!("API server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c().await.ok();
            tracing::info!("Received shutdown signal, stopping gracefully...");
        })
        .await?;

    // Let in-flight order notifications finish before the runtime goes away
    tasks.close();
    if tokio::time::timeout(NOTIFY_DRAIN_TIMEOUT, tasks.wait()).await.is_err() {
        tracing::warn!(pending = tasks.len(), "Dropping unfinished order notifications");
    } else {
        tracing::debug!("Order notifications drained");
    }

    Ok(())
}
