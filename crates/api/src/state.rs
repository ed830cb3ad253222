//! Shared application state for the Axum API server.

use std::sync::Arc;

use shopfront_common::config::AppConfig;
use shopfront_notifier::NotificationDispatcher;
use sqlx::PgPool;
use tokio_util::task::TaskTracker;

/// Application state shared across all route handlers via Axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: AppConfig,
    pub notifier: Arc<NotificationDispatcher>,
    /// Detached order notifications, drained on shutdown.
    pub tasks: TaskTracker,
}

impl AppState {
    pub fn new(pool: PgPool, config: AppConfig, notifier: NotificationDispatcher) -> Self {
        Self {
            pool,
            config,
            notifier: Arc::new(notifier),
            tasks: TaskTracker::new(),
        }
    }
}
