//! Health check endpoint.

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}

/// GET /health: Liveness plus whether order notifications will be sent.
async fn health_check(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "service": "shopfront-api",
        "version": env!("CARGO_PKG_VERSION"),
        "notifications_enabled": state.config.notifier.is_enabled()
    }))
}
