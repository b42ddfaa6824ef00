/// Health check endpoint
use axum::{response::Json, routing::get, Router};
use serde_json::json;

use crate::context::AppContext;

/// Build health routes
pub fn routes() -> Router<AppContext> {
    Router::new().route("/health", get(health_check))
}

/// Health check handler
async fn health_check() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION")
    }))
}
