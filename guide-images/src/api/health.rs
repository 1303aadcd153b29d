//! Health check endpoint

use axum::{extract::State, routing::get, Json, Router};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::AppState;

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// "ok", or "degraded" when no image source is configured
    pub status: String,
    /// Module name ("guide-images")
    pub module: String,
    /// Crate version from Cargo.toml
    pub version: String,
    /// Seconds since service started
    pub uptime_seconds: u64,
    /// Number of image sources usable for search
    pub sources_available: usize,
    /// Names of those sources (e.g. "Unsplash")
    pub sources: Vec<String>,
}

/// GET /health
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let uptime = Utc::now().signed_duration_since(state.startup_time);
    let uptime_seconds = uptime.num_seconds().max(0) as u64;
    let sources_available = state.manager.available_source_count();

    let status = if sources_available > 0 { "ok" } else { "degraded" };

    Json(HealthResponse {
        status: status.to_string(),
        module: "guide-images".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds,
        sources_available,
        sources: state.manager.source_names().into_iter().map(String::from).collect(),
    })
}

/// Build health check routes
pub fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
