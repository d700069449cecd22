use axum::{routing::get, Json, Router};
use tracing::info;

use crate::models::HealthCheckResponse;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(health))
}

pub async fn health() -> Json<HealthCheckResponse> {
    info!("GET /health - Health check");

    let endpoints = [
        ("upload", "/api/upload (POST)"),
        ("get_all", "/api/prices (GET)"),
        ("get_latest", "/api/prices/latest (GET)"),
        ("get_by_date", "/api/prices/{date} (GET)"),
        ("metadata", "/api/metadata (GET)"),
        ("clear", "/api/prices/clear (DELETE)"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect();

    Json(HealthCheckResponse {
        status: "online".to_string(),
        service: "Gold Price API".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        endpoints,
    })
}
