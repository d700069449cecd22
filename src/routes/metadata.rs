use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use tracing::info;

use crate::errors::AppError;
use crate::models::MetadataResponse;
use crate::services::price_service;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(get_metadata))
}

pub async fn get_metadata(State(state): State<AppState>) -> Result<Json<MetadataResponse>, AppError> {
    info!("GET /api/metadata - Getting upload metadata");
    let metadata = price_service::get_metadata(state.store.as_ref()).await?;
    Ok(Json(MetadataResponse::from(metadata)))
}
