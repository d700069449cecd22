use axum::extract::{Path, Query, State};
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info};

use crate::errors::AppError;
use crate::models::{
    ApiResponse, Carat, ClearResponse, DatePriceResponse, LatestPricesResponse, PriceResponse,
};
use crate::services::price_service;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_all_prices))
        .route("/latest", get(get_latest_prices))
        .route("/clear", delete(clear_all_prices))
        .route("/:date", get(get_price_by_date))
}

#[derive(Debug, Deserialize)]
pub struct PriceQuery {
    pub carat: Option<String>,
    // Kept as text so a malformed limit falls back to the default instead of rejecting.
    pub limit: Option<String>,
}

pub async fn get_all_prices(
    State(state): State<AppState>,
    Query(query): Query<PriceQuery>,
) -> Result<Json<ApiResponse<Vec<PriceResponse>>>, AppError> {
    let limit = price_service::resolve_limit(query.limit.as_deref());
    info!("GET /api/prices - carat={:?} limit={}", query.carat, limit);

    let prices = price_service::get_recent(state.store.as_ref(), limit).await?;

    let data: Vec<PriceResponse> = match query.carat.as_deref().filter(|c| !c.trim().is_empty()) {
        Some(raw) => match Carat::parse(raw) {
            Some(carat) => prices.iter().map(|p| PriceResponse::new(p, carat)).collect(),
            None => Vec::new(),
        },
        None => prices
            .iter()
            .flat_map(|p| Carat::ALL.into_iter().map(move |c| PriceResponse::new(p, c)))
            .collect(),
    };

    Ok(Json(ApiResponse {
        success: true,
        message: None,
        count: Some(data.len()),
        data: Some(data),
    }))
}

pub async fn get_latest_prices(State(state): State<AppState>) -> Result<Response, AppError> {
    info!("GET /api/prices/latest - Getting latest prices");

    match price_service::get_latest(state.store.as_ref()).await? {
        Some(price) => Ok(Json(LatestPricesResponse::from(&price)).into_response()),
        None => Ok(Json(json!({
            "success": false,
            "message": "No data available",
        }))
        .into_response()),
    }
}

pub async fn get_price_by_date(
    Path(date): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<DatePriceResponse>, AppError> {
    info!("GET /api/prices/{} - Getting price by date", date);
    let price = price_service::get_by_date(state.store.as_ref(), &date).await?;
    Ok(Json(DatePriceResponse::from(&price)))
}

pub async fn clear_all_prices(State(state): State<AppState>) -> Result<Json<ClearResponse>, AppError> {
    info!("DELETE /api/prices/clear - Clearing all price data");

    let deleted = price_service::clear_all(state.store.as_ref())
        .await
        .map_err(|e| {
            error!("Error clearing data: {}", e);
            e
        })?;

    Ok(Json(ClearResponse {
        success: true,
        message: format!("Deleted {} records", deleted),
    }))
}
