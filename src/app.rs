use axum::extract::DefaultBodyLimit;
use axum::routing::get;
use axum::Router;
use http::header;
use tower_http::cors::{Any, CorsLayer};

use crate::routes::{health, metadata, prices, upload};
use crate::state::AppState;

pub fn create_app(state: AppState, max_upload_bytes: usize) -> Router {
    Router::<AppState>::new()
        .route("/", get(health::health))
        .nest("/health", health::router())
        .nest("/api/upload", upload::router())
        .nest("/api/prices", prices::router())
        .nest("/api/metadata", metadata::router())
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(cors_layer())
        .with_state(state)
}

fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers([header::ORIGIN, header::CONTENT_LENGTH, header::CONTENT_TYPE])
}
