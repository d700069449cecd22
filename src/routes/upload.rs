use axum::extract::multipart::MultipartError;
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use tracing::{error, info, warn};

use crate::errors::AppError;
use crate::models::UploadResponse;
use crate::services::{csv_import_service, price_service};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/", post(upload_csv))
}

struct UploadedFile {
    filename: String,
    content: Vec<u8>,
}

fn multipart_error(context: &str, e: MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge("Uploaded file exceeds the size limit".to_string())
    } else {
        AppError::Validation(format!("{}: {}", context, e.body_text()))
    }
}

async fn read_file_field(multipart: &mut Multipart) -> Result<Option<UploadedFile>, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error("Invalid multipart body", e))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let filename = field.file_name().unwrap_or_default().to_string();
        let content = field.bytes().await.map_err(|e| {
            error!("Failed to read uploaded file {}: {}", filename, e);
            multipart_error("Failed to read file", e)
        })?;

        return Ok(Some(UploadedFile {
            filename,
            content: content.to_vec(),
        }));
    }
    Ok(None)
}

pub async fn upload_csv(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    let file = read_file_field(&mut multipart)
        .await?
        .ok_or_else(|| AppError::Validation("No file uploaded".to_string()))?;

    info!("POST /api/upload - Uploading {} ({} bytes)", file.filename, file.content.len());

    if !file.filename.to_lowercase().ends_with(".csv") {
        warn!("Rejected upload {}: not a CSV file", file.filename);
        return Err(AppError::Validation("File must be a CSV".to_string()));
    }

    let prices = csv_import_service::parse_gold_price_bytes(&file.content).map_err(|e| {
        warn!("Rejected upload {}: {}", file.filename, e);
        AppError::Validation(e.to_string())
    })?;

    let summary = {
        let _guard = state.ingest_lock.lock().await;
        price_service::upsert_prices(state.store.as_ref(), prices)
            .await
            .map_err(|e| {
                error!("Failed to store data from {}: {}", file.filename, e);
                AppError::Internal(format!("Failed to store data: {}", e))
            })?
    };

    let processed = summary.processed();
    price_service::record_upload(state.store.as_ref(), &file.filename, processed).await;

    let message = if processed == 0 {
        "No new or updated records found. All data is already up to date.".to_string()
    } else {
        format!("Successfully processed {} records (new or updated)", processed)
    };

    Ok(Json(UploadResponse {
        success: true,
        message,
        records_processed: processed,
        filename: file.filename,
    }))
}
