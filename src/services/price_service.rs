use std::collections::HashMap;

use chrono::Utc;
use thiserror::Error;
use tracing::{error, info, warn};

use crate::errors::{AppError, StoreError};
use crate::models::{GoldPrice, UploadMetadata};
use crate::store::{PriceStore, MAX_BATCH_SIZE};
use crate::utils::normalize_date;

pub const DEFAULT_LIMIT: i64 = 100;

/// Outcome of reconciling one upload against the store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpsertSummary {
    pub new: usize,
    pub updated: usize,
    pub skipped: usize,
}

impl UpsertSummary {
    /// Records that were written. Unchanged records are not counted.
    pub fn processed(&self) -> usize {
        self.new + self.updated
    }
}

/// A store failure part-way through an upsert.
///
/// `committed` counts records in batches acknowledged before the failure;
/// those stay committed.
#[derive(Debug, Error)]
#[error("{source} ({committed} records committed before failure)")]
pub struct UpsertError {
    pub committed: usize,
    #[source]
    pub source: StoreError,
}

enum Change {
    New,
    Updated,
    Unchanged,
}

/// Insert new records, overwrite changed ones, and leave identical ones alone.
///
/// Each record is looked up by `date_sortable` before being staged; staged
/// writes are committed in batches of at most `MAX_BATCH_SIZE`. A key that
/// appears more than once in `prices` is compared against the value staged
/// earlier in the same call.
pub async fn upsert_prices(
    store: &dyn PriceStore,
    prices: Vec<GoldPrice>,
) -> Result<UpsertSummary, UpsertError> {
    let mut summary = UpsertSummary::default();
    let mut committed = 0;
    let mut staged: HashMap<String, GoldPrice> = HashMap::new();

    let mut pending = prices.into_iter().peekable();
    while pending.peek().is_some() {
        let mut batch = Vec::with_capacity(MAX_BATCH_SIZE);

        for mut price in pending.by_ref().take(MAX_BATCH_SIZE) {
            let existing = match staged.get(&price.date_sortable) {
                Some(p) => Some(p.clone()),
                None => store
                    .fetch_by_date(&price.date_sortable)
                    .await
                    .map_err(|source| {
                        error!("Failed to look up gold price for {}: {}", price.date_sortable, source);
                        UpsertError { committed, source }
                    })?,
            };

            let change = match existing {
                None => Change::New,
                Some(current) if current.prices_differ(&price) => Change::Updated,
                Some(_) => Change::Unchanged,
            };

            match change {
                Change::New => summary.new += 1,
                Change::Updated => summary.updated += 1,
                Change::Unchanged => {
                    summary.skipped += 1;
                    continue;
                }
            }

            price.uploaded_at = Some(Utc::now());
            staged.insert(price.date_sortable.clone(), price.clone());
            batch.push(price);
        }

        if batch.is_empty() {
            continue;
        }

        store.commit_batch(&batch).await.map_err(|source| {
            error!("Failed to commit batch of {} gold prices: {}", batch.len(), source);
            UpsertError { committed, source }
        })?;
        committed += batch.len();
    }

    info!(
        "📊 Upload summary: {} new, {} updated, {} skipped (no change)",
        summary.new, summary.updated, summary.skipped
    );

    Ok(summary)
}

/// Record the upload. Failures are logged and swallowed.
pub async fn record_upload(store: &dyn PriceStore, filename: &str, processed: usize) {
    let metadata = UploadMetadata {
        last_upload: Utc::now(),
        total_records: processed as i64,
        filename: filename.to_string(),
    };

    if let Err(e) = store.save_metadata(&metadata).await {
        warn!("Failed to update upload metadata for {}: {}", filename, e);
    }
}

/// Parse a user-supplied `limit`, falling back to `DEFAULT_LIMIT`.
pub fn resolve_limit(raw: Option<&str>) -> i64 {
    raw.and_then(|v| v.trim().parse::<i64>().ok())
        .filter(|v| *v > 0)
        .unwrap_or(DEFAULT_LIMIT)
}

pub async fn get_recent(store: &dyn PriceStore, limit: i64) -> Result<Vec<GoldPrice>, AppError> {
    store.fetch_recent(limit).await.map_err(|e| {
        error!("Failed to fetch recent gold prices: {}", e);
        AppError::Store(e)
    })
}

pub async fn get_latest(store: &dyn PriceStore) -> Result<Option<GoldPrice>, AppError> {
    store.fetch_latest().await.map_err(|e| {
        error!("Failed to fetch latest gold price: {}", e);
        AppError::Store(e)
    })
}

/// Look up one day. `date` may be in any layout the CSV importer accepts.
pub async fn get_by_date(store: &dyn PriceStore, date: &str) -> Result<GoldPrice, AppError> {
    let key = normalize_date(date)
        .ok_or_else(|| AppError::Validation(format!("Invalid date: {}", date)))?;

    store
        .fetch_by_date(&key.sortable)
        .await
        .map_err(|e| {
            error!("Failed to fetch gold price for {}: {}", key.sortable, e);
            AppError::Store(e)
        })?
        .ok_or_else(|| AppError::NotFound(format!("No data found for date: {}", date)))
}

pub async fn get_metadata(store: &dyn PriceStore) -> Result<Option<UploadMetadata>, AppError> {
    store.fetch_metadata().await.map_err(|e| {
        error!("Failed to fetch upload metadata: {}", e);
        AppError::Store(e)
    })
}

pub async fn clear_all(store: &dyn PriceStore) -> Result<u64, AppError> {
    let deleted = store.clear_prices().await.map_err(|e| {
        error!("Failed to clear gold prices: {}", e);
        AppError::Store(e)
    })?;
    info!("Deleted {} gold price records", deleted);
    Ok(deleted)
}
