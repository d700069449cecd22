use async_trait::async_trait;

use crate::errors::StoreError;
use crate::models::{GoldPrice, UploadMetadata};

pub mod memory;
pub mod postgres;

pub use memory::MemoryPriceStore;
pub use postgres::PgPriceStore;

/// Largest number of writes committed together in one batch.
pub const MAX_BATCH_SIZE: usize = 500;

/// Persistence for gold price records and the upload metadata singleton.
///
/// Price records are keyed by `date_sortable`.
#[async_trait]
pub trait PriceStore: Send + Sync {
    async fn fetch_by_date(&self, date_sortable: &str) -> Result<Option<GoldPrice>, StoreError>;

    /// Write every record atomically, replacing any existing record with the
    /// same key. Callers keep batches within `MAX_BATCH_SIZE`.
    async fn commit_batch(&self, batch: &[GoldPrice]) -> Result<(), StoreError>;

    /// Most recent records first.
    async fn fetch_recent(&self, limit: i64) -> Result<Vec<GoldPrice>, StoreError>;

    async fn fetch_latest(&self) -> Result<Option<GoldPrice>, StoreError>;

    async fn save_metadata(&self, metadata: &UploadMetadata) -> Result<(), StoreError>;

    async fn fetch_metadata(&self) -> Result<Option<UploadMetadata>, StoreError>;

    /// Delete every price record, returning how many were removed.
    async fn clear_prices(&self) -> Result<u64, StoreError>;
}
