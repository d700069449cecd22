use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::info;

use super::PriceStore;
use crate::db::{gold_price_queries, metadata_queries};
use crate::errors::StoreError;
use crate::models::{GoldPrice, UploadMetadata};

/// PostgreSQL-backed store sharing one connection pool.
#[derive(Clone)]
pub struct PgPriceStore {
    pool: PgPool,
}

impl PgPriceStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Open a pool and bring the schema up to date.
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(|e| StoreError::Unavailable(format!("migration failed: {}", e)))?;

        info!("✅ PostgreSQL price store ready");
        Ok(Self::new(pool))
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[async_trait]
impl PriceStore for PgPriceStore {
    async fn fetch_by_date(&self, date_sortable: &str) -> Result<Option<GoldPrice>, StoreError> {
        Ok(gold_price_queries::fetch_by_date(&self.pool, date_sortable).await?)
    }

    async fn commit_batch(&self, batch: &[GoldPrice]) -> Result<(), StoreError> {
        Ok(gold_price_queries::upsert_batch(&self.pool, batch).await?)
    }

    async fn fetch_recent(&self, limit: i64) -> Result<Vec<GoldPrice>, StoreError> {
        Ok(gold_price_queries::fetch_recent(&self.pool, limit).await?)
    }

    async fn fetch_latest(&self) -> Result<Option<GoldPrice>, StoreError> {
        Ok(gold_price_queries::fetch_latest(&self.pool).await?)
    }

    async fn save_metadata(&self, metadata: &UploadMetadata) -> Result<(), StoreError> {
        Ok(metadata_queries::upsert(&self.pool, metadata).await?)
    }

    async fn fetch_metadata(&self) -> Result<Option<UploadMetadata>, StoreError> {
        Ok(metadata_queries::fetch(&self.pool).await?)
    }

    async fn clear_prices(&self) -> Result<u64, StoreError> {
        Ok(gold_price_queries::delete_all(&self.pool).await?)
    }
}
