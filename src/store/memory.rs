use std::collections::BTreeMap;

use async_trait::async_trait;
use parking_lot::RwLock;

use super::PriceStore;
use crate::errors::StoreError;
use crate::models::{GoldPrice, UploadMetadata};

/// Process-local store. Records live in a map ordered by sort date.
#[derive(Default)]
pub struct MemoryPriceStore {
    prices: RwLock<BTreeMap<String, GoldPrice>>,
    metadata: RwLock<Option<UploadMetadata>>,
}

impl MemoryPriceStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.prices.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.prices.read().is_empty()
    }
}

#[async_trait]
impl PriceStore for MemoryPriceStore {
    async fn fetch_by_date(&self, date_sortable: &str) -> Result<Option<GoldPrice>, StoreError> {
        Ok(self.prices.read().get(date_sortable).cloned())
    }

    async fn commit_batch(&self, batch: &[GoldPrice]) -> Result<(), StoreError> {
        let mut prices = self.prices.write();
        for p in batch {
            prices.insert(p.date_sortable.clone(), p.clone());
        }
        Ok(())
    }

    async fn fetch_recent(&self, limit: i64) -> Result<Vec<GoldPrice>, StoreError> {
        let limit = usize::try_from(limit).unwrap_or(0);
        Ok(self.prices.read().values().rev().take(limit).cloned().collect())
    }

    async fn fetch_latest(&self) -> Result<Option<GoldPrice>, StoreError> {
        Ok(self.prices.read().values().next_back().cloned())
    }

    async fn save_metadata(&self, metadata: &UploadMetadata) -> Result<(), StoreError> {
        *self.metadata.write() = Some(metadata.clone());
        Ok(())
    }

    async fn fetch_metadata(&self) -> Result<Option<UploadMetadata>, StoreError> {
        Ok(self.metadata.read().clone())
    }

    async fn clear_prices(&self) -> Result<u64, StoreError> {
        let mut prices = self.prices.write();
        let deleted = prices.len() as u64;
        prices.clear();
        Ok(deleted)
    }
}
