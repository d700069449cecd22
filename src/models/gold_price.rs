use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::utils::CanonicalDate;

/// Grams in one troy ounce.
pub const GRAMS_PER_TROY_OUNCE: f64 = 31.1035;

/// Purity multipliers against the 24K per-gram price.
pub const PURITY_22K: f64 = 0.9167;
pub const PURITY_18K: f64 = 0.75;

// One trading day's gold price, keyed by `date_sortable`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct GoldPrice {
    pub date: String,          // 26-Dec-25
    pub date_sortable: String, // 2025-12-26
    pub price_per_ounce: f64,
    pub price_24k: i64,
    pub price_22k: i64,
    pub price_18k: i64,
    #[serde(skip)]
    pub uploaded_at: Option<DateTime<Utc>>,
}

impl GoldPrice {
    /// Derive the per-carat prices from a USD per-ounce quote.
    ///
    /// Rounding is half away from zero throughout.
    pub fn from_ounce_price(date: &CanonicalDate, price_per_ounce: f64) -> Self {
        let per_gram = price_per_ounce / GRAMS_PER_TROY_OUNCE;

        Self {
            date: date.display.clone(),
            date_sortable: date.sortable.clone(),
            price_per_ounce: (price_per_ounce * 100.0).round() / 100.0,
            price_24k: per_gram.round() as i64,
            price_22k: (per_gram * PURITY_22K).round() as i64,
            price_18k: (per_gram * PURITY_18K).round() as i64,
            uploaded_at: None,
        }
    }

    /// True when any stored price differs. The upload timestamp is ignored.
    pub fn prices_differ(&self, other: &GoldPrice) -> bool {
        self.price_24k != other.price_24k
            || self.price_22k != other.price_22k
            || self.price_18k != other.price_18k
            || self.price_per_ounce != other.price_per_ounce
    }

    pub fn price_for(&self, carat: Carat) -> i64 {
        match carat {
            Carat::K24 => self.price_24k,
            Carat::K22 => self.price_22k,
            Carat::K18 => self.price_18k,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Carat {
    K24,
    K22,
    K18,
}

impl Carat {
    pub const ALL: [Carat; 3] = [Carat::K24, Carat::K22, Carat::K18];

    pub fn label(&self) -> &'static str {
        match self {
            Carat::K24 => "24K",
            Carat::K22 => "22K",
            Carat::K18 => "18K",
        }
    }

    /// Case-insensitive parse of `24K`, `22K` or `18K`.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_uppercase().as_str() {
            "24K" => Some(Carat::K24),
            "22K" => Some(Carat::K22),
            "18K" => Some(Carat::K18),
            _ => None,
        }
    }
}

/// Singleton record describing the most recent successful upload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct UploadMetadata {
    pub last_upload: DateTime<Utc>,
    pub total_records: i64,
    pub filename: String,
}
