use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Carat, GoldPrice, UploadMetadata};

/// One carat's price for one day, as returned by the list endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceResponse {
    pub date: String,
    pub carat: String,
    pub price_lkr: i64,
    pub price_per_ounce: f64,
}

impl PriceResponse {
    pub fn new(price: &GoldPrice, carat: Carat) -> Self {
        Self {
            date: price.date.clone(),
            carat: carat.label().to_string(),
            price_lkr: price.price_for(carat),
            price_per_ounce: price.price_per_ounce,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaratPrice {
    pub price_lkr: i64,
    pub carat: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LatestPricesResponse {
    pub success: bool,
    pub date: String,
    pub prices: BTreeMap<String, CaratPrice>,
    pub price_per_ounce: f64,
}

impl From<&GoldPrice> for LatestPricesResponse {
    fn from(price: &GoldPrice) -> Self {
        let prices = Carat::ALL
            .iter()
            .map(|carat| {
                (
                    carat.label().to_string(),
                    CaratPrice {
                        price_lkr: price.price_for(*carat),
                        carat: carat.label().to_string(),
                    },
                )
            })
            .collect();

        Self {
            success: true,
            date: price.date.clone(),
            prices,
            price_per_ounce: price.price_per_ounce,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DatePriceResponse {
    pub success: bool,
    pub date: String,
    pub prices: BTreeMap<String, i64>,
    pub price_per_ounce: f64,
}

impl From<&GoldPrice> for DatePriceResponse {
    fn from(price: &GoldPrice) -> Self {
        Self {
            success: true,
            date: price.date.clone(),
            prices: Carat::ALL
                .iter()
                .map(|carat| (carat.label().to_string(), price.price_for(*carat)))
                .collect(),
            price_per_ounce: price.price_per_ounce,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UploadResponse {
    pub success: bool,
    pub message: String,
    pub records_processed: usize,
    pub filename: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetadataBody {
    Upload {
        last_upload: DateTime<Utc>,
        total_records: i64,
        filename: String,
    },
    Empty {
        message: String,
    },
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MetadataResponse {
    pub success: bool,
    pub metadata: MetadataBody,
}

impl From<Option<UploadMetadata>> for MetadataResponse {
    fn from(meta: Option<UploadMetadata>) -> Self {
        let metadata = match meta {
            Some(m) => MetadataBody::Upload {
                last_upload: m.last_upload,
                total_records: m.total_records,
                filename: m.filename,
            },
            None => MetadataBody::Empty {
                message: "No uploads yet".to_string(),
            },
        };
        Self { success: true, metadata }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ClearResponse {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthCheckResponse {
    pub status: String,
    pub service: String,
    pub version: String,
    pub endpoints: BTreeMap<String, String>,
}
