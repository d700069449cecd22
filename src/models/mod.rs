mod gold_price;
pub mod api;

pub use gold_price::{Carat, GoldPrice, UploadMetadata, GRAMS_PER_TROY_OUNCE, PURITY_18K, PURITY_22K};
pub use api::{
    ApiResponse, CaratPrice, ClearResponse, DatePriceResponse, HealthCheckResponse,
    LatestPricesResponse, MetadataBody, MetadataResponse, PriceResponse, UploadResponse,
};
