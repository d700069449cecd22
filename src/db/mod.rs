pub mod gold_price_queries;
pub mod metadata_queries;
