use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;

use goldprice_api::app;
use goldprice_api::config::{AppConfig, StoreBackend};
use goldprice_api::logging::{init_logging, LoggingConfig};
use goldprice_api::state::AppState;
use goldprice_api::store::{MemoryPriceStore, PgPriceStore, PriceStore};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    // Initialize logging FIRST
    init_logging(LoggingConfig::from_env())?;

    let config = AppConfig::from_env()?;

    let mut pg_store = None;
    let store: Arc<dyn PriceStore> = match config.store_backend {
        StoreBackend::Postgres => {
            let url = config.database_url.as_deref().unwrap_or_default();
            let pg = PgPriceStore::connect(url, config.max_connections).await?;
            tracing::info!("📊 Using price store: PostgreSQL");
            pg_store = Some(pg.clone());
            Arc::new(pg)
        }
        StoreBackend::Memory => {
            tracing::info!("📊 Using price store: in-memory (data is lost on restart)");
            Arc::new(MemoryPriceStore::new())
        }
    };

    let state = AppState::new(store);
    let app = app::create_app(state, config.max_upload_bytes);

    let addr = SocketAddr::from((config.bind_addr, config.port));
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("🚀 Gold Price API running at http://{}/", addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(pg) = pg_store {
        pg.close().await;
    }
    tracing::info!("Gold Price API stopped");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}
