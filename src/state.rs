use std::sync::Arc;
use tokio::sync::Mutex;
use crate::store::PriceStore;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn PriceStore>,
    /// Held for the whole read-then-write pass of an upload so overlapping
    /// uploads in this process cannot interleave on the same dates.
    pub ingest_lock: Arc<Mutex<()>>,
}

impl AppState {
    pub fn new(store: Arc<dyn PriceStore>) -> Self {
        Self {
            store,
            ingest_lock: Arc::new(Mutex::new(())),
        }
    }
}
