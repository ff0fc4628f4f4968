use feedcache::{CacheAsideReader, DataStore, KeyValueCache};
use std::sync::Arc;
use std::time::Duration;

/// Server state shared across handlers
#[derive(Clone, Debug)]
pub struct AppState {
    pub reader: Arc<CacheAsideReader>,
    pub request_timeout: Duration,
}

impl AppState {
    pub fn new(
        store: Arc<dyn DataStore>,
        cache: Arc<dyn KeyValueCache>,
        request_timeout: Duration,
    ) -> Self {
        Self {
            reader: Arc::new(CacheAsideReader::new(store, cache)),
            request_timeout,
        }
    }
}
