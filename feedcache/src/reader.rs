use crate::codec;
use crate::domain::{CacheKey, FeedId, RetrievalResult, Source};
use crate::error::{FetchError, StoreError};
use crate::ports::{DataStore, KeyValueCache, Lookup};
use crate::record::Record;
use shared::TtlMs;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::time::timeout;
use tracing::{debug, error, info, warn};

/// Lifetime of a repopulated cache entry.
pub const CACHE_ENTRY_TTL: TtlMs = TtlMs::from_secs(300);

/// Upper bound on a background cache write.
pub const POPULATE_TIMEOUT: Duration = Duration::from_secs(5);

/// Cache-aside read path in front of the authoritative store.
///
/// The cache is advisory: every cache failure (transport error, corrupt
/// payload, failed write-back) is absorbed here and only logged. Write-back
/// runs after the result is decided and never delays it. Store
/// failures are the only errors a cached fetch can return besides bad input.
/// No state is held between requests, so one reader is shared by all of them.
#[derive(Clone)]
pub struct CacheAsideReader {
    store: Arc<dyn DataStore>,
    cache: Arc<dyn KeyValueCache>,
}

impl CacheAsideReader {
    pub fn new(store: Arc<dyn DataStore>, cache: Arc<dyn KeyValueCache>) -> Self {
        Self { store, cache }
    }

    /// Validate the raw identifier, then serve from cache or fall back to the store.
    pub async fn fetch(&self, raw_feed_id: &str) -> Result<RetrievalResult, FetchError> {
        let feed_id = FeedId::parse(raw_feed_id)?;
        Ok(self.fetch_feed(feed_id).await?)
    }

    /// Baseline path: same validation and store contract, never touches the cache.
    pub async fn fetch_uncached(&self, raw_feed_id: &str) -> Result<RetrievalResult, FetchError> {
        let start = Instant::now();
        let feed_id = FeedId::parse(raw_feed_id)?;

        let records = self.store.query(feed_id).await.inspect_err(|e| {
            error!("Database error for feed {}: {}", feed_id, e);
        })?;

        let result = RetrievalResult::new(records, start.elapsed(), Source::Store);
        info!("Uncached query took {:?}", result.elapsed);
        Ok(result)
    }

    pub async fn fetch_feed(&self, feed_id: FeedId) -> Result<RetrievalResult, StoreError> {
        let start = Instant::now();
        let key = feed_id.cache_key();

        if let Some(records) = self.lookup(&key).await {
            let result = RetrievalResult::new(records, start.elapsed(), Source::Cache);
            info!("Cached query took {:?}", result.elapsed);
            return Ok(result);
        }

        let records = self.store.query(feed_id).await.inspect_err(|e| {
            error!("Database error on cache miss for feed {}: {}", feed_id, e);
        })?;
        let result = RetrievalResult::new(records, start.elapsed(), Source::Store);

        self.populate(key, &result.records);

        info!("Uncached query took {:?}", result.elapsed);
        Ok(result)
    }

    /// `Some` only when the cache held a payload that decodes cleanly.
    async fn lookup(&self, key: &CacheKey) -> Option<Vec<Record>> {
        let payload = match self.cache.get(key).await {
            Ok(Lookup::Hit(payload)) => payload,
            Ok(Lookup::Miss) => {
                debug!("Cache miss for key {}", key);
                return None;
            }
            Err(e) => {
                warn!("Cache get error for key {}: {}. Attempting DB fetch.", key, e);
                return None;
            }
        };

        match codec::decode(&payload) {
            Ok(records) => {
                debug!("Cache hit for key {} ({} records)", key, records.len());
                Some(records)
            }
            Err(e) => {
                warn!("Cache payload for key {} is unreadable: {}. Fetching from DB instead.", key, e);
                None
            }
        }
    }

    /// Best-effort write-back on a detached task. The caller never waits for it;
    /// failures and stalls are logged and dropped.
    fn populate(&self, key: CacheKey, records: &[Record]) {
        let payload = match codec::encode(records) {
            Ok(payload) => payload,
            Err(e) => {
                warn!("Failed to encode result for cache key {}: {}", key, e);
                return;
            }
        };

        let cache = Arc::clone(&self.cache);
        tokio::spawn(async move {
            match timeout(POPULATE_TIMEOUT, cache.set(&key, payload, CACHE_ENTRY_TTL)).await {
                Ok(Ok(())) => debug!("Cache key {} populated", key),
                Ok(Err(e)) => warn!("Failed to set cache key {}: {}", key, e),
                Err(_) => warn!(
                    "Cache set for key {} did not finish within {:?}, abandoning it",
                    key, POPULATE_TIMEOUT
                ),
            }
        });
    }
}

impl std::fmt::Debug for CacheAsideReader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheAsideReader")
            .field("store", &"<dyn DataStore>")
            .field("cache", &"<dyn KeyValueCache>")
            .finish()
    }
}
