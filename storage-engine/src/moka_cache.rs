use async_trait::async_trait;
use bytes::Bytes;
use feedcache::{CacheError, CacheKey, KeyValueCache, Lookup};
use moka::Expiry;
use moka::future::Cache;
use shared::TtlMs;
use std::fmt::Debug;
use std::time::{Duration, Instant};

#[derive(Clone)]
struct Entry {
    payload: Bytes,
    ttl: Duration,
}

/// Expires each entry after the TTL it was written with.
/// Overwriting a key restarts its clock.
struct PerEntryTtl;

impl Expiry<CacheKey, Entry> for PerEntryTtl {
    fn expire_after_create(
        &self,
        _key: &CacheKey,
        value: &Entry,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(value.ttl)
    }

    fn expire_after_update(
        &self,
        _key: &CacheKey,
        value: &Entry,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(value.ttl)
    }
}

/// Moka-based in-process cache with per-entry TTL support
/// Used when no Redis is configured, or as the fallback when Redis is unreachable at startup
pub struct MokaCache {
    cache: Cache<CacheKey, Entry>,
}

impl MokaCache {
    /// Create a new bounded Moka cache with max entries
    pub fn new_bounded(max_entries: u64) -> Self {
        let cache = Cache::builder()
            .name("feedcache")
            .max_capacity(max_entries)
            .expire_after(PerEntryTtl)
            .build();

        Self { cache }
    }

    pub fn entry_count(&self) -> u64 {
        self.cache.entry_count()
    }
}

#[async_trait]
impl KeyValueCache for MokaCache {
    async fn get(&self, key: &CacheKey) -> Result<Lookup, CacheError> {
        match self.cache.get(key).await {
            Some(entry) => Ok(Lookup::Hit(entry.payload)),
            None => Ok(Lookup::Miss), // Either doesn't exist or TTL expired
        }
    }

    async fn set(&self, key: &CacheKey, payload: Bytes, ttl: TtlMs) -> Result<(), CacheError> {
        let entry = Entry {
            payload,
            ttl: ttl.as_duration(),
        };
        self.cache.insert(key.clone(), entry).await;
        Ok(())
    }
}

impl Debug for MokaCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MokaCache")
            .field("entry_count", &self.cache.entry_count())
            .field("weighted_size", &self.cache.weighted_size())
            .finish()
    }
}
