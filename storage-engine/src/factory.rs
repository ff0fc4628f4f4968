use crate::moka_cache::MokaCache;
use crate::redis_cache::RedisCache;
use feedcache::KeyValueCache;
use shared::config::{CacheBackend, CacheConfig};
use std::sync::Arc;
use tracing::{info, warn};

/// Build the configured cache backend.
/// An unreachable Redis never blocks startup: the service runs with an in-process cache instead.
pub async fn build_cache(config: &CacheConfig) -> Arc<dyn KeyValueCache> {
    match config.backend {
        CacheBackend::Redis => match RedisCache::connect(&config.redis_url).await {
            Ok(cache) => Arc::new(cache),
            Err(e) => {
                warn!(
                    "Failed to initialize Redis cache: {}. Running with in-memory cache.",
                    e
                );
                Arc::new(MokaCache::new_bounded(config.memory_capacity))
            }
        },
        CacheBackend::Memory => {
            info!(
                "Using in-memory cache (capacity {} entries)",
                config.memory_capacity
            );
            Arc::new(MokaCache::new_bounded(config.memory_capacity))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use feedcache::{FeedId, Lookup};
    use shared::TtlMs;

    #[tokio::test]
    async fn test_memory_backend_is_usable() {
        let config = CacheConfig {
            backend: CacheBackend::Memory,
            redis_url: String::new(),
            memory_capacity: 16,
        };
        let cache = build_cache(&config).await;
        let key = FeedId::new(9).cache_key();

        cache
            .set(&key, Bytes::from_static(b"[]"), TtlMs::from_secs(300))
            .await
            .unwrap();
        assert!(matches!(cache.get(&key).await.unwrap(), Lookup::Hit(_)));
    }

    #[tokio::test]
    async fn test_invalid_redis_url_falls_back_to_memory() {
        let config = CacheConfig {
            backend: CacheBackend::Redis,
            redis_url: "not a redis url".to_string(),
            memory_capacity: 16,
        };
        let cache = build_cache(&config).await;
        let key = FeedId::new(9).cache_key();

        assert_eq!(cache.get(&key).await.unwrap(), Lookup::Miss);
    }
}
