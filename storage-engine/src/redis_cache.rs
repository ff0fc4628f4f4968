//! Redis-backed [`KeyValueCache`].

use async_trait::async_trait;
use bytes::Bytes;
use feedcache::{CacheError, CacheKey, KeyValueCache, Lookup};
use redis::AsyncCommands;
use redis::aio::ConnectionManager;
use shared::TtlMs;
use std::fmt;
use tracing::{debug, info};

/// Shared Redis client.
/// `ConnectionManager` reconnects on its own and is cheap to clone per call.
#[derive(Clone)]
pub struct RedisCache {
    conn_manager: ConnectionManager,
    redis_url: String,
}

impl fmt::Debug for RedisCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RedisCache")
            .field("redis_url", &self.redis_url)
            .field("conn_manager", &"<ConnectionManager>")
            .finish()
    }
}

impl RedisCache {
    pub async fn connect(redis_url: &str) -> Result<Self, CacheError> {
        info!("Initializing Redis connection manager for {}", redis_url);
        let client =
            redis::Client::open(redis_url).map_err(|e| CacheError::connect(redis_url, e))?;
        let conn_manager = ConnectionManager::new(client)
            .await
            .map_err(|e| CacheError::connect(redis_url, e))?;
        info!("Redis connection established");

        Ok(Self {
            conn_manager,
            redis_url: redis_url.to_string(),
        })
    }
}

#[async_trait]
impl KeyValueCache for RedisCache {
    async fn get(&self, key: &CacheKey) -> Result<Lookup, CacheError> {
        let mut conn = self.conn_manager.clone();
        let value = conn
            .get::<_, Option<Vec<u8>>>(key.as_str())
            .await
            .map_err(|e| CacheError::transport("get", key.as_str(), e))?;

        Ok(match value {
            Some(payload) => Lookup::Hit(Bytes::from(payload)),
            None => Lookup::Miss,
        })
    }

    async fn set(&self, key: &CacheKey, payload: Bytes, ttl: TtlMs) -> Result<(), CacheError> {
        let mut conn = self.conn_manager.clone();
        let seconds = ttl.as_secs_ceil();

        conn.set_ex::<_, _, ()>(key.as_str(), payload.as_ref(), seconds)
            .await
            .map_err(|e| CacheError::transport("set", key.as_str(), e))?;

        debug!("SETEX {} ({} bytes, ttl {}s)", key, payload.len(), seconds);
        Ok(())
    }
}
