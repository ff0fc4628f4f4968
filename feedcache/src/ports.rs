use crate::domain::{CacheKey, FeedId};
use crate::error::{CacheError, StoreError};
use crate::record::Record;
use async_trait::async_trait;
use bytes::Bytes;
use shared::TtlMs;

// Ports are the pluggable extension points for the two external dependencies

/// Port for the authoritative backing store (e.g., Postgres)
#[async_trait]
pub trait DataStore: Send + Sync + 'static {
    /// All records for the feed, in store iteration order. No rows is `Ok(vec![])`.
    async fn query(&self, feed_id: FeedId) -> Result<Vec<Record>, StoreError>;
}

/// Outcome of a cache read that did not fail.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Lookup {
    Hit(Bytes),
    Miss,
}

/// Port for the external key-value cache (e.g., Redis)
#[async_trait]
pub trait KeyValueCache: Send + Sync + 'static {
    async fn get(&self, key: &CacheKey) -> Result<Lookup, CacheError>;
    async fn set(&self, key: &CacheKey, payload: Bytes, ttl: TtlMs) -> Result<(), CacheError>;
}
