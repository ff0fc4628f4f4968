//! Postgres-backed [`DataStore`] over a deadpool connection pool.

use crate::columns::decode_row;
use async_trait::async_trait;
use deadpool_postgres::{Config, ManagerConfig, Pool, PoolConfig, RecyclingMethod, Runtime};
use feedcache::{DataStore, FeedId, Record, StoreError};
use shared::config::DatabaseConfig;
use tokio_postgres::NoTls;
use tracing::{debug, info};

/// The parameter is cast so an `i64` binds against an `integer` column.
const ITEMS_BY_FEED: &str = "SELECT * FROM items WHERE feed_id = $1::int8";

#[derive(Clone)]
pub struct PostgresStore {
    pool: Pool,
}

impl PostgresStore {
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }

    /// Build the pool. Connections are opened lazily; call [`ping`](Self::ping) to verify.
    pub fn from_config(config: &DatabaseConfig) -> shared::Result<Self> {
        let mut cfg = Config::new();
        cfg.url = Some(config.url.clone());
        cfg.manager = Some(ManagerConfig {
            recycling_method: RecyclingMethod::Fast,
        });
        cfg.pool = Some(PoolConfig::new(config.pool_size));

        let pool = cfg
            .create_pool(Some(Runtime::Tokio1), NoTls)
            .map_err(|e| shared::Error::Internal(format!("Failed to create pool: {}", e)))?;

        info!("Database pool created (max size {})", config.pool_size);
        Ok(Self::new(pool))
    }

    pub async fn ping(&self) -> shared::Result<()> {
        let client = self
            .pool
            .get()
            .await
            .map_err(|e| shared::Error::Internal(format!("unable to connect to database: {}", e)))?;
        client
            .simple_query("SELECT 1")
            .await
            .map_err(|e| shared::Error::Internal(format!("unable to ping database: {}", e)))?;
        Ok(())
    }

    pub fn pool(&self) -> &Pool {
        &self.pool
    }
}

#[async_trait]
impl DataStore for PostgresStore {
    async fn query(&self, feed_id: FeedId) -> Result<Vec<Record>, StoreError> {
        let client = self
            .pool
            .get()
            .await
            .map_err(|e| StoreError::connection(feed_id, e))?;

        let statement = client
            .prepare_cached(ITEMS_BY_FEED)
            .await
            .map_err(|e| StoreError::query(feed_id, e))?;
        let rows = client
            .query(&statement, &[&feed_id.get()])
            .await
            .map_err(|e| StoreError::query(feed_id, e))?;

        debug!("Feed {} returned {} rows", feed_id, rows.len());

        rows.iter().map(|row| decode_row(feed_id, row)).collect()
    }
}

impl std::fmt::Debug for PostgresStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let status = self.pool.status();
        f.debug_struct("PostgresStore")
            .field("size", &status.size)
            .field("available", &status.available)
            .finish()
    }
}
