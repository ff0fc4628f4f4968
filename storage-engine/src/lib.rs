pub mod columns;
pub mod factory;
pub mod moka_cache;
pub mod postgres_store;
pub mod redis_cache;

pub use factory::build_cache;
pub use moka_cache::MokaCache;
pub use postgres_store::PostgresStore;
pub use redis_cache::RedisCache;
