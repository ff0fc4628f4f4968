#![deny(clippy::all)]

pub mod codec;
pub mod domain;
pub mod error;
pub mod ports;
pub mod reader;
pub mod record;

pub use domain::{CacheKey, FeedId, RetrievalResult, Source};
pub use error::{CacheError, CodecError, FetchError, InputError, StoreError};
pub use ports::{DataStore, KeyValueCache, Lookup};
pub use reader::{CACHE_ENTRY_TTL, CacheAsideReader, POPULATE_TIMEOUT};
pub use record::{Record, Value};
