use crate::domain::FeedId;
use std::num::ParseIntError;
use thiserror::Error;

pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Malformed feed identifier supplied by the caller.
#[derive(Debug, Error)]
#[error("invalid feed identifier '{raw}': {source}")]
pub struct InputError {
    raw: String,
    #[source]
    source: ParseIntError,
}

impl InputError {
    pub(crate) fn new(raw: &str, source: ParseIntError) -> Self {
        Self {
            raw: raw.to_string(),
            source,
        }
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }
}

/// Failure of the authoritative store. Always fatal to the request.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("unable to acquire a database connection for feed {feed_id}: {source}")]
    Connection {
        feed_id: FeedId,
        #[source]
        source: BoxError,
    },

    #[error("failed to query items for feed {feed_id}: {source}")]
    Query {
        feed_id: FeedId,
        #[source]
        source: BoxError,
    },

    #[error("failed to read column '{column}' for feed {feed_id}: {source}")]
    Decode {
        feed_id: FeedId,
        column: String,
        #[source]
        source: BoxError,
    },
}

impl StoreError {
    pub fn connection(feed_id: FeedId, source: impl Into<BoxError>) -> Self {
        StoreError::Connection {
            feed_id,
            source: source.into(),
        }
    }

    pub fn query(feed_id: FeedId, source: impl Into<BoxError>) -> Self {
        StoreError::Query {
            feed_id,
            source: source.into(),
        }
    }

    pub fn decode(feed_id: FeedId, column: impl Into<String>, source: impl Into<BoxError>) -> Self {
        StoreError::Decode {
            feed_id,
            column: column.into(),
            source: source.into(),
        }
    }

    pub fn feed_id(&self) -> FeedId {
        match self {
            StoreError::Connection { feed_id, .. }
            | StoreError::Query { feed_id, .. }
            | StoreError::Decode { feed_id, .. } => *feed_id,
        }
    }
}

/// Operational failure of the cache. A miss is not an error.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("unable to connect to cache at {url}: {source}")]
    Connect {
        url: String,
        #[source]
        source: BoxError,
    },

    #[error("cache {op} failed for key '{key}': {source}")]
    Transport {
        op: &'static str,
        key: String,
        #[source]
        source: BoxError,
    },
}

impl CacheError {
    pub fn connect(url: impl Into<String>, source: impl Into<BoxError>) -> Self {
        CacheError::Connect {
            url: url.into(),
            source: source.into(),
        }
    }

    pub fn transport(op: &'static str, key: impl Into<String>, source: impl Into<BoxError>) -> Self {
        CacheError::Transport {
            op,
            key: key.into(),
            source: source.into(),
        }
    }
}

/// Cache payload could not be encoded or decoded.
#[derive(Debug, Error)]
#[error("cache payload codec error: {0}")]
pub struct CodecError(#[from] pub serde_json::Error);

/// Errors that reach the caller of the reader.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error(transparent)]
    Input(#[from] InputError),

    #[error(transparent)]
    Store(#[from] StoreError),
}
