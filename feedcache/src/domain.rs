use crate::error::InputError;
use crate::record::Record;
use std::fmt;
use std::time::Duration;

/// Grouping key selecting which items a request returns.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FeedId(i64);

impl FeedId {
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// Parse a raw path segment. Accepts anything a base-10 `i64` parse accepts.
    pub fn parse(raw: &str) -> Result<Self, InputError> {
        raw.parse::<i64>()
            .map(Self)
            .map_err(|source| InputError::new(raw, source))
    }

    pub fn get(self) -> i64 {
        self.0
    }

    pub fn cache_key(self) -> CacheKey {
        CacheKey::for_feed(self)
    }
}

impl fmt::Display for FeedId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Key under which a feed's serialized records live in the external cache.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    pub const PREFIX: &str = "item-";

    pub fn for_feed(feed_id: FeedId) -> Self {
        // Formatting the parsed integer keeps "+5" and "5" on the same key.
        Self(format!("{}{}", Self::PREFIX, feed_id.get()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CacheKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Which dependency produced a [`RetrievalResult`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Source {
    Cache,
    Store,
}

impl Source {
    pub fn as_str(self) -> &'static str {
        match self {
            Source::Cache => "cache",
            Source::Store => "store",
        }
    }
}

#[derive(Clone, Debug)]
pub struct RetrievalResult {
    pub records: Vec<Record>,
    pub elapsed: Duration,
    pub source: Source,
}

impl RetrievalResult {
    pub fn new(records: Vec<Record>, elapsed: Duration, source: Source) -> Self {
        Self {
            records,
            elapsed,
            source,
        }
    }

    pub fn elapsed_ms(&self) -> u64 {
        u64::try_from(self.elapsed.as_millis()).unwrap_or(u64::MAX)
    }
}
