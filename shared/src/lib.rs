// shared/src/lib.rs

use std::time::Duration;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("invalid configuration for {var}: {reason}")]
    Config { var: &'static str, reason: String },
    #[error("internal: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TtlMs(pub u64);

impl TtlMs {
    pub const fn from_secs(secs: u64) -> Self {
        TtlMs(secs * 1000)
    }

    pub fn as_duration(self) -> Duration {
        Duration::from_millis(self.0)
    }

    /// Whole seconds, rounded up so a sub-second TTL never becomes "no expiry".
    pub fn as_secs_ceil(self) -> u64 {
        self.0.div_ceil(1000).max(1)
    }
}

pub mod config;
