//! Process configuration from the environment.
//!
//! | Variable | Default |
//! |---|---|
//! | `CAMPSITE_ADDR` | `0.0.0.0:3000` |
//! | `CAMPSITE_DATA_FILE` | unset: in-memory store |
//!
//! Log filtering is `RUST_LOG`, read by the subscriber in `main`.

use std::env;
use std::net::{AddrParseError, SocketAddr};
use std::path::PathBuf;

use tracing::info;

pub const ADDR_VAR: &str = "CAMPSITE_ADDR";
pub const DATA_FILE_VAR: &str = "CAMPSITE_DATA_FILE";
pub const DEFAULT_ADDR: &str = "0.0.0.0:3000";

/// An environment variable held a value that could not be used.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{key}={value:?} is not a socket address: {source}")]
    InvalidAddr {
        key: &'static str,
        value: String,
        source: AddrParseError,
    },
}

#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    pub addr: SocketAddr,
    /// Where the campground collection is persisted. `None` keeps it in
    /// memory.
    pub data_file: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup, so tests need not touch the
    /// process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let raw_addr = lookup(ADDR_VAR).unwrap_or_else(|| {
            info!("{ADDR_VAR} not set, using default: {DEFAULT_ADDR}");
            DEFAULT_ADDR.to_owned()
        });
        let addr = raw_addr.parse().map_err(|source| ConfigError::InvalidAddr {
            key: ADDR_VAR,
            value: raw_addr.clone(),
            source,
        })?;

        let data_file = lookup(DATA_FILE_VAR)
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from);
        if data_file.is_none() {
            info!("{DATA_FILE_VAR} not set, campgrounds are kept in memory");
        }

        Ok(Self { addr, data_file })
    }
}
