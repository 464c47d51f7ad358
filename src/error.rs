//! Process-level error type.

use crate::config::ConfigError;
use crate::store::StoreError;

/// The error type returned by campsite's startup and serving operations.
///
/// Request-level failures are [`Fault`](crate::Fault)s, rendered as error
/// pages and never surfaced here. This type covers what stops the process:
/// bad configuration, a store that cannot be opened, or a port that cannot be
/// bound.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    #[error("config: {0}")]
    Config(#[from] ConfigError),

    #[error("store: {0}")]
    Store(#[from] StoreError),
}
