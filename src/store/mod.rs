//! Campground persistence.
//!
//! [`CampgroundStore`] is the port the controller talks to; it is injected as
//! router state rather than reached through a global. Two adapters ship:
//!
//! - [`MemoryStore`]: process-local, lost on exit
//! - [`FileStore`]: one JSON file holding the whole collection
//!
//! Both keep documents in insertion order and re-validate every draft before
//! writing it, so nothing that fails the campground schema is ever persisted.

use async_trait::async_trait;

use crate::campground::{Campground, CampgroundDraft, CampgroundId};
use crate::fault::Fault;
use crate::schema::Violations;

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

/// Errors raised by store adapters.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The draft failed re-validation at write time.
    #[error("invalid campground: {0}")]
    Invalid(#[from] Violations),

    /// Reading or writing the backing file failed.
    #[error("campground store I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// The backing file does not hold a campground collection.
    #[error("campground store is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
}

impl From<StoreError> for Fault {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Invalid(violations) => violations.into(),
            other => {
                tracing::error!(error = %other, "store operation failed");
                Fault::internal(other.to_string())
            }
        }
    }
}

/// Port for campground persistence.
#[async_trait]
pub trait CampgroundStore: Send + Sync {
    /// Every campground, in insertion order.
    async fn find_all(&self) -> Result<Vec<Campground>, StoreError>;

    async fn find_by_id(&self, id: CampgroundId) -> Result<Option<Campground>, StoreError>;

    /// Validates `draft`, assigns it a fresh id and stores it.
    async fn insert(&self, draft: CampgroundDraft) -> Result<Campground, StoreError>;

    /// Validates `draft` and replaces the fields of `id` in place. `None` when
    /// no such campground exists.
    async fn update(
        &self,
        id: CampgroundId,
        draft: CampgroundDraft,
    ) -> Result<Option<Campground>, StoreError>;

    /// Removes `id`, returning what was removed. Removing an absent id is not
    /// an error.
    async fn remove(&self, id: CampgroundId) -> Result<Option<Campground>, StoreError>;
}
