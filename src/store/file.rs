//! JSON-file campground collection.
//!
//! The whole collection lives in one file as a JSON array of documents:
//!
//! ```json
//! [{"_id": "67e5…", "title": "Pine Ridge", "price": 25, "description": "quiet", "location": "CO"}]
//! ```
//!
//! The file is read once on open and rewritten after every mutation, via a
//! sibling temp file and a rename so a crash never leaves half a collection
//! behind. A mutation whose write fails is rolled back in memory.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tokio::sync::Mutex;
use tracing::{debug, info};

use super::memory::Collection;
use super::{CampgroundStore, StoreError};
use crate::campground::{Campground, CampgroundDraft, CampgroundId};

/// [`CampgroundStore`] persisted to a single JSON file.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    collection: Mutex<Collection>,
}

impl FileStore {
    /// Opens the collection at `path`. A missing file is an empty collection;
    /// it is created on the first write.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let docs: Vec<Campground> = match fs::read(&path).await {
            Ok(bytes) => serde_json::from_slice(&bytes)?,
            Err(e) if e.kind() == ErrorKind::NotFound => Vec::new(),
            Err(e) => return Err(e.into()),
        };
        info!(path = %path.display(), campgrounds = docs.len(), "campground store opened");
        Ok(Self { path, collection: Mutex::new(Collection::from_docs(docs)) })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Applies `change` to a copy of the collection, persists the copy, and
    /// only then makes it current.
    async fn mutate<T>(
        &self,
        change: impl FnOnce(&mut Collection) -> Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        let mut current = self.collection.lock().await;
        let mut next = current.clone();
        let out = change(&mut next)?;
        self.persist(&next).await?;
        *current = next;
        Ok(out)
    }

    async fn persist(&self, collection: &Collection) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec_pretty(collection.docs())?;
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, &bytes).await?;
        fs::rename(&tmp, &self.path).await?;
        debug!(path = %self.path.display(), bytes = bytes.len(), "campground store written");
        Ok(())
    }
}

#[async_trait]
impl CampgroundStore for FileStore {
    async fn find_all(&self) -> Result<Vec<Campground>, StoreError> {
        Ok(self.collection.lock().await.docs().to_vec())
    }

    async fn find_by_id(&self, id: CampgroundId) -> Result<Option<Campground>, StoreError> {
        Ok(self.collection.lock().await.get(id).cloned())
    }

    async fn insert(&self, draft: CampgroundDraft) -> Result<Campground, StoreError> {
        self.mutate(|c| c.insert(draft)).await
    }

    async fn update(
        &self,
        id: CampgroundId,
        draft: CampgroundDraft,
    ) -> Result<Option<Campground>, StoreError> {
        self.mutate(|c| c.update(id, draft)).await
    }

    async fn remove(&self, id: CampgroundId) -> Result<Option<Campground>, StoreError> {
        self.mutate(|c| Ok(c.remove(id))).await
    }
}
