//! In-memory campground collection.

use async_trait::async_trait;
use serde_json::{Map, Value};
use tokio::sync::RwLock;

use super::{CampgroundStore, StoreError};
use crate::campground::{Campground, CampgroundDraft, CampgroundId};
use crate::schema::CAMPGROUND;

/// An ordered collection of campground documents.
///
/// Holds the write rules shared by every adapter; adapters add locking and,
/// for [`FileStore`](super::FileStore), durability.
#[derive(Clone, Debug, Default)]
pub(crate) struct Collection {
    docs: Vec<Campground>,
}

impl Collection {
    pub(crate) fn from_docs(docs: Vec<Campground>) -> Self {
        Self { docs }
    }

    pub(crate) fn docs(&self) -> &[Campground] {
        &self.docs
    }

    pub(crate) fn get(&self, id: CampgroundId) -> Option<&Campground> {
        self.docs.iter().find(|c| c.id == id)
    }

    pub(crate) fn insert(&mut self, draft: CampgroundDraft) -> Result<Campground, StoreError> {
        revalidate(&draft)?;
        let camp = Campground::from_draft(CampgroundId::generate(), draft);
        self.docs.push(camp.clone());
        Ok(camp)
    }

    pub(crate) fn update(
        &mut self,
        id: CampgroundId,
        draft: CampgroundDraft,
    ) -> Result<Option<Campground>, StoreError> {
        revalidate(&draft)?;
        let Some(slot) = self.docs.iter_mut().find(|c| c.id == id) else {
            return Ok(None);
        };
        *slot = Campground::from_draft(id, draft);
        Ok(Some(slot.clone()))
    }

    pub(crate) fn remove(&mut self, id: CampgroundId) -> Option<Campground> {
        let index = self.docs.iter().position(|c| c.id == id)?;
        Some(self.docs.remove(index))
    }
}

/// Checks a draft against the campground schema the same way the request
/// guard does.
fn revalidate(draft: &CampgroundDraft) -> Result<(), StoreError> {
    let mut payload = Map::new();
    payload.insert(CAMPGROUND.root().to_owned(), serde_json::to_value(draft)?);
    CAMPGROUND.validate(&Value::Object(payload))?;
    Ok(())
}

/// Process-local [`CampgroundStore`].
#[derive(Debug, Default)]
pub struct MemoryStore {
    collection: RwLock<Collection>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CampgroundStore for MemoryStore {
    async fn find_all(&self) -> Result<Vec<Campground>, StoreError> {
        Ok(self.collection.read().await.docs().to_vec())
    }

    async fn find_by_id(&self, id: CampgroundId) -> Result<Option<Campground>, StoreError> {
        Ok(self.collection.read().await.get(id).cloned())
    }

    async fn insert(&self, draft: CampgroundDraft) -> Result<Campground, StoreError> {
        self.collection.write().await.insert(draft)
    }

    async fn update(
        &self,
        id: CampgroundId,
        draft: CampgroundDraft,
    ) -> Result<Option<Campground>, StoreError> {
        self.collection.write().await.update(id, draft)
    }

    async fn remove(&self, id: CampgroundId) -> Result<Option<Campground>, StoreError> {
        Ok(self.collection.write().await.remove(id))
    }
}
