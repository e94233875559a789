//! In-memory collection store
//!
//! Revision-checked snapshots: `save` fails with `Conflict` when the stored
//! revision no longer matches the snapshot's, which models optimistic
//! concurrency the same way a document store's compare-and-set would.

use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

use crate::domain::{CollectionStore, DomainError};
use crate::models::collection::Collection;

#[derive(Default)]
pub struct MemoryCollectionStore {
    collections: DashMap<String, Collection>,
}

impl MemoryCollectionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CollectionStore for MemoryCollectionStore {
    async fn load(&self, collection_id: &str) -> Result<Option<Collection>, DomainError> {
        Ok(self.collections.get(collection_id).map(|c| c.clone()))
    }

    async fn save(&self, collection: &Collection) -> Result<(), DomainError> {
        match self.collections.entry(collection.id.clone()) {
            Entry::Occupied(mut occupied) => {
                if occupied.get().revision != collection.revision {
                    return Err(DomainError::Conflict);
                }
                let mut stored = collection.clone();
                stored.revision += 1;
                occupied.insert(stored);
            }
            Entry::Vacant(vacant) => {
                let mut stored = collection.clone();
                stored.revision += 1;
                vacant.insert(stored);
            }
        }
        Ok(())
    }
}
