//! External collaborator contracts
//!
//! The engine depends only on these narrow traits, never on a specific
//! transport or store. Implementations live in the infrastructure layer
//! (and `tcgdex` for the real catalog client).

use async_trait::async_trait;

use super::DomainError;
use crate::catalog::{RawCard, RawSeries, RawSet};
use crate::models::collection::Collection;

/// Read-only source of card/set/series reference data.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Fetch one raw card record. `Ok(None)` means the catalog has no such id.
    async fn fetch_card(
        &self,
        id: &str,
        locale_code: &str,
    ) -> Result<Option<RawCard>, DomainError>;

    /// Fetch one raw set record.
    async fn fetch_set(&self, id: &str) -> Result<RawSet, DomainError>;

    /// Fetch one raw series record (sets in brief form).
    async fn fetch_series(&self, id: &str) -> Result<RawSeries, DomainError>;
}

/// Durable store of collection snapshots, keyed by collection id.
#[async_trait]
pub trait CollectionStore: Send + Sync {
    async fn load(&self, collection_id: &str) -> Result<Option<Collection>, DomainError>;

    /// Persist a snapshot. Fails with [`DomainError::Conflict`] when the
    /// stored revision no longer matches the snapshot's (a writer outside
    /// the aggregator's own serialization got there first).
    async fn save(&self, collection: &Collection) -> Result<(), DomainError>;
}

/// Fire-and-forget push channel towards collection subscribers.
#[async_trait]
pub trait PushDelivery: Send + Sync {
    async fn publish(&self, channel: &str, payload: serde_json::Value)
    -> Result<(), DomainError>;
}
