//! Collection aggregate
//!
//! A collection maps card ids to owned quantities. `cards_count` is derived
//! and recomputed on every mutation; it is never settable from outside, so
//! it cannot drift from the entries.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// One owned card. `card_id` is a reference into the shared catalog, not
/// ownership of card data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionEntry {
    pub card_id: String,
    pub quantity: u32,
    pub tradable_quantity: u32,
}

impl CollectionEntry {
    pub fn new(card_id: &str) -> Self {
        Self {
            card_id: card_id.to_string(),
            quantity: 0,
            tradable_quantity: 0,
        }
    }

    /// Invariant check: 0 <= tradable_quantity <= quantity.
    pub fn is_consistent(&self) -> bool {
        self.tradable_quantity <= self.quantity
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collection {
    pub id: String, // UUID
    pub owner_id: String,
    pub name: String,
    /// Sparse map: entries are deleted (not zeroed) when quantity hits 0
    pub entries: HashMap<String, CollectionEntry>,
    /// Derived: sum of quantities over all entries
    pub cards_count: u32,
    /// Optimistic-concurrency revision, bumped by the store on save
    #[serde(default)]
    pub revision: u64,
    pub created_at: String,
    pub updated_at: String,
}

impl Collection {
    pub fn new(owner_id: &str, name: &str) -> Self {
        let now = chrono::Utc::now().to_rfc3339();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            owner_id: owner_id.to_string(),
            name: name.to_string(),
            entries: HashMap::new(),
            cards_count: 0,
            revision: 0,
            created_at: now.clone(),
            updated_at: now,
        }
    }

    /// A collection with a caller-chosen id, used when the first `acquire`
    /// brings the collection into existence.
    pub fn with_id(id: &str, owner_id: &str) -> Self {
        let mut collection = Self::new(owner_id, id);
        collection.id = id.to_string();
        collection
    }

    pub fn entry(&self, card_id: &str) -> Option<&CollectionEntry> {
        self.entries.get(card_id)
    }

    pub fn recompute_cards_count(&mut self) {
        self.cards_count = self.entries.values().map(|e| e.quantity).sum();
    }

    pub fn touch(&mut self) {
        self.updated_at = chrono::Utc::now().to_rfc3339();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cards_count_is_sum_of_quantities() {
        let mut collection = Collection::new("user-1", "Binder");
        collection.entries.insert(
            "a".to_string(),
            CollectionEntry {
                card_id: "a".to_string(),
                quantity: 3,
                tradable_quantity: 1,
            },
        );
        collection.entries.insert(
            "b".to_string(),
            CollectionEntry {
                card_id: "b".to_string(),
                quantity: 2,
                tradable_quantity: 0,
            },
        );

        collection.recompute_cards_count();
        assert_eq!(collection.cards_count, 5);

        collection.entries.remove("a");
        collection.recompute_cards_count();
        assert_eq!(collection.cards_count, 2);
    }

    #[test]
    fn entry_consistency() {
        let mut entry = CollectionEntry::new("a");
        entry.quantity = 2;
        entry.tradable_quantity = 2;
        assert!(entry.is_consistent());
        entry.tradable_quantity = 3;
        assert!(!entry.is_consistent());
    }
}
