//! Diff broadcasting
//!
//! Computes the minimal delta a mutation produced and hands it to the
//! push-delivery collaborator. Delivery is fire-and-forget, at-least-once,
//! and dispatched only after the mutation's state is committed — a slow or
//! failed subscriber can never stall or fail a collection update.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::domain::PushDelivery;
use crate::models::collection::CollectionEntry;

/// Minimal delta describing how a mutation changed one entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryDiff {
    pub card_id: String,
    pub quantity_delta: i64,
    pub tradable_delta: i64,
    pub removed: bool,
}

impl EntryDiff {
    pub fn is_noop(&self) -> bool {
        self.quantity_delta == 0 && self.tradable_delta == 0 && !self.removed
    }
}

/// Compute the delta between the entry before and after a mutation.
/// `None` stands for "absent from the entry map".
pub fn entry_diff(
    card_id: &str,
    before: Option<&CollectionEntry>,
    after: Option<&CollectionEntry>,
) -> EntryDiff {
    let (before_qty, before_tradable) = before
        .map(|e| (i64::from(e.quantity), i64::from(e.tradable_quantity)))
        .unwrap_or((0, 0));
    let (after_qty, after_tradable) = after
        .map(|e| (i64::from(e.quantity), i64::from(e.tradable_quantity)))
        .unwrap_or((0, 0));

    EntryDiff {
        card_id: card_id.to_string(),
        quantity_delta: after_qty - before_qty,
        tradable_delta: after_tradable - before_tradable,
        removed: before.is_some() && after.is_none(),
    }
}

pub struct DiffBroadcaster {
    delivery: Arc<dyn PushDelivery>,
}

impl DiffBroadcaster {
    pub fn new(delivery: Arc<dyn PushDelivery>) -> Self {
        Self { delivery }
    }

    /// Publish a diff to all subscribers of the collection's channel.
    /// Runs detached; failures are logged and never propagate to the
    /// mutation that produced the diff.
    pub fn publish(&self, collection_id: &str, diff: &EntryDiff) {
        if diff.is_noop() {
            return;
        }

        let payload = match serde_json::to_value(diff) {
            Ok(v) => v,
            Err(e) => {
                tracing::error!("failed to serialize diff for {}: {}", collection_id, e);
                return;
            }
        };

        let delivery = Arc::clone(&self.delivery);
        let channel = collection_id.to_string();
        tokio::spawn(async move {
            if let Err(e) = delivery.publish(&channel, payload).await {
                tracing::warn!("diff delivery failed for {}: {}", channel, e);
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(quantity: u32, tradable: u32) -> CollectionEntry {
        CollectionEntry {
            card_id: "sv01-025".to_string(),
            quantity,
            tradable_quantity: tradable,
        }
    }

    #[test]
    fn diff_for_created_entry() {
        let after = entry(3, 0);
        let diff = entry_diff("sv01-025", None, Some(&after));
        assert_eq!(diff.quantity_delta, 3);
        assert_eq!(diff.tradable_delta, 0);
        assert!(!diff.removed);
    }

    #[test]
    fn diff_for_removed_entry() {
        let before = entry(2, 1);
        let diff = entry_diff("sv01-025", Some(&before), None);
        assert_eq!(diff.quantity_delta, -2);
        assert_eq!(diff.tradable_delta, -1);
        assert!(diff.removed);
    }

    #[test]
    fn diff_for_tradable_change_only() {
        let before = entry(4, 1);
        let after = entry(4, 3);
        let diff = entry_diff("sv01-025", Some(&before), Some(&after));
        assert_eq!(diff.quantity_delta, 0);
        assert_eq!(diff.tradable_delta, 2);
        assert!(!diff.removed);
        assert!(!diff.is_noop());
    }

    #[test]
    fn unchanged_entry_is_noop() {
        let before = entry(4, 1);
        let diff = entry_diff("sv01-025", Some(&before), Some(&before.clone()));
        assert!(diff.is_noop());
    }
}
