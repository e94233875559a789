//! Collection Service - mutation engine for per-user collections
//!
//! Owns the collection state machine: acquire/release/set_tradable plus the
//! derived aggregates. Mutations on one collection are serialized through a
//! per-id mutex, so concurrent calls against the same collection observe a
//! total order; different collections proceed fully in parallel. There is
//! no global lock and no cross-collection transaction.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use dashmap::DashMap;
use serde::Serialize;
use tokio::sync::Mutex;

use crate::catalog::cache::CardCatalog;
use crate::catalog::language::{self, ResolvedLocale};
use crate::config::{Config, ReleasePolicy};
use crate::domain::{CollectionStore, DomainError, PushDelivery};
use crate::tcgdex::TcgdexClient;
use crate::models::collection::{Collection, CollectionEntry};
use crate::services::broadcast::{DiffBroadcaster, entry_diff};

/// Result of a successful mutation: the post-mutation entry snapshot and the
/// recomputed collection total. `entry.quantity == 0` means the entry was
/// deleted from the map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MutationOutcome {
    pub entry: CollectionEntry,
    pub cards_count: u32,
}

/// Set-completion aggregate for one collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SetCompletion {
    pub set_id: String,
    /// Distinct owned cards belonging to the set
    pub owned: u32,
    pub total: u32,
}

/// Bounded per-collection window of idempotency tokens and their outcomes.
struct ReplayWindow {
    order: VecDeque<String>,
    outcomes: HashMap<String, MutationOutcome>,
}

impl ReplayWindow {
    fn new() -> Self {
        Self {
            order: VecDeque::new(),
            outcomes: HashMap::new(),
        }
    }

    fn get(&self, token: &str) -> Option<MutationOutcome> {
        self.outcomes.get(token).cloned()
    }

    fn remember(&mut self, token: &str, outcome: MutationOutcome, capacity: usize) {
        if self.outcomes.contains_key(token) {
            return;
        }
        while self.order.len() >= capacity {
            if let Some(evicted) = self.order.pop_front() {
                self.outcomes.remove(&evicted);
            }
        }
        self.order.push_back(token.to_string());
        self.outcomes.insert(token.to_string(), outcome);
    }
}

pub struct CollectionService {
    store: Arc<dyn CollectionStore>,
    catalog: Arc<CardCatalog>,
    broadcaster: DiffBroadcaster,
    policy: ReleasePolicy,
    default_locale: ResolvedLocale,
    locks: DashMap<String, Arc<Mutex<()>>>,
    replays: DashMap<String, ReplayWindow>,
    replay_capacity: usize,
}

impl CollectionService {
    pub fn new(
        store: Arc<dyn CollectionStore>,
        catalog: Arc<CardCatalog>,
        delivery: Arc<dyn PushDelivery>,
        policy: ReleasePolicy,
        default_locale: &str,
    ) -> Self {
        Self {
            store,
            catalog,
            broadcaster: DiffBroadcaster::new(delivery),
            policy,
            default_locale: language::resolve(default_locale),
            locks: DashMap::new(),
            replays: DashMap::new(),
            replay_capacity: 128,
        }
    }

    pub fn with_replay_capacity(mut self, capacity: usize) -> Self {
        self.replay_capacity = capacity.max(1);
        self
    }

    /// Assemble a service over the real catalog client, with every knob
    /// taken from configuration.
    pub fn from_config(
        config: &Config,
        store: Arc<dyn CollectionStore>,
        delivery: Arc<dyn PushDelivery>,
    ) -> Result<Self, DomainError> {
        let catalog = Arc::new(CardCatalog::new(
            Arc::new(TcgdexClient::new(config.catalog_base_url.clone())?),
            config.asset_base_url.clone(),
        ));

        Ok(Self::new(
            store,
            catalog,
            delivery,
            config.release_policy,
            &config.default_locale,
        )
        .with_replay_capacity(config.idempotency_window))
    }

    /// Start a fresh collection for a user.
    pub async fn create_collection(
        &self,
        owner_id: &str,
        name: &str,
    ) -> Result<Collection, DomainError> {
        let collection = Collection::new(owner_id, name);
        self.store.save(&collection).await?;
        tracing::info!("created collection {} for {}", collection.id, owner_id);
        Ok(collection)
    }

    pub async fn get_collection(
        &self,
        collection_id: &str,
    ) -> Result<Option<Collection>, DomainError> {
        self.store.load(collection_id).await
    }

    /// Add `delta` copies of a card. An unseen card is fetched and
    /// normalized through the catalog first, so the mutation fails with
    /// `CardNotFound` before any state is touched.
    pub async fn acquire(
        &self,
        collection_id: &str,
        card_id: &str,
        delta: u32,
        token: Option<&str>,
    ) -> Result<MutationOutcome, DomainError> {
        if delta == 0 {
            return Err(DomainError::Validation(
                "acquire delta must be positive".to_string(),
            ));
        }

        let lock = self.lock_for(collection_id);
        let _guard = lock.lock().await;

        if let Some(previous) = self.replayed(collection_id, token) {
            tracing::debug!("acquire replay on {}: returning stored outcome", collection_id);
            return Ok(previous);
        }

        self.catalog
            .ensure_card(card_id, &self.default_locale)
            .await?;

        tracing::info!("acquire {}x{} on {}", delta, card_id, collection_id);
        let outcome = self
            .apply(collection_id, card_id, |before| {
                let mut entry = before.cloned().unwrap_or_else(|| CollectionEntry::new(card_id));
                entry.quantity = entry.quantity.checked_add(delta).ok_or_else(|| {
                    DomainError::Validation("quantity overflow".to_string())
                })?;
                Ok(entry)
            })
            .await?;

        self.remember(collection_id, token, &outcome);
        Ok(outcome)
    }

    /// Remove up to `delta` copies of a card. Strict policy rejects an
    /// underflow with `InsufficientQuantity`; clamp policy floors at zero.
    /// The entry is deleted when the quantity reaches zero, and the tradable
    /// quantity is clamped down to the new quantity.
    pub async fn release(
        &self,
        collection_id: &str,
        card_id: &str,
        delta: u32,
        token: Option<&str>,
    ) -> Result<MutationOutcome, DomainError> {
        if delta == 0 {
            return Err(DomainError::Validation(
                "release delta must be positive".to_string(),
            ));
        }

        let lock = self.lock_for(collection_id);
        let _guard = lock.lock().await;

        if let Some(previous) = self.replayed(collection_id, token) {
            tracing::debug!("release replay on {}: returning stored outcome", collection_id);
            return Ok(previous);
        }

        let policy = self.policy;
        tracing::info!("release {}x{} on {} ({:?})", delta, card_id, collection_id, policy);
        let outcome = self
            .apply(collection_id, card_id, |before| {
                let mut entry = before.cloned().unwrap_or_else(|| CollectionEntry::new(card_id));
                if policy == ReleasePolicy::Strict && delta > entry.quantity {
                    return Err(DomainError::InsufficientQuantity {
                        requested: delta,
                        available: entry.quantity,
                    });
                }
                entry.quantity = entry.quantity.saturating_sub(delta);
                entry.tradable_quantity = entry.tradable_quantity.min(entry.quantity);
                Ok(entry)
            })
            .await?;

        self.remember(collection_id, token, &outcome);
        Ok(outcome)
    }

    /// Adjust the tradable quantity by `tradable_delta` (may be negative),
    /// clamped to `[0, quantity]`. Fails with `UnknownCard` when the
    /// collection has no entry for the card.
    pub async fn set_tradable(
        &self,
        collection_id: &str,
        card_id: &str,
        tradable_delta: i64,
        token: Option<&str>,
    ) -> Result<MutationOutcome, DomainError> {
        let lock = self.lock_for(collection_id);
        let _guard = lock.lock().await;

        if let Some(previous) = self.replayed(collection_id, token) {
            tracing::debug!(
                "set_tradable replay on {}: returning stored outcome",
                collection_id
            );
            return Ok(previous);
        }

        tracing::info!(
            "set_tradable {:+} on {} of {}",
            tradable_delta,
            card_id,
            collection_id
        );
        let outcome = self
            .apply(collection_id, card_id, |before| {
                let mut entry = before
                    .cloned()
                    .ok_or_else(|| DomainError::UnknownCard(card_id.to_string()))?;
                let tradable = (i64::from(entry.tradable_quantity) + tradable_delta)
                    .clamp(0, i64::from(entry.quantity));
                entry.tradable_quantity = tradable as u32;
                Ok(entry)
            })
            .await?;

        self.remember(collection_id, token, &outcome);
        Ok(outcome)
    }

    /// How many distinct cards of a set the collection owns, against the
    /// set's total. An absent collection counts as empty.
    pub async fn set_completion(
        &self,
        collection_id: &str,
        set_id: &str,
    ) -> Result<SetCompletion, DomainError> {
        let set = self.catalog.ensure_set(set_id).await?;

        let mut owned = 0u32;
        if let Some(collection) = self.store.load(collection_id).await? {
            for card_id in collection.entries.keys() {
                let card = self
                    .catalog
                    .ensure_card(card_id, &self.default_locale)
                    .await?;
                if card.set_id() == set_id {
                    owned += 1;
                }
            }
        }

        Ok(SetCompletion {
            set_id: set_id.to_string(),
            owned,
            total: set.total_cards,
        })
    }

    // ---- internals -------------------------------------------------------

    fn lock_for(&self, collection_id: &str) -> Arc<Mutex<()>> {
        self.locks
            .entry(collection_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    fn replayed(&self, collection_id: &str, token: Option<&str>) -> Option<MutationOutcome> {
        let token = token?;
        self.replays.get(collection_id)?.get(token)
    }

    fn remember(&self, collection_id: &str, token: Option<&str>, outcome: &MutationOutcome) {
        let Some(token) = token else { return };
        self.replays
            .entry(collection_id.to_string())
            .or_insert_with(ReplayWindow::new)
            .remember(token, outcome.clone(), self.replay_capacity);
    }

    /// Load-mutate-save with one internal retry on save conflict. Conflicts
    /// inside our own serialization are impossible; a conflict means an
    /// external writer (e.g. an administrative edit) got between load and
    /// save, so reloading and reapplying once is the documented recovery.
    async fn apply<F>(
        &self,
        collection_id: &str,
        card_id: &str,
        mutate: F,
    ) -> Result<MutationOutcome, DomainError>
    where
        F: Fn(Option<&CollectionEntry>) -> Result<CollectionEntry, DomainError>,
    {
        match self.apply_once(collection_id, card_id, &mutate).await {
            Err(DomainError::Conflict) => {
                tracing::warn!("save conflict on {}, reloading and retrying once", collection_id);
                self.apply_once(collection_id, card_id, &mutate).await
            }
            other => other,
        }
    }

    async fn apply_once<F>(
        &self,
        collection_id: &str,
        card_id: &str,
        mutate: &F,
    ) -> Result<MutationOutcome, DomainError>
    where
        F: Fn(Option<&CollectionEntry>) -> Result<CollectionEntry, DomainError>,
    {
        let mut collection = match self.store.load(collection_id).await? {
            Some(collection) => collection,
            // First acquire brings the collection into existence
            None => Collection::with_id(collection_id, collection_id),
        };

        let before = collection.entries.get(card_id).cloned();
        let after = mutate(before.as_ref())?;

        // A no-op mutation (e.g. clamp-release of an absent entry) must not
        // create a collection, bump its revision or publish a diff
        let unchanged = match before.as_ref() {
            Some(b) => *b == after,
            None => after.quantity == 0,
        };
        if unchanged {
            return Ok(MutationOutcome {
                cards_count: collection.cards_count,
                entry: after,
            });
        }

        if after.quantity == 0 {
            collection.entries.remove(card_id);
        } else {
            collection
                .entries
                .insert(card_id.to_string(), after.clone());
        }
        collection.recompute_cards_count();
        collection.touch();

        self.store.save(&collection).await?;

        let after_ref = if after.quantity == 0 { None } else { Some(&after) };
        let diff = entry_diff(card_id, before.as_ref(), after_ref);
        self.broadcaster.publish(&collection.id, &diff);

        Ok(MutationOutcome {
            entry: after,
            cards_count: collection.cards_count,
        })
    }
}
