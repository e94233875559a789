//! Shared test fixtures: a stub catalog source with a handful of known
//! cards and a fully wired service over in-memory collaborators.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use cardbinder::catalog::{RawCard, RawCardCount, RawSeries, RawSet, RawSetRef};
use cardbinder::config::ReleasePolicy;
use cardbinder::domain::{CatalogSource, CollectionStore, DomainError, PushDelivery};
use cardbinder::infrastructure::{ChannelDelivery, MemoryCollectionStore};
use cardbinder::{CardCatalog, CollectionService};

pub struct StubCatalogSource {
    cards: HashMap<String, RawCard>,
    sets: HashMap<String, RawSet>,
}

impl StubCatalogSource {
    pub fn with_standard_cards() -> Self {
        let mut cards = HashMap::new();

        cards.insert(
            "pikachu-025".to_string(),
            RawCard {
                id: Some("pikachu-025".to_string()),
                local_id: Some("025".to_string()),
                name: Some("Pikachu".to_string()),
                category: Some("Pokemon".to_string()),
                set: Some(set_ref("sv01")),
                stage: Some("Basic".to_string()),
                hp: Some(60),
                types: Some(vec!["Lightning".to_string()]),
                ..RawCard::default()
            },
        );
        cards.insert(
            "charmander-004".to_string(),
            RawCard {
                id: Some("charmander-004".to_string()),
                local_id: Some("004".to_string()),
                name: Some("Charmander".to_string()),
                category: Some("Pokemon".to_string()),
                set: Some(set_ref("sv01")),
                stage: Some("Basic".to_string()),
                hp: Some(70),
                types: Some(vec!["Fire".to_string()]),
                ..RawCard::default()
            },
        );
        cards.insert(
            "potion-181".to_string(),
            RawCard {
                id: Some("potion-181".to_string()),
                local_id: Some("181".to_string()),
                name: Some("Potion".to_string()),
                category: Some("Trainer".to_string()),
                set: Some(set_ref("svp")),
                trainer_type: Some("Item".to_string()),
                effect: Some("Heal 30 damage from 1 of your Pokémon.".to_string()),
                ..RawCard::default()
            },
        );
        // Data-quality problem on purpose: trainer without effect text
        cards.insert(
            "mesagoza-166".to_string(),
            RawCard {
                id: Some("mesagoza-166".to_string()),
                local_id: Some("166".to_string()),
                name: Some("Mesagoza".to_string()),
                category: Some("Trainer".to_string()),
                set: Some(set_ref("sv01")),
                trainer_type: Some("Stadium".to_string()),
                ..RawCard::default()
            },
        );

        let mut sets = HashMap::new();
        sets.insert(
            "sv01".to_string(),
            RawSet {
                id: Some("sv01".to_string()),
                name: Some("Scarlet & Violet".to_string()),
                logo: None,
                card_count: Some(RawCardCount {
                    total: Some(3),
                    official: Some(3),
                }),
            },
        );

        Self { cards, sets }
    }
}

fn set_ref(id: &str) -> RawSetRef {
    RawSetRef {
        id: Some(id.to_string()),
        name: None,
    }
}

#[async_trait]
impl CatalogSource for StubCatalogSource {
    async fn fetch_card(
        &self,
        id: &str,
        _locale_code: &str,
    ) -> Result<Option<RawCard>, DomainError> {
        Ok(self.cards.get(id).cloned())
    }

    async fn fetch_set(&self, id: &str) -> Result<RawSet, DomainError> {
        self.sets
            .get(id)
            .cloned()
            .ok_or_else(|| DomainError::External(format!("catalog has no set '{}'", id)))
    }

    async fn fetch_series(&self, _id: &str) -> Result<RawSeries, DomainError> {
        Err(DomainError::External("series not wired in stub".to_string()))
    }
}

pub struct TestHarness {
    pub service: Arc<CollectionService>,
    pub delivery: Arc<ChannelDelivery>,
    pub store: Arc<MemoryCollectionStore>,
}

/// Install the test subscriber once per binary; `RUST_LOG` filters as usual.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn harness(policy: ReleasePolicy) -> TestHarness {
    let store = Arc::new(MemoryCollectionStore::new());
    harness_with_store(policy, Arc::clone(&store) as Arc<dyn CollectionStore>, store)
}

pub fn harness_with_store(
    policy: ReleasePolicy,
    store: Arc<dyn CollectionStore>,
    memory: Arc<MemoryCollectionStore>,
) -> TestHarness {
    init_tracing();
    let source = Arc::new(StubCatalogSource::with_standard_cards());
    let catalog = Arc::new(CardCatalog::new(source, "https://assets.example.net"));
    let delivery = Arc::new(ChannelDelivery::new());

    let service = CollectionService::new(
        store,
        catalog,
        Arc::clone(&delivery) as Arc<dyn PushDelivery>,
        policy,
        "en",
    );

    TestHarness {
        service: Arc::new(service),
        delivery,
        store: memory,
    }
}
