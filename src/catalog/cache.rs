//! Read-through cache of normalized catalog data
//!
//! Cards, sets and series are fetched once per (id, locale) and reused.
//! Concurrent fetches for the same key may race to populate an entry; the
//! last writer wins, which is harmless because normalization is idempotent
//! and the results are structurally equal. No lock on the read path.

use std::sync::Arc;

use dashmap::DashMap;

use crate::catalog::adapter::CatalogAdapter;
use crate::catalog::language::ResolvedLocale;
use crate::domain::{CatalogSource, DomainError};
use crate::models::card::Card;
use crate::models::set::{CardSet, Series};

pub struct CardCatalog {
    source: Arc<dyn CatalogSource>,
    adapter: CatalogAdapter,
    cards: DashMap<(String, String), Arc<Card>>,
    sets: DashMap<String, Arc<CardSet>>,
    series: DashMap<String, Arc<Series>>,
}

impl CardCatalog {
    pub fn new(source: Arc<dyn CatalogSource>, asset_base_url: impl Into<String>) -> Self {
        Self {
            source,
            adapter: CatalogAdapter::new(asset_base_url),
            cards: DashMap::new(),
            sets: DashMap::new(),
            series: DashMap::new(),
        }
    }

    pub fn adapter(&self) -> &CatalogAdapter {
        &self.adapter
    }

    /// Get the canonical card for (id, locale), fetching and normalizing on
    /// first use. Fails with `CardNotFound` when the catalog has no such id.
    pub async fn ensure_card(
        &self,
        id: &str,
        locale: &ResolvedLocale,
    ) -> Result<Arc<Card>, DomainError> {
        let key = (id.to_string(), locale.code.to_string());
        if let Some(card) = self.cards.get(&key) {
            return Ok(Arc::clone(&card));
        }

        let raw = self
            .source
            .fetch_card(id, locale.code)
            .await?
            .ok_or_else(|| DomainError::CardNotFound(id.to_string()))?;
        let card = Arc::new(self.adapter.normalize(&raw, locale)?);

        tracing::debug!("catalog cache filled: card {} ({})", id, locale.code);
        self.cards.insert(key, Arc::clone(&card));
        Ok(card)
    }

    /// Cache lookup without triggering a fetch.
    pub fn peek_card(&self, id: &str, locale: &ResolvedLocale) -> Option<Arc<Card>> {
        self.cards
            .get(&(id.to_string(), locale.code.to_string()))
            .map(|c| Arc::clone(&c))
    }

    pub async fn ensure_set(&self, id: &str) -> Result<Arc<CardSet>, DomainError> {
        if let Some(set) = self.sets.get(id) {
            return Ok(Arc::clone(&set));
        }

        let raw = self.source.fetch_set(id).await?;
        let set = Arc::new(self.adapter.normalize_set(&raw)?);

        tracing::debug!("catalog cache filled: set {}", id);
        self.sets.insert(id.to_string(), Arc::clone(&set));
        Ok(set)
    }

    pub async fn ensure_series(&self, id: &str) -> Result<Arc<Series>, DomainError> {
        if let Some(series) = self.series.get(id) {
            return Ok(Arc::clone(&series));
        }

        let raw = self.source.fetch_series(id).await?;
        let series = Arc::new(self.adapter.normalize_series(&raw)?);

        tracing::debug!("catalog cache filled: series {}", id);
        self.series.insert(id.to_string(), Arc::clone(&series));
        Ok(series)
    }
}
