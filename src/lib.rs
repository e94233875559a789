//! cardbinder - catalog normalization & collection aggregation engine
//!
//! Tracks a user's trading-card collection against an external,
//! multi-language card catalog: normalizes heterogeneous catalog records
//! into one canonical card model, maintains per-collection aggregates, and
//! broadcasts minimal diffs to subscribers on every mutation. Transport,
//! persistence and push delivery are injected collaborators.

pub mod catalog;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod models;
pub mod services;
pub mod tcgdex;

pub use catalog::{CardCatalog, ResolvedLocale, resolve_image_url, resolve_locale};
pub use config::{Config, ReleasePolicy};
pub use domain::{CatalogSource, CollectionStore, DomainError, PushDelivery};
pub use models::{Card, CardKind, Collection, CollectionEntry};
pub use services::{CollectionService, EntryDiff, MutationOutcome, SetCompletion};
pub use tcgdex::TcgdexClient;
