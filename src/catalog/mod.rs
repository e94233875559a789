//! Catalog normalization: taxonomy, locale resolution, adapter and cache.

pub mod adapter;
pub mod cache;
pub mod language;
pub mod taxonomy;

pub use adapter::{
    CatalogAdapter, ImageFormat, ImageQuality, RawCard, RawCardCount, RawSeries, RawSet,
    RawSetRef, resolve_image_url,
};
pub use cache::CardCatalog;
pub use language::{FALLBACK_LOCALE, ResolvedLocale, resolve as resolve_locale};
pub use taxonomy::{classify, validate};
