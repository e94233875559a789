//! Locale resolution
//!
//! Maps a requested locale onto the code the catalog API understands.
//! Unrecognized input falls back to English; that fallback is a documented
//! policy, not a silent default — the `fallback` flag tells callers it
//! happened.

use std::collections::HashMap;

use once_cell::sync::Lazy;

pub const FALLBACK_LOCALE: &str = "en";

// Requested locale -> catalog code. The catalog recognizes these 1:1.
static LOCALES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("en", "en"),
        ("fr", "fr"),
        ("es", "es"),
        ("it", "it"),
        ("pt", "pt"),
        ("pt-br", "pt-br"),
        ("pt-pt", "pt-pt"),
        ("de", "de"),
        ("nl", "nl"),
        ("pl", "pl"),
        ("ru", "ru"),
        ("ja", "ja"),
        ("ko", "ko"),
        ("zh-tw", "zh-tw"),
        ("zh-cn", "zh-cn"),
        ("id", "id"),
        ("th", "th"),
    ])
});

/// A catalog locale code plus whether the English fallback kicked in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedLocale {
    pub code: &'static str,
    pub fallback: bool,
}

impl ResolvedLocale {
    pub fn as_str(&self) -> &'static str {
        self.code
    }
}

/// Resolve a requested locale. Matching is case-insensitive and accepts
/// `_` as a separator (e.g. "pt_BR").
pub fn resolve(requested: &str) -> ResolvedLocale {
    let key = requested.trim().to_ascii_lowercase().replace('_', "-");
    match LOCALES.get(key.as_str()).copied() {
        Some(code) => ResolvedLocale {
            code,
            fallback: false,
        },
        None => {
            tracing::debug!("locale {:?} not recognized, falling back to en", requested);
            ResolvedLocale {
                code: FALLBACK_LOCALE,
                fallback: true,
            }
        }
    }
}
