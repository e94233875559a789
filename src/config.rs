use std::env;

/// What `release` does when the delta exceeds the owned quantity. A
/// deployment must choose: this type has no `Default` on purpose.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleasePolicy {
    /// Reject with `InsufficientQuantity`
    Strict,
    /// Reduce to zero
    Clamp,
}

impl ReleasePolicy {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "strict" => Some(ReleasePolicy::Strict),
            "clamp" => Some(ReleasePolicy::Clamp),
            _ => None,
        }
    }
}

#[derive(Clone)]
pub struct Config {
    pub catalog_base_url: String,
    pub asset_base_url: String,
    pub default_locale: String,
    pub release_policy: ReleasePolicy,
    pub idempotency_window: usize,
}

impl Config {
    pub fn from_env() -> Self {
        let release_policy = match env::var("RELEASE_POLICY") {
            Ok(raw) => ReleasePolicy::parse(&raw).unwrap_or_else(|| {
                tracing::warn!("unrecognized RELEASE_POLICY {:?}, using strict", raw);
                ReleasePolicy::Strict
            }),
            Err(_) => {
                tracing::warn!("RELEASE_POLICY not set, using strict");
                ReleasePolicy::Strict
            }
        };

        Self {
            catalog_base_url: env::var("CATALOG_BASE_URL")
                .unwrap_or_else(|_| "https://api.tcgdex.net".to_string()),
            asset_base_url: env::var("ASSET_BASE_URL")
                .unwrap_or_else(|_| "https://assets.tcgdex.net".to_string()),
            default_locale: env::var("DEFAULT_LOCALE").unwrap_or_else(|_| "en".to_string()),
            release_policy,
            idempotency_window: env::var("IDEMPOTENCY_WINDOW")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(128),
        }
    }
}
