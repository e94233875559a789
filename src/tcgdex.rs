//! TCGdex catalog client
//!
//! HTTP implementation of [`CatalogSource`] against a TCGdex-shaped REST
//! API. All calls here are idempotent reads, so transport failures and 5xx
//! responses are retried with bounded backoff; 4xx responses are not.

use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use crate::catalog::{RawCard, RawSeries, RawSet};
use crate::domain::{CatalogSource, DomainError};

const USER_AGENT: &str = "CardBinder/0.3 (hello@cardbinder.app)";
const FETCH_ATTEMPTS: u32 = 3;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

pub struct TcgdexClient {
    base_url: String,
    client: reqwest::Client,
}

impl TcgdexClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, DomainError> {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }

        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| DomainError::External(format!("failed to build client: {}", e)))?;

        Ok(Self { base_url, client })
    }

    /// GET a JSON resource. `Ok(None)` on 404.
    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<Option<T>, DomainError> {
        let mut last_failure = String::new();

        for attempt in 1..=FETCH_ATTEMPTS {
            match self.client.get(url).send().await {
                Ok(resp) => {
                    let status = resp.status();
                    if status == reqwest::StatusCode::NOT_FOUND {
                        return Ok(None);
                    }
                    if status.is_server_error() {
                        tracing::warn!(
                            "catalog API {} returned {} (attempt {}/{})",
                            url,
                            status,
                            attempt,
                            FETCH_ATTEMPTS
                        );
                        last_failure = format!("status {}", status);
                    } else if !status.is_success() {
                        return Err(DomainError::External(format!(
                            "catalog API returned status {} for {}",
                            status, url
                        )));
                    } else {
                        let body = resp.text().await.map_err(|e| {
                            DomainError::External(format!("failed to read response body: {}", e))
                        })?;
                        let parsed = serde_json::from_str(&body).map_err(|e| {
                            DomainError::MalformedRecord(format!(
                                "unparseable catalog payload: {}",
                                e
                            ))
                        })?;
                        return Ok(Some(parsed));
                    }
                }
                Err(e) => {
                    tracing::warn!(
                        "catalog request to {} failed (attempt {}/{}): {}",
                        url,
                        attempt,
                        FETCH_ATTEMPTS,
                        e
                    );
                    last_failure = e.to_string();
                }
            }

            if attempt < FETCH_ATTEMPTS {
                tokio::time::sleep(Duration::from_millis(200 * u64::from(attempt))).await;
            }
        }

        Err(DomainError::External(format!(
            "catalog unreachable after {} attempts: {}",
            FETCH_ATTEMPTS, last_failure
        )))
    }
}

#[async_trait]
impl CatalogSource for TcgdexClient {
    async fn fetch_card(
        &self,
        id: &str,
        locale_code: &str,
    ) -> Result<Option<RawCard>, DomainError> {
        let url = format!("{}/v2/{}/cards/{}", self.base_url, locale_code, id);
        self.get_json(&url).await
    }

    async fn fetch_set(&self, id: &str) -> Result<RawSet, DomainError> {
        // Set/series reference data is locale-independent on the wire
        let url = format!("{}/v2/en/sets/{}", self.base_url, id);
        self.get_json(&url)
            .await?
            .ok_or_else(|| DomainError::External(format!("catalog has no set '{}'", id)))
    }

    async fn fetch_series(&self, id: &str) -> Result<RawSeries, DomainError> {
        let url = format!("{}/v2/en/series/{}", self.base_url, id);
        self.get_json(&url)
            .await?
            .ok_or_else(|| DomainError::External(format!("catalog has no series '{}'", id)))
    }
}
