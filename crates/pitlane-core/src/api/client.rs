//! HTTP implementation of `RaceDataProvider` against the pitlane REST API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header, Client, Url};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::models::{Circuit, Constructor, Driver, Qualifying, Race, RaceResult};

use super::{ApiError, RaceDataProvider};

// ============================================================================
// Constants
// ============================================================================

/// HTTP request timeout in seconds.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Maximum number of retries for rate-limited (429) requests.
const MAX_RATE_LIMIT_RETRIES: u32 = 3;

/// Initial backoff delay in milliseconds for rate limiting.
const INITIAL_BACKOFF_MS: u64 = 1000;

/// Data provider backed by the REST endpoints under `base_url`.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct HttpDataProvider {
    client: Client,
    base_url: Url,
}

impl HttpDataProvider {
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| ApiError::InvalidUrl(format!("{}: {}", base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::InvalidUrl(base_url.to_string()));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    /// Append path segments to the base URL, percent-encoding each one.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Check if response is successful, returning an error with body if not.
    /// Returns Ok(Some(response)) for success, Ok(None) for rate limit (should retry),
    /// or Err for other errors.
    async fn check_response_for_retry(
        response: reqwest::Response,
    ) -> Result<Option<reqwest::Response>, ApiError> {
        if response.status().is_success() {
            Ok(Some(response))
        } else if response.status().as_u16() == 429 {
            Ok(None)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body))
        }
    }

    async fn get<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T, ApiError> {
        let url = self.endpoint(segments)?;
        let mut retries = 0;
        let mut backoff_ms = INITIAL_BACKOFF_MS;

        loop {
            debug!(url = %url, "GET");
            let response = self
                .client
                .get(url.clone())
                .header(header::ACCEPT, "application/json")
                .send()
                .await?;

            match Self::check_response_for_retry(response).await? {
                Some(response) => {
                    let body = response.text().await?;
                    return serde_json::from_str(&body).map_err(|e| {
                        ApiError::InvalidResponse(format!("Failed to parse JSON from {}: {}", url, e))
                    });
                }
                None => {
                    retries += 1;
                    if retries > MAX_RATE_LIMIT_RETRIES {
                        return Err(ApiError::RateLimited);
                    }
                    warn!(url = %url, retry = retries, backoff_ms = backoff_ms, "Rate limited, backing off");
                    tokio::time::sleep(Duration::from_millis(backoff_ms)).await;
                    backoff_ms *= 2;
                }
            }
        }
    }
}

#[async_trait]
impl RaceDataProvider for HttpDataProvider {
    async fn races(&self) -> Result<Vec<Race>, ApiError> {
        self.get(&["races"]).await
    }

    async fn races_for_season(&self, season: i32) -> Result<Vec<Race>, ApiError> {
        self.get(&["races", "season", &season.to_string()]).await
    }

    async fn race_results(&self, race_id: i64) -> Result<Vec<RaceResult>, ApiError> {
        self.get(&["results", "race", &race_id.to_string()]).await
    }

    async fn qualifying(&self, race_id: i64) -> Result<Vec<Qualifying>, ApiError> {
        self.get(&["qualifying", "race", &race_id.to_string()]).await
    }

    async fn driver(&self, reference: &str) -> Result<Driver, ApiError> {
        self.get(&["drivers", reference]).await
    }

    async fn constructor(&self, reference: &str) -> Result<Constructor, ApiError> {
        self.get(&["constructors", reference]).await
    }

    async fn circuit(&self, id: i64) -> Result<Circuit, ApiError> {
        self.get(&["circuits", &id.to_string()]).await
    }

    async fn driver_results(&self, reference: &str, year: i32) -> Result<Vec<RaceResult>, ApiError> {
        self.get(&["driverResults", reference, &year.to_string()]).await
    }

    async fn constructor_results(&self, reference: &str, year: i32) -> Result<Vec<RaceResult>, ApiError> {
        self.get(&["constructorResults", reference, &year.to_string()]).await
    }
}
