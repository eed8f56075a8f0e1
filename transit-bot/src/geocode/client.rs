//! Geocoding API client.

use std::time::Duration;

use crate::nearby::Geocoder;

use super::error::GeocodeError;
use super::types::{GeocodeResponse, GeocodeResult};

/// Default base URL for the Google geocoding API.
const DEFAULT_BASE_URL: &str = "https://maps.googleapis.com/maps/api/geocode/json";

/// Default state used to bias results.
const DEFAULT_REGION: &str = "AK";

/// Configuration for the geocoding client.
#[derive(Debug, Clone)]
pub struct GeocodeConfig {
    /// API key sent as the `key` query parameter
    pub api_key: String,
    /// Base URL for the API
    pub base_url: String,
    /// `administrative_area` component filter, e.g. "AK"
    pub region: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl GeocodeConfig {
    /// Create a new config with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            region: DEFAULT_REGION.to_string(),
            timeout_secs: 10,
        }
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the region bias.
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = region.into();
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    fn components(&self) -> String {
        format!("country:US|administrative_area:{}", self.region)
    }
}

/// Client for the geocoding API.
#[derive(Debug, Clone)]
pub struct GeocodeClient {
    http: reqwest::Client,
    config: GeocodeConfig,
}

impl GeocodeClient {
    /// Create a new geocoding client.
    pub fn new(config: GeocodeConfig) -> Result<Self, GeocodeError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { http, config })
    }

    /// Geocode free text.
    ///
    /// Returns `Ok(None)` when nothing precise enough was found.
    pub async fn geocode(&self, address: &str) -> Result<Option<GeocodeResult>, GeocodeError> {
        let response = self
            .http
            .get(&self.config.base_url)
            .query(&[
                ("address", address.to_string()),
                ("components", self.config.components()),
                ("key", self.config.api_key.clone()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GeocodeError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;

        let parsed: GeocodeResponse =
            serde_json::from_str(&body).map_err(|e| GeocodeError::Json {
                message: e.to_string(),
            })?;

        parsed.into_result()
    }
}

impl Geocoder for GeocodeClient {
    async fn geocode(&self, address: &str) -> Result<Option<GeocodeResult>, GeocodeError> {
        GeocodeClient::geocode(self, address).await
    }
}
