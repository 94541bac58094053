//! Google Maps results through SerpAPI.
//!
//! Needs an API key; without one the provider reports
//! [`GeocodingError::NotConfigured`] and the chain moves on.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::domain::Coordinates;

use super::error::GeocodingError;
use super::provider::{
    GeocodingProvider, Place, PlaceSource, RequestThrottle, USER_AGENT, search_query,
};

const DEFAULT_BASE_URL: &str = "https://serpapi.com";

/// Configuration for the SerpAPI provider.
#[derive(Debug, Clone)]
pub struct SerpApiConfig {
    /// API key; `None` disables the provider
    pub api_key: Option<String>,
    /// Base URL for the API (defaults to production SerpAPI)
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Minimum gap between requests
    pub min_interval: Duration,
}

impl SerpApiConfig {
    /// Create a config with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Some(api_key.into()),
            ..Self::default()
        }
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Set the minimum gap between requests.
    pub fn with_min_interval(mut self, interval: Duration) -> Self {
        self.min_interval = interval;
        self
    }
}

impl Default for SerpApiConfig {
    /// No API key: the provider is present but always skipped.
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 10,
            min_interval: Duration::from_secs(1),
        }
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    local_results: Vec<LocalResult>,
}

#[derive(Debug, Deserialize)]
struct LocalResult {
    #[serde(default)]
    title: String,
    #[serde(default)]
    address: String,
    gps_coordinates: Option<GpsCoordinates>,
}

#[derive(Debug, Deserialize)]
struct GpsCoordinates {
    latitude: f64,
    longitude: f64,
}

/// SerpAPI HTTP client.
#[derive(Debug, Clone)]
pub struct SerpApiProvider {
    http: reqwest::Client,
    api_key: Option<String>,
    base_url: String,
    throttle: Arc<RequestThrottle>,
}

impl SerpApiProvider {
    /// Create a new provider with its own throttle.
    pub fn new(config: SerpApiConfig) -> Result<Self, GeocodingError> {
        let throttle = Arc::new(RequestThrottle::new(config.min_interval));
        Self::with_throttle(config, throttle)
    }

    /// Create a new provider sharing `throttle` with other clients.
    pub fn with_throttle(
        config: SerpApiConfig,
        throttle: Arc<RequestThrottle>,
    ) -> Result<Self, GeocodingError> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            api_key: config.api_key.filter(|k| !k.is_empty()),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            throttle,
        })
    }

    /// True if an API key is set.
    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }
}

#[async_trait]
impl GeocodingProvider for SerpApiProvider {
    fn name(&self) -> &'static str {
        "serpapi"
    }

    async fn resolve(&self, name: &str, city: &str) -> Result<Place, GeocodingError> {
        let Some(api_key) = &self.api_key else {
            return Err(GeocodingError::NotConfigured("SERPAPI_KEY not set".into()));
        };

        self.throttle.wait().await;

        let query = search_query(name, city);
        debug!(%query, "Geocoding with SerpAPI");

        let response = self
            .http
            .get(format!("{}/search", self.base_url))
            .query(&[
                ("engine", "google_maps"),
                ("q", query.as_str()),
                ("type", "search"),
                ("api_key", api_key.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GeocodingError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;
        let parsed: SearchResponse = serde_json::from_str(&body)?;

        // Only the top hit counts, even if a later one has coordinates
        let Some(LocalResult {
            title,
            address,
            gps_coordinates: Some(gps),
        }) = parsed.local_results.into_iter().next()
        else {
            return Err(GeocodingError::NotFound(query));
        };

        Ok(Place {
            coordinates: Coordinates::new(gps.latitude, gps.longitude),
            name: title,
            address,
            source: PlaceSource::GoogleMapsSerpapi,
        })
    }
}
