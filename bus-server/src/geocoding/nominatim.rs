//! OpenStreetMap Nominatim provider.
//!
//! Nominatim's usage policy allows at most one request per second and
//! requires an identifying `User-Agent`; both are enforced here.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::domain::Coordinates;

use super::error::GeocodingError;
use super::provider::{
    GeocodingProvider, Place, PlaceSource, RequestThrottle, USER_AGENT, search_query,
};

/// Public Nominatim instance.
const DEFAULT_BASE_URL: &str = "https://nominatim.openstreetmap.org";

/// Configuration for the Nominatim provider.
#[derive(Debug, Clone)]
pub struct NominatimConfig {
    /// Base URL for the API (defaults to the public instance)
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Minimum gap between requests
    pub min_interval: Duration,
}

impl NominatimConfig {
    /// Create a config pointing at the public instance.
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 10,
            min_interval: Duration::from_secs(1),
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

impl Default for NominatimConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Raw search or reverse result. Nominatim sends coordinates as strings.
#[derive(Debug, Deserialize)]
struct NominatimResult {
    lat: String,
    lon: String,
    #[serde(default)]
    display_name: Option<String>,
}

impl NominatimResult {
    fn coordinates(&self) -> Result<Coordinates, GeocodingError> {
        let lat = self
            .lat
            .parse()
            .map_err(|_| GeocodingError::InvalidCoordinate(self.lat.clone()))?;
        let lon = self
            .lon
            .parse()
            .map_err(|_| GeocodingError::InvalidCoordinate(self.lon.clone()))?;
        Ok(Coordinates::new(lat, lon))
    }
}

/// Nominatim HTTP client.
#[derive(Debug, Clone)]
pub struct NominatimProvider {
    http: reqwest::Client,
    base_url: String,
    throttle: Arc<RequestThrottle>,
}

impl NominatimProvider {
    /// Create a new provider with its own throttle.
    pub fn new(config: NominatimConfig) -> Result<Self, GeocodingError> {
        let throttle = Arc::new(RequestThrottle::new(config.min_interval));
        Self::with_throttle(config, throttle)
    }

    /// Create a new provider sharing `throttle` with other clients.
    pub fn with_throttle(
        config: NominatimConfig,
        throttle: Arc<RequestThrottle>,
    ) -> Result<Self, GeocodingError> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            throttle,
        })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, GeocodingError> {
        self.throttle.wait().await;

        let url = format!("{}{}", self.base_url, path);
        let response = self.http.get(&url).query(query).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GeocodingError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Look up the address at a point.
    ///
    /// Returns Nominatim's response object unchanged (`display_name`,
    /// `address` breakdown, and so on).
    pub async fn reverse(&self, at: Coordinates) -> Result<serde_json::Value, GeocodingError> {
        debug!(lat = at.lat, lon = at.lon, "Reverse geocoding");

        let value: serde_json::Value = self
            .get_json(
                "/reverse",
                &[
                    ("lat", at.lat.to_string()),
                    ("lon", at.lon.to_string()),
                    ("format", "json".to_string()),
                    ("addressdetails", "1".to_string()),
                ],
            )
            .await?;

        // Nominatim reports "nothing here" as a 200 with an error field
        if let Some(message) = value.get("error").and_then(|e| e.as_str()) {
            debug!(message, "Reverse geocoding found nothing");
            return Err(GeocodingError::NotFound(at.to_string()));
        }

        Ok(value)
    }
}

#[async_trait]
impl GeocodingProvider for NominatimProvider {
    fn name(&self) -> &'static str {
        "nominatim"
    }

    async fn resolve(&self, name: &str, city: &str) -> Result<Place, GeocodingError> {
        let query = search_query(name, city);
        debug!(%query, "Geocoding with Nominatim");

        let results: Vec<NominatimResult> = self
            .get_json(
                "/search",
                &[
                    ("q", query.clone()),
                    ("format", "json".to_string()),
                    ("limit", "1".to_string()),
                    ("addressdetails", "1".to_string()),
                ],
            )
            .await?;

        let result = results
            .into_iter()
            .next()
            .ok_or_else(|| GeocodingError::NotFound(query))?;
        let coordinates = result.coordinates()?;
        let display_name = result.display_name.unwrap_or_default();

        Ok(Place {
            coordinates,
            name: display_name.clone(),
            address: display_name,
            source: PlaceSource::Openstreetmap,
        })
    }
}
