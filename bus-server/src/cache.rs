//! Caching layer for geocoding lookups.
//!
//! Place names repeat a lot (every fare quote between the same two stops
//! resolves the same two names) and the providers are rate limited, so
//! successful resolutions are memoised. Failures are not cached; the next
//! request tries the providers again.

use std::time::Duration;

use futures::future::try_join;
use moka::future::Cache as MokaCache;
use tracing::{debug, warn};

use crate::domain::Coordinates;
use crate::geocoding::{Geocoder, GeocodingError, Place};

/// Cache key: lower-cased (name, city).
type PlaceKey = (String, String);

/// Configuration for the geocoding cache.
#[derive(Debug, Clone)]
pub struct GeocodeCacheConfig {
    /// TTL for cached entries.
    pub ttl: Duration,

    /// Maximum number of cached entries.
    pub max_capacity: u64,
}

impl Default for GeocodeCacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(24 * 60 * 60),
            max_capacity: 1000,
        }
    }
}

/// Geocoder with caching.
///
/// Wraps a [`Geocoder`] and caches successful forward lookups.
pub struct CachedGeocoder {
    geocoder: Geocoder,
    places: MokaCache<PlaceKey, Place>,
}

impl CachedGeocoder {
    /// Create a new cached geocoder.
    pub fn new(geocoder: Geocoder, cache_config: &GeocodeCacheConfig) -> Self {
        let places = MokaCache::builder()
            .time_to_live(cache_config.ttl)
            .max_capacity(cache_config.max_capacity)
            .build();

        Self { geocoder, places }
    }

    fn key(name: &str, city: &str) -> PlaceKey {
        (name.trim().to_lowercase(), city.trim().to_lowercase())
    }

    /// Resolve a place, using the cache if available.
    pub async fn geocode(&self, name: &str, city: &str) -> Result<Place, GeocodingError> {
        let key = Self::key(name, city);

        if let Some(place) = self.places.get(&key).await {
            debug!(name, city, "Geocoding cache hit");
            return Ok(place);
        }

        let place = self.geocoder.geocode(name, city).await?;
        self.places.insert(key, place.clone()).await;

        Ok(place)
    }

    /// Coordinates for a place, or the fallback position if it can't be found.
    pub async fn coordinates_for(&self, name: &str, city: &str) -> Coordinates {
        match self.geocode(name, city).await {
            Ok(place) => place.coordinates,
            Err(e) => {
                warn!(name, city, error = %e, "Geocoding failed, using fallback position");
                self.geocoder.fallback()
            }
        }
    }

    /// Great-circle distance between two named places in km.
    ///
    /// Fails if either name can't be resolved; no fallback position is used.
    pub async fn distance_between(
        &self,
        from: &str,
        to: &str,
        city: &str,
    ) -> Result<f64, GeocodingError> {
        let (from, to) = try_join(self.geocode(from, city), self.geocode(to, city)).await?;
        Ok(from.coordinates.distance_km(to.coordinates))
    }

    /// Address details for a point. Not cached.
    pub async fn reverse_geocode(
        &self,
        at: Coordinates,
    ) -> Result<serde_json::Value, GeocodingError> {
        self.geocoder.reverse_geocode(at).await
    }
}
