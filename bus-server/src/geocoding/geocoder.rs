//! Provider chain with a fallback position.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::domain::Coordinates;

use super::error::GeocodingError;
use super::nominatim::{NominatimConfig, NominatimProvider};
use super::provider::{GeocodingProvider, Place, RequestThrottle};
use super::serpapi::{SerpApiConfig, SerpApiProvider};

/// Tries each provider in order until one resolves the name.
#[derive(Clone)]
pub struct Geocoder {
    providers: Vec<Arc<dyn GeocodingProvider>>,
    reverse: Option<Arc<NominatimProvider>>,
    fallback: Coordinates,
}

impl Geocoder {
    /// Create a geocoder over `providers`, tried in order.
    ///
    /// Reverse lookups are unavailable until [`Geocoder::with_reverse`] is
    /// called.
    pub fn new(providers: Vec<Arc<dyn GeocodingProvider>>) -> Self {
        Self {
            providers,
            reverse: None,
            fallback: Coordinates::bhubaneswar(),
        }
    }

    /// The usual chain: SerpAPI first when it has a key, then Nominatim.
    ///
    /// Both providers share one request throttle set to the longer of the
    /// two configured intervals. Nominatim also serves reverse lookups.
    pub fn from_config(
        serpapi: SerpApiConfig,
        nominatim: NominatimConfig,
    ) -> Result<Self, GeocodingError> {
        let interval = serpapi.min_interval.max(nominatim.min_interval);
        let throttle = Arc::new(RequestThrottle::new(interval));

        let serpapi = SerpApiProvider::with_throttle(serpapi, Arc::clone(&throttle))?;
        let nominatim = Arc::new(NominatimProvider::with_throttle(nominatim, throttle)?);

        let mut providers: Vec<Arc<dyn GeocodingProvider>> = Vec::with_capacity(2);
        if serpapi.is_configured() {
            providers.push(Arc::new(serpapi));
        } else {
            debug!("No SerpAPI key, geocoding with Nominatim only");
        }
        providers.push(Arc::clone(&nominatim) as Arc<dyn GeocodingProvider>);

        Ok(Self::new(providers).with_reverse(nominatim))
    }

    /// Use `provider` for reverse lookups.
    pub fn with_reverse(mut self, provider: Arc<NominatimProvider>) -> Self {
        self.reverse = Some(provider);
        self
    }

    /// Position returned when nothing resolves.
    pub fn with_fallback(mut self, fallback: Coordinates) -> Self {
        self.fallback = fallback;
        self
    }

    /// Names of the providers in the order they are tried.
    pub fn provider_names(&self) -> Vec<&'static str> {
        self.providers.iter().map(|p| p.name()).collect()
    }

    /// The position substituted for unresolvable names.
    pub fn fallback(&self) -> Coordinates {
        self.fallback
    }

    /// Resolve a place, returning the first provider's success.
    ///
    /// If every provider fails the last provider's error is returned.
    pub async fn geocode(&self, name: &str, city: &str) -> Result<Place, GeocodingError> {
        let mut last_err =
            GeocodingError::NotConfigured("no geocoding providers".to_string());

        for provider in &self.providers {
            match provider.resolve(name, city).await {
                Ok(place) => {
                    debug!(
                        provider = provider.name(),
                        name,
                        city,
                        lat = place.coordinates.lat,
                        lon = place.coordinates.lon,
                        "Geocoded place"
                    );
                    return Ok(place);
                }
                Err(e) => {
                    debug!(provider = provider.name(), name, error = %e, "Provider failed");
                    last_err = e;
                }
            }
        }

        Err(last_err)
    }

    /// Coordinates for a place, or the fallback position if it can't be found.
    pub async fn coordinates_for(&self, name: &str, city: &str) -> Coordinates {
        match self.geocode(name, city).await {
            Ok(place) => place.coordinates,
            Err(e) => {
                warn!(name, city, error = %e, "Geocoding failed, using fallback position");
                self.fallback
            }
        }
    }

    /// Address details for a point.
    pub async fn reverse_geocode(
        &self,
        at: Coordinates,
    ) -> Result<serde_json::Value, GeocodingError> {
        match &self.reverse {
            Some(provider) => provider.reverse(at).await,
            None => Err(GeocodingError::NotConfigured(
                "no reverse geocoding provider".to_string(),
            )),
        }
    }
}

impl std::fmt::Debug for Geocoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Geocoder")
            .field("providers", &self.provider_names())
            .field("reverse", &self.reverse.is_some())
            .field("fallback", &self.fallback)
            .finish()
    }
}
