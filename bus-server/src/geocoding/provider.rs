//! The provider interface and the pieces every provider shares.

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::debug;

use crate::domain::Coordinates;

use super::error::GeocodingError;

/// Sent with every outgoing request.
pub const USER_AGENT: &str = "MoBusApp/1.0 (Bus Route Planner)";

/// City assumed when a caller doesn't name one.
pub const DEFAULT_CITY: &str = "Bhubaneswar";

/// Free-text query sent to providers for a place in Odisha.
pub fn search_query(name: &str, city: &str) -> String {
    format!("{name}, {city}, Odisha, India")
}

/// Which provider resolved a place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaceSource {
    GoogleMapsSerpapi,
    Openstreetmap,
}

/// A resolved place.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Place {
    pub coordinates: Coordinates,
    /// Provider's name for the place
    pub name: String,
    pub address: String,
    pub source: PlaceSource,
}

/// Something that can turn a place name into a [`Place`].
#[async_trait]
pub trait GeocodingProvider: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    /// Resolve `name` in `city`.
    async fn resolve(&self, name: &str, city: &str) -> Result<Place, GeocodingError>;
}

/// Enforces a minimum gap between outgoing requests.
///
/// One throttle can be shared between providers so that together they stay
/// under a single rate.
#[derive(Debug)]
pub struct RequestThrottle {
    min_interval: Duration,
    last_request: Mutex<Option<Instant>>,
}

impl RequestThrottle {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_request: Mutex::new(None),
        }
    }

    /// Wait until a request is allowed, then claim the slot.
    pub async fn wait(&self) {
        let mut last = self.last_request.lock().await;
        if let Some(at) = *last {
            let elapsed = at.elapsed();
            if elapsed < self.min_interval {
                let wait = self.min_interval - elapsed;
                debug!(?wait, "Rate limiting geocoding request");
                tokio::time::sleep(wait).await;
            }
        }
        *last = Some(Instant::now());
    }
}
