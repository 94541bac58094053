//! Fare quotes.
//!
//! A fare depends only on distance. The distance is either supplied by the
//! caller or measured as the crow flies between two geocoded stop names;
//! if geocoding fails a fixed default is charged instead, and the quote
//! says so.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::cache::CachedGeocoder;
use crate::domain::FareTable;
use crate::geocoding::round_km;

/// Distance charged when the two stops can't be located.
pub const DEFAULT_DISTANCE_KM: f64 = 10.0;

/// Fare in INR for a distance.
///
/// First slab with `min_km <= distance < max_km`; past the last slab the last
/// slab's fare; an empty table charges 0. Negative distances aren't rejected.
pub fn calculate_fare(fares: &FareTable, distance_km: f64) -> u32 {
    fares.fare_for(distance_km)
}

/// Where a quote's distance came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DistanceSource {
    /// Supplied by the caller (or zero when nothing was supplied)
    Given,
    /// Great-circle distance between the geocoded stops
    Measured,
    /// Geocoding failed; [`DEFAULT_DISTANCE_KM`] was charged
    Default,
}

/// What to quote: an explicit distance, or two stop names.
///
/// An explicit distance wins when both are present.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct FareRequest {
    #[serde(default)]
    pub from_stop: Option<String>,
    #[serde(default)]
    pub to_stop: Option<String>,
    #[serde(default)]
    pub distance_km: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FareQuote {
    /// Rounded to two decimals; `None` when the distance is zero
    pub distance_km: Option<f64>,
    pub distance_source: DistanceSource,
    #[serde(rename = "fare_inr")]
    pub fare: u32,
    pub from: Option<String>,
    pub to: Option<String>,
}

impl FareQuote {
    fn new(
        fares: &FareTable,
        distance_km: f64,
        source: DistanceSource,
        request: FareRequest,
    ) -> Self {
        Self {
            distance_km: (distance_km != 0.0).then(|| round_km(distance_km)),
            distance_source: source,
            fare: calculate_fare(fares, distance_km),
            from: request.from_stop,
            to: request.to_stop,
        }
    }
}

fn non_empty(s: &Option<String>) -> Option<&str> {
    s.as_deref().filter(|s| !s.is_empty())
}

/// Quote a fare, geocoding the stop names in `city` if no distance is given.
pub async fn quote_fare(
    fares: &FareTable,
    geocoder: &CachedGeocoder,
    request: FareRequest,
    city: &str,
) -> FareQuote {
    let (distance_km, source) = match (
        request.distance_km,
        non_empty(&request.from_stop),
        non_empty(&request.to_stop),
    ) {
        (Some(km), _, _) => (km, DistanceSource::Given),
        (None, Some(from), Some(to)) => match geocoder.distance_between(from, to, city).await {
            Ok(km) => {
                info!(from, to, distance_km = km, "Distance measured");
                (km, DistanceSource::Measured)
            }
            Err(e) => {
                warn!(
                    from,
                    to,
                    error = %e,
                    default_km = DEFAULT_DISTANCE_KM,
                    "Distance calculation failed, using default"
                );
                (DEFAULT_DISTANCE_KM, DistanceSource::Default)
            }
        },
        _ => (0.0, DistanceSource::Given),
    };

    let quote = FareQuote::new(fares, distance_km, source, request);
    info!(fare_inr = quote.fare, distance_km, source = ?source, "Fare calculated");
    quote
}
