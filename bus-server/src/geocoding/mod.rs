//! Place-name geocoding and distance helpers.
//!
//! Free-text place names are resolved to coordinates by an ordered chain of
//! HTTP providers (SerpAPI's Google Maps engine, then OpenStreetMap
//! Nominatim). Callers that only need a position use
//! [`Geocoder::coordinates_for`], which never fails: an unresolvable name
//! gets the Bhubaneswar city centre.

mod distance;
mod error;
mod geocoder;
mod nearest;
mod nominatim;
mod provider;
mod serpapi;

pub use distance::{EARTH_RADIUS_KM, great_circle_distance, round_km};
pub use error::GeocodingError;
pub use geocoder::Geocoder;
#[cfg(test)]
pub(crate) use geocoder::testing;
pub use nearest::{
    DEFAULT_MAX_DISTANCE_KM, DEFAULT_MAX_RESULTS, NearbyStop, WALKING_MINUTES_PER_KM,
    find_nearest_stops,
};
pub use nominatim::{NominatimConfig, NominatimProvider};
pub use provider::{
    DEFAULT_CITY, GeocodingProvider, Place, PlaceSource, RequestThrottle, USER_AGENT,
    search_query,
};
pub use serpapi::{SerpApiConfig, SerpApiProvider};
