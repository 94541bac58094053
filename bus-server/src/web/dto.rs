//! Data transfer objects for web requests and responses.

use serde::{Deserialize, Serialize, Serializer};

use crate::dataset::RouteSummary;
use crate::domain::{Coordinates, Route, Stop};
use crate::geocoding::NearbyStop;
use crate::planner::{JourneyPreferences, MatchedRoute};

/// Free-text search.
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub query: String,
}

/// A route record with its number, as search and detail tools report it.
#[derive(Debug, Serialize)]
pub struct RouteEntry {
    pub route_number: String,

    #[serde(flatten)]
    pub route: Route,
}

impl From<&Route> for RouteEntry {
    fn from(route: &Route) -> Self {
        Self {
            route_number: route.number.clone(),
            route: route.clone(),
        }
    }
}

/// A stop record with its id.
#[derive(Debug, Serialize)]
pub struct StopEntry {
    pub id: String,

    #[serde(flatten)]
    pub stop: Stop,
}

impl From<&Stop> for StopEntry {
    fn from(stop: &Stop) -> Self {
        Self {
            id: stop.id.clone(),
            stop: stop.clone(),
        }
    }
}

/// Routes matching a search.
#[derive(Debug, Serialize)]
pub struct RouteSearchResponse {
    pub query: String,

    /// Matches before truncation
    pub total_results: usize,

    pub routes: Vec<RouteEntry>,
}

/// Stops matching a search.
#[derive(Debug, Serialize)]
pub struct StopSearchResponse {
    pub query: String,

    /// Matches before truncation
    pub total_results: usize,

    pub stops: Vec<StopEntry>,
}

/// Ordered stops of one route.
#[derive(Debug, Serialize)]
pub struct RouteStopsResponse {
    pub route_number: String,
    pub route_name: String,
    pub total_stops: usize,
    pub stops: Vec<String>,
}

/// Routes serving a stop.
#[derive(Debug, Serialize)]
pub struct StopRoutesResponse {
    pub stop_name: String,
    pub total_routes: usize,
    pub routes: Vec<RouteSummary>,
}

/// Request for direct routes between two places.
#[derive(Debug, Deserialize)]
pub struct ConnectionsQuery {
    pub from_stop: String,
    pub to_stop: String,
}

/// Direct routes between two places, best first.
#[derive(Debug, Serialize)]
pub struct ConnectionsResponse {
    pub from: String,
    pub to: String,
    pub routes_found: usize,
    pub routes: Vec<MatchedRoute>,
}

/// Request to plan a journey.
#[derive(Debug, Deserialize)]
pub struct PlanJourneyRequest {
    pub start: String,
    pub end: String,

    #[serde(flatten)]
    pub preferences: JourneyPreferences,
}

/// Request for stops near a point.
#[derive(Debug, Deserialize)]
pub struct NearestStopsQuery {
    pub lat: f64,
    pub lon: f64,

    /// Defaults to 5
    pub max_results: Option<usize>,

    /// Defaults to 2 km
    pub max_distance_km: Option<f64>,
}

/// Stops near a point.
#[derive(Debug, Serialize)]
pub struct NearestStopsResponse {
    pub location: Coordinates,
    pub total_results: usize,
    pub stops: Vec<NearbyStop>,
}

/// Request to resolve a place name.
#[derive(Debug, Deserialize)]
pub struct GeocodeQuery {
    pub name: String,

    /// Defaults to the server's configured city
    pub city: Option<String>,
}

/// Request to look up the address at a point.
#[derive(Debug, Deserialize)]
pub struct ReverseGeocodeQuery {
    pub lat: f64,
    pub lon: f64,
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Serializes a table as a JSON object keyed by each row's database key,
/// in table order.
pub struct KeyedTable<'a, T> {
    rows: &'a [T],
    key: fn(&T) -> &str,
}

impl<'a> KeyedTable<'a, Route> {
    /// Routes keyed by route number.
    pub fn routes(rows: &'a [Route]) -> Self {
        Self {
            rows,
            key: |r| r.number.as_str(),
        }
    }
}

impl<'a> KeyedTable<'a, Stop> {
    /// Stops keyed by stop id.
    pub fn stops(rows: &'a [Stop]) -> Self {
        Self {
            rows,
            key: |s| s.id.as_str(),
        }
    }
}

impl<T: Serialize> Serialize for KeyedTable<'_, T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.rows.iter().map(|row| ((self.key)(row), row)))
    }
}
