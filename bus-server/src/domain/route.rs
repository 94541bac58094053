//! Bus route type.

use serde::{Deserialize, Serialize};

use super::DomainError;
use super::de::null_as_default;

/// A numbered bus line.
///
/// `stops` holds stop display names in travel order. The order is the only
/// thing that encodes direction, so "A before B" on this list is what it
/// means for the route to go from A to B.
///
/// Serializes as the database record: the route number is the record's key,
/// not one of its fields, and optional fields appear only when present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    /// Route number (e.g. `"10"`, `"DD1"`); filled in from the map key
    #[serde(skip)]
    pub number: String,

    /// Human-readable route name
    #[serde(
        default,
        rename = "route_name",
        deserialize_with = "null_as_default",
        skip_serializing_if = "String::is_empty"
    )]
    pub name: String,

    /// Stop names in travel order
    #[serde(default, deserialize_with = "null_as_default")]
    pub stops: Vec<String>,

    /// Total route length
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance_km: Option<f64>,

    /// Free-text description of the corridor
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub via: Option<String>,

    /// Any other fields carried by the record (timings, frequency, ...)
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Route {
    /// Create a route, rejecting an empty stop list.
    pub fn new(
        number: impl Into<String>,
        name: impl Into<String>,
        stops: Vec<String>,
        distance_km: f64,
        via: impl Into<String>,
    ) -> Result<Self, DomainError> {
        let number = number.into();
        if stops.is_empty() {
            return Err(DomainError::EmptyRoute(number));
        }

        Ok(Self {
            number,
            name: name.into(),
            stops,
            distance_km: Some(distance_km),
            via: Some(via.into()),
            extra: serde_json::Map::new(),
        })
    }

    /// Route length, 0 when the record gives none.
    pub fn distance_km(&self) -> f64 {
        self.distance_km.unwrap_or_default()
    }

    /// Corridor description, empty when the record gives none.
    pub fn via(&self) -> &str {
        self.via.as_deref().unwrap_or_default()
    }

    /// Stop names lower-cased, in route order.
    pub fn stops_lowercase(&self) -> Vec<String> {
        self.stops.iter().map(|s| s.to_lowercase()).collect()
    }

    /// True if any stop name contains `query` (case-insensitive).
    pub fn serves(&self, query: &str) -> bool {
        let query = query.to_lowercase();
        self.stops.iter().any(|s| s.to_lowercase().contains(&query))
    }

    /// Number of stops on the route.
    pub fn stop_count(&self) -> usize {
        self.stops.len()
    }
}
