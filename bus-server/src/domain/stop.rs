//! Bus stop types.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::de::null_as_default;

/// A latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinates {
    /// Create a coordinate pair.
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Bhubaneswar city centre, used when a place cannot be resolved.
    pub const fn bhubaneswar() -> Self {
        Self::new(20.2961, 85.8245)
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4}, {:.4}", self.lat, self.lon)
    }
}

/// A physical boarding location.
///
/// The `id` is the key the stop is stored under in the database
/// (e.g. `kiit_square`). Route stop lists refer to stops by display
/// name, not by id, so nothing links the two tables except text. Like the
/// route number, the id is not part of the serialized record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stop {
    /// Database key; filled in from the enclosing map when loading
    #[serde(skip)]
    pub id: String,

    /// Display name
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,

    /// City the stop is in
    #[serde(default, deserialize_with = "null_as_default")]
    pub city: String,

    /// Approximate position, when known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<Coordinates>,

    /// Any other fields carried by the record
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Stop {
    /// Create a stop without coordinates.
    pub fn new(id: impl Into<String>, name: impl Into<String>, city: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            city: city.into(),
            coordinates: None,
            extra: serde_json::Map::new(),
        }
    }

    /// Attach coordinates.
    pub fn with_coordinates(mut self, coordinates: Coordinates) -> Self {
        self.coordinates = Some(coordinates);
        self
    }

    /// Case-insensitive substring match on name or city.
    pub fn matches(&self, query_lower: &str) -> bool {
        self.name.to_lowercase().contains(query_lower)
            || self.city.to_lowercase().contains(query_lower)
    }
}
