//! Loading the network database from its JSON file.
//!
//! The file is one object with `stops` and `routes` maps keyed by stop id
//! and route number, a `fare_structure` holding `distance_slabs`, and an
//! optional `metadata` block. Key order in the maps is preserved.

use std::path::Path;

use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::domain::{FareTable, Route, Stop};

use super::error::DatasetError;
use super::known_stops::enrich_coordinates;
use super::Dataset;

type JsonMap = serde_json::Map<String, serde_json::Value>;

/// Top-level shape of the database file.
#[derive(Debug, Deserialize)]
struct RawDatabase {
    #[serde(default)]
    stops: JsonMap,
    #[serde(default)]
    routes: JsonMap,
    #[serde(default)]
    fare_structure: FareTable,
    #[serde(default)]
    metadata: serde_json::Value,
}

impl Dataset {
    /// Load the database from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, DatasetError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| DatasetError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let dataset = Self::from_json_str(&contents)?;
        info!(
            path = %path.display(),
            routes = dataset.route_count(),
            stops = dataset.stop_count(),
            "Loaded network database"
        );
        Ok(dataset)
    }

    /// Parse the database from a JSON string.
    ///
    /// Known stops without coordinates get approximate ones filled in.
    pub fn from_json_str(json: &str) -> Result<Self, DatasetError> {
        let raw: RawDatabase = serde_json::from_str(json)?;

        let mut stops = raw
            .stops
            .into_iter()
            .map(|(id, value)| {
                let mut stop: Stop = parse_record("stop", &id, value)?;
                stop.id = id;
                Ok(stop)
            })
            .collect::<Result<Vec<_>, DatasetError>>()?;

        let routes = raw
            .routes
            .into_iter()
            .map(|(number, value)| {
                let mut route: Route = parse_record("route", &number, value)?;
                if route.stops.is_empty() {
                    warn!(route = %number, "Route has no stops and will never match");
                }
                route.number = number;
                Ok(route)
            })
            .collect::<Result<Vec<_>, DatasetError>>()?;

        let enriched = enrich_coordinates(&mut stops);
        debug!(enriched, "Filled in known stop coordinates");

        Ok(Self::new(stops, routes, raw.fare_structure).with_metadata(raw.metadata))
    }
}

fn parse_record<T: serde::de::DeserializeOwned>(
    kind: &'static str,
    key: &str,
    value: serde_json::Value,
) -> Result<T, DatasetError> {
    serde_json::from_value(value).map_err(|e| DatasetError::InvalidRecord {
        kind,
        key: key.to_string(),
        message: e.to_string(),
    })
}
