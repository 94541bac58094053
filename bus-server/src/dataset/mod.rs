//! Static network database.
//!
//! The whole bus network (stops, routes, fares) is loaded once at startup
//! into a [`Dataset`] and shared read-only for the life of the process.
//! Every query takes `&Dataset`; nothing mutates it after construction.

mod error;
mod known_stops;
mod load;

use std::collections::HashMap;

use serde::Serialize;

use crate::domain::{FareTable, Route, Stop};

pub use error::DatasetError;
pub use known_stops::{enrich_coordinates, known_coordinates};

/// A route as reported by stop-to-route lookups.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteSummary {
    pub route_number: String,
    pub route_name: String,
    pub stops: Vec<String>,
}

impl RouteSummary {
    fn from_route(route: &Route) -> Self {
        Self {
            route_number: route.number.clone(),
            route_name: route.name.clone(),
            stops: route.stops.clone(),
        }
    }
}

/// Immutable stop, route and fare tables.
///
/// Routes and stops keep their source order. That order is observable:
/// route matching breaks ranking ties by it.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    stops: Vec<Stop>,
    stop_index: HashMap<String, usize>,
    routes: Vec<Route>,
    route_index: HashMap<String, usize>,
    fares: FareTable,
    metadata: serde_json::Value,
}

impl Dataset {
    /// Build a dataset from already-parsed tables.
    ///
    /// If two entries share a key the later one wins lookups, matching what a
    /// JSON object with a repeated key would load as.
    pub fn new(stops: Vec<Stop>, routes: Vec<Route>, fares: FareTable) -> Self {
        let stop_index = stops
            .iter()
            .enumerate()
            .map(|(i, s)| (s.id.clone(), i))
            .collect();
        let route_index = routes
            .iter()
            .enumerate()
            .map(|(i, r)| (r.number.clone(), i))
            .collect();

        Self {
            stops,
            stop_index,
            routes,
            route_index,
            fares,
            metadata: serde_json::Value::Null,
        }
    }

    /// Attach the database's free-form metadata block.
    pub fn with_metadata(mut self, metadata: serde_json::Value) -> Self {
        self.metadata = metadata;
        self
    }

    /// All routes in source order.
    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    /// All stops in source order.
    pub fn stops(&self) -> &[Stop] {
        &self.stops
    }

    /// The fare table.
    pub fn fares(&self) -> &FareTable {
        &self.fares
    }

    /// The metadata block (`null` if the database had none).
    pub fn metadata(&self) -> &serde_json::Value {
        &self.metadata
    }

    /// Look up a stop by id.
    pub fn get_stop_info(&self, stop_id: &str) -> Option<&Stop> {
        self.stop_index
            .get(stop_id)
            .and_then(|&i| self.stops.get(i))
    }

    /// Look up a route by number.
    pub fn get_route_info(&self, route_number: &str) -> Option<&Route> {
        self.route_index
            .get(route_number)
            .and_then(|&i| self.routes.get(i))
    }

    /// Stops whose name or city contains `query` (case-insensitive).
    pub fn search_stops(&self, query: &str) -> Vec<&Stop> {
        let query = query.to_lowercase();
        self.stops.iter().filter(|s| s.matches(&query)).collect()
    }

    /// Routes whose number or name contains `query` (case-insensitive).
    pub fn search_routes(&self, query: &str) -> Vec<&Route> {
        let query = query.to_lowercase();
        self.routes
            .iter()
            .filter(|r| {
                r.number.to_lowercase().contains(&query) || r.name.to_lowercase().contains(&query)
            })
            .collect()
    }

    /// Routes with any stop whose name contains `stop_name` (case-insensitive).
    ///
    /// This is a containment check over the whole route, with no notion of
    /// position or direction.
    pub fn get_routes_for_stop(&self, stop_name: &str) -> Vec<RouteSummary> {
        self.routes
            .iter()
            .filter(|r| r.serves(stop_name))
            .map(RouteSummary::from_route)
            .collect()
    }

    /// Ordered stop names for a route; empty if the route is unknown.
    pub fn route_stops(&self, route_number: &str) -> &[String] {
        self.get_route_info(route_number)
            .map_or(&[], |r| r.stops.as_slice())
    }

    /// True if the route has a stop whose name contains `stop_name`.
    pub fn is_stop_on_route(&self, stop_name: &str, route_number: &str) -> bool {
        self.get_route_info(route_number)
            .is_some_and(|r| r.serves(stop_name))
    }

    /// Number of routes.
    pub fn route_count(&self) -> usize {
        self.routes.len()
    }

    /// Number of stops.
    pub fn stop_count(&self) -> usize {
        self.stops.len()
    }
}
