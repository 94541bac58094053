//! Nearest stops to a point.

use serde::Serialize;

use crate::dataset::Dataset;
use crate::domain::Coordinates;

use super::distance::round_km;

/// Walking pace assumed for `walking_time_min`.
pub const WALKING_MINUTES_PER_KM: f64 = 12.0;

pub const DEFAULT_MAX_RESULTS: usize = 5;

pub const DEFAULT_MAX_DISTANCE_KM: f64 = 2.0;

/// A stop within walking range of a point.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NearbyStop {
    pub stop_id: String,
    pub stop_name: String,
    pub city: String,
    /// Rounded to two decimal places
    pub distance_km: f64,
    pub distance_m: u64,
    pub walking_time_min: u64,
    pub coordinates: Coordinates,
}

/// Stops with known coordinates within `max_distance_km` of `origin`,
/// closest first, at most `max_results` of them.
///
/// Stops without coordinates are skipped. Ties on the rounded distance keep
/// dataset order.
pub fn find_nearest_stops(
    dataset: &Dataset,
    origin: Coordinates,
    max_results: usize,
    max_distance_km: f64,
) -> Vec<NearbyStop> {
    let mut nearby: Vec<NearbyStop> = dataset
        .stops()
        .iter()
        .filter_map(|stop| {
            let at = stop.coordinates?;
            let km = origin.distance_km(at);
            (km <= max_distance_km).then(|| NearbyStop {
                stop_id: stop.id.clone(),
                stop_name: stop.name.clone(),
                city: stop.city.clone(),
                distance_km: round_km(km),
                distance_m: (km * 1000.0).round() as u64,
                walking_time_min: (km * WALKING_MINUTES_PER_KM).round() as u64,
                coordinates: at,
            })
        })
        .collect();

    nearby.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));
    nearby.truncate(max_results);
    nearby
}
