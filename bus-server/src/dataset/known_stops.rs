//! Approximate coordinates for well-known stops.
//!
//! The database ships without positions for most stops. These fill the gap
//! for the busiest ones so nearest-stop lookups have something to work with.

use crate::domain::{Coordinates, Stop};

/// `(stop id, lat, lon)` for stops we know the position of.
const KNOWN_COORDINATES: &[(&str, f64, f64)] = &[
    ("acharya_vihar_square", 20.2943, 85.8133),
    ("kiit_square", 20.3557, 85.8183),
    ("kiit_campus", 20.3557, 85.8183),
    ("patia_square", 20.3540, 85.8205),
    ("master_canteen", 20.2697, 85.8387),
    ("ag_square", 20.2961, 85.8245),
    ("baramunda_bsabt", 20.2815, 85.8038),
    ("bhubaneswar_railway_station", 20.2697, 85.8387),
    ("nandankanan", 20.4008, 85.8156),
    ("airport", 20.2441, 85.8178),
    ("biju_patnaik_airport", 20.2441, 85.8178),
    ("sum_hospital", 20.2847, 85.7753),
    ("vani_vihar_square", 20.2972, 85.8205),
    ("jaydev_vihar_square", 20.2944, 85.8180),
    ("aiims", 20.3019, 85.8181),
    ("khandagiri", 20.2545, 85.7783),
    ("puri", 19.8135, 85.8312),
    ("cuttack", 20.4625, 85.8828),
];

/// Look up the built-in position for a stop id.
pub fn known_coordinates(stop_id: &str) -> Option<Coordinates> {
    KNOWN_COORDINATES
        .iter()
        .find(|(id, _, _)| *id == stop_id)
        .map(|&(_, lat, lon)| Coordinates::new(lat, lon))
}

/// Fill in coordinates for known stops that don't carry their own.
///
/// Returns the number of stops enriched. Existing coordinates are kept.
pub fn enrich_coordinates(stops: &mut [Stop]) -> usize {
    let mut enriched = 0;
    for stop in stops.iter_mut().filter(|s| s.coordinates.is_none()) {
        if let Some(coordinates) = known_coordinates(&stop.id) {
            stop.coordinates = Some(coordinates);
            enriched += 1;
        }
    }
    enriched
}
