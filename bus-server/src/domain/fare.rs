//! Distance-based fare table.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

use super::DomainError;

/// A distance bracket `[min_km, max_km)` with a flat fare.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FareSlab {
    pub min_km: f64,
    pub max_km: f64,

    /// Whole rupees; `10` and `10.0` both parse
    #[serde(deserialize_with = "whole_rupees")]
    pub fare: u32,
}

fn whole_rupees<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    let number = serde_json::Number::deserialize(deserializer)?;
    if let Some(n) = number.as_u64() {
        return u32::try_from(n).map_err(|_| D::Error::custom(format!("fare {n} out of range")));
    }
    match number.as_f64() {
        Some(f) if f.fract() == 0.0 && (0.0..=f64::from(u32::MAX)).contains(&f) => Ok(f as u32),
        _ => Err(D::Error::custom(format!(
            "fare must be a whole number of rupees, got {number}"
        ))),
    }
}

impl FareSlab {
    /// Create a slab, rejecting reversed bounds.
    pub fn new(min_km: f64, max_km: f64, fare: u32) -> Result<Self, DomainError> {
        if min_km > max_km {
            return Err(DomainError::InvalidSlab {
                min_km: min_km.to_string(),
                max_km: max_km.to_string(),
            });
        }
        Ok(Self {
            min_km,
            max_km,
            fare,
        })
    }

    /// True if `distance_km` falls in this half-open bracket.
    pub fn contains(&self, distance_km: f64) -> bool {
        self.min_km <= distance_km && distance_km < self.max_km
    }
}

/// Fare slabs in table order.
///
/// Slabs are expected to be ascending and non-overlapping, starting at 0.
/// Nothing here enforces that; lookups scan in order and take the first hit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FareTable {
    #[serde(default)]
    pub distance_slabs: Vec<FareSlab>,

    /// Any other fields of the fare structure (currency, notes, ...)
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl FareTable {
    /// Create a table from slabs.
    pub fn new(distance_slabs: Vec<FareSlab>) -> Self {
        Self {
            distance_slabs,
            extra: serde_json::Map::new(),
        }
    }

    /// Fare for a distance.
    ///
    /// Returns the first slab containing the distance. Distances beyond every
    /// slab (and anything else that matches none) pay the last slab's fare.
    /// An empty table charges 0.
    pub fn fare_for(&self, distance_km: f64) -> u32 {
        self.distance_slabs
            .iter()
            .find(|slab| slab.contains(distance_km))
            .or_else(|| self.distance_slabs.last())
            .map_or(0, |slab| slab.fare)
    }

    /// The highest fare any journey can be charged.
    pub fn ceiling_fare(&self) -> u32 {
        self.distance_slabs.last().map_or(0, |slab| slab.fare)
    }

    /// Returns true if there are no slabs.
    pub fn is_empty(&self) -> bool {
        self.distance_slabs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> FareTable {
        FareTable::new(vec![
            FareSlab::new(0.0, 5.0, 10).unwrap(),
            FareSlab::new(5.0, 10.0, 15).unwrap(),
        ])
    }

    #[test]
    fn first_matching_slab() {
        assert_eq!(table().fare_for(3.5), 10);
        assert_eq!(table().fare_for(0.0), 10);
        assert_eq!(table().fare_for(5.0), 15);
        assert_eq!(table().fare_for(9.99), 15);
    }

    #[test]
    fn beyond_all_slabs_pays_ceiling() {
        assert_eq!(table().fare_for(10.0), 15);
        assert_eq!(table().fare_for(12.0), 15);
        assert_eq!(table().fare_for(1_000.0), 15);
    }

    #[test]
    fn negative_distance_falls_through_to_ceiling() {
        assert_eq!(table().fare_for(-1.0), 15);
    }

    #[test]
    fn empty_table_is_free() {
        let empty = FareTable::default();
        assert!(empty.is_empty());
        assert_eq!(empty.fare_for(3.0), 0);
        assert_eq!(empty.ceiling_fare(), 0);
    }

    #[test]
    fn reversed_slab_rejected() {
        assert!(FareSlab::new(5.0, 2.0, 10).is_err());
    }

    #[test]
    fn parse_fare_structure() {
        let json = r#"{
            "currency": "INR",
            "distance_slabs": [
                {"min_km": 0, "max_km": 5, "fare": 10},
                {"min_km": 5, "max_km": 10, "fare": 15}
            ]
        }"#;
        let table: FareTable = serde_json::from_str(json).unwrap();
        assert_eq!(table.distance_slabs.len(), 2);
        assert_eq!(table.ceiling_fare(), 15);
        assert!(table.extra.contains_key("currency"));
    }

    #[test]
    fn fare_accepts_whole_floats() {
        let slab: FareSlab =
            serde_json::from_str(r#"{"min_km": 0.0, "max_km": 5.0, "fare": 10.0}"#).unwrap();
        assert_eq!(slab.fare, 10);
    }

    #[test]
    fn fare_rejects_fractions_and_negatives() {
        for fare in ["12.5", "-5"] {
            let json = format!(r#"{{"min_km": 0, "max_km": 5, "fare": {fare}}}"#);
            assert!(serde_json::from_str::<FareSlab>(&json).is_err(), "{fare}");
        }
    }
}
