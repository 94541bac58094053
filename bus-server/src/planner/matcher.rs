//! Direct route matching.
//!
//! A route matches a `(from, to)` pair when some stop name contains `from`,
//! some stop name contains `to`, and the `from` stop comes first. When
//! several stops contain the same query the *last* one is used on each side,
//! so a broad query like `"square"` can push the index past the other side
//! and rule the route out.

use serde::Serialize;
use tracing::debug;

use crate::dataset::Dataset;
use crate::domain::Route;

use super::rank::rank_matches;

/// A route that runs from one location to another.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchedRoute {
    pub route_number: String,
    pub route_name: String,

    /// Stop name (as listed on the route) where the trip starts
    pub from_stop: String,

    /// Stop name (as listed on the route) where the trip ends
    pub to_stop: String,

    /// `to_idx - from_idx`: stops travelled, counting the last one
    pub stops_between: usize,

    /// Stops from `from_stop` to `to_stop` inclusive
    pub all_stops: Vec<String>,

    /// Length of the whole route, not of this trip
    pub distance_km: f64,

    pub via: String,
}

/// Match one route against lower-cased location queries.
///
/// Returns `None` if either location is missing or the start doesn't come
/// strictly before the end.
pub fn match_route(route: &Route, from_lower: &str, to_lower: &str) -> Option<MatchedRoute> {
    let mut from_idx = None;
    let mut to_idx = None;

    // Later hits overwrite earlier ones on each side independently
    for (idx, stop) in route.stops_lowercase().iter().enumerate() {
        if stop.contains(from_lower) {
            from_idx = Some(idx);
        }
        if stop.contains(to_lower) {
            to_idx = Some(idx);
        }
    }

    let (from_idx, to_idx) = (from_idx?, to_idx?);
    if from_idx >= to_idx {
        return None;
    }

    let all_stops = route.stops.get(from_idx..=to_idx)?.to_vec();
    let from_stop = all_stops.first()?.clone();
    let to_stop = all_stops.last()?.clone();

    Some(MatchedRoute {
        route_number: route.number.clone(),
        route_name: route.name.clone(),
        from_stop,
        to_stop,
        stops_between: to_idx - from_idx,
        all_stops,
        distance_km: route.distance_km(),
        via: route.via().to_string(),
    })
}

/// Find every route running from `from_location` to `to_location`.
///
/// Matching is case-insensitive substring containment. Results are ranked
/// fewest stops first; ties keep route-table order. No match gives an
/// empty list.
pub fn find_routes(dataset: &Dataset, from_location: &str, to_location: &str) -> Vec<MatchedRoute> {
    let from_lower = from_location.to_lowercase();
    let to_lower = to_location.to_lowercase();

    let matches: Vec<MatchedRoute> = dataset
        .routes()
        .iter()
        .filter_map(|route| match_route(route, &from_lower, &to_lower))
        .collect();

    debug!(
        from = from_location,
        to = to_location,
        matches = matches.len(),
        "Direct route scan complete"
    );

    rank_matches(matches)
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::domain::FareTable;
    use proptest::prelude::*;

    const NAMES: &[&str] = &[
        "AG Square",
        "KIIT Square",
        "Patia Square",
        "Master Canteen",
        "Airport",
        "Vani Vihar",
        "Jaydev Vihar",
        "Khandagiri",
    ];

    fn network() -> impl Strategy<Value = Dataset> {
        let stop = proptest::sample::select(NAMES);
        let stops = proptest::collection::vec(stop, 1..7);
        proptest::collection::vec(stops, 0..8).prop_map(|routes| {
            let routes = routes
                .into_iter()
                .enumerate()
                .map(|(i, stops)| {
                    Route::new(
                        i.to_string(),
                        "",
                        stops.into_iter().map(str::to_string).collect(),
                        1.0,
                        "",
                    )
                    .unwrap()
                })
                .collect();
            Dataset::new(Vec::new(), routes, FareTable::default())
        })
    }

    fn query() -> impl Strategy<Value = String> {
        prop_oneof![
            proptest::sample::select(NAMES).prop_map(str::to_string),
            Just("square".to_string()),
            Just("vihar".to_string()),
            Just("a".to_string()),
        ]
    }

    proptest! {
        /// Every match uses the last hit on each side, start before end
        #[test]
        fn matches_respect_last_index_order(ds in network(), from in query(), to in query()) {
            let from_lower = from.to_lowercase();
            let to_lower = to.to_lowercase();

            for m in find_routes(&ds, &from, &to) {
                let route = ds.get_route_info(&m.route_number).unwrap();
                let lower = route.stops_lowercase();
                let i = lower.iter().rposition(|s| s.contains(&from_lower)).unwrap();
                let j = lower.iter().rposition(|s| s.contains(&to_lower)).unwrap();

                prop_assert!(i < j);
                prop_assert_eq!(m.stops_between, j - i);
                prop_assert_eq!(&m.from_stop, &route.stops[i]);
                prop_assert_eq!(&m.to_stop, &route.stops[j]);
                prop_assert_eq!(m.all_stops.len(), j - i + 1);
            }
        }

        /// Results are sorted by stops travelled; ties keep table order
        #[test]
        fn sorted_and_stable(ds in network(), from in query(), to in query()) {
            let matches = find_routes(&ds, &from, &to);
            for pair in matches.windows(2) {
                prop_assert!(pair[0].stops_between <= pair[1].stops_between);
                if pair[0].stops_between == pair[1].stops_between {
                    let a: usize = pair[0].route_number.parse().unwrap();
                    let b: usize = pair[1].route_number.parse().unwrap();
                    prop_assert!(a < b);
                }
            }
        }

        /// Same input, same output
        #[test]
        fn idempotent(ds in network(), from in query(), to in query()) {
            prop_assert_eq!(find_routes(&ds, &from, &to), find_routes(&ds, &from, &to));
        }
    }
}
