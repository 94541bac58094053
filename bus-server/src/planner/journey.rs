//! Journey planning: direct routes first, then one change.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::dataset::{Dataset, RouteSummary};

use super::config::PlannerConfig;
use super::matcher::{MatchedRoute, find_routes};

/// Suggestion attached to every "no route" answer.
const NO_ROUTE_SUGGESTION: &str = "Try searching for nearby bus stops or alternative locations";

/// Rider preferences.
///
/// Accepted and logged, but they don't change which routes are offered or
/// how they are ordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct JourneyPreferences {
    #[serde(default = "default_minimize_transfers")]
    pub minimize_transfers: bool,
    #[serde(default)]
    pub prefer_ac: bool,
}

fn default_minimize_transfers() -> bool {
    true
}

impl Default for JourneyPreferences {
    fn default() -> Self {
        Self {
            minimize_transfers: true,
            prefer_ac: false,
        }
    }
}

/// The route to take on a direct journey.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecommendedRoute {
    pub route_number: String,
    pub route_name: String,
    pub from_stop: String,
    pub to_stop: String,
    /// Stops on the trip including both ends
    pub stops_count: usize,
    pub stops: Vec<String>,
}

/// A single-route journey.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DirectJourney {
    pub total_routes: usize,
    pub total_transfers: usize,
    pub estimated_time_minutes: usize,
    pub recommended_route: RecommendedRoute,
}

impl DirectJourney {
    fn from_match(best: MatchedRoute, config: &PlannerConfig) -> Self {
        Self {
            total_routes: 1,
            total_transfers: 0,
            estimated_time_minutes: config.direct_minutes(best.stops_between),
            recommended_route: RecommendedRoute {
                route_number: best.route_number,
                route_name: best.route_name,
                from_stop: best.from_stop,
                to_stop: best.to_stop,
                stops_count: best.stops_between + 1,
                stops: best.all_stops,
            },
        }
    }
}

/// One bus of a two-bus journey.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransferLeg {
    pub route_number: String,
    pub route_name: String,
    pub from: String,
    pub to: String,
}

/// Two routes joined at a shared stop.
///
/// The change point is only known to be on both routes; nothing checks
/// that it lies after the start on the first or before the end on the second.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransferOption {
    pub first_route: TransferLeg,
    /// Shared stop name, lower-cased
    pub transfer_point: String,
    pub second_route: TransferLeg,
}

impl TransferOption {
    fn new(
        first: &RouteSummary,
        second: &RouteSummary,
        transfer_point: String,
        start: &str,
        end: &str,
    ) -> Self {
        Self {
            first_route: TransferLeg {
                route_number: first.route_number.clone(),
                route_name: first.route_name.clone(),
                from: start.to_string(),
                to: transfer_point.clone(),
            },
            second_route: TransferLeg {
                route_number: second.route_number.clone(),
                route_name: second.route_name.clone(),
                from: transfer_point.clone(),
                to: end.to_string(),
            },
            transfer_point,
        }
    }
}

/// A journey with one change.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransferJourney {
    pub total_routes: usize,
    pub total_transfers: usize,
    pub estimated_time_minutes: usize,
    pub transfer_options: Vec<TransferOption>,
}

/// No connection between the two locations.
///
/// A normal answer, not a failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NoRoute {
    pub message: String,
    pub suggestion: String,
}

/// Outcome of journey planning.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "journey_type", rename_all = "snake_case")]
pub enum JourneyPlan {
    Direct(DirectJourney),
    WithTransfer(TransferJourney),
    NoRouteFound(NoRoute),
}

impl JourneyPlan {
    /// Discriminant as it appears on the wire.
    pub fn journey_type(&self) -> &'static str {
        match self {
            JourneyPlan::Direct(_) => "direct",
            JourneyPlan::WithTransfer(_) => "with_transfer",
            JourneyPlan::NoRouteFound(_) => "no_route_found",
        }
    }

    /// Number of buses used (0 when no route was found).
    pub fn route_count(&self) -> usize {
        match self {
            JourneyPlan::Direct(d) => d.total_routes,
            JourneyPlan::WithTransfer(t) => t.total_routes,
            JourneyPlan::NoRouteFound(_) => 0,
        }
    }

    /// Estimated travel time, if a route was found.
    pub fn estimated_time_minutes(&self) -> Option<usize> {
        match self {
            JourneyPlan::Direct(d) => Some(d.estimated_time_minutes),
            JourneyPlan::WithTransfer(t) => Some(t.estimated_time_minutes),
            JourneyPlan::NoRouteFound(_) => None,
        }
    }
}

/// Journey planner over a loaded dataset.
#[derive(Debug, Clone, Copy)]
pub struct Planner<'a> {
    dataset: &'a Dataset,
    config: &'a PlannerConfig,
}

impl<'a> Planner<'a> {
    /// Create a new planner.
    pub fn new(dataset: &'a Dataset, config: &'a PlannerConfig) -> Self {
        Self { dataset, config }
    }

    /// Direct routes from `from` to `to`, best first.
    pub fn find_routes(&self, from: &str, to: &str) -> Vec<MatchedRoute> {
        find_routes(self.dataset, from, to)
    }

    /// Plan a journey from `start` to `end`.
    ///
    /// Tries direct routes first and takes the one with fewest stops. Only
    /// if there is none does it look for a single change.
    pub fn plan_journey(
        &self,
        start: &str,
        end: &str,
        preferences: &JourneyPreferences,
    ) -> JourneyPlan {
        debug!(
            start,
            end,
            minimize_transfers = preferences.minimize_transfers,
            prefer_ac = preferences.prefer_ac,
            "Planning journey"
        );

        if let Some(best) = self.find_routes(start, end).into_iter().next() {
            return JourneyPlan::Direct(DirectJourney::from_match(best, self.config));
        }

        let transfer_options = self.transfer_options(start, end);
        if !transfer_options.is_empty() {
            return JourneyPlan::WithTransfer(TransferJourney {
                total_routes: 2,
                total_transfers: 1,
                estimated_time_minutes: self.config.transfer_journey_mins,
                transfer_options,
            });
        }

        JourneyPlan::NoRouteFound(NoRoute {
            message: format!("No direct or connecting routes found between {start} and {end}"),
            suggestion: NO_ROUTE_SUGGESTION.to_string(),
        })
    }

    /// Change options in encounter order, capped at the configured limit.
    ///
    /// Walks every (route serving start, route serving end) pair in table
    /// order and, within a pair, the shared stops in first-route order.
    fn transfer_options(&self, start: &str, end: &str) -> Vec<TransferOption> {
        let start_routes = self.dataset.get_routes_for_stop(start);
        let end_routes = self.dataset.get_routes_for_stop(end);

        debug!(
            start_routes = start_routes.len(),
            end_routes = end_routes.len(),
            "Searching for a change point"
        );

        start_routes
            .iter()
            .flat_map(|first| end_routes.iter().map(move |second| (first, second)))
            .flat_map(|(first, second)| {
                common_stops(&first.stops, &second.stops)
                    .into_iter()
                    .map(move |stop| TransferOption::new(first, second, stop, start, end))
            })
            .take(self.config.max_transfer_options)
            .collect()
    }
}

/// Lower-cased stop names on both lists, each once, in `first` order.
fn common_stops(first: &[String], second: &[String]) -> Vec<String> {
    let second: HashSet<String> = second.iter().map(|s| s.to_lowercase()).collect();
    let mut seen = HashSet::new();

    first
        .iter()
        .map(|s| s.to_lowercase())
        .filter(|s| second.contains(s) && seen.insert(s.clone()))
        .collect()
}

/// Plan a journey with the default configuration.
pub fn plan_journey(
    dataset: &Dataset,
    start: &str,
    end: &str,
    preferences: &JourneyPreferences,
) -> JourneyPlan {
    let config = PlannerConfig::default();
    Planner::new(dataset, &config).plan_journey(start, end, preferences)
}
