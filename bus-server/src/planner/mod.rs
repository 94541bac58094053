//! Journey planner over the static bus network.
//!
//! This module answers: "which bus gets me from here to there?"
//!
//! Locations are free text matched against stop names by case-insensitive
//! substring. A direct route needs the start to appear before the end on
//! one route's stop list. Failing that, the planner pairs a route serving
//! the start with a route serving the end and offers every stop the two
//! have in common as a change point.

mod config;
mod journey;
mod matcher;
mod rank;


pub use config::PlannerConfig;
pub use journey::{
    DirectJourney, JourneyPlan, JourneyPreferences, NoRoute, Planner, RecommendedRoute,
    TransferJourney, TransferLeg, TransferOption, plan_journey,
};
pub use matcher::{MatchedRoute, find_routes, match_route};
pub use rank::rank_matches;
