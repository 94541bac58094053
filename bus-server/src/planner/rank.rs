//! Ranking of matched routes.

use super::matcher::MatchedRoute;

/// Rank matches by stops travelled, fewest first.
///
/// The sort is stable, so routes with equal stop counts keep the order they
/// were found in (route-table order).
pub fn rank_matches(mut matches: Vec<MatchedRoute>) -> Vec<MatchedRoute> {
    matches.sort_by_key(|m| m.stops_between);
    matches
}
