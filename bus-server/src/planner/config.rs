//! Planner configuration.

/// Tunable constants for journey planning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannerConfig {
    /// Minutes allowed per stop travelled on a direct route.
    pub minutes_per_stop: usize,

    /// Flat time estimate for any journey with a change (minutes).
    pub transfer_journey_mins: usize,

    /// Maximum number of change options to return.
    pub max_transfer_options: usize,
}

impl PlannerConfig {
    /// Create a new configuration with the given parameters.
    pub fn new(
        minutes_per_stop: usize,
        transfer_journey_mins: usize,
        max_transfer_options: usize,
    ) -> Self {
        Self {
            minutes_per_stop,
            transfer_journey_mins,
            max_transfer_options,
        }
    }

    /// Estimated riding time for a direct trip over `stops_between` stops.
    pub fn direct_minutes(&self, stops_between: usize) -> usize {
        stops_between.saturating_mul(self.minutes_per_stop)
    }
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            minutes_per_stop: 3,
            transfer_journey_mins: 45,
            max_transfer_options: 3,
        }
    }
}
