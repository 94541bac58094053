//! Application state for the web layer.

use std::sync::Arc;

use crate::cache::CachedGeocoder;
use crate::dataset::Dataset;
use crate::planner::PlannerConfig;

/// Shared application state.
///
/// Contains all the services needed to handle requests.
#[derive(Clone)]
pub struct AppState {
    /// The loaded bus network (read-only)
    pub dataset: Arc<Dataset>,

    /// Cached geocoding client
    pub geocoder: Arc<CachedGeocoder>,

    /// Journey planner configuration
    pub config: Arc<PlannerConfig>,

    /// City assumed for place names
    pub default_city: Arc<str>,
}

impl AppState {
    /// Create a new app state.
    pub fn new(
        dataset: Dataset,
        geocoder: CachedGeocoder,
        config: PlannerConfig,
        default_city: impl Into<Arc<str>>,
    ) -> Self {
        Self {
            dataset: Arc::new(dataset),
            geocoder: Arc::new(geocoder),
            config: Arc::new(config),
            default_city: default_city.into(),
        }
    }
}
