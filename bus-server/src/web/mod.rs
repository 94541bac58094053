//! Web layer for the bus route planner.
//!
//! Exposes the dataset lookups, route matching, journey planning, fare
//! quotes and geocoding as JSON endpoints.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::AppState;
