//! Domain types for the bus route planner.
//!
//! Stops, routes and fare slabs as they appear in the static network
//! database. Values are immutable once loaded; everything that reads them
//! does so through shared references.

mod de;
mod error;
mod fare;
mod route;
mod stop;

pub use error::DomainError;
pub use fare::{FareSlab, FareTable};
pub use route::Route;
pub use stop::{Coordinates, Stop};
