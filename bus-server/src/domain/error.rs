//! Domain error types.
//!
//! These errors represent validation failures when domain values are built
//! programmatically. They are distinct from loading and API errors.

/// Domain-level errors for validation and data consistency.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomainError {
    /// A route must list at least one stop
    #[error("route {0} has no stops")]
    EmptyRoute(String),

    /// Fare slab bounds are reversed
    #[error("invalid fare slab: min {min_km} km is above max {max_km} km")]
    InvalidSlab { min_km: String, max_km: String },
}
