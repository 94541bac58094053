//! Geocoding error types.

use thiserror::Error;

/// Errors from the geocoding providers.
#[derive(Debug, Error)]
pub enum GeocodingError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Provider returned an error status code
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Response body was not the JSON we expected
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// Provider answered but returned a coordinate we couldn't read
    #[error("invalid coordinate {0:?}")]
    InvalidCoordinate(String),

    /// Provider had no result for the query
    #[error("no result for {0:?}")]
    NotFound(String),

    /// Provider is missing credentials or there is no provider at all
    #[error("not configured: {0}")]
    NotConfigured(String),
}
