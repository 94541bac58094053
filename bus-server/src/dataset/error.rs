//! Dataset loading error types.

use std::path::PathBuf;

/// Errors that can occur when loading the network database.
#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    /// The database file could not be read
    #[error("failed to read database {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid JSON or has the wrong top-level shape
    #[error("invalid database JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A single stop or route record could not be parsed
    #[error("invalid {kind} record {key:?}: {message}")]
    InvalidRecord {
        kind: &'static str,
        key: String,
        message: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = DatasetError::InvalidRecord {
            kind: "route",
            key: "10".into(),
            message: "invalid type: string, expected a sequence".into(),
        };
        assert_eq!(
            err.to_string(),
            "invalid route record \"10\": invalid type: string, expected a sequence"
        );

        let err = DatasetError::Io {
            path: PathBuf::from("/missing/db.json"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        };
        assert!(err.to_string().contains("/missing/db.json"));
    }
}
