// Error types for fpscope
//
// Structured errors for the store, ingestion and query paths. Query and write
// paths degrade on failure; these values reach callers only where a boundary
// has to decide what to do with them.

use std::io;
use thiserror::Error;

/// Main error type for fpscope operations
#[derive(Debug, Error)]
pub enum CorrelationError {
    /// Database operation errors
    #[error("Database error: {0}")]
    DatabaseError(String),

    /// Invalid configuration or parameters
    #[error("Invalid configuration: {message}")]
    ConfigError { message: String },

    /// Invalid input from a caller or capture source
    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    /// Percent-decoding of a query value failed
    #[error("Decode error: {message}")]
    DecodeError { message: String },

    /// Generic I/O error
    #[error("I/O error: {source}")]
    IoError {
        #[from]
        source: io::Error,
    },

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// Generic error with context
    #[error("{0}")]
    Other(String),
}

impl From<anyhow::Error> for CorrelationError {
    fn from(err: anyhow::Error) -> Self {
        CorrelationError::Other(err.to_string())
    }
}

impl From<toml::de::Error> for CorrelationError {
    fn from(err: toml::de::Error) -> Self {
        CorrelationError::ConfigError {
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_database_error_message() {
        let err = CorrelationError::DatabaseError("connection reset".to_string());
        assert_eq!(err.to_string(), "Database error: connection reset");
    }

    #[test]
    fn test_error_conversion_from_io() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "missing");
        let err: CorrelationError = io_err.into();

        assert!(matches!(err, CorrelationError::IoError { .. }));
    }

    #[test]
    fn test_error_chain_preserved() {
        use std::error::Error;

        let io_err = io::Error::new(io::ErrorKind::PermissionDenied, "denied");
        let err = CorrelationError::from(io_err);

        assert!(err.source().is_some());
    }

    #[test]
    fn test_decode_error_message() {
        let err = CorrelationError::DecodeError {
            message: "invalid escape %zz".to_string(),
        };
        assert!(err.to_string().contains("%zz"));
    }
}
