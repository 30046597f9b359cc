//! Error types for trait operations.

use thiserror::Error;

/// Common error type for trait operations.
#[derive(Debug, Clone, Error)]
pub enum TraitError {
    /// Connection to external service failed
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// Remote service answered with an unexpected status
    #[error("unexpected response status {status}: {message}")]
    UnexpectedStatus {
        /// HTTP status code
        status: u16,
        /// Response summary
        message: String,
    },

    /// Requested resource not found
    #[error("not found: {0}")]
    NotFound(String),

    /// Operation timed out
    #[error("timeout")]
    Timeout,

    /// Parse/deserialization error
    #[error("parse error: {0}")]
    ParseError(String),

    /// Serialization error
    #[error("serialization error: {0}")]
    SerializationError(String),

    /// IO error
    #[error("IO error: {0}")]
    IoError(String),

    /// Database error
    #[error("database error: {0}")]
    DatabaseError(String),

    /// Invalid input
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Rate limited
    #[error("rate limited")]
    RateLimited,
}

impl TraitError {
    /// Returns true for transport failures worth retrying.
    ///
    /// Server-side (5xx) statuses are transient; client-side statuses and
    /// malformed payloads are not.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            TraitError::ConnectionFailed(_) | TraitError::Timeout | TraitError::RateLimited => {
                true
            }
            TraitError::UnexpectedStatus { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

impl From<std::io::Error> for TraitError {
    fn from(e: std::io::Error) -> Self {
        TraitError::IoError(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_classification() {
        assert!(TraitError::Timeout.is_transient());
        assert!(TraitError::ConnectionFailed("reset".into()).is_transient());
        assert!(TraitError::UnexpectedStatus {
            status: 503,
            message: "unavailable".into()
        }
        .is_transient());
        assert!(!TraitError::UnexpectedStatus {
            status: 404,
            message: "missing".into()
        }
        .is_transient());
        assert!(!TraitError::ParseError("bad json".into()).is_transient());
        assert!(!TraitError::DatabaseError("locked".into()).is_transient());
    }
}
