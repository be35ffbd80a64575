//! Storage error types for the grant storage abstraction layer.

/// Errors that can occur during grant storage operations.
///
/// Lookups for missing keys are not errors; they surface as `Ok(None)` or a
/// zero deletion count on the trait methods. Errors here mean the backend
/// itself failed or was handed data it cannot represent.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// The requested record was not found where one was required.
    #[error("Grant not found: {key}")]
    NotFound {
        /// The natural key that was looked up.
        key: String,
    },

    /// Failed to reach the storage backend (connectivity, pool exhaustion,
    /// timeout).
    #[error("Connection error: {message}")]
    Connection {
        /// Description of the connection failure.
        message: String,
    },

    /// A stored document could not be serialized or deserialized.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// An internal backend error occurred.
    #[error("Internal error: {message}")]
    Internal {
        /// Description of the internal error.
        message: String,
    },
}

impl StorageError {
    /// Creates a new `NotFound` error.
    #[must_use]
    pub fn not_found(key: impl Into<String>) -> Self {
        Self::NotFound { key: key.into() }
    }

    /// Creates a new `Connection` error.
    #[must_use]
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Creates a new `Internal` error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Returns `true` if this is a not found error.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns `true` if this is a connection error.
    #[must_use]
    pub fn is_connection_error(&self) -> bool {
        matches!(self, Self::Connection { .. })
    }

    /// Returns `true` if the backend was unavailable, as opposed to a data
    /// problem. Callers use this to decide whether a retry makes sense.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Connection { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = StorageError::not_found("refresh:abc");
        assert_eq!(err.to_string(), "Grant not found: refresh:abc");

        let err = StorageError::connection("pool timed out");
        assert_eq!(err.to_string(), "Connection error: pool timed out");

        let err = StorageError::internal("boom");
        assert_eq!(err.to_string(), "Internal error: boom");
    }

    #[test]
    fn test_error_predicates() {
        let err = StorageError::not_found("k");
        assert!(err.is_not_found());
        assert!(!err.is_connection_error());
        assert!(!err.is_transient());

        let err = StorageError::connection("refused");
        assert!(err.is_connection_error());
        assert!(err.is_transient());
        assert!(!err.is_not_found());

        let err = StorageError::internal("boom");
        assert!(!err.is_transient());
    }
}
