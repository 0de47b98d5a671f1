//! Storage error types.

/// Errors that can occur during storage operations.
///
/// A missing record is not an error: lookups, updates and deletes report it
/// through `None` / `false`.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// The payload is not a record (a JSON object).
    #[error("Invalid record: {message}")]
    InvalidRecord {
        /// Description of why the payload was rejected.
        message: String,
    },

    /// An internal storage error occurred.
    #[error("Internal error: {message}")]
    Internal {
        /// Description of the internal error.
        message: String,
    },
}

impl StorageError {
    /// Creates a new `InvalidRecord` error.
    #[must_use]
    pub fn invalid_record(message: impl Into<String>) -> Self {
        Self::InvalidRecord {
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

    /// Returns `true` if the caller sent a bad payload.
    #[must_use]
    pub fn is_invalid_record(&self) -> bool {
        matches!(self, Self::InvalidRecord { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            StorageError::invalid_record("expected an object").to_string(),
            "Invalid record: expected an object"
        );
        assert_eq!(StorageError::internal("boom").to_string(), "Internal error: boom");
    }

    #[test]
    fn test_error_category() {
        assert!(StorageError::invalid_record("x").is_invalid_record());
        assert!(!StorageError::internal("x").is_invalid_record());
    }
}
