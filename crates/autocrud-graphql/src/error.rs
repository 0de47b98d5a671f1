//! Error types for GraphQL operations.
//!
//! This module defines the error types used throughout the GraphQL layer.
//! Errors are converted to HTTP responses by the handlers and to GraphQL
//! error extensions by the resolvers.

use std::fmt;

use autocrud_schema::SchemaError;
use autocrud_storage::StorageError;

/// Errors that can occur during GraphQL operations.
#[derive(Debug)]
pub enum GraphQLError {
    /// The annotated or augmented schema is malformed.
    InvalidSchema(SchemaError),

    /// The dynamic schema could not be assembled.
    SchemaBuildFailed(String),

    /// Invalid request or query syntax.
    InvalidQuery(String),

    /// Storage error.
    Storage(String),

    /// Internal server error.
    Internal(String),
}

impl fmt::Display for GraphQLError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidSchema(err) => write!(f, "Invalid schema: {err}"),
            Self::SchemaBuildFailed(msg) => {
                write!(f, "Failed to build GraphQL schema: {msg}")
            }
            Self::InvalidQuery(msg) => write!(f, "Invalid GraphQL query: {msg}"),
            Self::Storage(msg) => write!(f, "Storage error: {msg}"),
            Self::Internal(msg) => write!(f, "Internal error: {msg}"),
        }
    }
}

impl std::error::Error for GraphQLError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidSchema(err) => Some(err),
            _ => None,
        }
    }
}

impl GraphQLError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::InvalidQuery(_) => 400,
            Self::InvalidSchema(_)
            | Self::SchemaBuildFailed(_)
            | Self::Storage(_)
            | Self::Internal(_) => 500,
        }
    }

    /// Returns the error code for GraphQL error extensions.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidSchema(_) => "INVALID_SCHEMA",
            Self::SchemaBuildFailed(_) => "SCHEMA_BUILD_FAILED",
            Self::InvalidQuery(_) => "INVALID_QUERY",
            Self::Storage(_) => "STORAGE_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Converts the error to a GraphQL-shaped error body.
    #[must_use]
    pub fn to_response_body(&self) -> serde_json::Value {
        serde_json::json!({
            "errors": [{
                "message": self.to_string(),
                "extensions": { "code": self.error_code() }
            }]
        })
    }
}

impl From<SchemaError> for GraphQLError {
    fn from(err: SchemaError) -> Self {
        Self::InvalidSchema(err)
    }
}

impl From<StorageError> for GraphQLError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::InvalidRecord { message } => Self::InvalidQuery(message),
            other => Self::Storage(other.to_string()),
        }
    }
}
