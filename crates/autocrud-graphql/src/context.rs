//! GraphQL execution context.
//!
//! The context is constructed per request and handed to async-graphql as
//! request data. Resolvers read the shared store from it.
//!
//! # Example
//!
//! ```ignore
//! use autocrud_graphql::GraphQLContextBuilder;
//!
//! let context = GraphQLContextBuilder::new()
//!     .with_store(store.clone())
//!     .with_request_id("req-123")
//!     .build()?;
//! ```

use autocrud_storage::DynRecordStore;

/// GraphQL execution context.
///
/// Cheap to clone: the store is shared through an `Arc`.
#[derive(Clone)]
pub struct GraphQLContext {
    /// Record store shared by every request.
    pub store: DynRecordStore,

    /// Request ID for tracing and correlation.
    pub request_id: String,
}

impl GraphQLContext {
    /// Creates a new builder for GraphQLContext.
    #[must_use]
    pub fn builder() -> GraphQLContextBuilder {
        GraphQLContextBuilder::default()
    }
}

/// Builder for constructing GraphQLContext.
#[derive(Default)]
pub struct GraphQLContextBuilder {
    store: Option<DynRecordStore>,
    request_id: Option<String>,
}

impl GraphQLContextBuilder {
    /// Creates a new builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the record store.
    #[must_use]
    pub fn with_store(mut self, store: DynRecordStore) -> Self {
        self.store = Some(store);
        self
    }

    /// Sets the request ID.
    #[must_use]
    pub fn with_request_id(mut self, id: impl Into<String>) -> Self {
        self.request_id = Some(id.into());
        self
    }

    /// Builds the GraphQLContext.
    ///
    /// # Errors
    ///
    /// Returns an error if required fields are missing.
    pub fn build(self) -> Result<GraphQLContext, ContextBuilderError> {
        let store = self
            .store
            .ok_or(ContextBuilderError::MissingField("store"))?;

        let request_id = self
            .request_id
            .ok_or(ContextBuilderError::MissingField("request_id"))?;

        Ok(GraphQLContext { store, request_id })
    }
}

/// Errors that can occur when building a GraphQLContext.
#[derive(Debug, thiserror::Error)]
pub enum ContextBuilderError {
    /// A required field was not provided.
    #[error("Missing required field: {0}")]
    MissingField(&'static str),
}
