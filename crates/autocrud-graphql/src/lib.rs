//! # autocrud-graphql
//!
//! GraphQL execution layer for Autocrud.
//!
//! This crate turns the augmented schema produced by `autocrud-schema` into
//! an executable async-graphql dynamic schema:
//!
//! - CRUD resolvers (`list<T>s`, `create<T>`, `update<T>`, `delete<T>`) per model
//! - Relation resolvers for every `@connection` field
//! - A [`ResolverMap`] keyed by type name and field name
//! - Axum handlers for `POST /graphql` and `GET /graphql`
//!
//! ## Overview
//!
//! ```ignore
//! let augmented = SchemaTransformer::transform(&source)?;
//! let resolvers = crud_resolvers(&augmented.models)
//!     .merge(relation_resolvers(&augmented.declarations)?);
//! let schema = ExecutableSchemaBuilder::new(&augmented.sdl, resolvers, config).build()?;
//! ```
//!
//! Resolvers read the store from the per-request [`GraphQLContext`].
//!
//! ## Modules
//!
//! - [`config`] - Configuration options
//! - [`context`] - GraphQL execution context
//! - [`resolvers`] - CRUD and relation resolvers
//! - [`schema`] - Executable schema building
//! - [`handler`] - Axum HTTP handlers
//! - [`error`] - Error types for GraphQL operations

pub mod config;
pub mod context;
pub mod error;
pub mod handler;
pub mod resolvers;
pub mod schema;

// Re-export main types
pub use config::GraphQLConfig;
pub use context::{GraphQLContext, GraphQLContextBuilder};
pub use error::GraphQLError;
pub use handler::{GraphQLState, graphql_handler, graphql_handler_get};
pub use resolvers::{
    FieldResolverFn, Related, RelationResolver, RelationStrategy, ResolverMap, crud_resolvers,
    relation_resolvers,
};
pub use schema::{ExecutableSchemaBuilder, SchemaBuilderConfig};

/// Result type for GraphQL operations.
pub type Result<T> = std::result::Result<T, GraphQLError>;
