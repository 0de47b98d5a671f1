//! # autocrud-server
//!
//! HTTP server exposing the CRUD API generated from an annotated schema.
//!
//! Startup reads the schema file named by the configuration, derives the
//! augmented schema and its resolvers, and serves them on `/graphql` over
//! one in-memory store that lives as long as the process.

pub mod bootstrap;
pub mod config;
pub mod handlers;
pub mod middleware;
pub mod observability;
pub mod server;

pub use config::{AppConfig, LoggingConfig, SchemaSettings, ServerConfig, StoreSettings};
pub use observability::init_tracing;
pub use server::{AutocrudServer, ServerBuilder, build_app};
