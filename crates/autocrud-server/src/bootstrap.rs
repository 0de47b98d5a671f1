//! Startup wiring: schema file → augmented schema → resolvers → executable schema.
//!
//! Everything here runs once, before the listener is bound. Any failure
//! aborts startup.

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use autocrud_graphql::{ExecutableSchemaBuilder, GraphQLState, crud_resolvers, relation_resolvers};
use autocrud_schema::{AugmentedSchema, SchemaTransformer};
use autocrud_storage::{DynRecordStore, InMemoryStore};
use tracing::{debug, info};

use crate::config::{AppConfig, StoreSettings};

/// Reads the annotated schema text.
pub fn read_schema_source(path: &Path) -> anyhow::Result<String> {
    std::fs::read_to_string(path)
        .with_context(|| format!("failed to read schema file '{}'", path.display()))
}

/// Reads and transforms the configured schema file.
pub fn transform_schema_file(cfg: &AppConfig) -> anyhow::Result<AugmentedSchema> {
    let source = read_schema_source(&cfg.schema.path)?;
    SchemaTransformer::transform(&source)
        .with_context(|| format!("invalid schema in '{}'", cfg.schema.path.display()))
}

/// Creates the process-lifetime record store.
pub fn create_store(settings: &StoreSettings) -> DynRecordStore {
    debug!(id_scope = ?settings.id_scope, "Creating in-memory store");
    Arc::new(InMemoryStore::with_id_scope(settings.id_scope))
}

/// Builds the GraphQL handler state from annotated schema text.
pub fn build_graphql_state(cfg: &AppConfig, source: &str) -> anyhow::Result<GraphQLState> {
    let augmented = SchemaTransformer::transform(source).context("failed to transform schema")?;

    if cfg.schema.print_transformed {
        info!(sdl = %augmented.sdl, "Augmented schema");
    }

    let relations = relation_resolvers(&augmented.declarations)
        .context("invalid @connection directive")?;
    let relation_count = relations.len();
    let resolvers = crud_resolvers(&augmented.models).merge(relations);

    let schema = ExecutableSchemaBuilder::new(
        &augmented.sdl,
        resolvers,
        cfg.graphql.to_schema_builder_config(),
    )
    .build()
    .context("failed to build GraphQL schema")?;

    info!(
        models = augmented.models.len(),
        relations = relation_count,
        "GraphQL schema ready"
    );

    Ok(GraphQLState {
        schema,
        store: create_store(&cfg.store),
        playground: cfg.graphql.playground,
    })
}

/// Reads the configured schema file and builds the GraphQL handler state.
pub fn build_graphql_state_from_file(cfg: &AppConfig) -> anyhow::Result<GraphQLState> {
    let source = read_schema_source(&cfg.schema.path)?;
    debug!(path = %cfg.schema.path.display(), bytes = source.len(), "Schema file loaded");
    build_graphql_state(cfg, &source)
}
