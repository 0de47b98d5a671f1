//! GraphQL resolvers for model records.
//!
//! This module provides the resolver implementations for the generated schema:
//! - `list`: `list<T>s` queries
//! - `create`, `update`, `delete`: the per-model mutations
//! - `relation`: `@connection` fields, forward and inverse
//!
//! Resolvers are collected into a [`ResolverMap`] keyed by type name and
//! field name; the schema builder attaches them to the matching fields.

mod create;
mod delete;
mod list;
mod map;
mod relation;
mod update;

pub use create::CreateResolver;
pub use delete::DeleteResolver;
pub use list::ListResolver;
pub use map::{FieldResolverFn, ResolverMap};
pub use relation::{Related, RelationResolver, RelationStrategy};
pub use update::UpdateResolver;

use async_graphql::dynamic::{ResolverContext, ValueAccessor};
use async_graphql::{Error as GraphQLError, ErrorExtensions, Value};
use autocrud_schema::{Declaration, OperationNames, SchemaError};
use autocrud_storage::{Record, StorageError, id_value, record_from_json};
use tracing::debug;

use crate::context::GraphQLContext;

const QUERY: &str = "Query";
const MUTATION: &str = "Mutation";

/// Builds the list/create/update/delete resolvers for every model.
#[must_use]
pub fn crud_resolvers(models: &[Declaration]) -> ResolverMap {
    let mut map = ResolverMap::new();
    for model in models {
        let names = OperationNames::for_model(&model.name);
        map.insert(QUERY, &names.list, ListResolver::resolve(model.name.clone()));
        map.insert(MUTATION, &names.create, CreateResolver::resolve(model.name.clone()));
        map.insert(MUTATION, &names.update, UpdateResolver::resolve(model.name.clone()));
        map.insert(MUTATION, &names.delete, DeleteResolver::resolve(model.name.clone()));
    }
    debug!(models = models.len(), resolvers = map.len(), "Built CRUD resolvers");
    map
}

/// Builds a resolver for every `@connection` field of every declaration.
///
/// # Errors
///
/// Returns [`SchemaError::DirectiveArgument`] if a `fromField` argument is
/// not a string.
pub fn relation_resolvers(declarations: &[Declaration]) -> Result<ResolverMap, SchemaError> {
    let mut map = ResolverMap::new();
    for relation in RelationResolver::collect(declarations)? {
        let (owner, field) = (relation.owner.clone(), relation.field.clone());
        map.insert(&owner, &field, relation.into_field_resolver());
    }
    debug!(resolvers = map.len(), "Built relation resolvers");
    Ok(map)
}

/// Helper to extract GraphQL context from resolver context.
pub(crate) fn get_graphql_context<'a>(
    ctx: &'a ResolverContext<'_>,
) -> Result<&'a GraphQLContext, GraphQLError> {
    ctx.data::<GraphQLContext>()
        .map_err(|_| GraphQLError::new("GraphQL context not available"))
}

/// Reads the `id` argument as an identifier string.
///
/// Integer literals are accepted and addressed by their decimal form.
pub(crate) fn id_argument(ctx: &ResolverContext<'_>) -> Result<String, GraphQLError> {
    let value = ctx
        .args
        .get("id")
        .ok_or_else(|| GraphQLError::new("Missing required argument 'id'"))?;
    let json = value_accessor_to_json(&value)?;
    id_value(&json).ok_or_else(|| GraphQLError::new("Argument 'id' must be a string or an integer"))
}

/// Reads the payload argument, which is named after the model.
pub(crate) fn payload_argument(
    ctx: &ResolverContext<'_>,
    model: &str,
) -> Result<Record, GraphQLError> {
    let value = ctx
        .args
        .get(model)
        .ok_or_else(|| GraphQLError::new(format!("Missing required argument '{model}'")))?;
    record_from_json(value_accessor_to_json(&value)?).map_err(storage_error_to_graphql)
}

/// Reads the parent object of a field as a record.
pub(crate) fn parent_record(ctx: &ResolverContext<'_>) -> Record {
    match ctx.parent_value.as_value() {
        Some(Value::Object(obj)) => obj
            .iter()
            .map(|(k, v)| (k.to_string(), graphql_value_to_json(v)))
            .collect(),
        _ => Record::new(),
    }
}

/// Converts a storage error into a GraphQL error with a `code` extension.
pub(crate) fn storage_error_to_graphql(error: StorageError) -> GraphQLError {
    let code = if error.is_invalid_record() {
        "INVALID_RECORD"
    } else {
        "STORAGE_ERROR"
    };
    GraphQLError::new(error.to_string()).extend_with(|_, e| e.set("code", code))
}

/// Converts a record to a GraphQL object value.
pub(crate) fn record_to_value(record: Record) -> Value {
    json_to_graphql_value(serde_json::Value::Object(record))
}

/// Convert a serde_json::Value to async_graphql::Value.
pub(crate) fn json_to_graphql_value(json: serde_json::Value) -> Value {
    match json {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => Value::Boolean(b),
        serde_json::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::Number(i.into())
            } else if let Some(u) = n.as_u64() {
                Value::Number(u.into())
            } else if let Some(f) = n.as_f64() {
                Value::Number(
                    async_graphql::Number::from_f64(f)
                        .unwrap_or_else(|| async_graphql::Number::from(0)),
                )
            } else {
                Value::Null
            }
        }
        serde_json::Value::String(s) => Value::String(s),
        serde_json::Value::Array(arr) => {
            Value::List(arr.into_iter().map(json_to_graphql_value).collect())
        }
        serde_json::Value::Object(obj) => {
            let map: async_graphql::indexmap::IndexMap<async_graphql::Name, Value> = obj
                .into_iter()
                .map(|(k, v)| (async_graphql::Name::new(k), json_to_graphql_value(v)))
                .collect();
            Value::Object(map)
        }
    }
}

/// Converts a GraphQL Value to serde_json::Value.
pub(crate) fn graphql_value_to_json(value: &Value) -> serde_json::Value {
    match value {
        Value::Null => serde_json::Value::Null,
        Value::Boolean(b) => serde_json::Value::Bool(*b),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                serde_json::Value::Number(i.into())
            } else if let Some(u) = n.as_u64() {
                serde_json::Value::Number(u.into())
            } else if let Some(f) = n.as_f64() {
                serde_json::json!(f)
            } else {
                serde_json::Value::Null
            }
        }
        Value::String(s) => serde_json::Value::String(s.clone()),
        Value::Enum(e) => serde_json::Value::String(e.to_string()),
        Value::List(items) => {
            serde_json::Value::Array(items.iter().map(graphql_value_to_json).collect())
        }
        Value::Object(obj) => serde_json::Value::Object(
            obj.iter()
                .map(|(k, v)| (k.to_string(), graphql_value_to_json(v)))
                .collect(),
        ),
        Value::Binary(bytes) => {
            serde_json::Value::Array(bytes.iter().map(|b| serde_json::json!(b)).collect())
        }
    }
}

/// Converts a ValueAccessor to serde_json::Value.
pub(crate) fn value_accessor_to_json(
    value: &ValueAccessor<'_>,
) -> Result<serde_json::Value, GraphQLError> {
    if value.is_null() {
        return Ok(serde_json::Value::Null);
    }

    if let Ok(b) = value.boolean() {
        return Ok(serde_json::Value::Bool(b));
    }

    if let Ok(i) = value.i64() {
        return Ok(serde_json::Value::Number(i.into()));
    }

    if let Ok(f) = value.f64() {
        return Ok(serde_json::json!(f));
    }

    if let Ok(s) = value.string() {
        return Ok(serde_json::Value::String(s.to_string()));
    }

    if let Ok(name) = value.enum_name() {
        return Ok(serde_json::Value::String(name.to_string()));
    }

    if let Ok(list) = value.list() {
        let items: Result<Vec<serde_json::Value>, GraphQLError> =
            list.iter().map(|v| value_accessor_to_json(&v)).collect();
        return Ok(serde_json::Value::Array(items?));
    }

    if let Ok(obj) = value.object() {
        let mut map = serde_json::Map::new();
        for (k, v) in obj.iter() {
            map.insert(k.to_string(), value_accessor_to_json(&v)?);
        }
        return Ok(serde_json::Value::Object(map));
    }

    Ok(serde_json::Value::Null)
}
