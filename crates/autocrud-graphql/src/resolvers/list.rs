//! List query resolver.
//!
//! Handles `list<T>s` queries, returning every record of a model.

use async_graphql::Value;
use async_graphql::dynamic::{FieldFuture, ResolverContext};
use tracing::{debug, warn};

use super::{get_graphql_context, record_to_value, storage_error_to_graphql};

/// Resolver for list queries.
///
/// Handles queries like:
/// ```graphql
/// query {
///   listUsers { id name }
/// }
/// ```
///
/// Records are returned in insertion order.
pub struct ListResolver;

impl ListResolver {
    /// Creates a resolver listing the records of `model`.
    pub fn resolve(model: String) -> impl Fn(ResolverContext<'_>) -> FieldFuture<'_> + Send + Sync + Clone {
        move |ctx| {
            let model = model.clone();

            FieldFuture::new(async move {
                let gql_ctx = get_graphql_context(&ctx)?;

                let records = gql_ctx.store.list(&model).await.map_err(|e| {
                    warn!(error = %e, model = %model, "List failed");
                    storage_error_to_graphql(e)
                })?;

                debug!(
                    model = %model,
                    count = records.len(),
                    request_id = %gql_ctx.request_id,
                    "Listed records"
                );

                let items: Vec<Value> = records.into_iter().map(record_to_value).collect();
                Ok(Some(Value::List(items)))
            })
        }
    }
}
