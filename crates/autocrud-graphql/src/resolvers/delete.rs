//! Delete mutation resolver.
//!
//! Handles `delete<T>` mutations for removing records.

use async_graphql::Value;
use async_graphql::dynamic::{FieldFuture, ResolverContext};
use tracing::{debug, trace, warn};

use super::{get_graphql_context, id_argument, storage_error_to_graphql};

/// Resolver for record delete mutations.
///
/// Handles mutations like:
/// ```graphql
/// mutation {
///   deleteUser(id: "0")
/// }
/// ```
///
/// Returns `true` if a record was removed and `false` if none matched.
pub struct DeleteResolver;

impl DeleteResolver {
    /// Creates a resolver for record deletion.
    ///
    /// # Arguments
    /// * `model` - The model type name (e.g., "User")
    pub fn resolve(model: String) -> impl Fn(ResolverContext<'_>) -> FieldFuture<'_> + Send + Sync + Clone {
        move |ctx| {
            let model = model.clone();

            FieldFuture::new(async move {
                debug!(model = %model, "Processing delete mutation");

                let gql_ctx = get_graphql_context(&ctx)?;
                let id = id_argument(&ctx)?;

                trace!(model = %model, id = %id, "Deleting record via store");

                let removed = gql_ctx.store.delete(&model, &id).await.map_err(|e| {
                    warn!(error = %e, model = %model, id = %id, "Delete failed");
                    storage_error_to_graphql(e)
                })?;

                debug!(model = %model, id = %id, removed, "Delete processed");

                Ok(Some(Value::Boolean(removed)))
            })
        }
    }
}
