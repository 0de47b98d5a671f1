//! Update mutation resolver.
//!
//! Handles `update<T>` mutations: a shallow merge of the payload into the
//! stored record.

use async_graphql::dynamic::{FieldFuture, ResolverContext};
use tracing::{debug, trace, warn};

use super::{
    get_graphql_context, id_argument, payload_argument, record_to_value, storage_error_to_graphql,
};

/// Resolver for record update mutations.
///
/// Handles mutations like:
/// ```graphql
/// mutation {
///   updatePost(id: "0", Post: { title: "New" }) { id title }
/// }
/// ```
///
/// Resolves to `null` when no record has the given identifier.
pub struct UpdateResolver;

impl UpdateResolver {
    /// Creates a resolver for record updates.
    ///
    /// # Arguments
    /// * `model` - The model type name (e.g., "Post")
    pub fn resolve(model: String) -> impl Fn(ResolverContext<'_>) -> FieldFuture<'_> + Send + Sync + Clone {
        move |ctx| {
            let model = model.clone();

            FieldFuture::new(async move {
                debug!(model = %model, "Processing update mutation");

                let gql_ctx = get_graphql_context(&ctx)?;
                let id = id_argument(&ctx)?;
                let patch = payload_argument(&ctx, &model)?;

                trace!(model = %model, id = %id, "Updating record via store");

                let updated = gql_ctx.store.update(&model, &id, patch).await.map_err(|e| {
                    warn!(error = %e, model = %model, id = %id, "Update failed");
                    storage_error_to_graphql(e)
                })?;

                match updated {
                    Some(record) => {
                        debug!(model = %model, id = %id, "Record updated successfully");
                        Ok(Some(record_to_value(record)))
                    }
                    None => {
                        debug!(model = %model, id = %id, "Update target not found");
                        Ok(None)
                    }
                }
            })
        }
    }
}
