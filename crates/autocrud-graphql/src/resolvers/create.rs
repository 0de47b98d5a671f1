//! Create mutation resolver.
//!
//! Handles `create<T>` mutations for creating new records.

use async_graphql::dynamic::{FieldFuture, ResolverContext};
use tracing::{debug, trace, warn};

use super::{get_graphql_context, payload_argument, record_to_value, storage_error_to_graphql};

/// Resolver for record creation mutations.
///
/// Handles mutations like:
/// ```graphql
/// mutation {
///   createUser(User: { name: "Ann" }) { id name }
/// }
/// ```
///
/// The payload argument carries the model's name. Any `id` in the payload
/// is ignored; the store assigns one.
pub struct CreateResolver;

impl CreateResolver {
    /// Creates a resolver for record creation.
    ///
    /// # Arguments
    /// * `model` - The model type name (e.g., "User")
    pub fn resolve(model: String) -> impl Fn(ResolverContext<'_>) -> FieldFuture<'_> + Send + Sync + Clone {
        move |ctx| {
            let model = model.clone();

            FieldFuture::new(async move {
                debug!(model = %model, "Processing create mutation");

                let gql_ctx = get_graphql_context(&ctx)?;
                let input = payload_argument(&ctx, &model)?;

                trace!(model = %model, fields = input.len(), "Creating record via store");

                let record = gql_ctx.store.create(&model, input).await.map_err(|e| {
                    warn!(error = %e, model = %model, "Create failed");
                    storage_error_to_graphql(e)
                })?;

                debug!(
                    model = %model,
                    id = ?record.get(autocrud_storage::ID_FIELD),
                    request_id = %gql_ctx.request_id,
                    "Record created successfully"
                );

                Ok(Some(record_to_value(record)))
            })
        }
    }
}
