//! Relation field resolvers.
//!
//! Every field carrying `@connection` gets a [`RelationResolver`]. The
//! related records live in the partition named after the field's type.
//!
//! - Forward (`@connection` without `fromField`): the parent's own field
//!   holds the related identifier, or a list of identifiers.
//! - Inverse (`@connection(fromField: "f")`): related records whose field
//!   `f` holds the parent's identifier, or a list containing it.

use std::collections::HashSet;
use std::sync::Arc;

use async_graphql::Value;
use async_graphql::dynamic::{FieldFuture, ResolverContext};
use autocrud_schema::{Argument, ConnectionDirective, Declaration, DeclarationKind, SchemaError};
use autocrud_storage::{Record, RecordStore, StorageError, id_value, record_id};
use serde_json::Value as JsonValue;
use tracing::trace;

use super::{get_graphql_context, parent_record, record_to_value, storage_error_to_graphql};

/// How related records are located.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelationStrategy {
    /// The parent's field holds the related identifier(s).
    Forward,
    /// The related records point back at the parent through `from_field`.
    Inverse {
        /// Field on the related type holding the parent's identifier.
        from_field: String,
    },
}

/// Result of a relation lookup.
#[derive(Debug, Clone, PartialEq)]
pub enum Related {
    /// The single related record.
    One(Record),
    /// The related records, in partition order.
    Many(Vec<Record>),
    /// A singular relation with no match.
    Missing,
}

impl Related {
    /// Converts to the field value; `Missing` resolves to `null`.
    #[must_use]
    pub fn into_value(self) -> Option<Value> {
        match self {
            Self::One(record) => Some(record_to_value(record)),
            Self::Many(records) => Some(Value::List(
                records.into_iter().map(record_to_value).collect(),
            )),
            Self::Missing => None,
        }
    }
}

/// Resolver for one `@connection` field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationResolver {
    /// Type owning the field.
    pub owner: String,
    /// Field name.
    pub field: String,
    /// Related type; also the partition searched.
    pub target: String,
    /// Whether the field is a list.
    pub plural: bool,
    pub strategy: RelationStrategy,
}

impl RelationResolver {
    /// Builds the resolver for `field` of `owner`, if it carries `@connection`.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::DirectiveArgument`] if `fromField` is not a string.
    pub fn from_argument(owner: &str, field: &Argument) -> Result<Option<Self>, SchemaError> {
        let Some(connection) = ConnectionDirective::from_argument(owner, field)? else {
            return Ok(None);
        };

        let strategy = match connection.from_field {
            Some(from_field) => RelationStrategy::Inverse { from_field },
            None => RelationStrategy::Forward,
        };

        Ok(Some(Self {
            owner: owner.to_string(),
            field: field.name.clone(),
            target: field.ty.leaf_name().to_string(),
            plural: field.ty.is_plural(),
            strategy,
        }))
    }

    /// Collects the relation resolvers of every object declaration.
    ///
    /// # Errors
    ///
    /// Returns the first malformed `@connection` encountered.
    pub fn collect(declarations: &[Declaration]) -> Result<Vec<Self>, SchemaError> {
        let mut relations = Vec::new();
        for declaration in declarations
            .iter()
            .filter(|d| d.kind == DeclarationKind::Object)
        {
            for field in &declaration.args {
                if let Some(relation) = Self::from_argument(&declaration.name, field)? {
                    relations.push(relation);
                }
            }
        }
        Ok(relations)
    }

    /// Picks the related records of `parent` out of the target partition.
    #[must_use]
    pub fn select(&self, parent: &Record, partition: &[Record]) -> Related {
        match &self.strategy {
            RelationStrategy::Forward => {
                let ids = forward_ids(parent.get(&self.field));
                let matches = |candidate: &&Record| {
                    record_id(candidate).is_some_and(|id| ids.contains(&id))
                };
                self.gather(partition.iter().filter(matches))
            }
            RelationStrategy::Inverse { from_field } => {
                let Some(parent_id) = record_id(parent) else {
                    return self.gather(std::iter::empty());
                };
                let matches = |candidate: &&Record| {
                    points_at(candidate.get(from_field), &parent_id)
                };
                self.gather(partition.iter().filter(matches))
            }
        }
    }

    /// Looks up the related records of `parent` in `store`.
    ///
    /// # Errors
    ///
    /// Propagates storage failures.
    pub async fn resolve(
        &self,
        parent: &Record,
        store: &dyn RecordStore,
    ) -> Result<Related, StorageError> {
        if self.strategy == RelationStrategy::Forward && !self.plural {
            let Some(id) = parent.get(&self.field).and_then(id_value) else {
                return Ok(Related::Missing);
            };
            return Ok(store
                .get(&self.target, &id)
                .await?
                .map_or(Related::Missing, Related::One));
        }

        let partition = store.list(&self.target).await?;
        Ok(self.select(parent, &partition))
    }

    /// Wraps the resolver as a field resolver reading the parent object.
    pub fn into_field_resolver(
        self,
    ) -> impl Fn(ResolverContext<'_>) -> FieldFuture<'_> + Send + Sync + Clone {
        let relation = Arc::new(self);
        move |ctx| {
            let relation = relation.clone();

            FieldFuture::new(async move {
                let gql_ctx = get_graphql_context(&ctx)?;
                let parent = parent_record(&ctx);

                let related = relation
                    .resolve(&parent, gql_ctx.store.as_ref())
                    .await
                    .map_err(storage_error_to_graphql)?;

                trace!(
                    owner = %relation.owner,
                    field = %relation.field,
                    target = %relation.target,
                    related = related_count(&related),
                    "Resolved relation"
                );

                Ok(related.into_value())
            })
        }
    }

    fn gather<'r>(&self, mut matches: impl Iterator<Item = &'r Record>) -> Related {
        if self.plural {
            Related::Many(matches.cloned().collect())
        } else {
            matches
                .next()
                .cloned()
                .map_or(Related::Missing, Related::One)
        }
    }
}

/// Identifiers held by a forward relation field.
///
/// A list yields each identifier it holds; a single identifier counts as a
/// one-element list.
fn forward_ids(value: Option<&JsonValue>) -> HashSet<String> {
    match value {
        Some(JsonValue::Array(items)) => items.iter().filter_map(id_value).collect(),
        Some(value) => id_value(value).into_iter().collect(),
        None => HashSet::new(),
    }
}

/// Whether `value` is `parent_id` or a list containing it.
fn points_at(value: Option<&JsonValue>, parent_id: &str) -> bool {
    match value {
        Some(JsonValue::Array(items)) => items
            .iter()
            .any(|item| id_value(item).as_deref() == Some(parent_id)),
        Some(value) => id_value(value).as_deref() == Some(parent_id),
        None => false,
    }
}

fn related_count(related: &Related) -> usize {
    match related {
        Related::One(_) => 1,
        Related::Many(records) => records.len(),
        Related::Missing => 0,
    }
}

#[cfg(test)]
mod tests {
    use autocrud_schema::parse_declarations;
    use autocrud_storage::{InMemoryStore, record_from_json};
    use serde_json::json;

    use super::*;

    fn rec(value: JsonValue) -> Record {
        record_from_json(value).unwrap()
    }

    fn relations(source: &str) -> Vec<RelationResolver> {
        RelationResolver::collect(&parse_declarations(source).unwrap()).unwrap()
    }

    fn relation(source: &str, field: &str) -> RelationResolver {
        relations(source)
            .into_iter()
            .find(|r| r.field == field)
            .unwrap()
    }

    const BLOG: &str = r#"
        type User @model {
            name: String
            posts: [Post] @connection(fromField: "author")
            favorites: [Post] @connection
            pinned: Post @connection
        }
        type Post @model {
            title: String
            author: User @connection
            editors: [User] @connection
        }
        type Comment @model {
            body: String
            post: Post @connection(fromField: "comments")
        }
    "#;

    fn posts() -> Vec<Record> {
        vec![
            rec(json!({"id": "0", "title": "A", "author": "1"})),
            rec(json!({"id": "1", "title": "B", "author": "0"})),
            rec(json!({"id": "2", "title": "C", "author": "1"})),
        ]
    }

    #[test]
    fn test_collect_classifies_fields() {
        let all = relations(BLOG);
        assert_eq!(all.len(), 6);

        let posts = relation(BLOG, "posts");
        assert_eq!(posts.owner, "User");
        assert_eq!(posts.target, "Post");
        assert!(posts.plural);
        assert_eq!(
            posts.strategy,
            RelationStrategy::Inverse {
                from_field: "author".into()
            }
        );

        let author = relation(BLOG, "author");
        assert_eq!(author.owner, "Post");
        assert_eq!(author.target, "User");
        assert!(!author.plural);
        assert_eq!(author.strategy, RelationStrategy::Forward);
    }

    #[test]
    fn test_collect_skips_plain_fields() {
        assert!(relations("type User @model { name: String, friend: User }").is_empty());
    }

    #[test]
    fn test_inverse_plural_filters_by_parent_id() {
        let user = rec(json!({"id": "1", "name": "Bob"}));
        let related = relation(BLOG, "posts").select(&user, &posts());

        let Related::Many(records) = related else {
            panic!("expected many");
        };
        let titles: Vec<_> = records.iter().map(|r| r["title"].clone()).collect();
        assert_eq!(titles, [json!("A"), json!("C")]);
    }

    #[test]
    fn test_inverse_plural_without_matches_is_empty() {
        let user = rec(json!({"id": "7"}));
        assert_eq!(
            relation(BLOG, "posts").select(&user, &posts()),
            Related::Many(vec![])
        );
    }

    #[test]
    fn test_inverse_matches_list_membership() {
        let post = rec(json!({"id": "4"}));
        let comments = vec![
            rec(json!({"id": "0", "body": "x"})),
            rec(json!({"id": "1", "body": "y", "comments": ["3", "4"]})),
        ];
        // Comment.post is singular: first record whose `comments` holds "4".
        assert_eq!(
            relation(BLOG, "post").select(&post, &comments),
            Related::One(comments[1].clone())
        );
    }

    #[test]
    fn test_forward_plural_membership() {
        let user = rec(json!({"id": "0", "favorites": ["2", "0", "9"]}));
        let Related::Many(records) = relation(BLOG, "favorites").select(&user, &posts()) else {
            panic!("expected many");
        };
        let ids: Vec<_> = records.iter().map(|r| r["id"].clone()).collect();
        // Partition order, unknown ids dropped.
        assert_eq!(ids, [json!("0"), json!("2")]);
    }

    #[test]
    fn test_forward_plural_missing_field_is_empty() {
        let user = rec(json!({"id": "0"}));
        assert_eq!(
            relation(BLOG, "favorites").select(&user, &posts()),
            Related::Many(vec![])
        );
    }

    #[test]
    fn test_forward_singular_by_identifier() {
        let user = rec(json!({"id": "0", "pinned": "2"}));
        assert_eq!(
            relation(BLOG, "pinned").select(&user, &posts()),
            Related::One(posts()[2].clone())
        );

        let user = rec(json!({"id": "0", "pinned": 1}));
        assert_eq!(
            relation(BLOG, "pinned").select(&user, &posts()),
            Related::One(posts()[1].clone())
        );
    }

    #[test]
    fn test_forward_singular_missing() {
        let pinned = relation(BLOG, "pinned");
        assert_eq!(pinned.select(&rec(json!({"id": "0"})), &posts()), Related::Missing);
        assert_eq!(
            pinned.select(&rec(json!({"id": "0", "pinned": "9"})), &posts()),
            Related::Missing
        );
    }

    #[test]
    fn test_into_value() {
        assert_eq!(Related::Missing.into_value(), None);
        assert_eq!(Related::Many(vec![]).into_value(), Some(Value::List(vec![])));
        assert!(matches!(
            Related::One(rec(json!({"id": "0"}))).into_value(),
            Some(Value::Object(_))
        ));
    }

    #[tokio::test]
    async fn test_resolve_against_store() {
        let store = InMemoryStore::new();
        let ann = store.create("User", rec(json!({"name": "Ann"}))).await.unwrap();
        let post = store
            .create("Post", rec(json!({"title": "Hi", "author": "0"})))
            .await
            .unwrap();

        let related = relation(BLOG, "posts").resolve(&ann, &store).await.unwrap();
        assert_eq!(related, Related::Many(vec![post.clone()]));

        let related = relation(BLOG, "author").resolve(&post, &store).await.unwrap();
        assert_eq!(related, Related::One(ann));

        let orphan = rec(json!({"id": "5", "author": "3"}));
        let related = relation(BLOG, "author").resolve(&orphan, &store).await.unwrap();
        assert_eq!(related, Related::Missing);
    }
}
