//! Resolver lookup table keyed by type name and field name.

use std::fmt;
use std::sync::Arc;

use async_graphql::dynamic::{FieldFuture, ResolverContext};
use indexmap::IndexMap;

/// A type-erased field resolver.
pub type FieldResolverFn =
    Arc<dyn for<'a> Fn(ResolverContext<'a>) -> FieldFuture<'a> + Send + Sync>;

/// Field resolvers grouped by the type that owns the field.
///
/// Iteration follows insertion order.
#[derive(Clone, Default)]
pub struct ResolverMap {
    types: IndexMap<String, IndexMap<String, FieldResolverFn>>,
}

impl ResolverMap {
    /// Creates an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the resolver of `type_name.field_name`, replacing any previous one.
    pub fn insert<F>(&mut self, type_name: &str, field_name: &str, resolver: F)
    where
        F: for<'a> Fn(ResolverContext<'a>) -> FieldFuture<'a> + Send + Sync + 'static,
    {
        self.types
            .entry(type_name.to_string())
            .or_default()
            .insert(field_name.to_string(), Arc::new(resolver));
    }

    /// Returns the resolver of `type_name.field_name`.
    #[must_use]
    pub fn get(&self, type_name: &str, field_name: &str) -> Option<&FieldResolverFn> {
        self.types.get(type_name)?.get(field_name)
    }

    #[must_use]
    pub fn contains(&self, type_name: &str, field_name: &str) -> bool {
        self.get(type_name, field_name).is_some()
    }

    /// Merges `other` into `self`; entries of `other` win on collision.
    #[must_use]
    pub fn merge(mut self, other: ResolverMap) -> Self {
        for (type_name, fields) in other.types {
            self.types.entry(type_name).or_default().extend(fields);
        }
        self
    }

    /// Names of the types that own at least one resolver.
    pub fn type_names(&self) -> impl Iterator<Item = &str> {
        self.types.keys().map(String::as_str)
    }

    /// Names of the fields of `type_name` that have a resolver.
    #[must_use]
    pub fn field_names(&self, type_name: &str) -> Vec<&str> {
        self.types
            .get(type_name)
            .map(|fields| fields.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// Total number of resolvers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.types.values().map(IndexMap::len).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Debug for ResolverMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for (type_name, fields) in &self.types {
            map.entry(type_name, &fields.keys().collect::<Vec<_>>());
        }
        map.finish()
    }
}

#[cfg(test)]
mod tests {
    use async_graphql::Value;

    use super::*;

    fn constant(value: bool) -> impl for<'a> Fn(ResolverContext<'a>) -> FieldFuture<'a> + Send + Sync {
        move |_| FieldFuture::new(async move { Ok(Some(Value::Boolean(value))) })
    }

    #[test]
    fn test_insert_and_get() {
        let mut map = ResolverMap::new();
        assert!(map.is_empty());

        map.insert("Query", "listUsers", constant(true));
        map.insert("Mutation", "deleteUser", constant(false));

        assert_eq!(map.len(), 2);
        assert!(map.contains("Query", "listUsers"));
        assert!(!map.contains("Query", "deleteUser"));
        assert!(map.get("User", "posts").is_none());
        assert_eq!(map.type_names().collect::<Vec<_>>(), ["Query", "Mutation"]);
    }

    #[test]
    fn test_merge_keeps_both_sides() {
        let mut left = ResolverMap::new();
        left.insert("Query", "listUsers", constant(true));
        let mut right = ResolverMap::new();
        right.insert("Query", "listPosts", constant(true));
        right.insert("User", "posts", constant(true));

        let merged = left.merge(right);
        assert_eq!(merged.len(), 3);
        assert_eq!(merged.field_names("Query"), ["listUsers", "listPosts"]);
        assert_eq!(merged.field_names("User"), ["posts"]);
        assert!(merged.field_names("Post").is_empty());
    }

    #[test]
    fn test_debug_lists_fields() {
        let mut map = ResolverMap::new();
        map.insert("User", "posts", constant(true));
        assert_eq!(format!("{map:?}"), r#"{"User": ["posts"]}"#);
    }
}
