//! Field type trees.
//!
//! A field's declared type is a tree of wrappers around one named leaf:
//! `[Post!]!` is `RequiredOf(ListOf(RequiredOf(Named("Post"))))`. Trees are
//! immutable; every transformation returns a new tree.

use std::fmt;
use std::str::FromStr;

use async_graphql_parser::types::{BaseType, Type};

use crate::error::SchemaError;

/// A wrapper type tree.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FieldType {
    /// A named type (`String`, `User`).
    Named(String),
    /// A list of the inner type (`[T]`).
    ListOf(Box<FieldType>),
    /// A non-null inner type (`T!`).
    RequiredOf(Box<FieldType>),
}

impl FieldType {
    /// Creates a named leaf.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named(name.into())
    }

    /// Wraps `inner` in a list.
    #[must_use]
    pub fn list_of(inner: FieldType) -> Self {
        Self::ListOf(Box::new(inner))
    }

    /// Wraps `inner` as non-null.
    #[must_use]
    pub fn required_of(inner: FieldType) -> Self {
        Self::RequiredOf(Box::new(inner))
    }

    /// Returns the name of the innermost named type.
    #[must_use]
    pub fn leaf_name(&self) -> &str {
        match self {
            Self::Named(name) => name,
            Self::ListOf(inner) | Self::RequiredOf(inner) => inner.leaf_name(),
        }
    }

    /// Returns a new tree with the same wrappers and `name` as the leaf.
    #[must_use]
    pub fn with_leaf(&self, name: &str) -> Self {
        match self {
            Self::Named(_) => Self::Named(name.to_string()),
            Self::ListOf(inner) => Self::list_of(inner.with_leaf(name)),
            Self::RequiredOf(inner) => Self::required_of(inner.with_leaf(name)),
        }
    }

    /// Returns the tree without its outermost `RequiredOf`, if it has one.
    ///
    /// Only one wrapper is removed: `[Foo!]!` becomes `[Foo!]`.
    #[must_use]
    pub fn without_required(&self) -> Self {
        match self {
            Self::RequiredOf(inner) => inner.as_ref().clone(),
            other => other.clone(),
        }
    }

    /// Whether the outermost node is `RequiredOf`.
    #[must_use]
    pub fn is_required(&self) -> bool {
        matches!(self, Self::RequiredOf(_))
    }

    /// Whether the field holds a sequence: the outermost node, or the node
    /// directly under an outermost `RequiredOf`, is `ListOf`.
    #[must_use]
    pub fn is_plural(&self) -> bool {
        match self {
            Self::ListOf(_) => true,
            Self::RequiredOf(inner) => matches!(inner.as_ref(), Self::ListOf(_)),
            Self::Named(_) => false,
        }
    }
}

impl From<&Type> for FieldType {
    fn from(ty: &Type) -> Self {
        let base = match &ty.base {
            BaseType::Named(name) => Self::Named(name.to_string()),
            BaseType::List(inner) => Self::list_of(Self::from(inner.as_ref())),
        };
        if ty.nullable {
            base
        } else {
            Self::required_of(base)
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(name) => write!(f, "{name}"),
            Self::ListOf(inner) => write!(f, "[{inner}]"),
            Self::RequiredOf(inner) => write!(f, "{inner}!"),
        }
    }
}

impl FromStr for FieldType {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Type::new(s.trim())
            .map(|ty| Self::from(&ty))
            .ok_or_else(|| SchemaError::InvalidType(s.to_string()))
    }
}
