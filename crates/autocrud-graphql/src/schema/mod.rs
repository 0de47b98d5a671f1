//! Executable schema building.
//!
//! The augmented SDL is parsed back into declarations and registered as
//! async-graphql dynamic types. Fields with an entry in the
//! [`ResolverMap`](crate::ResolverMap) use it; every other field reads the
//! same-named key of its parent object.
//!
//! ## Components
//!
//! - [`ExecutableSchemaBuilder`] - Builds the dynamic schema from SDL and resolvers
//! - [`type_ref`] - Maps declared field types to dynamic type references

mod builder;
mod type_ref;

pub use builder::{ExecutableSchemaBuilder, SchemaBuilderConfig};
pub use type_ref::type_ref;
