//! # autocrud-schema
//!
//! Schema model and CRUD schema transformation for Autocrud.
//!
//! This crate turns an annotated GraphQL SDL document into the augmented
//! schema served by the API layer:
//!
//! - Declarations marked `@model` get `<T>Create` / `<T>Update` input types
//! - A `Query` type exposes `list<T>s: [T!]!` per model
//! - A `Mutation` type exposes `create<T>`, `update<T>` and `delete<T>`
//! - Every model is extended with an `id: ID!` field
//!
//! ## Example
//!
//! ```ignore
//! use autocrud_schema::SchemaTransformer;
//!
//! let augmented = SchemaTransformer::transform(
//!     "type User @model { name: String }",
//! )?;
//! assert!(augmented.sdl.contains("input UserCreate"));
//! ```
//!
//! ## Modules
//!
//! - [`field_type`] - Wrapper type trees (`[Foo!]!`)
//! - [`declaration`] - Parsed declarations, fields and directives
//! - [`directives`] - Typed access to `@model` and `@connection`
//! - [`inputs`] - Create/Update input synthesis
//! - [`transform`] - Augmented schema generation

pub mod declaration;
pub mod directives;
pub mod error;
pub mod field_type;
pub mod inputs;
pub mod transform;

pub use declaration::{Argument, Declaration, DeclarationKind, Directive, parse_declarations};
pub use directives::ConnectionDirective;
pub use error::SchemaError;
pub use field_type::FieldType;
pub use inputs::{InputKind, is_builtin_scalar, synthesize_input};
pub use transform::{AugmentedSchema, OperationNames, SchemaTransformer, model_declarations};

/// Result type for schema operations.
pub type Result<T> = std::result::Result<T, SchemaError>;
