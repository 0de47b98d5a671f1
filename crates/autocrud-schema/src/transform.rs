//! Augmented schema generation.
//!
//! [`SchemaTransformer::transform`] keeps the source SDL verbatim and appends
//! the constructs derived from its `@model` declarations:
//!
//! ```graphql
//! input UserCreate { ... }
//! input UserUpdate { ... }
//!
//! type Query {
//!     listUsers: [User!]!
//! }
//!
//! type Mutation {
//!     createUser(User: UserCreate!): User
//!     updateUser(id: ID!, User: UserUpdate!): User
//!     deleteUser(id: ID!): Boolean
//! }
//!
//! extend type User {
//!     id: ID!
//! }
//! ```
//!
//! Names are plain concatenations; collisions are not detected.

use tracing::debug;

use crate::declaration::{Argument, Declaration, DeclarationKind, parse_declarations};
use crate::directives::is_model;
use crate::error::SchemaError;
use crate::field_type::FieldType;
use crate::inputs::{InputKind, synthesize_input};

/// Name of the identifier field added to every model.
pub const ID_FIELD: &str = "id";

/// Name of the identifier scalar.
pub const ID_TYPE: &str = "ID";

/// Generated root operation names for one model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationNames {
    /// `list<T>s`
    pub list: String,
    /// `create<T>`
    pub create: String,
    /// `update<T>`
    pub update: String,
    /// `delete<T>`
    pub delete: String,
}

impl OperationNames {
    /// Operation names for the model `model`.
    #[must_use]
    pub fn for_model(model: &str) -> Self {
        Self {
            list: format!("list{model}s"),
            create: format!("create{model}"),
            update: format!("update{model}"),
            delete: format!("delete{model}"),
        }
    }
}

/// The transformer output.
#[derive(Debug, Clone)]
pub struct AugmentedSchema {
    /// Source text followed by every generated construct.
    pub sdl: String,
    /// Declarations parsed from the source text.
    pub declarations: Vec<Declaration>,
    /// The `@model` subset of `declarations`.
    pub models: Vec<Declaration>,
}

/// Returns the declarations carrying `@model`, in document order.
#[must_use]
pub fn model_declarations(declarations: &[Declaration]) -> Vec<Declaration> {
    declarations.iter().filter(|d| is_model(d)).cloned().collect()
}

/// Derives the CRUD schema from annotated SDL.
pub struct SchemaTransformer;

impl SchemaTransformer {
    /// Transforms the annotated schema text.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::Parse`] if `source` is not valid SDL.
    pub fn transform(source: &str) -> Result<AugmentedSchema, SchemaError> {
        let declarations = parse_declarations(source)?;
        let models = model_declarations(&declarations);
        debug!(models = models.len(), "Transforming annotated schema");

        let inputs: Vec<String> = models
            .iter()
            .flat_map(|model| {
                [
                    synthesize_input(model, InputKind::Create),
                    synthesize_input(model, InputKind::Update),
                ]
            })
            .map(|input| input.to_string())
            .collect();

        let extensions: Vec<String> = models
            .iter()
            .map(|model| id_extension(&model.name).to_string())
            .collect();

        let sdl = format!(
            "{source}\n\n{inputs}\n\n{query}\n\n{mutation}\n\n{extensions}\n",
            inputs = inputs.join("\n"),
            query = query_declaration(&models),
            mutation = mutation_declaration(&models),
            extensions = extensions.join("\n"),
        );

        Ok(AugmentedSchema {
            sdl,
            declarations,
            models,
        })
    }
}

/// `type Query` with one list field per model.
#[must_use]
pub fn query_declaration(models: &[Declaration]) -> Declaration {
    models.iter().fold(
        Declaration::new("Query", DeclarationKind::Object),
        |query, model| {
            let ty = FieldType::required_of(FieldType::list_of(FieldType::required_of(
                FieldType::named(&model.name),
            )));
            query.with_arg(Argument::new(OperationNames::for_model(&model.name).list, ty))
        },
    )
}

/// `type Mutation` with the create fields, then the update fields, then the
/// delete fields.
#[must_use]
pub fn mutation_declaration(models: &[Declaration]) -> Declaration {
    let id_param = || Argument::new(ID_FIELD, FieldType::required_of(FieldType::named(ID_TYPE)));
    let payload_param = |model: &str, kind: InputKind| {
        Argument::new(
            model,
            FieldType::required_of(FieldType::named(kind.type_name(model))),
        )
    };

    let creates = models.iter().map(|model| {
        Argument::new(
            OperationNames::for_model(&model.name).create,
            FieldType::named(&model.name),
        )
        .with_param(payload_param(&model.name, InputKind::Create))
    });
    let updates = models.iter().map(|model| {
        Argument::new(
            OperationNames::for_model(&model.name).update,
            FieldType::named(&model.name),
        )
        .with_param(id_param())
        .with_param(payload_param(&model.name, InputKind::Update))
    });
    let deletes = models.iter().map(|model| {
        Argument::new(
            OperationNames::for_model(&model.name).delete,
            FieldType::named("Boolean"),
        )
        .with_param(id_param())
    });

    creates
        .chain(updates)
        .chain(deletes)
        .fold(Declaration::new("Mutation", DeclarationKind::Object), |m, f| m.with_arg(f))
}

/// `extend type <model> { id: ID! }`
#[must_use]
pub fn id_extension(model: &str) -> Declaration {
    Declaration::extension(model).with_arg(Argument::new(
        ID_FIELD,
        FieldType::required_of(FieldType::named(ID_TYPE)),
    ))
}
