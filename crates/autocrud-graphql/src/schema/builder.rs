//! Executable schema builder.
//!
//! This module provides `ExecutableSchemaBuilder`, which registers every
//! declaration of an SDL document as an async-graphql dynamic type and
//! attaches resolvers from a [`ResolverMap`].

use async_graphql::Value;
use async_graphql::dynamic::{
    Enum, EnumItem, Field, FieldFuture, InputObject, InputValue, Object, ResolverContext, Scalar,
    Schema, TypeRef,
};
use autocrud_schema::{
    Declaration, DeclarationKind, SchemaError, is_builtin_scalar, parse_declarations,
};
use indexmap::IndexMap;
use tracing::{debug, trace, warn};

use super::type_ref::type_ref;
use crate::error::GraphQLError;
use crate::resolvers::ResolverMap;

const QUERY: &str = "Query";
const MUTATION: &str = "Mutation";

/// Configuration for the schema builder.
#[derive(Debug, Clone)]
pub struct SchemaBuilderConfig {
    /// Maximum query depth allowed.
    pub max_depth: usize,

    /// Maximum query complexity allowed.
    pub max_complexity: usize,

    /// Whether to enable introspection queries.
    pub introspection_enabled: bool,
}

impl Default for SchemaBuilderConfig {
    fn default() -> Self {
        Self {
            max_depth: 15,
            max_complexity: 500,
            introspection_enabled: true,
        }
    }
}

/// Builds an executable schema from SDL text and a resolver map.
///
/// # Example
///
/// ```ignore
/// let augmented = SchemaTransformer::transform(&source)?;
/// let resolvers = crud_resolvers(&augmented.models)
///     .merge(relation_resolvers(&augmented.declarations)?);
///
/// let schema = ExecutableSchemaBuilder::new(&augmented.sdl, resolvers, config).build()?;
/// ```
pub struct ExecutableSchemaBuilder {
    sdl: String,
    resolvers: ResolverMap,
    config: SchemaBuilderConfig,
}

impl ExecutableSchemaBuilder {
    /// Creates a new schema builder.
    #[must_use]
    pub fn new(sdl: impl Into<String>, resolvers: ResolverMap, config: SchemaBuilderConfig) -> Self {
        Self {
            sdl: sdl.into(),
            resolvers,
            config,
        }
    }

    /// Builds the GraphQL schema.
    ///
    /// `extend type` declarations are folded into their base type. The
    /// `Mutation` root is only registered when it has fields, and `Query`
    /// always carries a `_health` field.
    ///
    /// # Errors
    ///
    /// Returns [`GraphQLError::InvalidSchema`] if the SDL does not parse or
    /// uses interfaces or unions, and [`GraphQLError::SchemaBuildFailed`] if
    /// a type is declared twice or async-graphql rejects the result.
    pub fn build(&self) -> Result<Schema, GraphQLError> {
        debug!("Starting GraphQL schema build");

        let declarations = merge_extensions(parse_declarations(&self.sdl)?)?;
        self.warn_unattached_resolvers(&declarations);

        let has_mutation = declarations
            .get(MUTATION)
            .is_some_and(|mutation| !mutation.args.is_empty());
        let mut schema_builder = Schema::build(QUERY, has_mutation.then_some(MUTATION), None);

        for declaration in declarations.values() {
            match &declaration.kind {
                DeclarationKind::Object => {
                    if declaration.name == MUTATION && !has_mutation {
                        trace!("Skipping empty Mutation type");
                        continue;
                    }
                    let mut object = self.build_object(declaration);
                    if declaration.name == QUERY {
                        object = object.field(health_field());
                    }
                    schema_builder = schema_builder.register(object);
                }
                DeclarationKind::Input => {
                    schema_builder = schema_builder.register(build_input(declaration));
                }
                DeclarationKind::Enum(values) => {
                    let enum_type = values
                        .iter()
                        .fold(Enum::new(&declaration.name), |e, value| {
                            e.item(EnumItem::new(value))
                        });
                    schema_builder = schema_builder.register(enum_type);
                }
                DeclarationKind::Scalar => {
                    if !is_builtin_scalar(&declaration.name) {
                        schema_builder = schema_builder.register(Scalar::new(&declaration.name));
                    }
                }
                DeclarationKind::Interface | DeclarationKind::Union(_) => {
                    return Err(SchemaError::Unsupported(format!(
                        "abstract type '{}'",
                        declaration.name
                    ))
                    .into());
                }
            }
        }

        if !declarations.contains_key(QUERY) {
            schema_builder = schema_builder.register(Object::new(QUERY).field(health_field()));
        }

        // Configure limits
        let mut schema_builder = schema_builder.limit_depth(self.config.max_depth);
        schema_builder = schema_builder.limit_complexity(self.config.max_complexity);

        if !self.config.introspection_enabled {
            schema_builder = schema_builder.disable_introspection();
        }

        let schema = schema_builder
            .finish()
            .map_err(|e| GraphQLError::SchemaBuildFailed(e.to_string()))?;

        debug!(types = declarations.len(), "GraphQL schema build complete");
        Ok(schema)
    }

    fn build_object(&self, declaration: &Declaration) -> Object {
        let mut object = Object::new(&declaration.name);

        for arg in &declaration.args {
            let ty = type_ref(&arg.ty);
            let mut field = match self.resolvers.get(&declaration.name, &arg.name) {
                Some(resolver) => {
                    let resolver = resolver.clone();
                    Field::new(&arg.name, ty, move |ctx| resolver(ctx))
                }
                None => Field::new(&arg.name, ty, parent_field_resolver(arg.name.clone())),
            };

            for param in &arg.params {
                field = field.argument(InputValue::new(&param.name, type_ref(&param.ty)));
            }
            object = object.field(field);
        }

        object
    }

    fn warn_unattached_resolvers(&self, declarations: &IndexMap<String, Declaration>) {
        for type_name in self.resolvers.type_names() {
            for field_name in self.resolvers.field_names(type_name) {
                let declared = declarations
                    .get(type_name)
                    .is_some_and(|d| d.arg(field_name).is_some());
                if !declared {
                    warn!(
                        type_name = %type_name,
                        field = %field_name,
                        "Resolver has no matching field in the schema"
                    );
                }
            }
        }
    }
}

/// Folds `extend type` declarations into their base declaration.
///
/// Extension fields already present on the base are skipped, so a model
/// that declares its own `id` keeps it.
fn merge_extensions(
    declarations: Vec<Declaration>,
) -> Result<IndexMap<String, Declaration>, GraphQLError> {
    let (bases, extensions): (Vec<_>, Vec<_>) =
        declarations.into_iter().partition(|d| !d.extend);

    let mut merged: IndexMap<String, Declaration> = IndexMap::new();
    for declaration in bases {
        if merged.contains_key(&declaration.name) {
            return Err(GraphQLError::SchemaBuildFailed(format!(
                "type '{}' is declared more than once",
                declaration.name
            )));
        }
        merged.insert(declaration.name.clone(), declaration);
    }

    for extension in extensions {
        let Some(base) = merged.get_mut(&extension.name) else {
            return Err(GraphQLError::SchemaBuildFailed(format!(
                "cannot extend undeclared type '{}'",
                extension.name
            )));
        };
        for arg in extension.args {
            if base.arg(&arg.name).is_some() {
                debug!(type_name = %base.name, field = %arg.name, "Extension field already declared");
                continue;
            }
            base.args.push(arg);
        }
    }

    Ok(merged)
}

fn build_input(declaration: &Declaration) -> InputObject {
    declaration
        .args
        .iter()
        .fold(InputObject::new(&declaration.name), |input, arg| {
            input.field(InputValue::new(&arg.name, type_ref(&arg.ty)))
        })
}

fn health_field() -> Field {
    Field::new("_health", TypeRef::named_nn(TypeRef::STRING), |_| {
        FieldFuture::new(async { Ok(Some(Value::String("ok".to_string()))) })
    })
    .description("Health check endpoint")
}

/// Resolves a field to the same-named key of the parent object.
fn parent_field_resolver(
    field: String,
) -> impl Fn(ResolverContext<'_>) -> FieldFuture<'_> + Send + Sync + Clone {
    move |ctx| {
        let field = field.clone();
        FieldFuture::new(async move {
            let value = match ctx.parent_value.as_value() {
                Some(Value::Object(obj)) => obj
                    .get(field.as_str())
                    .filter(|v| !matches!(v, Value::Null))
                    .cloned(),
                _ => None,
            };
            Ok(value)
        })
    }
}

#[cfg(test)]
mod tests {
    use autocrud_schema::SchemaTransformer;

    use super::*;
    use crate::resolvers::{crud_resolvers, relation_resolvers};

    const BLOG: &str = r#"
        type User @model {
            name: String
            posts: [Post] @connection(fromField: "author")
        }
        type Post @model {
            title: String
            author: User @connection
        }
    "#;

    fn build(source: &str) -> Result<Schema, GraphQLError> {
        let augmented = SchemaTransformer::transform(source)?;
        let resolvers =
            crud_resolvers(&augmented.models).merge(relation_resolvers(&augmented.declarations)?);
        ExecutableSchemaBuilder::new(augmented.sdl, resolvers, SchemaBuilderConfig::default())
            .build()
    }

    #[test]
    fn test_schema_has_crud_fields() {
        let sdl = build(BLOG).unwrap().sdl();

        assert!(sdl.contains("listUsers: [User!]!"));
        assert!(sdl.contains("createUser(User: UserCreate!): User"));
        assert!(sdl.contains("updatePost(id: ID!, Post: PostUpdate!): Post"));
        assert!(sdl.contains("deletePost(id: ID!): Boolean"));
        assert!(sdl.contains("input PostCreate"));
        assert!(sdl.contains("author: ID"));
    }

    #[test]
    fn test_schema_has_health_field() {
        let sdl = build(BLOG).unwrap().sdl();
        assert!(sdl.contains("_health"), "Schema should have _health field on Query");
    }

    #[test]
    fn test_extension_adds_id() {
        let sdl = build(BLOG).unwrap().sdl();
        assert!(sdl.contains("id: ID!"));
    }

    #[test]
    fn test_no_models_builds_query_only() {
        let schema = build("type Tag { label: String }").unwrap();
        let sdl = schema.sdl();
        assert!(sdl.contains("_health"));
        assert!(!sdl.contains("type Mutation"));
    }

    #[test]
    fn test_model_without_fields_builds() {
        let sdl = build("type User @model { name: String }\ntype Empty @model")
            .unwrap()
            .sdl();
        assert!(sdl.contains("input EmptyCreate"));
        assert!(sdl.contains("createEmpty(Empty: EmptyCreate!): Empty"));
        assert!(sdl.contains("listEmptys: [Empty!]!"));
    }

    #[test]
    fn test_model_with_own_id_keeps_it() {
        assert!(build("type User @model { id: ID!, name: String }").is_ok());
    }

    #[test]
    fn test_enum_and_scalar_registered() {
        let sdl = build(
            r#"
            scalar Date
            enum Role { ADMIN MEMBER }
            type User @model { role: Role, joined: Date }
            "#,
        )
        .unwrap()
        .sdl();
        assert!(sdl.contains("enum Role"));
        assert!(sdl.contains("scalar Date"));
        assert!(sdl.contains("input UserUpdate"));
    }

    #[test]
    fn test_interface_is_unsupported() {
        let err = build("interface Node { id: ID! }\ntype User implements Node @model { id: ID! }")
            .unwrap_err();
        assert!(matches!(
            err,
            GraphQLError::InvalidSchema(SchemaError::Unsupported(_))
        ));
    }

    #[test]
    fn test_duplicate_type_rejected() {
        let err = ExecutableSchemaBuilder::new(
            "type Query { a: String }\ntype Query { b: String }",
            ResolverMap::new(),
            SchemaBuilderConfig::default(),
        )
        .build()
        .unwrap_err();
        assert!(matches!(err, GraphQLError::SchemaBuildFailed(_)));
    }

    #[test]
    fn test_extension_without_base_rejected() {
        let err = ExecutableSchemaBuilder::new(
            "type Query { a: String }\nextend type Ghost { id: ID! }",
            ResolverMap::new(),
            SchemaBuilderConfig::default(),
        )
        .build()
        .unwrap_err();
        assert!(matches!(err, GraphQLError::SchemaBuildFailed(_)));
    }

    #[tokio::test]
    async fn test_introspection_disabled() {
        let schema = ExecutableSchemaBuilder::new(
            "type Query { a: String }",
            ResolverMap::new(),
            SchemaBuilderConfig {
                introspection_enabled: false,
                ..Default::default()
            },
        )
        .build()
        .unwrap();

        let response = schema.execute("{ __schema { queryType { name } } }").await;
        assert!(!response.errors.is_empty());
    }

    #[tokio::test]
    async fn test_plain_fields_read_parent_keys() {
        let schema = ExecutableSchemaBuilder::new(
            "type Query { a: String }",
            ResolverMap::new(),
            SchemaBuilderConfig::default(),
        )
        .build()
        .unwrap();

        let response = schema.execute("{ a _health }").await;
        assert!(response.errors.is_empty());
        assert_eq!(
            response.data.into_json().unwrap(),
            serde_json::json!({"a": null, "_health": "ok"})
        );
    }
}
