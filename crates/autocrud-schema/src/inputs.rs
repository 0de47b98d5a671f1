//! Create/Update input synthesis.
//!
//! For a model `T`, `TCreate` and `TUpdate` mirror the model's fields. Any
//! field whose leaf type is not a built-in scalar refers to other records,
//! so its leaf is replaced by `ID` while the list/non-null wrappers stay as
//! declared. `TUpdate` additionally drops the outermost non-null wrapper so
//! every field becomes optional on update.

use crate::declaration::{Argument, Declaration, DeclarationKind};
use crate::field_type::FieldType;

/// Names of the built-in GraphQL scalars.
pub const BUILTIN_SCALARS: [&str; 5] = ["String", "Int", "Float", "Boolean", "ID"];

/// Scalar substituted for relation leaves in input types.
pub const PLACEHOLDER_SCALAR: &str = "ID";

/// Whether `name` is one of the built-in scalars.
#[must_use]
pub fn is_builtin_scalar(name: &str) -> bool {
    BUILTIN_SCALARS.contains(&name)
}

/// The two synthesized input shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    Create,
    Update,
}

impl InputKind {
    /// Suffix appended to the model name.
    #[must_use]
    pub fn suffix(self) -> &'static str {
        match self {
            Self::Create => "Create",
            Self::Update => "Update",
        }
    }

    /// Input type name for `model`, e.g. `UserCreate`.
    #[must_use]
    pub fn type_name(self, model: &str) -> String {
        format!("{model}{}", self.suffix())
    }

    /// Input field type derived from a model field type.
    #[must_use]
    pub fn field_type(self, ty: &FieldType) -> FieldType {
        let base = match self {
            Self::Create => ty.clone(),
            Self::Update => ty.without_required(),
        };

        if is_builtin_scalar(base.leaf_name()) {
            base
        } else {
            base.with_leaf(PLACEHOLDER_SCALAR)
        }
    }
}

/// Builds the `kind` input declaration for `model`.
///
/// Field directives are not carried over to the input.
#[must_use]
pub fn synthesize_input(model: &Declaration, kind: InputKind) -> Declaration {
    model.args.iter().fold(
        Declaration::new(kind.type_name(&model.name), DeclarationKind::Input),
        |input, arg| input.with_arg(Argument::new(&arg.name, kind.field_type(&arg.ty))),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::declaration::parse_declarations;

    fn model() -> Declaration {
        parse_declarations(
            r#"
            type Post @model {
                title: String!
                views: Int
                author: User!
                tags: [Tag!]!
                related: [[Post]]
            }
            "#,
        )
        .unwrap()
        .remove(0)
    }

    fn field(decl: &Declaration, name: &str) -> String {
        decl.arg(name).unwrap().ty.to_string()
    }

    #[test]
    fn test_create_input() {
        let create = synthesize_input(&model(), InputKind::Create);
        assert_eq!(create.name, "PostCreate");
        assert_eq!(create.kind, DeclarationKind::Input);
        assert_eq!(field(&create, "title"), "String!");
        assert_eq!(field(&create, "views"), "Int");
        assert_eq!(field(&create, "author"), "ID!");
        assert_eq!(field(&create, "tags"), "[ID!]!");
        assert_eq!(field(&create, "related"), "[[ID]]");
    }

    #[test]
    fn test_update_input_is_optional() {
        let update = synthesize_input(&model(), InputKind::Update);
        assert_eq!(update.name, "PostUpdate");
        assert_eq!(field(&update, "title"), "String");
        assert_eq!(field(&update, "author"), "ID");
        assert_eq!(field(&update, "tags"), "[ID!]");
        assert_eq!(field(&update, "related"), "[[ID]]");
    }

    #[test]
    fn test_synthesis_leaves_model_untouched() {
        let post = model();
        let _create = synthesize_input(&post, InputKind::Create);
        let _update = synthesize_input(&post, InputKind::Update);
        assert_eq!(field(&post, "author"), "User!");
        assert_eq!(field(&post, "tags"), "[Tag!]!");
    }

    #[test]
    fn test_directives_dropped() {
        let decl = parse_declarations(r#"type A @model { bs: [B] @connection(fromField: "a") }"#)
            .unwrap()
            .remove(0);
        let create = synthesize_input(&decl, InputKind::Create);
        assert!(create.args[0].directives.is_empty());
        assert_eq!(create.to_string(), "input ACreate {\n    bs: [ID]\n}");
    }

    #[test]
    fn test_empty_model() {
        let decl = parse_declarations("type Empty @model").unwrap().remove(0);
        let create = synthesize_input(&decl, InputKind::Create);
        let update = synthesize_input(&decl, InputKind::Update);
        assert!(create.args.is_empty());

        let rendered = format!("{create}\n{update}");
        let reparsed = parse_declarations(&rendered).unwrap();
        assert_eq!(reparsed, vec![create, update]);
    }
}
