//! Autocrud schema directives.
//!
//! - `@model` - marks an object type for CRUD generation
//! - `@connection(fromField: String)` - marks a field as a derived relation

use crate::declaration::{Argument, Declaration};
use crate::error::SchemaError;

/// Directive and argument names recognized in annotated schemas.
pub mod names {
    pub const MODEL: &str = "model";
    pub const CONNECTION: &str = "connection";
    pub const FROM_FIELD: &str = "fromField";
}

/// Whether the declaration carries `@model`.
#[must_use]
pub fn is_model(declaration: &Declaration) -> bool {
    declaration.directive(names::MODEL).is_some()
}

/// A parsed `@connection` directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionDirective {
    /// Field on the related type that points back at the parent, if any.
    pub from_field: Option<String>,
}

impl ConnectionDirective {
    /// Reads `@connection` from a field of `owner`.
    ///
    /// Returns `Ok(None)` when the field has no `@connection`, and
    /// `from_field: None` when the directive has no `fromField`.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::DirectiveArgument`] if `fromField` is not a string.
    pub fn from_argument(owner: &str, field: &Argument) -> Result<Option<Self>, SchemaError> {
        let Some(directive) = field.directive(names::CONNECTION) else {
            return Ok(None);
        };

        let location = format!("{owner}.{}", field.name);
        let from_field = directive
            .string_argument(names::FROM_FIELD, &location)?
            .map(str::to_string);

        Ok(Some(Self { from_field }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::declaration::parse_declarations;

    #[test]
    fn test_directive_states() {
        let decls = parse_declarations(
            r#"
            type A @model {
                plain: String
                forward: [B] @connection
                inverse: [B] @connection(fromField: "aId")
                broken: B @connection(fromField: 42)
            }
            "#,
        )
        .unwrap();
        let a = &decls[0];
        assert!(is_model(a));

        assert_eq!(ConnectionDirective::from_argument("A", a.arg("plain").unwrap()).unwrap(), None);
        assert_eq!(
            ConnectionDirective::from_argument("A", a.arg("forward").unwrap()).unwrap(),
            Some(ConnectionDirective { from_field: None })
        );
        assert_eq!(
            ConnectionDirective::from_argument("A", a.arg("inverse").unwrap()).unwrap(),
            Some(ConnectionDirective {
                from_field: Some("aId".to_string())
            })
        );

        let err = ConnectionDirective::from_argument("A", a.arg("broken").unwrap()).unwrap_err();
        assert!(err.to_string().contains("A.broken"));
    }

    #[test]
    fn test_model_name_exact_match() {
        let decls = parse_declarations("type A @models { x: Int }\ntype B @Model { x: Int }").unwrap();
        assert!(!is_model(&decls[0]));
        assert!(!is_model(&decls[1]));
    }
}
