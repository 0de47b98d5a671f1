//! Error types for schema parsing and transformation.
//!
//! Every variant is a schema malformation: it is reported at startup and
//! nothing is served from a schema that produced one.

/// Errors that can occur while reading or transforming a schema.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    /// The SDL document could not be parsed.
    #[error("Failed to parse schema: {0}")]
    Parse(#[from] async_graphql_parser::Error),

    /// A type expression such as `[Foo!]!` could not be parsed.
    #[error("Invalid type expression: {0:?}")]
    InvalidType(String),

    /// A directive argument has a value of an unexpected shape.
    #[error("Argument '{argument}' of @{directive} on {location} must be {expected}")]
    DirectiveArgument {
        /// Directive name, without the `@`.
        directive: String,
        /// Argument name.
        argument: String,
        /// `Type.field` the directive is attached to.
        location: String,
        /// Human readable description of the accepted shape.
        expected: &'static str,
    },

    /// The schema uses a construct the executable schema cannot express.
    #[error("Unsupported schema construct: {0}")]
    Unsupported(String),
}

impl SchemaError {
    /// Creates a new `DirectiveArgument` error.
    #[must_use]
    pub fn directive_argument(
        directive: impl Into<String>,
        argument: impl Into<String>,
        location: impl Into<String>,
        expected: &'static str,
    ) -> Self {
        Self::DirectiveArgument {
            directive: directive.into(),
            argument: argument.into(),
            location: location.into(),
            expected,
        }
    }

    /// Returns `true` if the SDL itself failed to parse.
    #[must_use]
    pub fn is_parse_error(&self) -> bool {
        matches!(self, Self::Parse(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directive_argument_message() {
        let err = SchemaError::directive_argument("connection", "fromField", "User.posts", "a string");
        assert_eq!(
            err.to_string(),
            "Argument 'fromField' of @connection on User.posts must be a string"
        );
        assert!(!err.is_parse_error());
    }

    #[test]
    fn test_parse_error_from_parser() {
        let err: SchemaError = async_graphql_parser::parse_schema("type {")
            .unwrap_err()
            .into();
        assert!(err.is_parse_error());
        assert!(err.to_string().starts_with("Failed to parse schema"));
    }
}
