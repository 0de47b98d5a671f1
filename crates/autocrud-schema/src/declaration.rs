//! Parsed schema declarations.
//!
//! [`parse_declarations`] reads SDL with `async-graphql-parser` and flattens
//! each type definition into a [`Declaration`]: a name, its fields (called
//! arguments, as in the annotated schema) and its directives. Declarations
//! render back to SDL through `Display`.

use std::fmt;

use async_graphql_parser::Positioned;
use async_graphql_parser::types::{
    ConstDirective, FieldDefinition, InputValueDefinition, TypeDefinition, TypeKind,
    TypeSystemDefinition,
};
use async_graphql_value::ConstValue;
use tracing::trace;

use crate::error::SchemaError;
use crate::field_type::FieldType;

const INDENT: &str = "    ";

/// What kind of type a declaration introduces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeclarationKind {
    /// `type T { ... }`
    Object,
    /// `interface T { ... }`
    Interface,
    /// `input T { ... }`
    Input,
    /// `enum T { A B }`
    Enum(Vec<String>),
    /// `union T = A | B`
    Union(Vec<String>),
    /// `scalar T`
    Scalar,
}

impl DeclarationKind {
    fn keyword(&self) -> &'static str {
        match self {
            Self::Object => "type",
            Self::Interface => "interface",
            Self::Input => "input",
            Self::Enum(_) => "enum",
            Self::Union(_) => "union",
            Self::Scalar => "scalar",
        }
    }

    fn has_fields(&self) -> bool {
        matches!(self, Self::Object | Self::Interface | Self::Input)
    }
}

/// A directive applied to a declaration or a field.
#[derive(Debug, Clone, PartialEq)]
pub struct Directive {
    /// Directive name without the `@`.
    pub name: String,
    /// Arguments in declaration order.
    pub arguments: Vec<(String, ConstValue)>,
}

impl Directive {
    /// Creates a directive without arguments.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            arguments: Vec::new(),
        }
    }

    /// Adds an argument.
    #[must_use]
    pub fn with_argument(mut self, name: impl Into<String>, value: ConstValue) -> Self {
        self.arguments.push((name.into(), value));
        self
    }

    /// Returns the value of the named argument, if present.
    #[must_use]
    pub fn argument(&self, name: &str) -> Option<&ConstValue> {
        self.arguments
            .iter()
            .find(|(arg, _)| arg == name)
            .map(|(_, value)| value)
    }

    /// Returns the named argument as a string.
    ///
    /// `Ok(None)` means the argument is absent (or explicitly `null`).
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::DirectiveArgument`] if the argument holds
    /// anything other than a string. `location` names the annotated element
    /// in the error message.
    pub fn string_argument(&self, name: &str, location: &str) -> Result<Option<&str>, SchemaError> {
        match self.argument(name) {
            None | Some(ConstValue::Null) => Ok(None),
            Some(ConstValue::String(value)) => Ok(Some(value.as_str())),
            Some(_) => Err(SchemaError::directive_argument(
                &self.name, name, location, "a string",
            )),
        }
    }

    fn from_ast(directive: &ConstDirective) -> Self {
        Self {
            name: directive.name.node.to_string(),
            arguments: directive
                .arguments
                .iter()
                .map(|(name, value)| (name.node.to_string(), value.node.clone()))
                .collect(),
        }
    }
}

impl fmt::Display for Directive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}", self.name)?;
        if !self.arguments.is_empty() {
            let args: Vec<String> = self
                .arguments
                .iter()
                .map(|(name, value)| format!("{name}: {value}"))
                .collect();
            write!(f, "({})", args.join(", "))?;
        }
        Ok(())
    }
}

/// A field of a declaration, or a parameter of such a field.
#[derive(Debug, Clone, PartialEq)]
pub struct Argument {
    /// Field name.
    pub name: String,
    /// Declared type.
    pub ty: FieldType,
    /// Field parameters (`update(id: ID!)`); always empty on input fields.
    pub params: Vec<Argument>,
    /// Directives applied to the field.
    pub directives: Vec<Directive>,
}

impl Argument {
    /// Creates a field without parameters or directives.
    #[must_use]
    pub fn new(name: impl Into<String>, ty: FieldType) -> Self {
        Self {
            name: name.into(),
            ty,
            params: Vec::new(),
            directives: Vec::new(),
        }
    }

    /// Adds a parameter.
    #[must_use]
    pub fn with_param(mut self, param: Argument) -> Self {
        self.params.push(param);
        self
    }

    /// Adds a directive.
    #[must_use]
    pub fn with_directive(mut self, directive: Directive) -> Self {
        self.directives.push(directive);
        self
    }

    /// Returns the first directive with the given name.
    #[must_use]
    pub fn directive(&self, name: &str) -> Option<&Directive> {
        self.directives.iter().find(|d| d.name == name)
    }

    fn from_field(field: &FieldDefinition) -> Self {
        Self {
            name: field.name.node.to_string(),
            ty: FieldType::from(&field.ty.node),
            params: field
                .arguments
                .iter()
                .map(|arg| Self::from_input_value(&arg.node))
                .collect(),
            directives: directives_from_ast(&field.directives),
        }
    }

    fn from_input_value(value: &InputValueDefinition) -> Self {
        Self {
            name: value.name.node.to_string(),
            ty: FieldType::from(&value.ty.node),
            params: Vec::new(),
            directives: directives_from_ast(&value.directives),
        }
    }
}

impl fmt::Display for Argument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if !self.params.is_empty() {
            let params: Vec<String> = self.params.iter().map(ToString::to_string).collect();
            write!(f, "({})", params.join(", "))?;
        }
        write!(f, ": {}", self.ty)?;
        for directive in &self.directives {
            write!(f, " {directive}")?;
        }
        Ok(())
    }
}

/// A type declared in the schema.
#[derive(Debug, Clone, PartialEq)]
pub struct Declaration {
    /// Type name.
    pub name: String,
    /// Kind of type.
    pub kind: DeclarationKind,
    /// Whether this is an `extend` of a type declared elsewhere.
    pub extend: bool,
    /// Interfaces implemented by an object or interface.
    pub implements: Vec<String>,
    /// Fields in declaration order.
    pub args: Vec<Argument>,
    /// Directives applied to the type.
    pub directives: Vec<Directive>,
}

impl Declaration {
    /// Creates an empty declaration.
    #[must_use]
    pub fn new(name: impl Into<String>, kind: DeclarationKind) -> Self {
        Self {
            name: name.into(),
            kind,
            extend: false,
            implements: Vec::new(),
            args: Vec::new(),
            directives: Vec::new(),
        }
    }

    /// Creates an `extend type` declaration.
    #[must_use]
    pub fn extension(name: impl Into<String>) -> Self {
        Self {
            extend: true,
            ..Self::new(name, DeclarationKind::Object)
        }
    }

    /// Adds a field.
    #[must_use]
    pub fn with_arg(mut self, arg: Argument) -> Self {
        self.args.push(arg);
        self
    }

    /// Returns the first directive with the given name.
    #[must_use]
    pub fn directive(&self, name: &str) -> Option<&Directive> {
        self.directives.iter().find(|d| d.name == name)
    }

    /// Returns the field with the given name.
    #[must_use]
    pub fn arg(&self, name: &str) -> Option<&Argument> {
        self.args.iter().find(|a| a.name == name)
    }

    fn from_ast(definition: &TypeDefinition) -> Self {
        let name = definition.name.node.to_string();
        let mut declaration = Self {
            extend: definition.extend,
            directives: directives_from_ast(&definition.directives),
            ..Self::new(name, DeclarationKind::Scalar)
        };

        match &definition.kind {
            TypeKind::Scalar => {}
            TypeKind::Object(object) => {
                declaration.kind = DeclarationKind::Object;
                declaration.implements = names(&object.implements);
                declaration.args = object
                    .fields
                    .iter()
                    .map(|f| Argument::from_field(&f.node))
                    .collect();
            }
            TypeKind::Interface(interface) => {
                declaration.kind = DeclarationKind::Interface;
                declaration.implements = names(&interface.implements);
                declaration.args = interface
                    .fields
                    .iter()
                    .map(|f| Argument::from_field(&f.node))
                    .collect();
            }
            TypeKind::InputObject(input) => {
                declaration.kind = DeclarationKind::Input;
                declaration.args = input
                    .fields
                    .iter()
                    .map(|f| Argument::from_input_value(&f.node))
                    .collect();
            }
            TypeKind::Enum(enum_type) => {
                declaration.kind = DeclarationKind::Enum(
                    enum_type
                        .values
                        .iter()
                        .map(|v| v.node.value.node.to_string())
                        .collect(),
                );
            }
            TypeKind::Union(union) => {
                declaration.kind = DeclarationKind::Union(names(&union.members));
            }
        }

        declaration
    }
}

impl fmt::Display for Declaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.extend {
            write!(f, "extend ")?;
        }
        write!(f, "{} {}", self.kind.keyword(), self.name)?;
        if !self.implements.is_empty() {
            write!(f, " implements {}", self.implements.join(" & "))?;
        }
        for directive in &self.directives {
            write!(f, " {directive}")?;
        }

        // A body needs at least one entry; an empty one is left out entirely.
        match &self.kind {
            DeclarationKind::Scalar => Ok(()),
            DeclarationKind::Union(members) => write!(f, " = {}", members.join(" | ")),
            DeclarationKind::Enum(values) if values.is_empty() => Ok(()),
            DeclarationKind::Enum(values) => {
                writeln!(f, " {{")?;
                for value in values {
                    writeln!(f, "{INDENT}{value}")?;
                }
                write!(f, "}}")
            }
            kind if kind.has_fields() && !self.args.is_empty() => {
                writeln!(f, " {{")?;
                for arg in &self.args {
                    writeln!(f, "{INDENT}{arg}")?;
                }
                write!(f, "}}")
            }
            _ => Ok(()),
        }
    }
}

/// Parses SDL text into declarations, in document order.
///
/// Directive definitions and `schema { ... }` blocks carry no declarations
/// and are skipped.
///
/// # Errors
///
/// Returns [`SchemaError::Parse`] if the text is not valid SDL.
pub fn parse_declarations(source: &str) -> Result<Vec<Declaration>, SchemaError> {
    let document = async_graphql_parser::parse_schema(source)?;

    let declarations: Vec<Declaration> = document
        .definitions
        .iter()
        .filter_map(|definition| match definition {
            TypeSystemDefinition::Type(ty) => Some(Declaration::from_ast(&ty.node)),
            TypeSystemDefinition::Schema(_) | TypeSystemDefinition::Directive(_) => None,
        })
        .collect();

    trace!(count = declarations.len(), "Parsed schema declarations");
    Ok(declarations)
}

fn directives_from_ast(directives: &[Positioned<ConstDirective>]) -> Vec<Directive> {
    directives.iter().map(|d| Directive::from_ast(&d.node)).collect()
}

fn names(names: &[Positioned<async_graphql_value::Name>]) -> Vec<String> {
    names.iter().map(|n| n.node.to_string()).collect()
}
