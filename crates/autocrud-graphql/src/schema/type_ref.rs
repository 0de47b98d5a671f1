//! Field type to dynamic type reference mapping.

use async_graphql::dynamic::TypeRef;
use autocrud_schema::FieldType;

/// Converts a declared field type to a dynamic schema type reference.
#[must_use]
pub fn type_ref(ty: &FieldType) -> TypeRef {
    match ty {
        FieldType::Named(name) => TypeRef::named(name.clone()),
        FieldType::ListOf(inner) => TypeRef::List(Box::new(type_ref(inner))),
        FieldType::RequiredOf(inner) => TypeRef::NonNull(Box::new(type_ref(inner))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_ref_rendering() {
        for source in ["String", "ID!", "[Post]", "[Post!]!", "[[Int]]"] {
            let ty: FieldType = source.parse().unwrap();
            assert_eq!(type_ref(&ty).to_string(), source);
        }
    }
}
