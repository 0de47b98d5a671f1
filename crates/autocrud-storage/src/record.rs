//! Records and identifier helpers.

use serde_json::{Map, Value};

use crate::error::StorageError;

/// A stored record: field name to JSON value.
pub type Record = Map<String, Value>;

/// Reserved field holding a record's identifier.
pub const ID_FIELD: &str = "id";

/// Reads an identifier out of a JSON value.
///
/// Identifiers are strings; integer literals are accepted as their decimal
/// form so `1` and `"1"` address the same record.
#[must_use]
pub fn id_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) if n.is_i64() || n.is_u64() => Some(n.to_string()),
        _ => None,
    }
}

/// Returns the record's identifier, if it has one.
#[must_use]
pub fn record_id(record: &Record) -> Option<String> {
    record.get(ID_FIELD).and_then(id_value)
}

/// Shallow merge: fields of `patch` overwrite same-named fields of `base`;
/// the identifier is never overwritten.
#[must_use]
pub fn merge_records(base: &Record, patch: &Record) -> Record {
    let mut merged = base.clone();
    for (key, value) in patch {
        if key != ID_FIELD {
            merged.insert(key.clone(), value.clone());
        }
    }
    merged
}

/// Converts a JSON payload into a record.
///
/// # Errors
///
/// Returns [`StorageError::InvalidRecord`] if the payload is not an object.
pub fn record_from_json(value: Value) -> Result<Record, StorageError> {
    match value {
        Value::Object(map) => Ok(map),
        other => Err(StorageError::invalid_record(format!(
            "expected an object, got {other}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn rec(value: Value) -> Record {
        record_from_json(value).unwrap()
    }

    #[test]
    fn test_id_value() {
        assert_eq!(id_value(&json!("7")), Some("7".to_string()));
        assert_eq!(id_value(&json!(7)), Some("7".to_string()));
        assert_eq!(id_value(&json!(7.5)), None);
        assert_eq!(id_value(&json!(null)), None);
        assert_eq!(id_value(&json!(["7"])), None);
    }

    #[test]
    fn test_record_id() {
        assert_eq!(record_id(&rec(json!({"id": "3", "name": "Ann"}))), Some("3".into()));
        assert_eq!(record_id(&rec(json!({"name": "Ann"}))), None);
    }

    #[test]
    fn test_merge_records() {
        let base = rec(json!({"id": "1", "title": "Hi", "views": 3}));
        let patch = rec(json!({"title": "Hello", "draft": true, "id": "9"}));
        let merged = merge_records(&base, &patch);
        assert_eq!(
            Value::Object(merged),
            json!({"id": "1", "title": "Hello", "views": 3, "draft": true})
        );
    }

    #[test]
    fn test_record_from_json_rejects_non_objects() {
        let err = record_from_json(json!([1, 2])).unwrap_err();
        assert!(err.is_invalid_record());
    }
}
