//! Interchange between document values and `serde_json` trees.
//!
//! Raw JSON backends persist through this layer. Conversion to JSON fails on
//! any remaining [`Value::Opaque`] leaf: representing those is exactly the
//! job of the serialization layer above the backend, so an opaque leaf
//! reaching this point means no registered codec claimed it.

use serde_json::{Map as JsonMap, Number, Value as JsonValue};
use thiserror::Error;

use crate::{Record, Table, Tables, Value};

#[derive(Debug, Error)]
pub enum JsonError {
    #[error("opaque value cannot be represented as JSON: {0}")]
    Opaque(String),
    #[error("invalid document shape: {0}")]
    Shape(String),
}

// ── Value level ────────────────────────────────────────────────────────────

/// Converts a document value into a JSON tree.
///
/// Non-finite floats map to `null`, matching `serde_json`'s own behavior for
/// `f64`. Opaque leaves are rejected with [`JsonError::Opaque`].
pub fn to_json(value: &Value) -> Result<JsonValue, JsonError> {
    match value {
        Value::Null => Ok(JsonValue::Null),
        Value::Bool(b) => Ok(JsonValue::Bool(*b)),
        Value::Int(i) => Ok(JsonValue::Number(Number::from(*i))),
        Value::Float(f) => Ok(Number::from_f64(*f)
            .map(JsonValue::Number)
            .unwrap_or(JsonValue::Null)),
        Value::String(s) => Ok(JsonValue::String(s.clone())),
        Value::Array(items) => {
            let mut out = Vec::with_capacity(items.len());
            for item in items {
                out.push(to_json(item)?);
            }
            Ok(JsonValue::Array(out))
        }
        Value::Object(map) => {
            let mut out = JsonMap::new();
            for (key, item) in map {
                out.insert(key.clone(), to_json(item)?);
            }
            Ok(JsonValue::Object(out))
        }
        Value::Opaque(opaque) => Err(JsonError::Opaque(format!("{opaque:?}"))),
    }
}

/// Converts a JSON tree into a document value. Total: every JSON value has a
/// document representation.
pub fn from_json(json: JsonValue) -> Value {
    match json {
        JsonValue::Null => Value::Null,
        JsonValue::Bool(b) => Value::Bool(b),
        JsonValue::Number(n) => match n.as_i64() {
            Some(i) => Value::Int(i),
            // u64 beyond i64::MAX and fractional numbers land here.
            None => Value::Float(n.as_f64().unwrap_or_default()),
        },
        JsonValue::String(s) => Value::String(s),
        JsonValue::Array(items) => Value::Array(items.into_iter().map(from_json).collect()),
        JsonValue::Object(map) => Value::Object(
            map.into_iter()
                .map(|(key, item)| (key, from_json(item)))
                .collect(),
        ),
    }
}

// ── Dataset level ──────────────────────────────────────────────────────────

/// Serializes the full `table → record-id → record` structure.
pub fn tables_to_json(tables: &Tables) -> Result<JsonValue, JsonError> {
    let mut root = JsonMap::new();
    for (table_name, table) in tables {
        let mut table_out = JsonMap::new();
        for (record_id, record) in table {
            let mut record_out = JsonMap::new();
            for (field, value) in record {
                record_out.insert(field.clone(), to_json(value)?);
            }
            table_out.insert(record_id.clone(), JsonValue::Object(record_out));
        }
        root.insert(table_name.clone(), JsonValue::Object(table_out));
    }
    Ok(JsonValue::Object(root))
}

/// Parses the full `table → record-id → record` structure out of a JSON
/// tree, rejecting anything that does not have that shape.
pub fn tables_from_json(json: JsonValue) -> Result<Tables, JsonError> {
    let root = into_object(json, || "document root is not an object".to_string())?;
    let mut tables = Tables::new();
    for (table_name, table_json) in root {
        let table_obj = into_object(table_json, || {
            format!("table {table_name:?} is not an object")
        })?;
        let mut table = Table::new();
        for (record_id, record_json) in table_obj {
            let record_obj = into_object(record_json, || {
                format!("record {record_id:?} in table {table_name:?} is not an object")
            })?;
            let record: Record = record_obj
                .into_iter()
                .map(|(field, value)| (field, from_json(value)))
                .collect();
            table.insert(record_id, record);
        }
        tables.insert(table_name, table);
    }
    Ok(tables)
}

fn into_object(
    json: JsonValue,
    describe: impl FnOnce() -> String,
) -> Result<JsonMap<String, JsonValue>, JsonError> {
    match json {
        JsonValue::Object(map) => Ok(map),
        _ => Err(JsonError::Shape(describe())),
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, PartialEq)]
    struct Marker;

    #[test]
    fn scalars_round_trip() {
        for value in [
            Value::Null,
            Value::Bool(true),
            Value::Int(-3),
            Value::Float(2.5),
            Value::from("text"),
        ] {
            let json = to_json(&value).unwrap();
            assert_eq!(from_json(json), value);
        }
    }

    #[test]
    fn integers_and_floats_are_kept_apart() {
        assert_eq!(from_json(json!(7)), Value::Int(7));
        assert_eq!(from_json(json!(7.0)), Value::Float(7.0));
        assert_eq!(from_json(json!(u64::MAX)), Value::Float(u64::MAX as f64));
    }

    #[test]
    fn nested_containers_round_trip() {
        let value = from_json(json!({
            "items": [1, {"deep": [null, "s"]}],
            "flag": false,
        }));
        let json = to_json(&value).unwrap();
        assert_eq!(from_json(json), value);
    }

    #[test]
    fn key_order_is_preserved() {
        let value = from_json(json!({"z": 1, "a": 2, "m": 3}));
        let keys: Vec<_> = value.entries().map(|(k, _)| k).collect();
        assert_eq!(
            keys,
            vec![
                crate::EntryKey::Key("z"),
                crate::EntryKey::Key("a"),
                crate::EntryKey::Key("m")
            ]
        );
    }

    #[test]
    fn opaque_leaves_are_rejected() {
        let value = Value::Array(vec![Value::Int(1), Value::opaque(Marker)]);
        assert!(matches!(to_json(&value), Err(JsonError::Opaque(_))));
    }

    #[test]
    fn non_finite_floats_become_null() {
        assert_eq!(to_json(&Value::Float(f64::NAN)).unwrap(), JsonValue::Null);
    }

    #[test]
    fn tables_round_trip() {
        let json = json!({
            "people": {
                "1": {"name": "ada", "age": 36},
                "2": {"name": "joy"},
            },
            "empty": {},
        });
        let tables = tables_from_json(json.clone()).unwrap();
        assert_eq!(tables_to_json(&tables).unwrap(), json);
    }

    #[test]
    fn malformed_shapes_are_rejected() {
        assert!(matches!(
            tables_from_json(json!([1, 2])),
            Err(JsonError::Shape(_))
        ));
        assert!(matches!(
            tables_from_json(json!({"t": 3})),
            Err(JsonError::Shape(_))
        ));
        assert!(matches!(
            tables_from_json(json!({"t": {"1": []}})),
            Err(JsonError::Shape(_))
        ));
    }
}
