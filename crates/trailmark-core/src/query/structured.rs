//! Native predicates for structured document columns.
//!
//! JSON columns use `json_extract` guarded by `json_type`, JSONB columns
//! compare the `->` rendering of the element against `json(?)`. Both are
//! exact on type as well as value: `true` never matches `1`, `"1"` never
//! matches `1`.

use crate::model::table::quote_ident;
use crate::query::condition::{Condition, SqlValue};
use serde_json::Value;
use trailmark_core_types::ColumnEncoding;

/// Which element of an `[old, new]` pair a path points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PairSide {
    Old,
    New,
}

impl PairSide {
    fn index(self) -> usize {
        match self {
            PairSide::Old => 0,
            PairSide::New => 1,
        }
    }
}

/// Path to a top-level attribute, or to one side of its change pair.
///
/// Callers reject names containing `"` before getting here.
pub fn json_path(key: &str, side: Option<PairSide>) -> String {
    match side {
        None => format!("$.\"{}\"", key),
        Some(side) => format!("$.\"{}\"[{}]", key, side.index()),
    }
}

/// The element at `path` equals `value`.
pub fn equals(encoding: ColumnEncoding, column: &str, path: String, value: &Value) -> Condition {
    let column = quote_ident(column);
    match encoding {
        ColumnEncoding::StructuredBinaryJson => Condition::new(
            format!("{} -> ? = json(?)", column),
            vec![SqlValue::Text(path), SqlValue::Text(value.to_string())],
        ),
        // Text columns never reach here; treat them like JSON.
        ColumnEncoding::StructuredJson | ColumnEncoding::Text => {
            let has_type = Condition::new(
                format!("json_type({}, ?) = ?", column),
                vec![
                    SqlValue::Text(path.clone()),
                    SqlValue::from(json_type_name(value)),
                ],
            );
            match value {
                // The type name alone pins these down.
                Value::Null | Value::Bool(_) => has_type,
                Value::Array(_) | Value::Object(_) => has_type.and(Condition::new(
                    format!("json_extract({}, ?) = json(?)", column),
                    vec![SqlValue::Text(path), SqlValue::Text(value.to_string())],
                )),
                scalar => has_type.and(Condition::new(
                    format!("json_extract({}, ?) = ?", column),
                    vec![SqlValue::Text(path), SqlValue::from_json_scalar(scalar)],
                )),
            }
        }
    }
}

/// What SQLite's `json_type` reports for `value`.
fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(true) => "true",
        Value::Bool(false) => "false",
        Value::Number(n) if n.is_f64() => "real",
        Value::Number(_) => "integer",
        Value::String(_) => "text",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Some element exists at `path`, whatever its value (JSON null included).
pub fn present(encoding: ColumnEncoding, column: &str, path: String) -> Condition {
    let column = quote_ident(column);
    let sql = match encoding {
        ColumnEncoding::StructuredBinaryJson => format!("{} -> ? IS NOT NULL", column),
        ColumnEncoding::StructuredJson | ColumnEncoding::Text => {
            format!("json_type({}, ?) IS NOT NULL", column)
        }
    };
    Condition::new(sql, vec![SqlValue::Text(path)])
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_paths() {
        assert_eq!(json_path("name", None), "$.\"name\"");
        assert_eq!(json_path("name", Some(PairSide::Old)), "$.\"name\"[0]");
        assert_eq!(json_path("name", Some(PairSide::New)), "$.\"name\"[1]");
    }

    #[test]
    fn test_json_scalar_binds_sql_value() {
        let c = equals(
            ColumnEncoding::StructuredJson,
            "changes",
            json_path("count", Some(PairSide::New)),
            &json!(100),
        );
        assert_eq!(
            c.sql(),
            "(json_type(\"changes\", ?) = ?) AND (json_extract(\"changes\", ?) = ?)"
        );
        assert_eq!(c.params()[1], SqlValue::Text("integer".into()));
        assert_eq!(c.params()[3], SqlValue::Integer(100));
    }

    #[test]
    fn test_json_null_uses_json_type() {
        let c = equals(
            ColumnEncoding::StructuredJson,
            "snapshot",
            json_path("deleted_at", None),
            &Value::Null,
        );
        assert_eq!(c.sql(), "json_type(\"snapshot\", ?) = ?");
        assert_eq!(c.params()[1], SqlValue::Text("null".into()));
    }

    #[test]
    fn test_json_container_compares_documents() {
        let c = equals(
            ColumnEncoding::StructuredJson,
            "snapshot",
            json_path("tags", None),
            &json!(["a", "b"]),
        );
        assert_eq!(
            c.sql(),
            "(json_type(\"snapshot\", ?) = ?) AND (json_extract(\"snapshot\", ?) = json(?))"
        );
        assert_eq!(c.params()[1], SqlValue::Text("array".into()));
        assert_eq!(c.params()[3], SqlValue::Text("[\"a\",\"b\"]".into()));
    }

    #[test]
    fn test_json_bool_compares_type_only() {
        let c = equals(
            ColumnEncoding::StructuredJson,
            "snapshot",
            json_path("flag", None),
            &json!(true),
        );
        assert_eq!(c.sql(), "json_type(\"snapshot\", ?) = ?");
        assert_eq!(c.params()[1], SqlValue::Text("true".into()));
    }

    #[test]
    fn test_json_type_names() {
        assert_eq!(json_type_name(&json!(false)), "false");
        assert_eq!(json_type_name(&json!(1.5)), "real");
        assert_eq!(json_type_name(&json!(-3)), "integer");
        assert_eq!(json_type_name(&json!("1")), "text");
        assert_eq!(json_type_name(&json!({"a": 1})), "object");
    }

    #[test]
    fn test_jsonb_is_type_exact() {
        let c = equals(
            ColumnEncoding::StructuredBinaryJson,
            "changes",
            json_path("count", Some(PairSide::Old)),
            &json!("100"),
        );
        assert_eq!(c.sql(), "\"changes\" -> ? = json(?)");
        assert_eq!(c.params()[1], SqlValue::Text("\"100\"".into()));
    }

    #[test]
    fn test_present() {
        assert_eq!(
            present(ColumnEncoding::StructuredJson, "changes", json_path("name", None)).sql(),
            "json_type(\"changes\", ?) IS NOT NULL"
        );
        assert_eq!(
            present(ColumnEncoding::StructuredBinaryJson, "changes", json_path("name", None))
                .sql(),
            "\"changes\" -> ? IS NOT NULL"
        );
    }
}
