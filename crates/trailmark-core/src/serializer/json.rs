//! Machine-format JSON strategy.

use crate::errors::{Result, TrailError};
use crate::model::table::quote_ident;
use crate::model::AttributeMap;
use crate::query::condition::Condition;
use crate::query::structured::{equals, json_path};
use crate::serializer::SerializationStrategy;
use serde_json::Value;
use trailmark_core_types::ColumnEncoding;

const NAME: &str = "json";

/// Stores mappings as compact JSON objects with sorted keys.
///
/// The same text is a valid document for JSON/JSONB columns.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonStrategy;

impl SerializationStrategy for JsonStrategy {
    fn name(&self) -> &'static str {
        NAME
    }

    fn encode(&self, attributes: &AttributeMap) -> Result<String> {
        serde_json::to_string(attributes).map_err(|e| TrailError::encode(NAME, e))
    }

    fn decode(&self, payload: &str) -> Result<AttributeMap> {
        match serde_json::from_str::<Value>(payload).map_err(|e| TrailError::decode(NAME, e))? {
            Value::Object(object) => Ok(object.into_iter().collect()),
            other => Err(TrailError::decode(
                NAME,
                format!("expected an object, found {}", other),
            )),
        }
    }

    /// Reads the top-level attribute with SQLite's JSON functions.
    ///
    /// Only rows holding valid JSON are inspected, so rows written by another
    /// strategy in the same column are skipped rather than raising an error.
    fn where_object_condition(&self, column: &str, key: &str, value: &Value) -> Result<Condition> {
        let (sql, params) =
            equals(ColumnEncoding::StructuredJson, column, json_path(key, None), value)
                .into_parts();
        Ok(Condition::new(
            format!(
                "CASE WHEN json_valid({}) THEN {} ELSE 0 END",
                quote_ident(column),
                sql
            ),
            params,
        ))
    }
}
