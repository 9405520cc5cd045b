//! Human-readable YAML strategy.

use crate::errors::{Result, TrailError};
use crate::model::table::quote_ident;
use crate::model::AttributeMap;
use crate::query::condition::{Condition, SqlValue};
use crate::serializer::SerializationStrategy;
use serde_json::{Number, Value};

const NAME: &str = "yaml";
const DOCUMENT_START: &str = "---\n";

/// Stores mappings as YAML documents.
///
/// Every document starts with `---`, so each top-level key sits right after a
/// newline. That is what the text-column predicate anchors on.
///
/// The match is also anchored at its end: the line after the fragment must
/// not continue the value, either as an indented line of a nested mapping or
/// as another `- ` sequence item. Otherwise `{"tags": ["a"]}` would match a
/// stored `tags: [a, b]`.
#[derive(Debug, Clone, Copy, Default)]
pub struct YamlStrategy;

impl SerializationStrategy for YamlStrategy {
    fn name(&self) -> &'static str {
        NAME
    }

    fn encode(&self, attributes: &AttributeMap) -> Result<String> {
        let body = serde_yaml::to_string(attributes).map_err(|e| TrailError::encode(NAME, e))?;
        Ok(format!("{}{}", DOCUMENT_START, body))
    }

    fn decode(&self, payload: &str) -> Result<AttributeMap> {
        let document: serde_yaml::Value =
            serde_yaml::from_str(payload).map_err(|e| TrailError::decode(NAME, e))?;

        match untag(document) {
            serde_yaml::Value::Mapping(mapping) => mapping
                .into_iter()
                .map(|(key, value)| {
                    let key = key_to_string(key)?;
                    let value = yaml_to_json(value)?;
                    Ok((key, value))
                })
                .collect::<std::result::Result<AttributeMap, String>>()
                .map_err(|reason| TrailError::decode(NAME, reason)),
            other => Err(TrailError::decode(
                NAME,
                format!("expected a mapping, found {}", kind_of(&other)),
            )),
        }
    }

    fn where_object_condition(&self, column: &str, key: &str, value: &Value) -> Result<Condition> {
        let mut pair = AttributeMap::new();
        pair.insert(key.to_string(), value.clone());
        let fragment = serde_yaml::to_string(&pair).map_err(|e| TrailError::encode(NAME, e))?;
        let needle = format!("\n{}", fragment);
        // instr and substr count characters, not bytes.
        let width = i64::try_from(needle.chars().count())
            .map_err(|e| TrailError::encode(NAME, e))?;
        let column = quote_ident(column);
        let next = |len: usize| {
            format!("substr({c}, instr({c}, ?) + ?, {len})", c = column, len = len)
        };

        Ok(Condition::new(
            format!(
                "instr({}, ?) > 0 AND {} <> ' ' AND {} <> '- '",
                column,
                next(1),
                next(2)
            ),
            vec![
                SqlValue::Text(needle.clone()),
                SqlValue::Text(needle.clone()),
                SqlValue::Integer(width),
                SqlValue::Text(needle),
                SqlValue::Integer(width),
            ],
        ))
    }
}

fn untag(value: serde_yaml::Value) -> serde_yaml::Value {
    match value {
        serde_yaml::Value::Tagged(tagged) => untag(tagged.value),
        other => other,
    }
}

fn kind_of(value: &serde_yaml::Value) -> &'static str {
    match value {
        serde_yaml::Value::Null => "null",
        serde_yaml::Value::Bool(_) => "a boolean",
        serde_yaml::Value::Number(_) => "a number",
        serde_yaml::Value::String(_) => "a string",
        serde_yaml::Value::Sequence(_) => "a sequence",
        serde_yaml::Value::Mapping(_) => "a mapping",
        serde_yaml::Value::Tagged(_) => "a tagged value",
    }
}

fn key_to_string(key: serde_yaml::Value) -> std::result::Result<String, String> {
    match untag(key) {
        serde_yaml::Value::String(s) => Ok(s),
        serde_yaml::Value::Number(n) => Ok(n.to_string()),
        serde_yaml::Value::Bool(b) => Ok(b.to_string()),
        serde_yaml::Value::Null => Ok("null".to_string()),
        other => Err(format!("mapping key must be a scalar, found {}", kind_of(&other))),
    }
}

/// Convert a YAML value into a plain JSON value, unwrapping tags.
fn yaml_to_json(value: serde_yaml::Value) -> std::result::Result<Value, String> {
    Ok(match untag(value) {
        serde_yaml::Value::Null => Value::Null,
        serde_yaml::Value::Bool(b) => Value::Bool(b),
        serde_yaml::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::from(i)
            } else if let Some(u) = n.as_u64() {
                Value::from(u)
            } else {
                let f = n.as_f64().unwrap_or(f64::NAN);
                Value::Number(
                    Number::from_f64(f).ok_or_else(|| format!("non-finite number {}", n))?,
                )
            }
        }
        serde_yaml::Value::String(s) => Value::String(s),
        serde_yaml::Value::Sequence(items) => Value::Array(
            items
                .into_iter()
                .map(yaml_to_json)
                .collect::<std::result::Result<Vec<_>, _>>()?,
        ),
        serde_yaml::Value::Mapping(mapping) => {
            let mut object = serde_json::Map::new();
            for (key, value) in mapping {
                object.insert(key_to_string(key)?, yaml_to_json(value)?);
            }
            Value::Object(object)
        }
        serde_yaml::Value::Tagged(tagged) => yaml_to_json(tagged.value)?,
    })
}
