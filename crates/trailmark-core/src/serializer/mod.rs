//! Pluggable serialization strategies.
//!
//! A strategy turns an attribute mapping into the text stored in a `Text`
//! column and back, and knows how to match that text for `where_object`
//! queries. Structured (JSON/JSONB) columns bypass the strategy for storage
//! and are queried natively by the builders.
//!
//! Only `where_object_condition` is required. The other text predicates have
//! default implementations that fail with `UnsupportedColumnType`; a custom
//! strategy may provide them, the built-in ones do not. The change predicates
//! receive the whole mapping so that even an empty one is rejected.

pub mod json;
pub mod yaml;

pub use json::JsonStrategy;
pub use yaml::YamlStrategy;

use crate::errors::{Result, TrailError};
use crate::model::attributes::{changeset_from_attributes, changeset_to_attributes};
use crate::model::{AttributeMap, Changeset};
use crate::query::condition::Condition;
use crate::query::ops;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use trailmark_core_types::ColumnEncoding;

/// Encode/decode plus text-column predicate generation.
pub trait SerializationStrategy: Send + Sync {
    /// Short name used in logs and error messages.
    fn name(&self) -> &'static str;

    /// Encode a mapping into its stored text form.
    fn encode(&self, attributes: &AttributeMap) -> Result<String>;

    /// Decode stored text into a plain mapping.
    ///
    /// # Errors
    ///
    /// `DecodeFailure` when the payload is malformed or not a mapping.
    fn decode(&self, payload: &str) -> Result<AttributeMap>;

    fn encode_changeset(&self, changes: &Changeset) -> Result<String> {
        self.encode(&changeset_to_attributes(changes))
    }

    /// Decode stored text into a changeset, checking every pair has arity 2.
    fn decode_changeset(&self, payload: &str) -> Result<Changeset> {
        let attributes = self.decode(payload)?;
        changeset_from_attributes(attributes).map_err(|reason| TrailError::decode(self.name(), reason))
    }

    /// Predicate matching rows whose encoded snapshot has `key` set to `value`.
    fn where_object_condition(&self, column: &str, key: &str, value: &Value) -> Result<Condition>;

    fn where_object_changes_condition(
        &self,
        _column: &str,
        _attributes: &AttributeMap,
    ) -> Result<Condition> {
        Err(TrailError::unsupported(
            ops::WHERE_OBJECT_CHANGES,
            ColumnEncoding::Text,
        ))
    }

    fn where_object_changes_from_condition(
        &self,
        _column: &str,
        _attributes: &AttributeMap,
    ) -> Result<Condition> {
        Err(TrailError::unsupported(
            ops::WHERE_OBJECT_CHANGES_FROM,
            ColumnEncoding::Text,
        ))
    }

    fn where_object_changes_to_condition(
        &self,
        _column: &str,
        _attributes: &AttributeMap,
    ) -> Result<Condition> {
        Err(TrailError::unsupported(
            ops::WHERE_OBJECT_CHANGES_TO,
            ColumnEncoding::Text,
        ))
    }

    fn where_attribute_changes_condition(&self, _column: &str, _attribute: &str) -> Result<Condition> {
        Err(TrailError::unsupported(
            ops::WHERE_ATTRIBUTE_CHANGES,
            ColumnEncoding::Text,
        ))
    }
}

/// Selector for the built-in strategies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrategyKind {
    /// Human-readable YAML documents
    #[default]
    #[serde(alias = "yml")]
    Yaml,
    /// Compact JSON
    Json,
}

impl StrategyKind {
    pub fn build(&self) -> Arc<dyn SerializationStrategy> {
        match self {
            StrategyKind::Yaml => Arc::new(YamlStrategy),
            StrategyKind::Json => Arc::new(JsonStrategy),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StrategyKind::Yaml => "yaml",
            StrategyKind::Json => "json",
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StrategyKind {
    type Err = TrailError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "yaml" | "yml" => Ok(StrategyKind::Yaml),
            "json" => Ok(StrategyKind::Json),
            other => Err(TrailError::Config {
                reason: format!("unknown serializer '{}', expected yaml or json", other),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ChangePair;

    #[test]
    fn test_kind_parse() {
        assert_eq!("YAML".parse::<StrategyKind>().unwrap(), StrategyKind::Yaml);
        assert_eq!("json".parse::<StrategyKind>().unwrap(), StrategyKind::Json);
        assert!("msgpack".parse::<StrategyKind>().is_err());
    }

    #[test]
    fn test_built_strategy_names() {
        assert_eq!(StrategyKind::Yaml.build().name(), "yaml");
        assert_eq!(StrategyKind::Json.build().name(), "json");
    }

    #[test]
    fn test_changeset_round_trip_both_strategies() {
        let mut changes = Changeset::new();
        changes.insert("name".into(), ChangePair::new(Value::Null, "A"));
        changes.insert("count".into(), ChangePair::new(0, 100));

        for kind in [StrategyKind::Yaml, StrategyKind::Json] {
            let strategy = kind.build();
            let encoded = strategy.encode_changeset(&changes).unwrap();
            assert_eq!(strategy.decode_changeset(&encoded).unwrap(), changes);
        }
    }

    #[test]
    fn test_decode_changeset_rejects_bad_pair() {
        let strategy = JsonStrategy;
        let err = strategy
            .decode_changeset(r#"{"name":["a","b","c"]}"#)
            .unwrap_err();
        assert!(matches!(err, TrailError::DecodeFailure { .. }));
    }

    #[test]
    fn test_builtins_reject_change_predicates() {
        for kind in [StrategyKind::Yaml, StrategyKind::Json] {
            let strategy = kind.build();
            let err = strategy
                .where_object_changes_condition("changes", &AttributeMap::new())
                .unwrap_err();
            assert!(matches!(
                err,
                TrailError::UnsupportedColumnType {
                    op: ops::WHERE_OBJECT_CHANGES,
                    encoding: ColumnEncoding::Text
                }
            ));
            assert!(strategy
                .where_attribute_changes_condition("changes", "name")
                .is_err());
        }
    }
}
