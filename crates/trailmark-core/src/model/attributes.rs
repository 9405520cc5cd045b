//! Attribute snapshots and attribute-level diffs.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Plain mapping of attribute name to value.
///
/// Used for snapshots and for query predicates. Decoding a stored payload
/// always yields this type.
pub type AttributeMap = BTreeMap<String, Value>;

/// Mapping of attribute name to its `[old, new]` pair.
pub type Changeset = BTreeMap<String, ChangePair>;

/// An `[old, new]` value pair. Serializes as a two-element array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangePair(pub Value, pub Value);

impl ChangePair {
    pub fn new(old: impl Into<Value>, new: impl Into<Value>) -> Self {
        Self(old.into(), new.into())
    }

    pub fn old(&self) -> &Value {
        &self.0
    }

    pub fn new_value(&self) -> &Value {
        &self.1
    }

    /// True when old and new are equal, i.e. nothing actually changed.
    pub fn is_noop(&self) -> bool {
        self.0 == self.1
    }

    /// Read a pair back from its array form.
    ///
    /// Anything other than an array of exactly two elements is rejected.
    pub fn from_value(value: Value) -> Result<Self, String> {
        match value {
            Value::Array(mut items) if items.len() == 2 => {
                let new = items.pop().unwrap_or(Value::Null);
                let old = items.pop().unwrap_or(Value::Null);
                Ok(Self(old, new))
            }
            Value::Array(items) => Err(format!(
                "change pair must have exactly 2 elements, found {}",
                items.len()
            )),
            other => Err(format!("change pair must be an array, found {}", other)),
        }
    }

    pub fn into_value(self) -> Value {
        Value::Array(vec![self.0, self.1])
    }
}

/// Flatten a changeset into a plain mapping of `[old, new]` arrays.
pub fn changeset_to_attributes(changes: &Changeset) -> AttributeMap {
    changes
        .iter()
        .map(|(key, pair)| (key.clone(), pair.clone().into_value()))
        .collect()
}

/// Rebuild a changeset from a plain mapping of `[old, new]` arrays.
pub fn changeset_from_attributes(map: AttributeMap) -> Result<Changeset, String> {
    map.into_iter()
        .map(|(key, value)| {
            ChangePair::from_value(value)
                .map(|pair| (key.clone(), pair))
                .map_err(|reason| format!("attribute '{}': {}", key, reason))
        })
        .collect()
}
