//! Query-translation: logical predicates to storage-level conditions.
//!
//! Each builder validates its argument on construction, then on `build`:
//!
//! 1. asks the override adapter, if any, and returns its answer verbatim;
//! 2. resolves the live encoding of the column it targets;
//! 3. emits a native document predicate for JSON/JSONB columns, or hands
//!    the work to the serialization strategy for text columns.

pub mod condition;
pub mod structured;
pub mod where_attribute_changes;
pub mod where_object;
pub mod where_object_changes;

#[cfg(test)]
mod test_support;

pub use condition::{Condition, SqlValue};
pub use where_attribute_changes::WhereAttributeChanges;
pub use where_object::WhereObject;
pub use where_object_changes::{WhereObjectChanges, WhereObjectChangesFrom, WhereObjectChangesTo};

use crate::adapter::DiffAdapter;
use crate::config::TrailConfig;
use crate::errors::{Result, TrailError};
use crate::model::{AttributeMap, HistoryTable};
use crate::resolver::{ColumnEncodingResolver, SchemaSource};
use crate::serializer::SerializationStrategy;
use serde_json::Value;
use trailmark_core_types::ColumnEncoding;

/// Operation names used in errors, logs and adapter dispatch.
pub mod ops {
    pub const DIFF: &str = "diff";
    pub const WHERE_OBJECT: &str = "where_object";
    pub const WHERE_OBJECT_CHANGES: &str = "where_object_changes";
    pub const WHERE_OBJECT_CHANGES_FROM: &str = "where_object_changes_from";
    pub const WHERE_OBJECT_CHANGES_TO: &str = "where_object_changes_to";
    pub const WHERE_ATTRIBUTE_CHANGES: &str = "where_attribute_changes";
}

/// Everything a builder composes: the table, the active configuration, the
/// encoding cache and a view of the live schema.
#[derive(Clone, Copy)]
pub struct QueryContext<'a> {
    pub table: &'a HistoryTable,
    pub config: &'a TrailConfig,
    pub resolver: &'a ColumnEncodingResolver,
    pub schema: &'a dyn SchemaSource,
}

impl<'a> QueryContext<'a> {
    pub fn new(
        table: &'a HistoryTable,
        config: &'a TrailConfig,
        resolver: &'a ColumnEncodingResolver,
        schema: &'a dyn SchemaSource,
    ) -> Self {
        Self {
            table,
            config,
            resolver,
            schema,
        }
    }

    pub fn adapter(&self) -> Option<&'a dyn DiffAdapter> {
        self.config.adapter.as_deref()
    }

    pub fn strategy(&self) -> &'a dyn SerializationStrategy {
        self.config.strategy.as_ref()
    }

    pub(crate) fn encoding_of(&self, column: &str) -> Result<ColumnEncoding> {
        self.resolver.resolve(self.schema, &self.table.name, column)
    }
}

impl std::fmt::Debug for QueryContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryContext")
            .field("table", &self.table.name)
            .field("strategy", &self.config.strategy.name())
            .field("adapter", &self.config.adapter.is_some())
            .finish()
    }
}

/// Accept only a mapping of attribute names to values.
pub(crate) fn expect_mapping(op: &'static str, argument: &Value) -> Result<AttributeMap> {
    let object = argument.as_object().ok_or_else(|| {
        TrailError::invalid_argument(op, format!("expected a mapping, got {}", kind_of(argument)))
    })?;

    object
        .iter()
        .map(|(key, value)| {
            check_attribute_name(op, key)?;
            Ok((key.clone(), value.clone()))
        })
        .collect()
}

/// Accept only a single non-empty attribute name.
pub(crate) fn expect_attribute(op: &'static str, argument: &Value) -> Result<String> {
    match argument {
        Value::String(name) => {
            check_attribute_name(op, name)?;
            Ok(name.clone())
        }
        other => Err(TrailError::invalid_argument(
            op,
            format!("expected an attribute name, got {}", kind_of(other)),
        )),
    }
}

fn check_attribute_name(op: &'static str, name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(TrailError::invalid_argument(op, "attribute name is empty"));
    }
    // Cannot be written as a quoted JSON path label.
    if name.contains('"') {
        return Err(TrailError::invalid_argument(
            op,
            format!("attribute name '{}' contains a double quote", name),
        ));
    }
    Ok(())
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "a mapping",
    }
}
