//! Column encoding resolution with a process-wide cache.
//!
//! The first query against a `(table, column)` pair asks the schema what type
//! the column was declared with. The classification is cached until `reset`
//! is called, so later schema changes are only picked up after a reset.

use crate::errors::{Result, TrailError};
use std::collections::HashMap;
use std::sync::Mutex;
use trailmark_core_types::ColumnEncoding;

/// Read-only view of the live schema.
pub trait SchemaSource {
    /// Declared type of `table.column`, or `None` if either does not exist.
    fn column_type(&self, table: &str, column: &str) -> Result<Option<String>>;
}

/// Caches column encodings per `(table, column)`.
#[derive(Debug, Default)]
pub struct ColumnEncodingResolver {
    cache: Mutex<HashMap<(String, String), ColumnEncoding>>,
}

impl ColumnEncodingResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Classify `table.column`, consulting `schema` on a cache miss.
    ///
    /// # Errors
    ///
    /// `UnknownColumn` if the column is absent, `UnsupportedDeclaredType` if
    /// its declared type cannot hold a payload, or whatever `schema` reports.
    /// Failures are not cached.
    pub fn resolve(
        &self,
        schema: &dyn SchemaSource,
        table: &str,
        column: &str,
    ) -> Result<ColumnEncoding> {
        let key = (table.to_string(), column.to_string());
        if let Ok(cache) = self.cache.lock() {
            if let Some(encoding) = cache.get(&key) {
                return Ok(*encoding);
            }
        }

        let declared = schema
            .column_type(table, column)?
            .ok_or_else(|| TrailError::UnknownColumn {
                table: table.to_string(),
                column: column.to_string(),
            })?;

        let encoding = ColumnEncoding::from_declared_type(&declared).ok_or_else(|| {
            TrailError::UnsupportedDeclaredType {
                table: table.to_string(),
                column: column.to_string(),
                declared: declared.clone(),
            }
        })?;

        tracing::debug!(
            table = table,
            column = column,
            declared = %declared,
            encoding = encoding.as_str(),
            "resolved column encoding"
        );

        // A poisoned lock only costs us the cache entry.
        if let Ok(mut cache) = self.cache.lock() {
            cache.insert(key, encoding);
        }
        Ok(encoding)
    }

    /// Forget every cached classification.
    pub fn reset(&self) {
        if let Ok(mut cache) = self.cache.lock() {
            cache.clear();
        }
    }

    pub fn cached_len(&self) -> usize {
        self.cache.lock().map(|cache| cache.len()).unwrap_or(0)
    }
}
