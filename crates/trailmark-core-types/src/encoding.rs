//! Physical column encodings for snapshot and changes columns.

use serde::{Deserialize, Serialize};
use std::fmt;

/// How a snapshot/changes column is stored by the database.
///
/// The encoding is independent of the serialization strategy: text columns
/// always go through the strategy's encode/decode, structured columns hold a
/// JSON document the database can query natively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColumnEncoding {
    /// Plain text blob
    Text,
    /// JSON document, queried with extraction functions
    StructuredJson,
    /// Binary JSON document, queried with type-exact document comparison
    StructuredBinaryJson,
}

impl ColumnEncoding {
    /// Classify a declared SQL column type.
    ///
    /// Returns `None` for declared types that cannot hold an encoded payload
    /// (integers, reals, blobs).
    pub fn from_declared_type(declared: &str) -> Option<Self> {
        let normalized = declared.trim().to_ascii_uppercase();
        // VARCHAR(255), CHARACTER VARYING(10), ...
        let base = normalized
            .split(['(', ' '])
            .next()
            .unwrap_or_default()
            .to_string();

        match base.as_str() {
            "JSON" => Some(ColumnEncoding::StructuredJson),
            "JSONB" => Some(ColumnEncoding::StructuredBinaryJson),
            "" | "TEXT" | "VARCHAR" | "CHAR" | "CHARACTER" | "CLOB" | "NCHAR" | "NVARCHAR"
            | "NATIVE" | "VARYING" => Some(ColumnEncoding::Text),
            _ => None,
        }
    }

    /// Whether the database can evaluate document predicates on this column.
    pub fn is_structured(&self) -> bool {
        !matches!(self, ColumnEncoding::Text)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnEncoding::Text => "text",
            ColumnEncoding::StructuredJson => "json",
            ColumnEncoding::StructuredBinaryJson => "jsonb",
        }
    }
}

impl fmt::Display for ColumnEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
