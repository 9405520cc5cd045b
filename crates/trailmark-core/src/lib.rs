//! Trailmark Core - diff encoding and query translation for audit trails
//!
//! This crate holds everything that does not need a database connection:
//! - History record model: snapshots, `[old, new]` changesets, tracking options
//! - Serialization strategies (YAML, JSON) with text-column predicates
//! - Column encoding resolution with an explicit cache reset
//! - The optional override adapter and the built-in diff computation
//! - The five query builders producing SQL conditions
//!
//! Storage lives in `trailmark-store`, orchestration in `trailmark-engine`.

pub mod adapter;
pub mod config;
pub mod diff;
pub mod errors;
pub mod logging_facility;
pub mod model;
pub mod query;
pub mod resolver;
pub mod serializer;

// Log macros refer to `$crate::schema`.
pub use trailmark_core_types::schema;

pub use adapter::{AdapterResult, DiffAdapter};
pub use config::{TrailConfig, TrailSettings};
pub use errors::{Result, TmError, TmErrorKind, TrailError};
pub use model::{AttributeMap, ChangePair, Changeset, HistoryRecord, HistoryTable, Subject};
pub use query::{Condition, QueryContext, SqlValue};
pub use resolver::{ColumnEncodingResolver, SchemaSource};
pub use serializer::{JsonStrategy, SerializationStrategy, StrategyKind, YamlStrategy};
pub use trailmark_core_types::{ColumnEncoding, Event};
