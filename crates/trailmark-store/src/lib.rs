//! Trailmark Store - SQLite persistence for history records
//!
//! Provides:
//! - Connection helpers and embedded, checksummed migrations
//! - Live schema introspection for column encoding resolution
//! - Append-only history writes, condition execution and ordered reads

pub mod db;
pub mod errors;
pub mod history;
pub mod migrations;
pub mod schema;

// Re-export key types
pub use errors::Result;
pub use schema::{create_history_table, SqliteSchema};
