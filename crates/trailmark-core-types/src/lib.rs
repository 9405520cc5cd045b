//! Core types shared across Trailmark crates
//!
//! This crate provides the vocabulary used by the core, the store and the
//! logging facility:
//!
//! - **Column encodings**: how a snapshot/changes column is physically stored
//! - **History events**: the lifecycle event a history row records
//! - **Schema constants**: Canonical field keys and event names

pub mod encoding;
pub mod event;
pub mod schema;

pub use encoding::ColumnEncoding;
pub use event::Event;
