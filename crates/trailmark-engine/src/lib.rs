//! Trailmark Engine - Orchestration layer
//!
//! Composes configuration, the column encoding cache and the SQLite store
//! into one `HistoryTrail` that records history rows and answers the five
//! query shapes end to end.

pub mod commands;
pub mod payload;
pub mod trail;

pub use commands::QueryShape;
pub use trail::HistoryTrail;
