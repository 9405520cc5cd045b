//! Attribute-level diff computation.
//!
//! ## Entry points
//!
//! - [`compute_changeset`] filters a raw changeset down to what gets stored,
//!   unless an override adapter answers for the table.
//! - [`snapshot_attributes`] strips attributes that are never recorded.
//! - [`prior_state`] rebuilds the pre-change snapshot of an update.
//!
//! ## Guarantees
//!
//! - A stored pair never has equal old and new values.
//! - Output is ordered by attribute name, so encoding is deterministic.

pub mod engine;

pub use engine::{compute_changeset, prior_state, snapshot_attributes};
