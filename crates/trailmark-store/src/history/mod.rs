//! History row persistence and reads.

pub mod persist;
pub mod query;

pub use persist::{backfill_actor, insert_record};
pub use query::{execute_condition, fetch_record, list_for_subject, next_record, previous_record};
