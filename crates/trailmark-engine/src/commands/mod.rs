//! Operations on a `HistoryTrail`.
//!
//! `record` writes history rows, `query` reads them back through the five
//! query shapes and decodes their payloads.

pub mod query;
pub mod record;

pub use query::QueryShape;

use std::time::Instant;
use trailmark_core::{log_op_end, log_op_error, log_op_start, HistoryTable};
use trailmark_store::errors::Result;

/// Bracket `f` with the canonical start/end log events for `op`.
pub(crate) fn logged<T>(
    op: &'static str,
    table: &HistoryTable,
    f: impl FnOnce() -> Result<T>,
) -> Result<T> {
    log_op_start!(op, table = table.name.as_str());
    let start = Instant::now();

    let result = f();

    let elapsed = start.elapsed().as_millis() as u64;
    match &result {
        Ok(_) => log_op_end!(op, duration_ms = elapsed),
        Err(e) => {
            let e_clone = e.clone().with_table(table.name.clone());
            log_op_error!(op, e_clone, duration_ms = elapsed);
        }
    }
    result
}
