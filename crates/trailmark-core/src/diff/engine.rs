//! Built-in changeset filtering and snapshot derivation.

use crate::adapter::{settle, DiffAdapter};
use crate::errors::Result;
use crate::model::{AttributeMap, Changeset, HistoryTable};
use crate::query::ops;

/// Reduce `raw` to the changes that belong in a history record.
///
/// If `adapter` implements `diff`, its answer is returned verbatim and none of
/// the built-in filtering runs. Otherwise no-op pairs are dropped and the
/// table's `only`/`ignore`/`skip` options are applied.
///
/// # Errors
///
/// `Adapter` if the override adapter fails.
pub fn compute_changeset(
    table: &HistoryTable,
    raw: &Changeset,
    adapter: Option<&dyn DiffAdapter>,
) -> Result<Changeset> {
    if let Some(answer) = adapter.and_then(|a| settle(ops::DIFF, a.diff(table, raw))) {
        return answer;
    }

    Ok(raw
        .iter()
        .filter(|(key, pair)| !pair.is_noop() && table.options.tracks_change(key))
        .map(|(key, pair)| (key.clone(), pair.clone()))
        .collect())
}

/// Copy of `attributes` without the table's skipped attributes.
pub fn snapshot_attributes(table: &HistoryTable, attributes: &AttributeMap) -> AttributeMap {
    attributes
        .iter()
        .filter(|(key, _)| table.options.keeps_in_snapshot(key))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

/// State before `changes` were applied to `current`.
///
/// Attributes absent from `current` but present in `changes` are restored too,
/// so a snapshot of an update carries every attribute that changed.
pub fn prior_state(current: &AttributeMap, changes: &Changeset) -> AttributeMap {
    let mut previous = current.clone();
    for (key, pair) in changes {
        previous.insert(key.clone(), pair.old().clone());
    }
    previous
}
