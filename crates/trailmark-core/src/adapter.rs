//! Optional full-override point for diff computation and query building.
//!
//! Every method defaults to `None`, meaning "not implemented here". When an
//! adapter returns `Some`, its answer replaces all built-in logic for that
//! call: no column resolution, no strategy, no fallback on error.

use crate::errors::{AdapterFailure, Result, TrailError};
use crate::model::{AttributeMap, Changeset, HistoryTable};
use crate::query::condition::Condition;

pub type AdapterResult<T> = std::result::Result<T, AdapterFailure>;

pub trait DiffAdapter: Send + Sync {
    fn diff(&self, _table: &HistoryTable, _raw: &Changeset) -> Option<AdapterResult<Changeset>> {
        None
    }

    fn where_object(
        &self,
        _table: &HistoryTable,
        _attributes: &AttributeMap,
    ) -> Option<AdapterResult<Condition>> {
        None
    }

    fn where_object_changes(
        &self,
        _table: &HistoryTable,
        _attributes: &AttributeMap,
    ) -> Option<AdapterResult<Condition>> {
        None
    }

    fn where_object_changes_from(
        &self,
        _table: &HistoryTable,
        _attributes: &AttributeMap,
    ) -> Option<AdapterResult<Condition>> {
        None
    }

    fn where_object_changes_to(
        &self,
        _table: &HistoryTable,
        _attributes: &AttributeMap,
    ) -> Option<AdapterResult<Condition>> {
        None
    }

    fn where_attribute_changes(
        &self,
        _table: &HistoryTable,
        _attribute: &str,
    ) -> Option<AdapterResult<Condition>> {
        None
    }
}

/// Turn an adapter answer into a core result.
///
/// `None` stays `None` so the caller can fall through to built-in logic.
pub(crate) fn settle<T>(op: &'static str, answer: Option<AdapterResult<T>>) -> Option<Result<T>> {
    answer.map(|result| {
        tracing::debug!(op = op, ok = result.is_ok(), "override adapter answered");
        result.map_err(|source| TrailError::adapter(op, source))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Silent;
    impl DiffAdapter for Silent {}

    #[derive(Debug)]
    struct Boom;
    impl std::fmt::Display for Boom {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_str("boom")
        }
    }
    impl std::error::Error for Boom {}

    #[test]
    fn test_default_methods_are_absent() {
        let table = HistoryTable::default();
        let adapter = Silent;
        assert!(adapter.diff(&table, &Changeset::new()).is_none());
        assert!(adapter.where_object(&table, &AttributeMap::new()).is_none());
        assert!(adapter.where_attribute_changes(&table, "name").is_none());
    }

    #[test]
    fn test_settle_keeps_original_error() {
        let answer: Option<AdapterResult<Condition>> = Some(Err(Box::new(Boom)));
        let err = settle("where_object", answer).unwrap().unwrap_err();
        match err {
            TrailError::Adapter { op, source } => {
                assert_eq!(op, "where_object");
                assert!(source.downcast_ref::<Boom>().is_some());
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_settle_passes_none_through() {
        assert!(settle::<Condition>("where_object", None).is_none());
    }
}
