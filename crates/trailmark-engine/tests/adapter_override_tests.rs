// Override adapter: answers replace built-in logic for exactly the
// operations it implements

use rusqlite::Connection;
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use trailmark_core::{
    AdapterResult, AttributeMap, ChangePair, Changeset, Condition, DiffAdapter, HistoryTable,
    SqlValue, Subject, TmErrorKind, TrailConfig,
};
use trailmark_engine::{HistoryTrail, QueryShape};

#[derive(Default)]
struct Calls {
    diff: AtomicUsize,
    where_object_changes: AtomicUsize,
}

/// Implements `diff` and `where_object_changes` only.
struct Partial {
    calls: Arc<Calls>,
}

impl DiffAdapter for Partial {
    fn diff(&self, _table: &HistoryTable, raw: &Changeset) -> Option<AdapterResult<Changeset>> {
        self.calls.diff.fetch_add(1, Ordering::SeqCst);
        // Keep no-op pairs the built-in path would drop.
        Some(Ok(raw.clone()))
    }

    fn where_object_changes(
        &self,
        _table: &HistoryTable,
        attributes: &AttributeMap,
    ) -> Option<AdapterResult<Condition>> {
        self.calls.where_object_changes.fetch_add(1, Ordering::SeqCst);
        let name = attributes.get("name")?.as_str()?.to_string();
        Some(Ok(Condition::new(
            "instr(changes, ?) > 0",
            vec![SqlValue::Text(name)],
        )))
    }
}

struct Broken;

#[derive(Debug)]
struct Boom;

impl std::fmt::Display for Boom {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("boom")
    }
}

impl std::error::Error for Boom {}

impl DiffAdapter for Broken {
    fn where_attribute_changes(
        &self,
        _table: &HistoryTable,
        _attribute: &str,
    ) -> Option<AdapterResult<Condition>> {
        Some(Err(Box::new(Boom)))
    }
}

fn setup(adapter: Arc<dyn DiffAdapter>) -> (Connection, HistoryTable, HistoryTrail) {
    let mut conn = trailmark_store::db::open_in_memory().unwrap();
    trailmark_store::migrations::apply_migrations(&mut conn).unwrap();
    let trail = HistoryTrail::new(TrailConfig::default().with_adapter(adapter));
    (conn, HistoryTable::default(), trail)
}

#[test]
fn test_adapter_replaces_builtin_on_text_columns() {
    let calls = Arc::new(Calls::default());
    let (conn, table, trail) = setup(Arc::new(Partial {
        calls: calls.clone(),
    }));
    let subject = Subject::new("Widget", "1");

    let mut current = AttributeMap::new();
    current.insert("name".into(), json!("foobar"));
    let mut raw = Changeset::new();
    raw.insert("name".into(), ChangePair::new("A", "foobar"));
    raw.insert("flag".into(), ChangePair::new(true, true));
    let id = trail
        .record_update(&conn, &table, &subject, &current, &raw, None)
        .unwrap()
        .unwrap();
    assert_eq!(calls.diff.load(Ordering::SeqCst), 1);

    // The adapter kept the no-op pair.
    let record = trailmark_store::history::fetch_record(&conn, &table, id).unwrap();
    let stored = trail.changeset(&conn, &table, &record).unwrap().unwrap();
    assert!(stored.contains_key("flag"));

    // Text columns have no built-in `where_object_changes`; the adapter's
    // answer is used as is.
    let rows = trail
        .find(
            &conn,
            &table,
            QueryShape::WhereObjectChanges,
            &json!({"name": "foobar"}),
        )
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(calls.where_object_changes.load(Ordering::SeqCst), 1);
    assert_eq!(trail.resolver().cached_len(), 2);

    // Not implemented by the adapter: built-in path, which rejects text.
    let err = trail
        .find(
            &conn,
            &table,
            QueryShape::WhereObjectChangesTo,
            &json!({"name": "foobar"}),
        )
        .unwrap_err();
    assert_eq!(err.kind(), TmErrorKind::UnsupportedColumnType);
}

#[test]
fn test_adapter_errors_propagate_unchanged() {
    let (conn, table, trail) = setup(Arc::new(Broken));

    let err = trail
        .find(
            &conn,
            &table,
            QueryShape::WhereAttributeChanges,
            &json!("name"),
        )
        .unwrap_err();
    assert_eq!(err.kind(), TmErrorKind::Adapter);
    assert_eq!(err.op(), Some("where_attribute_changes"));
    assert_eq!(err.adapter_source().map(|e| e.to_string()), Some("boom".into()));
}

#[test]
fn test_removing_the_adapter_restores_builtin() {
    let calls = Arc::new(Calls::default());
    let (conn, table, mut trail) = setup(Arc::new(Partial {
        calls: calls.clone(),
    }));
    trail.set_adapter(None);

    let err = trail
        .find(
            &conn,
            &table,
            QueryShape::WhereObjectChanges,
            &json!({"name": "foobar"}),
        )
        .unwrap_err();
    assert_eq!(err.kind(), TmErrorKind::UnsupportedColumnType);
    assert_eq!(calls.where_object_changes.load(Ordering::SeqCst), 0);
}
