//! Writes to a history table.
//!
//! Rows are append-only. The only update ever issued fills in a missing actor.

use crate::errors::{persistence, record_not_found, Result};
use rusqlite::{params, Connection, OptionalExtension};
use trailmark_core::model::table::quote_ident;
use trailmark_core::model::NewRecord;
use trailmark_core::HistoryTable;

/// Insert one history row and return its id.
///
/// # Errors
///
/// - `Persistence` — the insert failed (missing table, constraint violation)
pub fn insert_record(conn: &Connection, table: &HistoryTable, record: &NewRecord) -> Result<i64> {
    let sql = format!(
        "INSERT INTO {} (subject_type, subject_id, event, {}, {}, actor, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        quote_ident(&table.name),
        quote_ident(&table.snapshot_column),
        quote_ident(&table.changes_column),
    );

    conn.execute(
        &sql,
        params![
            record.subject.subject_type,
            record.subject.subject_id,
            record.event.as_str(),
            record.snapshot,
            record.changes,
            record.actor,
            record.created_at.timestamp_millis(),
        ],
    )
    .map_err(|e| persistence("insert_record", &table.name, e))?;

    let id = conn.last_insert_rowid();
    tracing::debug!(
        table = %table.name,
        record_id = id,
        event = record.event.as_str(),
        "inserted history record"
    );
    Ok(id)
}

/// Set the actor of a record that does not have one yet.
///
/// Returns `false` when the record already had an actor; it is left as is.
///
/// # Errors
///
/// - `NotFound` — no record with this id
/// - `Persistence` — the update failed
pub fn backfill_actor(
    conn: &Connection,
    table: &HistoryTable,
    id: i64,
    actor: &str,
) -> Result<bool> {
    let name = quote_ident(&table.name);
    let updated = conn
        .execute(
            &format!(
                "UPDATE {} SET actor = ?1 WHERE id = ?2 AND actor IS NULL",
                name
            ),
            params![actor, id],
        )
        .map_err(|e| persistence("backfill_actor", &table.name, e))?;

    if updated == 1 {
        tracing::debug!(table = %table.name, record_id = id, "backfilled actor");
        return Ok(true);
    }

    let exists = conn
        .query_row(
            &format!("SELECT 1 FROM {} WHERE id = ?1", name),
            [id],
            |_| Ok(()),
        )
        .optional()
        .map_err(|e| persistence("backfill_actor", &table.name, e))?
        .is_some();

    if exists {
        Ok(false)
    } else {
        Err(record_not_found("backfill_actor", &table.name, id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::fetch_record;
    use crate::migrations::apply_migrations;
    use chrono::{TimeZone, Utc};
    use trailmark_core::{Event, Subject, TmErrorKind};

    fn setup() -> Connection {
        let mut conn = Connection::open_in_memory().unwrap();
        apply_migrations(&mut conn).unwrap();
        conn
    }

    fn create_row(actor: Option<&str>) -> NewRecord {
        NewRecord {
            subject: Subject::new("Widget", "1"),
            event: Event::Create,
            snapshot: None,
            changes: Some("---\nname:\n- null\n- A\n".to_string()),
            actor: actor.map(str::to_string),
            created_at: Utc.timestamp_millis_opt(1_700_000_000_000).unwrap(),
        }
    }

    #[test]
    fn test_insert_and_fetch() {
        let conn = setup();
        let table = HistoryTable::default();
        let id = insert_record(&conn, &table, &create_row(Some("alice"))).unwrap();

        let record = fetch_record(&conn, &table, id).unwrap();
        assert_eq!(record.event, Event::Create);
        assert_eq!(record.snapshot, None);
        assert_eq!(record.actor.as_deref(), Some("alice"));
        assert_eq!(record.created_at.timestamp_millis(), 1_700_000_000_000);
    }

    #[test]
    fn test_backfill_only_when_missing() {
        let conn = setup();
        let table = HistoryTable::default();
        let id = insert_record(&conn, &table, &create_row(None)).unwrap();

        assert!(backfill_actor(&conn, &table, id, "bob").unwrap());
        assert!(!backfill_actor(&conn, &table, id, "carol").unwrap());
        assert_eq!(
            fetch_record(&conn, &table, id).unwrap().actor.as_deref(),
            Some("bob")
        );
    }

    #[test]
    fn test_backfill_unknown_record() {
        let conn = setup();
        let err = backfill_actor(&conn, &HistoryTable::default(), 99, "bob").unwrap_err();
        assert_eq!(err.kind(), TmErrorKind::NotFound);
        assert_eq!(err.record_id(), Some(99));
    }

    #[test]
    fn test_insert_into_missing_table() {
        let conn = setup();
        let err = insert_record(&conn, &HistoryTable::new("nope"), &create_row(None)).unwrap_err();
        assert_eq!(err.kind(), TmErrorKind::Persistence);
        assert_eq!(err.table(), Some("nope"));
    }
}
