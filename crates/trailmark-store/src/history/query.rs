//! Read-only history queries.
//!
//! Every list is ordered by `(created_at, id)`, i.e. creation order.

use crate::errors::{persistence, record_not_found, Result};
use chrono::{DateTime, TimeZone, Utc};
use rusqlite::types::{Type, Value as SqliteValue};
use rusqlite::{params_from_iter, Connection, OptionalExtension};
use trailmark_core::model::table::quote_ident;
use trailmark_core::{Condition, Event, HistoryRecord, HistoryTable, SqlValue, Subject};

/// Rows satisfying `condition`, in creation order.
///
/// # Errors
///
/// - `Persistence` — the statement could not be prepared or run
pub fn execute_condition(
    conn: &Connection,
    table: &HistoryTable,
    condition: &Condition,
) -> Result<Vec<HistoryRecord>> {
    let sql = format!(
        "{} WHERE {} ORDER BY created_at, id",
        select_clause(table),
        condition.sql()
    );
    let params = condition.params().iter().map(to_sqlite);

    let mut stmt = conn
        .prepare(&sql)
        .map_err(|e| persistence("execute_condition", &table.name, e))?;
    let records = stmt
        .query_map(params_from_iter(params), row_to_record)
        .map_err(|e| persistence("execute_condition", &table.name, e))?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| persistence("execute_condition", &table.name, e))?;

    tracing::debug!(
        table = %table.name,
        rows = records.len(),
        "executed history condition"
    );
    Ok(records)
}

/// Full history of one subject.
pub fn list_for_subject(
    conn: &Connection,
    table: &HistoryTable,
    subject: &Subject,
) -> Result<Vec<HistoryRecord>> {
    execute_condition(conn, table, &Condition::subject(subject))
}

/// Fetch one record by id.
///
/// # Errors
///
/// - `NotFound` — no record with this id
pub fn fetch_record(conn: &Connection, table: &HistoryTable, id: i64) -> Result<HistoryRecord> {
    conn.query_row(
        &format!("{} WHERE id = ?1", select_clause(table)),
        [id],
        row_to_record,
    )
    .optional()
    .map_err(|e| persistence("fetch_record", &table.name, e))?
    .ok_or_else(|| record_not_found("fetch_record", &table.name, id))
}

/// The record of the same subject created right after `record`.
pub fn next_record(
    conn: &Connection,
    table: &HistoryTable,
    record: &HistoryRecord,
) -> Result<Option<HistoryRecord>> {
    neighbour(conn, table, record, Direction::Next)
}

/// The record of the same subject created right before `record`.
pub fn previous_record(
    conn: &Connection,
    table: &HistoryTable,
    record: &HistoryRecord,
) -> Result<Option<HistoryRecord>> {
    neighbour(conn, table, record, Direction::Previous)
}

enum Direction {
    Next,
    Previous,
}

fn neighbour(
    conn: &Connection,
    table: &HistoryTable,
    record: &HistoryRecord,
    direction: Direction,
) -> Result<Option<HistoryRecord>> {
    let (filter, order) = match direction {
        Direction::Next => (
            "(created_at > ?3 OR (created_at = ?3 AND id > ?4))",
            "created_at, id",
        ),
        Direction::Previous => (
            "(created_at < ?3 OR (created_at = ?3 AND id < ?4))",
            "created_at DESC, id DESC",
        ),
    };
    let sql = format!(
        "{} WHERE subject_type = ?1 AND subject_id = ?2 AND {} ORDER BY {} LIMIT 1",
        select_clause(table),
        filter,
        order
    );

    conn.query_row(
        &sql,
        rusqlite::params![
            record.subject_type,
            record.subject_id,
            record.created_at.timestamp_millis(),
            record.id
        ],
        row_to_record,
    )
    .optional()
    .map_err(|e| persistence("neighbour_record", &table.name, e))
}

fn select_clause(table: &HistoryTable) -> String {
    format!(
        "SELECT id, subject_type, subject_id, event, {}, {}, actor, created_at FROM {}",
        quote_ident(&table.snapshot_column),
        quote_ident(&table.changes_column),
        quote_ident(&table.name)
    )
}

fn to_sqlite(value: &SqlValue) -> SqliteValue {
    match value {
        SqlValue::Null => SqliteValue::Null,
        SqlValue::Integer(i) => SqliteValue::Integer(*i),
        SqlValue::Real(f) => SqliteValue::Real(*f),
        SqlValue::Text(s) => SqliteValue::Text(s.clone()),
    }
}

fn row_to_record(row: &rusqlite::Row<'_>) -> rusqlite::Result<HistoryRecord> {
    let event: String = row.get(3)?;
    let event = event
        .parse::<Event>()
        .map_err(|reason| rusqlite::Error::FromSqlConversionFailure(3, Type::Text, reason.into()))?;

    let millis: i64 = row.get(7)?;
    let created_at: DateTime<Utc> = Utc.timestamp_millis_opt(millis).single().ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            7,
            Type::Integer,
            format!("timestamp out of range: {}", millis).into(),
        )
    })?;

    Ok(HistoryRecord {
        id: row.get(0)?,
        subject_type: row.get(1)?,
        subject_id: row.get(2)?,
        event,
        snapshot: row.get(4)?,
        changes: row.get(5)?,
        actor: row.get(6)?,
        created_at,
    })
}
