//! Live schema introspection and history table installation.

use crate::errors::{persistence, Result};
use rusqlite::{Connection, OptionalExtension};
use trailmark_core::errors::TrailError;
use trailmark_core::model::table::quote_ident;
use trailmark_core::{ColumnEncoding, HistoryTable, SchemaSource};

/// `SchemaSource` backed by `pragma_table_info`.
pub struct SqliteSchema<'a> {
    conn: &'a Connection,
}

impl<'a> SqliteSchema<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }
}

impl SchemaSource for SqliteSchema<'_> {
    fn column_type(&self, table: &str, column: &str) -> trailmark_core::Result<Option<String>> {
        let declared = self
            .conn
            .query_row(
                "SELECT type FROM pragma_table_info(?1) WHERE name = ?2",
                [table, column],
                |row| row.get::<_, String>(0),
            )
            .optional()
            .map_err(|e| TrailError::Schema {
                reason: format!("cannot inspect {}.{}: {}", table, column, e),
            })?;

        tracing::debug!(
            table = table,
            column = column,
            declared = declared.as_deref().unwrap_or("<missing>"),
            "inspected column"
        );
        Ok(declared)
    }
}

/// SQL type a payload column is declared with for `encoding`.
pub fn declared_type(encoding: ColumnEncoding) -> &'static str {
    match encoding {
        ColumnEncoding::Text => "TEXT",
        ColumnEncoding::StructuredJson => "JSON",
        ColumnEncoding::StructuredBinaryJson => "JSONB",
    }
}

/// Create a history table whose payload columns use `encoding`.
///
/// The default `versions` table comes from the migrations; this is for
/// additional tables or structured payload columns.
pub fn create_history_table(
    conn: &Connection,
    table: &HistoryTable,
    encoding: ColumnEncoding,
) -> Result<()> {
    let name = quote_ident(&table.name);
    let payload = declared_type(encoding);
    let sql = format!(
        "CREATE TABLE IF NOT EXISTS {name} (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            subject_type TEXT NOT NULL,
            subject_id TEXT NOT NULL,
            event TEXT NOT NULL CHECK (event IN ('create', 'update', 'destroy')),
            {snapshot} {payload},
            {changes} {payload},
            actor TEXT,
            created_at INTEGER NOT NULL
        );
        CREATE INDEX IF NOT EXISTS {index} ON {name} (subject_type, subject_id, created_at, id);",
        name = name,
        snapshot = quote_ident(&table.snapshot_column),
        changes = quote_ident(&table.changes_column),
        payload = payload,
        index = quote_ident(&format!("idx_{}_subject", table.name)),
    );

    conn.execute_batch(&sql)
        .map_err(|e| persistence("create_history_table", &table.name, e))?;

    tracing::debug!(table = %table.name, payload = payload, "created history table");
    Ok(())
}
