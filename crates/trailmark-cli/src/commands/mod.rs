//! Subcommands and the state they share.

pub mod backfill;
pub mod history;
pub mod init;
pub mod query;
pub mod record;

use rusqlite::Connection;
use serde_json::{json, Value};
use std::path::Path;
use trailmark_core::{HistoryRecord, HistoryTable, StrategyKind, TrailSettings};
use trailmark_engine::HistoryTrail;

pub type CliResult<T = ()> = Result<T, Box<dyn std::error::Error>>;

/// Settings resolved from `--config` and `--serializer`.
pub struct Context {
    pub trail: HistoryTrail,
    pub table: HistoryTable,
}

impl Context {
    pub fn load(config: Option<&Path>, serializer: Option<StrategyKind>) -> CliResult<Self> {
        let mut settings = match config {
            Some(path) => TrailSettings::load(path)?,
            None => TrailSettings::default(),
        };
        if let Some(kind) = serializer {
            settings.serializer = kind;
        }
        let (config, table) = settings.into_parts();
        Ok(Self {
            trail: HistoryTrail::new(config),
            table,
        })
    }

    /// Open `db`, creating it and the default schema if needed.
    pub fn open(&self, db: &Path) -> CliResult<Connection> {
        let mut conn = trailmark_store::db::open(db)?;
        trailmark_store::migrations::apply_migrations(&mut conn)?;
        Ok(conn)
    }

    /// A record with its payloads decoded.
    pub fn render(&self, conn: &Connection, record: &HistoryRecord) -> CliResult<Value> {
        let object = self.trail.reify(conn, &self.table, record)?;
        let changes = self.trail.changeset(conn, &self.table, record)?;
        Ok(json!({
            "id": record.id,
            "subject_type": record.subject_type,
            "subject_id": record.subject_id,
            "event": record.event,
            "actor": record.actor,
            "created_at": record.created_at.to_rfc3339(),
            "object": object,
            "changes": changes,
        }))
    }

    pub fn render_all(&self, conn: &Connection, records: &[HistoryRecord]) -> CliResult<Value> {
        records
            .iter()
            .map(|record| self.render(conn, record))
            .collect::<CliResult<Vec<_>>>()
            .map(Value::Array)
    }
}

pub fn print_json(value: &Value) -> CliResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
