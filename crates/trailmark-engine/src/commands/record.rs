//! Writing history rows.
//!
//! Each event derives its payloads from the subject's attributes, encodes them
//! for the live encoding of the target column and appends one row. Snapshot
//! payloads hold the state *before* the event, so a create has none.

use chrono::Utc;
use rusqlite::Connection;
use serde_json::Value;
use trailmark_core::diff::{compute_changeset, prior_state, snapshot_attributes};
use trailmark_core::model::NewRecord;
use trailmark_core::{
    AttributeMap, ChangePair, Changeset, Event, HistoryTable, Subject, TmError, TrailError,
};
use trailmark_store::errors::Result;
use trailmark_store::history::insert_record;

use crate::commands::logged;
use crate::payload;
use crate::trail::HistoryTrail;

pub mod ops {
    pub const RECORD_CREATE: &str = "record_create";
    pub const RECORD_UPDATE: &str = "record_update";
    pub const RECORD_DESTROY: &str = "record_destroy";
    pub const BACKFILL_ACTOR: &str = "backfill_actor";
}

impl HistoryTrail {
    /// Record the creation of `subject` with its initial `attributes`.
    ///
    /// Every attribute becomes a `[null, value]` pair before the table's
    /// tracking options (or the adapter's `diff`) are applied.
    ///
    /// # Errors
    ///
    /// - `Adapter` if the override adapter's `diff` fails
    /// - `UnsupportedColumnType` / `UnknownColumn` if the changes column cannot hold a payload
    /// - `Persistence` if the insert fails
    pub fn record_create(
        &self,
        conn: &Connection,
        table: &HistoryTable,
        subject: &Subject,
        attributes: &AttributeMap,
        actor: Option<&str>,
    ) -> Result<i64> {
        logged(ops::RECORD_CREATE, table, || {
            let raw: Changeset = attributes
                .iter()
                .map(|(key, value)| (key.clone(), ChangePair(Value::Null, value.clone())))
                .collect();
            let changes = compute_changeset(table, &raw, self.config().adapter.as_deref())?;
            let changes = self.encode_changes(conn, table, &changes)?;

            insert_record(
                conn,
                table,
                &NewRecord {
                    subject: subject.clone(),
                    event: Event::Create,
                    snapshot: None,
                    changes: Some(changes),
                    actor: actor.map(str::to_string),
                    created_at: Utc::now(),
                },
            )
        })
    }

    /// Record an update of `subject`, whose attributes are now `current`.
    ///
    /// Returns `None` without writing when nothing tracked changed.
    pub fn record_update(
        &self,
        conn: &Connection,
        table: &HistoryTable,
        subject: &Subject,
        current: &AttributeMap,
        raw_changes: &Changeset,
        actor: Option<&str>,
    ) -> Result<Option<i64>> {
        logged(ops::RECORD_UPDATE, table, || {
            let changes = compute_changeset(table, raw_changes, self.config().adapter.as_deref())?;
            if changes.is_empty() {
                tracing::debug!(
                    subject_type = %subject.subject_type,
                    subject_id = %subject.subject_id,
                    "no tracked changes, skipping history row"
                );
                return Ok(None);
            }

            let snapshot = snapshot_attributes(table, &prior_state(current, raw_changes));
            let snapshot = self.encode_snapshot(conn, table, &snapshot)?;
            let changes = self.encode_changes(conn, table, &changes)?;

            let id = insert_record(
                conn,
                table,
                &NewRecord {
                    subject: subject.clone(),
                    event: Event::Update,
                    snapshot: Some(snapshot),
                    changes: Some(changes),
                    actor: actor.map(str::to_string),
                    created_at: Utc::now(),
                },
            )?;
            Ok(Some(id))
        })
    }

    /// Record the destruction of `subject`, whose last state was `current`.
    pub fn record_destroy(
        &self,
        conn: &Connection,
        table: &HistoryTable,
        subject: &Subject,
        current: &AttributeMap,
        actor: Option<&str>,
    ) -> Result<i64> {
        logged(ops::RECORD_DESTROY, table, || {
            let snapshot = snapshot_attributes(table, current);
            let snapshot = self.encode_snapshot(conn, table, &snapshot)?;

            insert_record(
                conn,
                table,
                &NewRecord {
                    subject: subject.clone(),
                    event: Event::Destroy,
                    snapshot: Some(snapshot),
                    changes: None,
                    actor: actor.map(str::to_string),
                    created_at: Utc::now(),
                },
            )
        })
    }

    /// Dispatch on `event`.
    ///
    /// `attributes` is the initial state for a create and the current state
    /// otherwise. `changes` is required for an update and refused for the
    /// other events.
    ///
    /// # Errors
    ///
    /// - `InvalidEvent` if `changes` does not fit `event`
    #[allow(clippy::too_many_arguments)]
    pub fn record(
        &self,
        conn: &Connection,
        table: &HistoryTable,
        event: Event,
        subject: &Subject,
        attributes: &AttributeMap,
        changes: Option<&Changeset>,
        actor: Option<&str>,
    ) -> Result<Option<i64>> {
        match (event, changes) {
            (Event::Create, None) => self
                .record_create(conn, table, subject, attributes, actor)
                .map(Some),
            (Event::Update, Some(changes)) => {
                self.record_update(conn, table, subject, attributes, changes, actor)
            }
            (Event::Destroy, None) => self
                .record_destroy(conn, table, subject, attributes, actor)
                .map(Some),
            (Event::Update, None) => Err(invalid_event(event, "an update needs its changes")),
            (_, Some(_)) => Err(invalid_event(event, "changes are only recorded for updates")),
        }
    }

    /// Fill in the actor of a row written without one.
    ///
    /// Returns `false` if the row already had an actor.
    pub fn backfill_actor(
        &self,
        conn: &Connection,
        table: &HistoryTable,
        id: i64,
        actor: &str,
    ) -> Result<bool> {
        logged(ops::BACKFILL_ACTOR, table, || {
            trailmark_store::history::backfill_actor(conn, table, id, actor)
        })
    }

    fn encode_snapshot(
        &self,
        conn: &Connection,
        table: &HistoryTable,
        snapshot: &AttributeMap,
    ) -> Result<String> {
        let encoding = self.encoding_of(conn, table, &table.snapshot_column)?;
        Ok(payload::encode_attributes(
            encoding,
            self.config().strategy.as_ref(),
            snapshot,
        )?)
    }

    fn encode_changes(
        &self,
        conn: &Connection,
        table: &HistoryTable,
        changes: &Changeset,
    ) -> Result<String> {
        let encoding = self.encoding_of(conn, table, &table.changes_column)?;
        Ok(payload::encode_changeset(
            encoding,
            self.config().strategy.as_ref(),
            changes,
        )?)
    }
}

fn invalid_event(event: Event, reason: &str) -> TmError {
    TmError::from(TrailError::InvalidEvent {
        event: event.to_string(),
        reason: reason.to_string(),
    })
    .with_op("record")
}
