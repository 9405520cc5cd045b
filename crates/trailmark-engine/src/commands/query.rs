//! Reading history back: the five query shapes, ordered reads and payload
//! decoding.

use std::fmt;
use std::str::FromStr;

use rusqlite::Connection;
use serde_json::Value;
use trailmark_core::query::{
    ops, WhereAttributeChanges, WhereObject, WhereObjectChanges, WhereObjectChangesFrom,
    WhereObjectChangesTo,
};
use trailmark_core::{
    AttributeMap, Changeset, Condition, HistoryRecord, HistoryTable, Subject, TrailError,
};
use trailmark_store::errors::Result;
use trailmark_store::history::{
    execute_condition, list_for_subject, next_record, previous_record,
};

use crate::commands::logged;
use crate::payload;
use crate::trail::HistoryTrail;

/// One of the five logical predicates over history rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryShape {
    /// Snapshot contains every given attribute value
    WhereObject,
    /// Changes moved every given attribute from or to the value
    WhereObjectChanges,
    /// Changes moved every given attribute away from the value
    WhereObjectChangesFrom,
    /// Changes moved every given attribute to the value
    WhereObjectChangesTo,
    /// Changes touched the named attribute
    WhereAttributeChanges,
}

impl QueryShape {
    pub const ALL: [QueryShape; 5] = [
        QueryShape::WhereObject,
        QueryShape::WhereObjectChanges,
        QueryShape::WhereObjectChangesFrom,
        QueryShape::WhereObjectChangesTo,
        QueryShape::WhereAttributeChanges,
    ];

    /// Operation name used in logs, errors and adapter dispatch.
    pub fn op(&self) -> &'static str {
        match self {
            QueryShape::WhereObject => ops::WHERE_OBJECT,
            QueryShape::WhereObjectChanges => ops::WHERE_OBJECT_CHANGES,
            QueryShape::WhereObjectChangesFrom => ops::WHERE_OBJECT_CHANGES_FROM,
            QueryShape::WhereObjectChangesTo => ops::WHERE_OBJECT_CHANGES_TO,
            QueryShape::WhereAttributeChanges => ops::WHERE_ATTRIBUTE_CHANGES,
        }
    }
}

impl fmt::Display for QueryShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.op().replace('_', "-"))
    }
}

impl FromStr for QueryShape {
    type Err = String;

    /// Accepts `where-object` as well as `where_object`.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let normalized = s.trim().replace('-', "_");
        QueryShape::ALL
            .into_iter()
            .find(|shape| shape.op() == normalized)
            .ok_or_else(|| format!("unknown query shape '{}'", s))
    }
}

impl HistoryTrail {
    /// Build the condition for `shape` without running it.
    ///
    /// The argument is validated before the adapter or the schema is
    /// consulted.
    ///
    /// # Errors
    ///
    /// - `InvalidArgument` if `argument` has the wrong shape
    /// - `UnsupportedColumnType` for change queries on a text column
    /// - `Adapter` if the override adapter fails
    pub fn condition_for(
        &self,
        conn: &Connection,
        table: &HistoryTable,
        shape: QueryShape,
        argument: &Value,
    ) -> Result<Condition> {
        self.with_context(conn, table, |ctx| match shape {
            QueryShape::WhereObject => WhereObject::new(ctx, argument)?.build(),
            QueryShape::WhereObjectChanges => WhereObjectChanges::new(ctx, argument)?.build(),
            QueryShape::WhereObjectChangesFrom => {
                WhereObjectChangesFrom::new(ctx, argument)?.build()
            }
            QueryShape::WhereObjectChangesTo => WhereObjectChangesTo::new(ctx, argument)?.build(),
            QueryShape::WhereAttributeChanges => {
                WhereAttributeChanges::new(ctx, argument)?.build()
            }
        })
    }

    /// Rows matching `shape`, in creation order.
    pub fn find(
        &self,
        conn: &Connection,
        table: &HistoryTable,
        shape: QueryShape,
        argument: &Value,
    ) -> Result<Vec<HistoryRecord>> {
        logged(shape.op(), table, || {
            let condition = self.condition_for(conn, table, shape, argument)?;
            execute_condition(conn, table, &condition)
        })
    }

    pub fn where_object(
        &self,
        conn: &Connection,
        table: &HistoryTable,
        attributes: &Value,
    ) -> Result<Vec<HistoryRecord>> {
        self.find(conn, table, QueryShape::WhereObject, attributes)
    }

    pub fn where_object_changes(
        &self,
        conn: &Connection,
        table: &HistoryTable,
        attributes: &Value,
    ) -> Result<Vec<HistoryRecord>> {
        self.find(conn, table, QueryShape::WhereObjectChanges, attributes)
    }

    pub fn where_object_changes_from(
        &self,
        conn: &Connection,
        table: &HistoryTable,
        attributes: &Value,
    ) -> Result<Vec<HistoryRecord>> {
        self.find(conn, table, QueryShape::WhereObjectChangesFrom, attributes)
    }

    pub fn where_object_changes_to(
        &self,
        conn: &Connection,
        table: &HistoryTable,
        attributes: &Value,
    ) -> Result<Vec<HistoryRecord>> {
        self.find(conn, table, QueryShape::WhereObjectChangesTo, attributes)
    }

    pub fn where_attribute_changes(
        &self,
        conn: &Connection,
        table: &HistoryTable,
        attribute: &Value,
    ) -> Result<Vec<HistoryRecord>> {
        self.find(conn, table, QueryShape::WhereAttributeChanges, attribute)
    }

    /// Every row of `subject`, oldest first.
    pub fn versions_for(
        &self,
        conn: &Connection,
        table: &HistoryTable,
        subject: &Subject,
    ) -> Result<Vec<HistoryRecord>> {
        list_for_subject(conn, table, subject)
    }

    pub fn next_version(
        &self,
        conn: &Connection,
        table: &HistoryTable,
        record: &HistoryRecord,
    ) -> Result<Option<HistoryRecord>> {
        next_record(conn, table, record)
    }

    pub fn previous_version(
        &self,
        conn: &Connection,
        table: &HistoryTable,
        record: &HistoryRecord,
    ) -> Result<Option<HistoryRecord>> {
        previous_record(conn, table, record)
    }

    /// Decode the changes of `record`; `None` for a destroy.
    ///
    /// # Errors
    ///
    /// `DecodeFailure` if the payload does not decode under the live column
    /// encoding and the active strategy.
    pub fn changeset(
        &self,
        conn: &Connection,
        table: &HistoryTable,
        record: &HistoryRecord,
    ) -> Result<Option<Changeset>> {
        let Some(raw) = record.changes.as_deref() else {
            return Ok(None);
        };
        let encoding = self.encoding_of(conn, table, &table.changes_column)?;
        payload::decode_changeset(encoding, self.config().strategy.as_ref(), raw)
            .map(Some)
            .map_err(|e| decode_error(e, table, record))
    }

    /// The attributes of the subject before `record`'s event; `None` for a
    /// create.
    pub fn reify(
        &self,
        conn: &Connection,
        table: &HistoryTable,
        record: &HistoryRecord,
    ) -> Result<Option<AttributeMap>> {
        let Some(raw) = record.snapshot.as_deref() else {
            return Ok(None);
        };
        let encoding = self.encoding_of(conn, table, &table.snapshot_column)?;
        payload::decode_attributes(encoding, self.config().strategy.as_ref(), raw)
            .map(Some)
            .map_err(|e| decode_error(e, table, record))
    }
}

fn decode_error(
    err: TrailError,
    table: &HistoryTable,
    record: &HistoryRecord,
) -> trailmark_core::TmError {
    trailmark_core::TmError::from(err)
        .with_table(table.name.clone())
        .with_record_id(record.id)
}
