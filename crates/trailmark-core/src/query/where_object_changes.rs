//! Diff predicates over `[old, new]` pairs.
//!
//! Text columns are rejected unless the active strategy provides the
//! predicate itself.

use crate::adapter::{settle, AdapterResult, DiffAdapter};
use crate::errors::Result;
use crate::model::{AttributeMap, HistoryTable};
use crate::query::condition::Condition;
use crate::query::structured::{equals, json_path, PairSide};
use crate::query::{expect_mapping, ops, QueryContext};
use crate::serializer::SerializationStrategy;
use serde_json::Value;
use trailmark_core_types::ColumnEncoding;

/// Which side of each pair has to match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Match {
    Either,
    Old,
    New,
}

impl Match {
    fn op(self) -> &'static str {
        match self {
            Match::Either => ops::WHERE_OBJECT_CHANGES,
            Match::Old => ops::WHERE_OBJECT_CHANGES_FROM,
            Match::New => ops::WHERE_OBJECT_CHANGES_TO,
        }
    }

    fn ask_adapter(
        self,
        adapter: &dyn DiffAdapter,
        table: &HistoryTable,
        attributes: &AttributeMap,
    ) -> Option<AdapterResult<Condition>> {
        match self {
            Match::Either => adapter.where_object_changes(table, attributes),
            Match::Old => adapter.where_object_changes_from(table, attributes),
            Match::New => adapter.where_object_changes_to(table, attributes),
        }
    }

    fn ask_strategy(
        self,
        strategy: &dyn SerializationStrategy,
        column: &str,
        attributes: &AttributeMap,
    ) -> Result<Condition> {
        match self {
            Match::Either => strategy.where_object_changes_condition(column, attributes),
            Match::Old => strategy.where_object_changes_from_condition(column, attributes),
            Match::New => strategy.where_object_changes_to_condition(column, attributes),
        }
    }

    fn pair_condition(
        self,
        encoding: ColumnEncoding,
        column: &str,
        key: &str,
        value: &Value,
    ) -> Condition {
        let at = |side: PairSide| equals(encoding, column, json_path(key, Some(side)), value);
        match self {
            Match::Either => Condition::any(vec![at(PairSide::Old), at(PairSide::New)]),
            Match::Old => at(PairSide::Old),
            Match::New => at(PairSide::New),
        }
    }
}

#[derive(Debug)]
struct ChangesQuery<'a> {
    ctx: QueryContext<'a>,
    attributes: AttributeMap,
    matching: Match,
}

impl<'a> ChangesQuery<'a> {
    fn new(ctx: QueryContext<'a>, argument: &Value, matching: Match) -> Result<Self> {
        let attributes = expect_mapping(matching.op(), argument)?;
        Ok(Self {
            ctx,
            attributes,
            matching,
        })
    }

    fn build(&self) -> Result<Condition> {
        let op = self.matching.op();
        if let Some(answer) = self.ctx.adapter().and_then(|adapter| {
            settle(
                op,
                self.matching
                    .ask_adapter(adapter, self.ctx.table, &self.attributes),
            )
        }) {
            return answer;
        }

        let column = self.ctx.table.changes_column.as_str();
        match self.ctx.encoding_of(column)? {
            ColumnEncoding::Text => {
                self.matching
                    .ask_strategy(self.ctx.strategy(), column, &self.attributes)
            }
            structured => Ok(Condition::all(
                self.attributes
                    .iter()
                    .map(|(key, value)| {
                        self.matching.pair_condition(structured, column, key, value)
                    })
                    .collect(),
            )),
        }
    }
}

/// Every given key changed, with the value on either side of its pair.
#[derive(Debug)]
pub struct WhereObjectChanges<'a>(ChangesQuery<'a>);

impl<'a> WhereObjectChanges<'a> {
    pub fn new(ctx: QueryContext<'a>, argument: &Value) -> Result<Self> {
        ChangesQuery::new(ctx, argument, Match::Either).map(Self)
    }

    pub fn build(&self) -> Result<Condition> {
        self.0.build()
    }
}

/// Every given key changed away from the given value.
#[derive(Debug)]
pub struct WhereObjectChangesFrom<'a>(ChangesQuery<'a>);

impl<'a> WhereObjectChangesFrom<'a> {
    pub fn new(ctx: QueryContext<'a>, argument: &Value) -> Result<Self> {
        ChangesQuery::new(ctx, argument, Match::Old).map(Self)
    }

    pub fn build(&self) -> Result<Condition> {
        self.0.build()
    }
}

/// Every given key changed to the given value.
#[derive(Debug)]
pub struct WhereObjectChangesTo<'a>(ChangesQuery<'a>);

impl<'a> WhereObjectChangesTo<'a> {
    pub fn new(ctx: QueryContext<'a>, argument: &Value) -> Result<Self> {
        ChangesQuery::new(ctx, argument, Match::New).map(Self)
    }

    pub fn build(&self) -> Result<Condition> {
        self.0.build()
    }
}
