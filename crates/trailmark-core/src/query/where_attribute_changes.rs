//! The diff mentions an attribute at all.

use crate::adapter::settle;
use crate::errors::Result;
use crate::query::condition::Condition;
use crate::query::structured::{json_path, present};
use crate::query::{expect_attribute, ops, QueryContext};
use serde_json::Value;
use trailmark_core_types::ColumnEncoding;

#[derive(Debug)]
pub struct WhereAttributeChanges<'a> {
    ctx: QueryContext<'a>,
    attribute: String,
}

impl<'a> WhereAttributeChanges<'a> {
    /// # Errors
    ///
    /// `InvalidArgument` unless `argument` is a non-empty string.
    pub fn new(ctx: QueryContext<'a>, argument: &Value) -> Result<Self> {
        let attribute = expect_attribute(ops::WHERE_ATTRIBUTE_CHANGES, argument)?;
        Ok(Self { ctx, attribute })
    }

    pub fn build(&self) -> Result<Condition> {
        if let Some(answer) = self.ctx.adapter().and_then(|adapter| {
            settle(
                ops::WHERE_ATTRIBUTE_CHANGES,
                adapter.where_attribute_changes(self.ctx.table, &self.attribute),
            )
        }) {
            return answer;
        }

        let column = self.ctx.table.changes_column.as_str();
        match self.ctx.encoding_of(column)? {
            ColumnEncoding::Text => self
                .ctx
                .strategy()
                .where_attribute_changes_condition(column, &self.attribute),
            structured => Ok(present(
                structured,
                column,
                json_path(&self.attribute, None),
            )),
        }
    }
}
