//! Snapshot contains every given key/value pair.

use crate::adapter::settle;
use crate::errors::Result;
use crate::model::AttributeMap;
use crate::query::condition::Condition;
use crate::query::structured::{equals, json_path};
use crate::query::{expect_mapping, ops, QueryContext};
use serde_json::Value;
use trailmark_core_types::ColumnEncoding;

#[derive(Debug)]
pub struct WhereObject<'a> {
    ctx: QueryContext<'a>,
    attributes: AttributeMap,
}

impl<'a> WhereObject<'a> {
    /// # Errors
    ///
    /// `InvalidArgument` unless `argument` is a mapping.
    pub fn new(ctx: QueryContext<'a>, argument: &Value) -> Result<Self> {
        let attributes = expect_mapping(ops::WHERE_OBJECT, argument)?;
        Ok(Self { ctx, attributes })
    }

    /// The only shape with a text-column fallback: the strategy matches each
    /// pair against the encoded snapshot.
    pub fn build(&self) -> Result<Condition> {
        if let Some(answer) = self.ctx.adapter().and_then(|adapter| {
            settle(
                ops::WHERE_OBJECT,
                adapter.where_object(self.ctx.table, &self.attributes),
            )
        }) {
            return answer;
        }

        let column = self.ctx.table.snapshot_column.as_str();
        let encoding = self.ctx.encoding_of(column)?;

        let conditions = match encoding {
            ColumnEncoding::Text => {
                let strategy = self.ctx.strategy();
                self.attributes
                    .iter()
                    .map(|(key, value)| strategy.where_object_condition(column, key, value))
                    .collect::<Result<Vec<_>>>()?
            }
            structured => self
                .attributes
                .iter()
                .map(|(key, value)| equals(structured, column, json_path(key, None), value))
                .collect(),
        };

        Ok(Condition::all(conditions))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::TrailError;
    use crate::query::test_support::{FailingAdapter, Fixture, RecordingAdapter};
    use crate::query::SqlValue;
    use serde_json::json;

    #[test]
    fn test_text_column_uses_strategy() {
        let fixture = Fixture::new("TEXT", "TEXT");
        let condition = WhereObject::new(fixture.ctx(), &json!({"name": "foobar"}))
            .unwrap()
            .build()
            .unwrap();
        assert!(condition.sql().starts_with("instr(\"snapshot\", ?) > 0 AND "));
        assert_eq!(
            condition.params()[0],
            SqlValue::Text("\nname: foobar\n".into())
        );
        assert_eq!(fixture.strategy_calls(), 1);
    }

    #[test]
    fn test_json_column_extracts() {
        let fixture = Fixture::new("JSON", "JSON");
        let condition = WhereObject::new(fixture.ctx(), &json!({"count": 100, "name": "foobar"}))
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(
            condition.sql(),
            "((json_type(\"snapshot\", ?) = ?) AND (json_extract(\"snapshot\", ?) = ?)) AND \
             ((json_type(\"snapshot\", ?) = ?) AND (json_extract(\"snapshot\", ?) = ?))"
        );
        assert_eq!(
            condition.params(),
            &[
                SqlValue::Text("$.\"count\"".into()),
                SqlValue::Text("integer".into()),
                SqlValue::Text("$.\"count\"".into()),
                SqlValue::Integer(100),
                SqlValue::Text("$.\"name\"".into()),
                SqlValue::Text("text".into()),
                SqlValue::Text("$.\"name\"".into()),
                SqlValue::Text("foobar".into()),
            ]
        );
        assert_eq!(fixture.strategy_calls(), 0);
    }

    #[test]
    fn test_empty_mapping_is_vacuous() {
        let fixture = Fixture::new("JSONB", "JSONB");
        let condition = WhereObject::new(fixture.ctx(), &json!({}))
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(condition, Condition::always());
    }

    #[test]
    fn test_invalid_argument_touches_nothing() {
        let fixture = Fixture::new("TEXT", "TEXT");
        let err = WhereObject::new(fixture.ctx(), &json!("name")).unwrap_err();
        assert!(matches!(err, TrailError::InvalidArgument { .. }));
        assert_eq!(fixture.schema_lookups(), 0);
    }

    #[test]
    fn test_adapter_override_skips_builtin() {
        let adapter = RecordingAdapter::default();
        let fixture = Fixture::new("TEXT", "TEXT").with_adapter(adapter.clone());
        let condition = WhereObject::new(fixture.ctx(), &json!({"name": "x"}))
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(condition.sql(), "adapter_where_object");
        assert_eq!(adapter.calls(ops::WHERE_OBJECT), 1);
        assert_eq!(fixture.schema_lookups(), 0);
        assert_eq!(fixture.strategy_calls(), 0);
    }

    #[test]
    fn test_adapter_failure_is_not_followed_by_fallback() {
        let fixture = Fixture::new("TEXT", "TEXT").with_adapter(FailingAdapter);
        let err = WhereObject::new(fixture.ctx(), &json!({"name": "x"}))
            .unwrap()
            .build()
            .unwrap_err();
        assert!(matches!(err, TrailError::Adapter { op: "where_object", .. }));
        assert_eq!(fixture.schema_lookups(), 0);
    }
}
