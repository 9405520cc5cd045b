//! Storage-level predicates produced by the query builders.
//!
//! A `Condition` is an SQL boolean expression with positional `?`
//! placeholders and the values bound to them, in order. Conditions compose
//! with `and`/`any`, and parameters follow the same order as the text.

use crate::model::Subject;
use serde_json::Value;

/// A value bound to a `?` placeholder.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
}

impl SqlValue {
    /// Bind a JSON scalar the way SQLite's `json_extract` returns it.
    ///
    /// Booleans become 0/1, containers are bound as their JSON text.
    pub fn from_json_scalar(value: &Value) -> Self {
        match value {
            Value::Null => SqlValue::Null,
            Value::Bool(b) => SqlValue::Integer(i64::from(*b)),
            Value::Number(n) => match n.as_i64() {
                Some(i) => SqlValue::Integer(i),
                None => SqlValue::Real(n.as_f64().unwrap_or(f64::NAN)),
            },
            Value::String(s) => SqlValue::Text(s.clone()),
            Value::Array(_) | Value::Object(_) => SqlValue::Text(value.to_string()),
        }
    }
}

impl From<&str> for SqlValue {
    fn from(value: &str) -> Self {
        SqlValue::Text(value.to_string())
    }
}

impl From<String> for SqlValue {
    fn from(value: String) -> Self {
        SqlValue::Text(value)
    }
}

impl From<i64> for SqlValue {
    fn from(value: i64) -> Self {
        SqlValue::Integer(value)
    }
}

/// An SQL predicate plus its bound parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    sql: String,
    params: Vec<SqlValue>,
}

impl Condition {
    pub fn new(sql: impl Into<String>, params: Vec<SqlValue>) -> Self {
        Self {
            sql: sql.into(),
            params,
        }
    }

    /// A condition every row satisfies.
    pub fn always() -> Self {
        Self::new("1 = 1", Vec::new())
    }

    /// Restrict to the history of one subject.
    pub fn subject(subject: &Subject) -> Self {
        Self::new(
            "subject_type = ? AND subject_id = ?",
            vec![
                SqlValue::from(subject.subject_type.as_str()),
                SqlValue::from(subject.subject_id.as_str()),
            ],
        )
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn params(&self) -> &[SqlValue] {
        &self.params
    }

    pub fn into_parts(self) -> (String, Vec<SqlValue>) {
        (self.sql, self.params)
    }

    /// Both conditions must hold.
    pub fn and(self, other: Condition) -> Self {
        Self::all(vec![self, other])
    }

    /// Every condition must hold. An empty list is vacuously true.
    pub fn all(conditions: Vec<Condition>) -> Self {
        Self::join(conditions, " AND ").unwrap_or_else(Self::always)
    }

    /// At least one condition must hold. An empty list matches nothing.
    pub fn any(conditions: Vec<Condition>) -> Self {
        Self::join(conditions, " OR ").unwrap_or_else(|| Self::new("1 = 0", Vec::new()))
    }

    fn join(conditions: Vec<Condition>, separator: &str) -> Option<Self> {
        if conditions.is_empty() {
            return None;
        }
        if conditions.len() == 1 {
            return conditions.into_iter().next();
        }
        let mut parts = Vec::with_capacity(conditions.len());
        let mut params = Vec::new();
        for condition in conditions {
            parts.push(format!("({})", condition.sql));
            params.extend(condition.params);
        }
        Some(Self::new(parts.join(separator), params))
    }
}
