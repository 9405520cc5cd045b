//! Shared fixtures for builder tests.

use crate::adapter::{AdapterResult, DiffAdapter};
use crate::config::TrailConfig;
use crate::errors::Result;
use crate::model::{AttributeMap, HistoryTable};
use crate::query::condition::Condition;
use crate::query::{ops, QueryContext};
use crate::resolver::{ColumnEncodingResolver, SchemaSource};
use crate::serializer::{SerializationStrategy, YamlStrategy};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

pub struct FakeSchema {
    snapshot: String,
    changes: String,
    lookups: AtomicUsize,
}

impl SchemaSource for FakeSchema {
    fn column_type(&self, _table: &str, column: &str) -> Result<Option<String>> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        Ok(match column {
            "snapshot" => Some(self.snapshot.clone()),
            "changes" => Some(self.changes.clone()),
            _ => None,
        })
    }
}

/// YAML strategy that counts how often a predicate was requested.
pub struct CountingStrategy {
    calls: Arc<AtomicUsize>,
}

impl SerializationStrategy for CountingStrategy {
    fn name(&self) -> &'static str {
        "counting"
    }

    fn encode(&self, attributes: &AttributeMap) -> Result<String> {
        YamlStrategy.encode(attributes)
    }

    fn decode(&self, payload: &str) -> Result<AttributeMap> {
        YamlStrategy.decode(payload)
    }

    fn where_object_condition(&self, column: &str, key: &str, value: &Value) -> Result<Condition> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        YamlStrategy.where_object_condition(column, key, value)
    }
}

pub struct Fixture {
    table: HistoryTable,
    config: TrailConfig,
    resolver: ColumnEncodingResolver,
    schema: FakeSchema,
    strategy_calls: Arc<AtomicUsize>,
}

impl Fixture {
    pub fn new(snapshot: &str, changes: &str) -> Self {
        let strategy_calls = Arc::new(AtomicUsize::new(0));
        let config = TrailConfig::default().with_strategy(Arc::new(CountingStrategy {
            calls: Arc::clone(&strategy_calls),
        }));
        Self {
            table: HistoryTable::default(),
            config,
            resolver: ColumnEncodingResolver::new(),
            schema: FakeSchema {
                snapshot: snapshot.to_string(),
                changes: changes.to_string(),
                lookups: AtomicUsize::new(0),
            },
            strategy_calls,
        }
    }

    pub fn with_adapter(mut self, adapter: impl DiffAdapter + 'static) -> Self {
        self.config = self.config.with_adapter(Arc::new(adapter));
        self
    }

    pub fn ctx(&self) -> QueryContext<'_> {
        QueryContext::new(&self.table, &self.config, &self.resolver, &self.schema)
    }

    pub fn schema_lookups(&self) -> usize {
        self.schema.lookups.load(Ordering::SeqCst)
    }

    pub fn strategy_calls(&self) -> usize {
        self.strategy_calls.load(Ordering::SeqCst)
    }
}

/// Answers the query operations it is told to, and records every call.
#[derive(Clone, Default)]
pub struct RecordingAdapter {
    implemented: Option<Vec<&'static str>>,
    calls: Arc<Mutex<HashMap<&'static str, usize>>>,
}

impl RecordingAdapter {
    pub fn only(ops: &[&'static str]) -> Self {
        Self {
            implemented: Some(ops.to_vec()),
            ..Self::default()
        }
    }

    pub fn calls(&self, op: &str) -> usize {
        self.calls
            .lock()
            .map(|calls| calls.get(op).copied().unwrap_or(0))
            .unwrap_or(0)
    }

    fn answer(&self, op: &'static str) -> Option<AdapterResult<Condition>> {
        if let Some(implemented) = &self.implemented {
            if !implemented.contains(&op) {
                return None;
            }
        }
        if let Ok(mut calls) = self.calls.lock() {
            *calls.entry(op).or_insert(0) += 1;
        }
        Some(Ok(Condition::new(format!("adapter_{}", op), Vec::new())))
    }
}

impl DiffAdapter for RecordingAdapter {
    fn where_object(&self, _: &HistoryTable, _: &AttributeMap) -> Option<AdapterResult<Condition>> {
        self.answer(ops::WHERE_OBJECT)
    }

    fn where_object_changes(
        &self,
        _: &HistoryTable,
        _: &AttributeMap,
    ) -> Option<AdapterResult<Condition>> {
        self.answer(ops::WHERE_OBJECT_CHANGES)
    }

    fn where_object_changes_from(
        &self,
        _: &HistoryTable,
        _: &AttributeMap,
    ) -> Option<AdapterResult<Condition>> {
        self.answer(ops::WHERE_OBJECT_CHANGES_FROM)
    }

    fn where_object_changes_to(
        &self,
        _: &HistoryTable,
        _: &AttributeMap,
    ) -> Option<AdapterResult<Condition>> {
        self.answer(ops::WHERE_OBJECT_CHANGES_TO)
    }

    fn where_attribute_changes(&self, _: &HistoryTable, _: &str) -> Option<AdapterResult<Condition>> {
        self.answer(ops::WHERE_ATTRIBUTE_CHANGES)
    }
}

pub struct FailingAdapter;

impl DiffAdapter for FailingAdapter {
    fn where_object(&self, _: &HistoryTable, _: &AttributeMap) -> Option<AdapterResult<Condition>> {
        Some(Err("adapter exploded".into()))
    }
}
