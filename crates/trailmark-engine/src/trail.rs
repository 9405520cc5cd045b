//! `HistoryTrail`: the configuration and encoding cache every operation uses.

use std::sync::Arc;

use rusqlite::Connection;
use trailmark_core::query::QueryContext;
use trailmark_core::{
    ColumnEncoding, ColumnEncodingResolver, DiffAdapter, HistoryTable, SerializationStrategy,
    TrailConfig,
};
use trailmark_store::errors::Result;
use trailmark_store::SqliteSchema;

/// Records history rows and answers queries over them.
///
/// Holds no connection; every call takes one. The resolver cache is shared by
/// all calls on the same trail and survives strategy switches.
#[derive(Debug, Default)]
pub struct HistoryTrail {
    config: TrailConfig,
    resolver: ColumnEncodingResolver,
}

impl HistoryTrail {
    pub fn new(config: TrailConfig) -> Self {
        Self {
            config,
            resolver: ColumnEncodingResolver::new(),
        }
    }

    pub fn config(&self) -> &TrailConfig {
        &self.config
    }

    pub fn resolver(&self) -> &ColumnEncodingResolver {
        &self.resolver
    }

    /// Switch the serialization strategy. Later calls use the new one.
    ///
    /// Rows already written keep the format they were written in.
    pub fn set_strategy(&mut self, strategy: Arc<dyn SerializationStrategy>) {
        tracing::info!(strategy = strategy.name(), "switched serialization strategy");
        self.config.strategy = strategy;
    }

    pub fn set_adapter(&mut self, adapter: Option<Arc<dyn DiffAdapter>>) {
        self.config.adapter = adapter;
    }

    /// Forget cached column encodings, e.g. after altering a history table.
    pub fn reset_schema_cache(&self) {
        self.resolver.reset();
    }

    pub(crate) fn encoding_of(
        &self,
        conn: &Connection,
        table: &HistoryTable,
        column: &str,
    ) -> Result<ColumnEncoding> {
        let schema = SqliteSchema::new(conn);
        Ok(self.resolver.resolve(&schema, &table.name, column)?)
    }

    /// Run `f` with a query context bound to `conn` and `table`.
    pub(crate) fn with_context<T>(
        &self,
        conn: &Connection,
        table: &HistoryTable,
        f: impl FnOnce(QueryContext<'_>) -> trailmark_core::Result<T>,
    ) -> Result<T> {
        let schema = SqliteSchema::new(conn);
        let ctx = QueryContext::new(table, &self.config, &self.resolver, &schema);
        Ok(f(ctx)?)
    }
}
