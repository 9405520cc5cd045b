//! Description of a history table and which attributes it tracks.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Attribute filters applied when a changeset or snapshot is computed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackingOptions {
    /// When non-empty, only these attributes produce changes
    #[serde(default)]
    pub only: BTreeSet<String>,
    /// Changes to these attributes are not recorded
    #[serde(default)]
    pub ignore: BTreeSet<String>,
    /// Never recorded, neither in changes nor in snapshots
    #[serde(default)]
    pub skip: BTreeSet<String>,
}

impl TrackingOptions {
    /// Whether a change to `attribute` belongs in a changeset.
    pub fn tracks_change(&self, attribute: &str) -> bool {
        if self.skip.contains(attribute) || self.ignore.contains(attribute) {
            return false;
        }
        self.only.is_empty() || self.only.contains(attribute)
    }

    /// Whether `attribute` belongs in a snapshot.
    pub fn keeps_in_snapshot(&self, attribute: &str) -> bool {
        !self.skip.contains(attribute)
    }
}

/// The history table a query or write targets.
///
/// This is what an override adapter receives as its first argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryTable {
    pub name: String,
    pub snapshot_column: String,
    pub changes_column: String,
    pub options: TrackingOptions,
}

impl HistoryTable {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_columns(
        mut self,
        snapshot_column: impl Into<String>,
        changes_column: impl Into<String>,
    ) -> Self {
        self.snapshot_column = snapshot_column.into();
        self.changes_column = changes_column.into();
        self
    }

    pub fn with_options(mut self, options: TrackingOptions) -> Self {
        self.options = options;
        self
    }
}

impl Default for HistoryTable {
    fn default() -> Self {
        Self {
            name: "versions".to_string(),
            snapshot_column: "snapshot".to_string(),
            changes_column: "changes".to_string(),
            options: TrackingOptions::default(),
        }
    }
}

/// Quote an SQL identifier, doubling embedded quotes.
pub fn quote_ident(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}
