//! Runtime configuration: the active strategy and the optional adapter.
//!
//! `TrailConfig` is passed explicitly to every operation; there is no global
//! state. `TrailSettings` is its TOML form.

use crate::adapter::DiffAdapter;
use crate::errors::{Result, TrailError};
use crate::model::{HistoryTable, TrackingOptions};
use crate::serializer::{SerializationStrategy, StrategyKind};
use serde::Deserialize;
use std::collections::BTreeSet;
use std::path::Path;
use std::sync::Arc;

/// Strategy and override adapter consulted by every operation.
#[derive(Clone)]
pub struct TrailConfig {
    pub strategy: Arc<dyn SerializationStrategy>,
    pub adapter: Option<Arc<dyn DiffAdapter>>,
}

impl TrailConfig {
    pub fn new(strategy: Arc<dyn SerializationStrategy>) -> Self {
        Self {
            strategy,
            adapter: None,
        }
    }

    pub fn with_strategy(mut self, strategy: Arc<dyn SerializationStrategy>) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_adapter(mut self, adapter: Arc<dyn DiffAdapter>) -> Self {
        self.adapter = Some(adapter);
        self
    }

    pub fn without_adapter(mut self) -> Self {
        self.adapter = None;
        self
    }
}

impl Default for TrailConfig {
    fn default() -> Self {
        Self::new(StrategyKind::default().build())
    }
}

impl std::fmt::Debug for TrailConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrailConfig")
            .field("strategy", &self.strategy.name())
            .field("adapter", &self.adapter.is_some())
            .finish()
    }
}

/// File form of the configuration.
///
/// ```toml
/// serializer = "json"
/// table = "versions"
/// ignore = ["updated_at"]
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TrailSettings {
    pub serializer: StrategyKind,
    pub table: String,
    pub snapshot_column: String,
    pub changes_column: String,
    pub only: BTreeSet<String>,
    pub ignore: BTreeSet<String>,
    pub skip: BTreeSet<String>,
}

impl Default for TrailSettings {
    fn default() -> Self {
        let table = HistoryTable::default();
        Self {
            serializer: StrategyKind::default(),
            table: table.name,
            snapshot_column: table.snapshot_column,
            changes_column: table.changes_column,
            only: BTreeSet::new(),
            ignore: BTreeSet::new(),
            skip: BTreeSet::new(),
        }
    }
}

impl TrailSettings {
    /// # Errors
    ///
    /// `Config` if the text is not valid TOML for these settings.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let settings: Self = toml::from_str(text).map_err(|e| TrailError::Config {
            reason: e.to_string(),
        })?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| TrailError::Config {
            reason: format!("cannot read {}: {}", path.display(), e),
        })?;
        Self::from_toml_str(&text)
    }

    fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("table", &self.table),
            ("snapshot_column", &self.snapshot_column),
            ("changes_column", &self.changes_column),
        ] {
            if value.trim().is_empty() {
                return Err(TrailError::Config {
                    reason: format!("{} must not be empty", field),
                });
            }
        }
        if self.snapshot_column == self.changes_column {
            return Err(TrailError::Config {
                reason: "snapshot_column and changes_column must differ".to_string(),
            });
        }
        Ok(())
    }

    pub fn history_table(&self) -> HistoryTable {
        HistoryTable::new(self.table.clone())
            .with_columns(self.snapshot_column.clone(), self.changes_column.clone())
            .with_options(TrackingOptions {
                only: self.only.clone(),
                ignore: self.ignore.clone(),
                skip: self.skip.clone(),
            })
    }

    pub fn into_parts(self) -> (TrailConfig, HistoryTable) {
        let table = self.history_table();
        (TrailConfig::new(self.serializer.build()), table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_yaml_without_adapter() {
        let config = TrailConfig::default();
        assert_eq!(config.strategy.name(), "yaml");
        assert!(config.adapter.is_none());
    }

    #[test]
    fn test_settings_from_toml() {
        let settings = TrailSettings::from_toml_str(
            r#"
serializer = "json"
table = "audit_versions"
ignore = ["updated_at"]
skip = ["password_digest"]
"#,
        )
        .unwrap();
        assert_eq!(settings.serializer, StrategyKind::Json);

        let (config, table) = settings.into_parts();
        assert_eq!(config.strategy.name(), "json");
        assert_eq!(table.name, "audit_versions");
        assert_eq!(table.snapshot_column, "snapshot");
        assert!(table.options.ignore.contains("updated_at"));
        assert!(!table.options.keeps_in_snapshot("password_digest"));
    }

    #[test]
    fn test_empty_toml_gives_defaults() {
        assert_eq!(
            TrailSettings::from_toml_str("").unwrap(),
            TrailSettings::default()
        );
    }

    #[test]
    fn test_serializer_names_match_cli_parsing() {
        for name in ["yaml", "yml", "json"] {
            let settings =
                TrailSettings::from_toml_str(&format!("serializer = \"{}\"", name)).unwrap();
            assert_eq!(settings.serializer, name.parse::<StrategyKind>().unwrap());
        }
        let settings = TrailSettings::from_toml_str("serializer = \"yml\"").unwrap();
        assert_eq!(settings.serializer, StrategyKind::Yaml);
    }

    #[test]
    fn test_unknown_serializer_rejected() {
        let err = TrailSettings::from_toml_str("serializer = \"marshal\"").unwrap_err();
        assert!(matches!(err, TrailError::Config { .. }));
    }

    #[test]
    fn test_same_column_rejected() {
        let err = TrailSettings::from_toml_str(
            "snapshot_column = \"payload\"\nchanges_column = \"payload\"",
        )
        .unwrap_err();
        assert!(err.to_string().contains("must differ"));
    }

    #[test]
    fn test_load_missing_file() {
        let err = TrailSettings::load("/definitely/not/here.toml").unwrap_err();
        assert!(matches!(err, TrailError::Config { .. }));
    }
}
