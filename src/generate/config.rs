//! YAML configuration for the generate command.
//!
//! Supports run-wide defaults and per-table overrides.

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Per-table generation settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TableConfig {
    /// Rows to generate for this table (overrides default)
    pub rows: Option<u64>,
    /// Audit column for this table (overrides default)
    pub audit_column: Option<String>,
    /// Skip this table entirely
    pub skip: bool,
}

/// Run-wide defaults, overridden by command-line flags
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DefaultConfig {
    pub rows: Option<u64>,
    pub batch_size: Option<usize>,
    pub audit_column: Option<String>,
    /// `START,END`, same syntax as `--time-range`
    pub time_range: Option<String>,
}

/// Complete YAML configuration for the generate command
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerateYamlConfig {
    pub default: DefaultConfig,
    pub tables: HashMap<String, TableConfig>,
}

impl GenerateYamlConfig {
    /// Load configuration from a YAML file
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: GenerateYamlConfig = serde_yaml_ng::from_str(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        Ok(config)
    }

    /// Get configuration for a specific table
    pub fn get_table_config(&self, table_name: &str) -> Option<&TableConfig> {
        self.tables.get(table_name).or_else(|| {
            let lower = table_name.to_lowercase();
            self.tables
                .iter()
                .find(|(k, _)| k.to_lowercase() == lower)
                .map(|(_, v)| v)
        })
    }

    pub fn should_skip(&self, table_name: &str) -> bool {
        self.get_table_config(table_name)
            .map(|c| c.skip)
            .unwrap_or(false)
    }

    /// Per-table row count, if one is configured
    pub fn table_rows(&self, table_name: &str) -> Option<u64> {
        self.get_table_config(table_name).and_then(|c| c.rows)
    }

    /// Per-table audit column, if one is configured
    pub fn table_audit_column(&self, table_name: &str) -> Option<&str> {
        self.get_table_config(table_name)
            .and_then(|c| c.audit_column.as_deref())
    }
}
