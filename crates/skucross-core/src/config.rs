//! Job configuration that downstream crates can serialize/deserialize.
//!
//! Layering (later wins): `Default` → environment (`from_env`) → YAML job
//! file (`JobFile`) → command-line flags applied by the binary.

use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::columns::{default_allowed_columns, OUTPUT_FILE_NAME, SHOP_ID};
use crate::error::{Error, Result};

/// How the cross join is executed. Both strategies produce identical output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    /// Build the product directly in memory.
    #[default]
    InMemory,
    /// Load both inputs into a transient SQLite database and let it join.
    RelationalStore,
    /// Pick `RelationalStore` once the estimated output exceeds the threshold.
    Auto,
}

impl StrategyKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StrategyKind::InMemory => "in_memory",
            StrategyKind::RelationalStore => "relational_store",
            StrategyKind::Auto => "auto",
        }
    }
}

impl FromStr for StrategyKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" | "in_memory" | "in-memory" => Ok(StrategyKind::InMemory),
            "sqlite" | "store" | "relational_store" | "relational-store" => {
                Ok(StrategyKind::RelationalStore)
            }
            "auto" => Ok(StrategyKind::Auto),
            other => Err(Error::Config(format!("unknown strategy '{}'", other))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobConfig {
    /// Column the shop dataset must carry; leads the output and is the sort key.
    pub key_column: String,

    /// Ordered allow-list of output columns.
    pub allowed_columns: Vec<String>,

    /// File name offered for the generated spreadsheet.
    pub output_file_name: String,

    /// Rows shown by the preview.
    pub preview_rows: usize,

    pub strategy: StrategyKind,

    /// Estimated output size (bytes) above which `Auto` switches to the store.
    pub store_threshold_bytes: u64,

    /// Directory for the store's temporary database file. `None` keeps the
    /// store in memory.
    pub store_dir: Option<String>,
}

impl Default for JobConfig {
    fn default() -> Self {
        Self {
            key_column: SHOP_ID.to_string(),
            allowed_columns: default_allowed_columns(),
            output_file_name: OUTPUT_FILE_NAME.to_string(),
            preview_rows: 10,
            strategy: StrategyKind::InMemory,
            store_threshold_bytes: 512 * 1024 * 1024, // 512 MiB default
            store_dir: None,
        }
    }
}

impl JobConfig {
    /// Create a config from environment variables, falling back to defaults.
    ///
    /// Environment variables:
    /// - `SKUCROSS_KEY_COLUMN`: key column name
    /// - `SKUCROSS_ALLOWED_COLUMNS`: comma-separated allow-list
    /// - `SKUCROSS_OUTPUT_FILE`: output file name
    /// - `SKUCROSS_PREVIEW_ROWS`: preview row count
    /// - `SKUCROSS_STRATEGY`: `memory`, `sqlite` or `auto`
    /// - `SKUCROSS_STORE_THRESHOLD_BYTES`: threshold used by `auto`
    /// - `SKUCROSS_STORE_DIR`: directory for the store's temp file
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as `from_env` but reading variables through `lookup`.
    /// Unparseable values are ignored.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::default();

        if let Some(s) = lookup("SKUCROSS_KEY_COLUMN") {
            if !s.trim().is_empty() {
                cfg.key_column = s.trim().to_string();
            }
        }

        if let Some(s) = lookup("SKUCROSS_ALLOWED_COLUMNS") {
            let cols = split_column_list(&s);
            if !cols.is_empty() {
                cfg.allowed_columns = cols;
            }
        }

        if let Some(s) = lookup("SKUCROSS_OUTPUT_FILE") {
            if !s.trim().is_empty() {
                cfg.output_file_name = s.trim().to_string();
            }
        }

        if let Some(s) = lookup("SKUCROSS_PREVIEW_ROWS") {
            if let Ok(v) = s.parse::<usize>() {
                cfg.preview_rows = v;
            }
        }

        if let Some(s) = lookup("SKUCROSS_STRATEGY") {
            if let Ok(v) = s.parse::<StrategyKind>() {
                cfg.strategy = v;
            }
        }

        if let Some(s) = lookup("SKUCROSS_STORE_THRESHOLD_BYTES") {
            if let Ok(v) = s.parse::<u64>() {
                cfg.store_threshold_bytes = v;
            }
        }

        if let Some(s) = lookup("SKUCROSS_STORE_DIR") {
            cfg.store_dir = Some(s);
        }

        cfg
    }

    /// Overlay the values present in a job file.
    pub fn apply_file(&mut self, file: &JobFile) {
        if let Some(key) = &file.key_column {
            self.key_column = key.clone();
        }
        if let Some(cols) = &file.allowed_columns {
            self.allowed_columns = cols.clone();
        }
        if let Some(name) = &file.output_file_name {
            self.output_file_name = name.clone();
        }
        if let Some(rows) = file.preview_rows {
            self.preview_rows = rows;
        }
        if let Some(strategy) = file.strategy {
            self.strategy = strategy;
        }
        if let Some(threshold) = file.store_threshold_bytes {
            self.store_threshold_bytes = threshold;
        }
        if let Some(dir) = &file.store_dir {
            self.store_dir = Some(dir.clone());
        }
    }

    /// Reject configurations the projector cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.key_column.trim().is_empty() {
            return Err(Error::Config("key column must not be empty".into()));
        }
        if self.allowed_columns.is_empty() {
            return Err(Error::Config("allow-list must name at least one column".into()));
        }
        if self.output_file_name.trim().is_empty() {
            return Err(Error::Config("output file name must not be empty".into()));
        }
        Ok(())
    }
}

/// YAML job file. Every field is optional and overrides the config it is
/// applied to.
///
/// ```yaml
/// key_column: Shop_Id
/// allowed_columns: [Shop_Id, SKU_Name, SOS]
/// strategy: relational_store
/// preview_rows: 20
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct JobFile {
    pub key_column: Option<String>,
    pub allowed_columns: Option<Vec<String>>,
    pub output_file_name: Option<String>,
    pub preview_rows: Option<usize>,
    pub strategy: Option<StrategyKind>,
    pub store_threshold_bytes: Option<u64>,
    pub store_dir: Option<String>,
}

impl JobFile {
    pub fn from_yaml_str(s: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(s)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("cannot read {}: {}", path.display(), e)))?;
        Self::from_yaml_str(&text)
    }
}

fn split_column_list(s: &str) -> Vec<String> {
    s.split(',')
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_string)
        .collect()
}
