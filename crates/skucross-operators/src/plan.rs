//! Operator planning surfaces: `Footprint` and `OpPlan`.

use serde::{Deserialize, Serialize};
use skucross_core::prelude::Schema;

/// Coarse memory model for an operator's output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Footprint {
    /// Estimated live bytes per output row.
    pub bytes_per_row: u64,
    /// Fixed overhead independent of row count (store page cache, etc.).
    pub overhead_bytes: u64,
}

impl Footprint {
    /// Estimate total live bytes for `rows` output rows.
    pub fn estimate_live(&self, rows: u64) -> u64 {
        self.overhead_bytes
            .saturating_add(self.bytes_per_row.saturating_mul(rows))
    }
}

/// Operator plan: output schema, ordering and a cached footprint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpPlan {
    pub output_schema: Schema,

    /// Columns the output is sorted by (ascending).
    pub sort_keys: Vec<String>,

    /// Requested output columns no input provides.
    pub missing_columns: Vec<String>,

    /// Footprint model cached to avoid recomputation.
    pub footprint: Footprint,
}

impl OpPlan {
    pub fn new(output_schema: Schema, footprint: Footprint) -> Self {
        Self {
            output_schema,
            sort_keys: vec![],
            missing_columns: vec![],
            footprint,
        }
    }

    pub fn with_sort_keys(mut self, cols: Vec<String>) -> Self {
        self.sort_keys = cols;
        self
    }

    pub fn with_missing_columns(mut self, cols: Vec<String>) -> Self {
        self.missing_columns = cols;
        self
    }
}
