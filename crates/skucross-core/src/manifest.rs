//! Run manifest emitted after each successful projection.
//!
//! Two runs over identical inputs and config carry the same `outputs_digest`.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::StrategyKind;
use crate::hash::Hash256;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ManifestId(pub Uuid);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunManifest {
    pub id: ManifestId,

    /// Stable hash of the job configuration used.
    pub config_hash: Hash256,

    /// Version string for provenance.
    pub engine_version: String,

    /// Strategy that actually ran (`Auto` is resolved before recording).
    pub strategy: StrategyKind,

    pub shop_rows: usize,
    pub sku_rows: usize,
    pub output_rows: usize,

    /// Output columns, in order.
    pub columns: Vec<String>,

    /// Allow-listed columns absent from both inputs.
    pub missing_columns: Vec<String>,

    /// Digest of the projected dataset.
    pub outputs_digest: Option<Hash256>,

    /// Milliseconds since Unix epoch (UTC).
    pub started_ms: u64,
    pub finished_ms: u64,
}

impl RunManifest {
    pub fn new(config_hash: Hash256, started_ms: u64) -> Self {
        Self {
            id: ManifestId(Uuid::new_v4()),
            config_hash,
            engine_version: crate::VERSION.to_string(),
            strategy: StrategyKind::InMemory,
            shop_rows: 0,
            sku_rows: 0,
            output_rows: 0,
            columns: Vec::new(),
            missing_columns: Vec::new(),
            outputs_digest: None,
            started_ms,
            finished_ms: started_ms,
        }
    }

    pub fn finish(mut self, finished_ms: u64, outputs_digest: Option<Hash256>) -> Self {
        self.finished_ms = finished_ms;
        self.outputs_digest = outputs_digest;
        self
    }

    pub fn duration_ms(&self) -> u64 {
        self.finished_ms.saturating_sub(self.started_ms)
    }
}
