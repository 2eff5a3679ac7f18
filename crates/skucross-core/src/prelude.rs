//! Convenient re-exports for downstream crates.

pub use crate::columns::{DEFAULT_ALLOWED_COLUMNS, OUTPUT_FILE_NAME, SHOP_ID};
pub use crate::config::{JobConfig, StrategyKind};
pub use crate::error::{Error, Result};
pub use crate::hash::Hash256;
pub use crate::manifest::{ManifestId, RunManifest};
pub use crate::schema::{DataType, Field, Schema};
pub use crate::types::{Column, RowBatch, Scalar};
