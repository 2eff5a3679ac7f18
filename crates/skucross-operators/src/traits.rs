//! Operator trait + common interfaces.
//!
//! A caller asks an operator for its `OpPlan` (output schema, footprint) and
//! then evaluates it once over the full inputs. Both cross-join strategies
//! implement this trait, which is what makes them interchangeable.

use skucross_core::prelude::Schema;
use skucross_core::types::RowBatch;

use crate::plan::{Footprint, OpPlan};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum OpError {
    #[error("shop dataset has no '{0}' column")]
    MissingKeyColumn(String),

    #[error("planning error: {0}")]
    Plan(String),

    #[error("execution error: {0}")]
    Exec(String),

    #[error("relational store error: {0}")]
    Store(#[from] rusqlite::Error),

    #[error("relational store file: {0}")]
    StoreFile(#[from] std::io::Error),
}

impl From<skucross_core::error::Error> for OpError {
    fn from(e: skucross_core::error::Error) -> Self {
        OpError::Exec(e.to_string())
    }
}

/// Trait that all operators must implement.
///
/// Invariants:
/// - `eval_block` must be deterministic given the same inputs.
/// - An error means no output at all; operators never return partial batches.
pub trait Operator: Send + Sync {
    /// Human-readable operator name (stable).
    fn name(&self) -> &'static str;

    /// Rough memory model: `rows` output rows of about `bytes` bytes each.
    fn memory_need(&self, rows: u64, bytes: u64) -> Footprint;

    /// Given input schemas, return the output schema and footprint.
    fn plan(&self, input_schemas: &[Schema]) -> Result<OpPlan, OpError>;

    /// Evaluate over the complete inputs.
    fn eval_block(&self, inputs: &[&RowBatch]) -> Result<RowBatch, OpError>;
}
