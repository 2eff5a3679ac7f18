//! Cross-Join Projector: the one entry point callers use.
//!
//! Resolves the allow-list against both inputs, chooses an execution
//! strategy and runs it. The strategy never changes the result, only how
//! much of the product is held in memory while it is sorted.

use std::path::PathBuf;

use skucross_core::columns::SHOP_ID;
use skucross_core::config::{JobConfig, StrategyKind};
use skucross_core::types::RowBatch;
use tracing::{debug, warn};

use crate::join::{output_rows, InMemoryCrossJoin, StoreCrossJoin};
use crate::plan::OpPlan;
use crate::project::ProjectionPlan;
use crate::traits::{OpError, Operator};

/// Result of one projection.
#[derive(Debug, Clone, PartialEq)]
pub struct Projection {
    pub batch: RowBatch,
    /// Allow-listed columns absent from both inputs (non-fatal).
    pub missing_columns: Vec<String>,
    /// Strategy that ran; never `Auto`.
    pub strategy: StrategyKind,
}

#[derive(Debug, Clone)]
pub struct CrossJoinProjector {
    pub key_column: String,
    pub allowed_columns: Vec<String>,
    pub strategy: StrategyKind,
    pub store_threshold_bytes: u64,
    pub store_dir: Option<PathBuf>,
}

impl CrossJoinProjector {
    /// In-memory projector keyed on `Shop_Id`.
    pub fn new(allowed_columns: Vec<String>) -> Self {
        let defaults = JobConfig::default();
        Self {
            key_column: SHOP_ID.to_string(),
            allowed_columns,
            strategy: StrategyKind::InMemory,
            store_threshold_bytes: defaults.store_threshold_bytes,
            store_dir: None,
        }
    }

    pub fn from_config(cfg: &JobConfig) -> Self {
        Self {
            key_column: cfg.key_column.clone(),
            allowed_columns: cfg.allowed_columns.clone(),
            strategy: cfg.strategy,
            store_threshold_bytes: cfg.store_threshold_bytes,
            store_dir: cfg.store_dir.as_ref().map(PathBuf::from),
        }
    }

    pub fn with_key_column(mut self, key: impl Into<String>) -> Self {
        self.key_column = key.into();
        self
    }

    pub fn with_strategy(mut self, strategy: StrategyKind) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_store_threshold(mut self, bytes: u64) -> Self {
        self.store_threshold_bytes = bytes;
        self
    }

    pub fn with_store_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.store_dir = Some(dir.into());
        self
    }

    pub fn resolve(&self, shop: &RowBatch, sku: &RowBatch) -> Result<ProjectionPlan, OpError> {
        ProjectionPlan::resolve(
            &shop.schema(),
            &sku.schema(),
            &self.allowed_columns,
            &self.key_column,
        )
    }

    /// Resolve `Auto` by comparing the in-memory footprint with the threshold.
    pub fn choose_strategy(
        &self,
        plan: &ProjectionPlan,
        shop: &RowBatch,
        sku: &RowBatch,
    ) -> Result<StrategyKind, OpError> {
        if self.strategy != StrategyKind::Auto {
            return Ok(self.strategy);
        }
        let rows = output_rows(shop, sku)? as u64;
        let row_bytes = plan.estimate_row_bytes(shop, sku);
        let live = InMemoryCrossJoin::new(plan.clone())
            .memory_need(rows, row_bytes)
            .estimate_live(rows);
        let chosen = if live > self.store_threshold_bytes {
            StrategyKind::RelationalStore
        } else {
            StrategyKind::InMemory
        };
        debug!(
            rows,
            estimated_bytes = live,
            threshold = self.store_threshold_bytes,
            strategy = chosen.as_str(),
            "strategy chosen"
        );
        Ok(chosen)
    }

    fn operator(&self, plan: ProjectionPlan, strategy: StrategyKind) -> Box<dyn Operator> {
        match strategy {
            StrategyKind::RelationalStore => {
                Box::new(StoreCrossJoin::new(plan, self.store_dir.clone()))
            }
            StrategyKind::InMemory | StrategyKind::Auto => Box::new(InMemoryCrossJoin::new(plan)),
        }
    }

    /// Describe what `project` would do, without computing the product.
    pub fn explain(
        &self,
        shop: &RowBatch,
        sku: &RowBatch,
    ) -> Result<(OpPlan, StrategyKind), OpError> {
        let plan = self.resolve(shop, sku)?;
        let strategy = self.choose_strategy(&plan, shop, sku)?;
        let op = self.operator(plan, strategy);
        let op_plan = op.plan(&[shop.schema(), sku.schema()])?;
        Ok((op_plan, strategy))
    }

    /// Compute the projected cross join of `shop` and `sku`.
    pub fn project(&self, shop: &RowBatch, sku: &RowBatch) -> Result<Projection, OpError> {
        let plan = self.resolve(shop, sku)?;
        if !plan.missing_columns.is_empty() {
            warn!(
                missing = ?plan.missing_columns,
                "allow-listed columns not found in either input; omitted from output"
            );
        }
        let missing_columns = plan.missing_columns.clone();
        let strategy = self.choose_strategy(&plan, shop, sku)?;
        let op = self.operator(plan, strategy);
        debug!(operator = op.name(), "evaluating cross join");
        let batch = op.eval_block(&[shop, sku])?;

        Ok(Projection {
            batch,
            missing_columns,
            strategy,
        })
    }
}

/// Project with the default key and the in-memory strategy.
pub fn project_cross_join(
    shop: &RowBatch,
    sku: &RowBatch,
    allowed_columns: &[String],
) -> Result<Projection, OpError> {
    CrossJoinProjector::new(allowed_columns.to_vec()).project(shop, sku)
}
