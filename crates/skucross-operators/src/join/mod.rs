//! Cross-join strategies. Both produce the same rows in the same order:
//! the shop-major product, stably sorted by the key column.

pub mod cross;
pub mod store;

use skucross_core::prelude::Schema;
use skucross_core::types::RowBatch;

use crate::plan::{Footprint, OpPlan};
use crate::project::{ProjectionPlan, Side};
use crate::traits::OpError;

pub use cross::InMemoryCrossJoin;
pub use store::StoreCrossJoin;

/// Number of output rows, failing instead of overflowing.
pub(crate) fn output_rows(shop: &RowBatch, sku: &RowBatch) -> Result<usize, OpError> {
    shop.num_rows().checked_mul(sku.num_rows()).ok_or_else(|| {
        OpError::Exec(format!(
            "cross join of {} x {} rows does not fit in memory",
            shop.num_rows(),
            sku.num_rows()
        ))
    })
}

/// Shared `Operator::plan` for both strategies.
pub(crate) fn plan_for_schemas(
    plan: &ProjectionPlan,
    input_schemas: &[Schema],
    footprint: Footprint,
) -> Result<OpPlan, OpError> {
    let [shop, sku] = input_schemas else {
        return Err(OpError::Plan("cross join expects two inputs".into()));
    };
    for c in &plan.columns {
        let schema = match c.side {
            Side::Shop => shop,
            Side::Sku => sku,
        };
        if schema.index_of(&c.field.name) != Some(c.index) {
            return Err(OpError::Plan(format!(
                "column '{}' not found in {:?} input",
                c.field.name, c.side
            )));
        }
    }
    Ok(OpPlan::new(plan.output_schema(), footprint)
        .with_sort_keys(vec![plan.key_column.clone()])
        .with_missing_columns(plan.missing_columns.clone()))
}

/// Split evaluation inputs into (shop, sku).
pub(crate) fn two_inputs<'a>(
    inputs: &[&'a RowBatch],
) -> Result<(&'a RowBatch, &'a RowBatch), OpError> {
    match inputs {
        [shop, sku] => Ok((*shop, *sku)),
        _ => Err(OpError::Exec(format!(
            "cross join needs two inputs, got {}",
            inputs.len()
        ))),
    }
}
