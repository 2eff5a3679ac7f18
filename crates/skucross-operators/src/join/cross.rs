//! In-memory cross join.
//!
//! Emits the product shop-major (each shop row paired with every SKU row in
//! order), gathering only the planned columns, then stable-sorts by the key.

use skucross_core::prelude::Schema;
use skucross_core::types::{Column, RowBatch};

use super::{output_rows, plan_for_schemas, two_inputs};
use crate::plan::{Footprint, OpPlan};
use crate::project::{ProjectionPlan, Side};
use crate::traits::{OpError, Operator};

pub struct InMemoryCrossJoin {
    pub plan: ProjectionPlan,
}

impl InMemoryCrossJoin {
    pub fn new(plan: ProjectionPlan) -> Self {
        Self { plan }
    }
}

impl Operator for InMemoryCrossJoin {
    fn name(&self) -> &'static str {
        "cross_join_memory"
    }

    fn memory_need(&self, _rows: u64, bytes: u64) -> Footprint {
        // Whole output is live, plus one sort index per row.
        Footprint {
            bytes_per_row: bytes + std::mem::size_of::<usize>() as u64,
            overhead_bytes: 0,
        }
    }

    fn plan(&self, input_schemas: &[Schema]) -> Result<OpPlan, OpError> {
        plan_for_schemas(&self.plan, input_schemas, self.memory_need(0, 0))
    }

    fn eval_block(&self, inputs: &[&RowBatch]) -> Result<RowBatch, OpError> {
        let (shop, sku) = two_inputs(inputs)?;
        self.plan.check_inputs(shop, sku)?;

        let total = output_rows(shop, sku)?;
        let n = sku.num_rows();

        let columns = self
            .plan
            .columns
            .iter()
            .map(|pc| {
                let mut values = Vec::with_capacity(total);
                match pc.side {
                    Side::Shop => {
                        for v in &shop.columns[pc.index].values {
                            values.extend(std::iter::repeat(v).take(n).cloned());
                        }
                    }
                    Side::Sku => {
                        let sku_values = &sku.columns[pc.index].values;
                        for _ in 0..shop.num_rows() {
                            values.extend_from_slice(sku_values);
                        }
                    }
                }
                Column::new(pc.field.name.clone(), values)
            })
            .collect();

        let mut batch = RowBatch::new(columns)?;
        batch.sort_by_columns(&[self.plan.key_column.clone()])?;
        Ok(batch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skucross_core::types::Scalar;

    fn s(v: &str) -> Scalar {
        Scalar::Str(v.to_string())
    }

    fn inputs() -> (RowBatch, RowBatch) {
        let shop = RowBatch::from_rows(
            &["Shop_Id", "Region"],
            vec![
                vec![Scalar::I64(2), s("N")],
                vec![Scalar::I64(1), s("S")],
            ],
        )
        .unwrap();
        let sku = RowBatch::from_rows(&["SKU_Name"], vec![vec![s("A")], vec![s("B")]]).unwrap();
        (shop, sku)
    }

    fn op(shop: &RowBatch, sku: &RowBatch, allowed: &[&str]) -> InMemoryCrossJoin {
        let allowed: Vec<String> = allowed.iter().map(|s| s.to_string()).collect();
        let plan =
            ProjectionPlan::resolve(&shop.schema(), &sku.schema(), &allowed, "Shop_Id").unwrap();
        InMemoryCrossJoin::new(plan)
    }

    #[test]
    fn product_sorted_by_key_with_sku_order_kept() {
        let (shop, sku) = inputs();
        let out = op(&shop, &sku, &["Shop_Id", "SKU_Name"])
            .eval_block(&[&shop, &sku])
            .unwrap();
        assert_eq!(out.column_names(), vec!["Shop_Id", "SKU_Name"]);
        assert_eq!(
            out.columns[0].values,
            vec![Scalar::I64(1), Scalar::I64(1), Scalar::I64(2), Scalar::I64(2)]
        );
        assert_eq!(out.columns[1].values, vec![s("A"), s("B"), s("A"), s("B")]);
    }

    #[test]
    fn shop_side_attributes_follow_their_row() {
        let (shop, sku) = inputs();
        let out = op(&shop, &sku, &["Shop_Id", "Region"])
            .eval_block(&[&shop, &sku])
            .unwrap();
        assert_eq!(out.columns[1].values, vec![s("S"), s("S"), s("N"), s("N")]);
    }

    #[test]
    fn empty_side_gives_empty_output() {
        let (shop, _) = inputs();
        let sku = RowBatch::new(vec![Column::new("SKU_Name", vec![])]).unwrap();
        let out = op(&shop, &sku, &["Shop_Id", "SKU_Name"])
            .eval_block(&[&shop, &sku])
            .unwrap();
        assert_eq!(out.num_rows(), 0);
        assert_eq!(out.num_columns(), 2);
    }

    #[test]
    fn plan_reports_schema_and_sort_key() {
        let (shop, sku) = inputs();
        let join = op(&shop, &sku, &["Shop_Id", "SKU_Name", "SOS"]);
        let plan = join.plan(&[shop.schema(), sku.schema()]).unwrap();
        assert_eq!(plan.output_schema.names(), vec!["Shop_Id", "SKU_Name"]);
        assert_eq!(plan.sort_keys, vec!["Shop_Id"]);
        assert_eq!(plan.missing_columns, vec!["SOS"]);

        assert!(join.plan(&[shop.schema()]).is_err());
    }

    #[test]
    fn wrong_input_count_is_rejected() {
        let (shop, sku) = inputs();
        let err = op(&shop, &sku, &["Shop_Id"]).eval_block(&[&shop]).unwrap_err();
        assert!(matches!(err, OpError::Exec(_)));
    }
}
