//! Allow-list resolution for the cross join.
//!
//! The key column always comes from the shop side and always leads the
//! output. Every other allow-listed name is taken from the SKU side when the
//! SKU dataset has it, from the shop side otherwise, and reported as missing
//! when neither side does.

use serde::{Deserialize, Serialize};
use skucross_core::prelude::{Field, Schema};
use skucross_core::types::{RowBatch, Scalar};

use crate::traits::OpError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    Shop,
    Sku,
}

/// One output column and where its values come from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectedColumn {
    pub side: Side,
    /// Column position in the source dataset.
    pub index: usize,
    pub field: Field,
}

impl ProjectedColumn {
    pub fn name(&self) -> &str {
        &self.field.name
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionPlan {
    pub key_column: String,
    /// Output columns in order; `columns[0]` is the key.
    pub columns: Vec<ProjectedColumn>,
    /// Allow-listed names found in neither input, in allow-list order.
    pub missing_columns: Vec<String>,
}

impl ProjectionPlan {
    pub fn resolve(
        shop: &Schema,
        sku: &Schema,
        allowed_columns: &[String],
        key_column: &str,
    ) -> Result<Self, OpError> {
        let key_index = shop
            .index_of(key_column)
            .ok_or_else(|| OpError::MissingKeyColumn(key_column.to_string()))?;

        let mut columns = vec![ProjectedColumn {
            side: Side::Shop,
            index: key_index,
            field: shop.fields[key_index].clone(),
        }];
        let mut missing_columns: Vec<String> = Vec::new();

        for name in allowed_columns {
            if name == key_column
                || columns.iter().any(|c| c.name() == name.as_str())
                || missing_columns.contains(name)
            {
                continue;
            }
            let source = sku
                .index_of(name)
                .map(|i| (Side::Sku, i, &sku.fields[i]))
                .or_else(|| shop.index_of(name).map(|i| (Side::Shop, i, &shop.fields[i])));
            match source {
                Some((side, index, field)) => columns.push(ProjectedColumn {
                    side,
                    index,
                    field: field.clone(),
                }),
                None => missing_columns.push(name.clone()),
            }
        }

        Ok(Self {
            key_column: key_column.to_string(),
            columns,
            missing_columns,
        })
    }

    pub fn output_schema(&self) -> Schema {
        Schema::new(self.columns.iter().map(|c| c.field.clone()).collect())
    }

    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name().to_string()).collect()
    }

    /// Columns read from one side, with their output positions.
    pub fn columns_from(&self, side: Side) -> impl Iterator<Item = (usize, &ProjectedColumn)> {
        self.columns
            .iter()
            .enumerate()
            .filter(move |(_, c)| c.side == side)
    }

    /// Check that both inputs still have the shape this plan was resolved for.
    pub fn check_inputs(&self, shop: &RowBatch, sku: &RowBatch) -> Result<(), OpError> {
        for c in &self.columns {
            let input = match c.side {
                Side::Shop => shop,
                Side::Sku => sku,
            };
            match input.columns.get(c.index) {
                Some(col) if col.name == c.field.name => {}
                _ => {
                    return Err(OpError::Plan(format!(
                        "input no longer has column '{}' at position {}",
                        c.field.name, c.index
                    )))
                }
            }
        }
        Ok(())
    }

    /// Average in-memory size of one output row, sampled from the inputs.
    pub fn estimate_row_bytes(&self, shop: &RowBatch, sku: &RowBatch) -> u64 {
        self.columns
            .iter()
            .map(|c| {
                let input = match c.side {
                    Side::Shop => shop,
                    Side::Sku => sku,
                };
                input
                    .columns
                    .get(c.index)
                    .map(|col| average_value_bytes(&col.values))
                    .unwrap_or(0)
            })
            .sum()
    }
}

fn average_value_bytes(values: &[Scalar]) -> u64 {
    let base = std::mem::size_of::<Scalar>() as u64;
    if values.is_empty() {
        return base;
    }
    let heap: u64 = values
        .iter()
        .map(|v| match v {
            Scalar::Str(s) => s.capacity() as u64,
            _ => 0,
        })
        .sum();
    base + heap / values.len() as u64
}
