//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use skucross_core::types::{RowBatch, Scalar};
use skucross_io::write_xlsx_to_path;

pub fn s(v: &str) -> Scalar {
    Scalar::Str(v.to_string())
}

/// `n` shops with ids counting down from `n`, so the output must be re-sorted.
/// `Shop_Name` is not on the default allow-list.
pub fn shops(n: usize) -> RowBatch {
    let rows = (0..n)
        .map(|i| {
            let id = (n - i) as i64;
            vec![
                Scalar::I64(id),
                s(&format!("Shop {}", id)),
                Scalar::F64(0.75),
            ]
        })
        .collect();
    RowBatch::from_rows(&["Shop_Id", "Shop_Name", "Perfect_Store_Threshold"], rows).unwrap()
}

pub fn skus(n: usize) -> RowBatch {
    let rows = (0..n)
        .map(|i| {
            vec![
                s(if i % 3 == 0 { "Beverage" } else { "Snack" }),
                s(&format!("SKU-{:03}", n - i)),
                Scalar::Bool(i % 2 == 0),
                Scalar::F64(0.5 + i as f64),
            ]
        })
        .collect();
    RowBatch::from_rows(&["Category_Name", "SKU_Name", "Core_Flag", "SOS"], rows).unwrap()
}

pub fn write_csv(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).expect("write csv fixture");
    path
}

pub fn write_xlsx(dir: &Path, name: &str, batch: &RowBatch) -> PathBuf {
    let path = dir.join(name);
    write_xlsx_to_path(batch, &path).expect("write xlsx fixture");
    path
}

/// Values of `column` across every row.
pub fn column_values(batch: &RowBatch, column: &str) -> Vec<Scalar> {
    batch
        .column(column)
        .map(|c| c.values.clone())
        .unwrap_or_default()
}
