//! XLSX reader: first worksheet, first row as header.

use std::io::{Read, Seek};

use calamine::{Data, Reader, Xlsx};
use skucross_core::types::{Column, RowBatch, Scalar};

use super::normalize_headers;
use crate::error::{IoError, Result};

/// Largest magnitude at which every integral `f64` is still an exact `i64`.
const MAX_EXACT_INT: f64 = 9_007_199_254_740_992.0;

pub fn read_xlsx<RS: Read + Seek>(reader: RS) -> Result<RowBatch> {
    let mut workbook: Xlsx<RS> = Xlsx::new(reader)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| IoError::InputRead("workbook has no worksheets".into()))??;

    let mut rows = range.rows();
    let header = rows
        .next()
        .ok_or_else(|| IoError::InputRead("worksheet is empty".into()))?;
    let names = normalize_headers(header.iter().map(header_text).collect());

    let mut columns: Vec<Column> = names
        .into_iter()
        .map(|name| Column::new(name, Vec::new()))
        .collect();
    for row in rows {
        for (col, cell) in columns.iter_mut().zip(row.iter()) {
            col.values.push(cell_to_scalar(cell));
        }
    }

    RowBatch::new(columns).map_err(|e| IoError::InputRead(e.to_string()))
}

fn header_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        other => cell_to_scalar(other).to_string(),
    }
}

/// Map a cell to a scalar. Whole-number floats become integers, the way the
/// sheet's author typed them; date-times keep their Excel serial value.
fn cell_to_scalar(cell: &Data) -> Scalar {
    match cell {
        Data::Empty | Data::Error(_) => Scalar::Null,
        Data::Int(i) => Scalar::I64(*i),
        Data::Float(f) => float_scalar(*f),
        Data::String(s) => Scalar::Str(s.clone()),
        Data::Bool(b) => Scalar::Bool(*b),
        Data::DateTime(dt) => Scalar::F64(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Scalar::Str(s.clone()),
    }
}

fn float_scalar(f: f64) -> Scalar {
    if !f.is_finite() {
        Scalar::Null
    } else if f.fract() == 0.0 && f.abs() <= MAX_EXACT_INT {
        Scalar::I64(f as i64)
    } else {
        Scalar::F64(f)
    }
}
