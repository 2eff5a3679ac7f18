//! Dataset representation: a `RowBatch` of equally long named columns.
//!
//! Values are the scalars a spreadsheet or CSV cell can carry. The ordering
//! defined here (`scalar_cmp`) matches SQLite's default ordering (with NaN
//! stored as NULL), so sorting in memory and `ORDER BY` in the relational
//! store agree row for row.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::schema::{DataType, Field, Schema};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Scalar {
    Null,
    Bool(bool),
    I64(i64),
    F64(f64),
    Str(String),
}

impl Scalar {
    pub fn data_type(&self) -> Option<DataType> {
        match self {
            Scalar::Null => None,
            Scalar::Bool(_) => Some(DataType::Boolean),
            Scalar::I64(_) => Some(DataType::Int64),
            Scalar::F64(_) => Some(DataType::Float64),
            Scalar::Str(_) => Some(DataType::Utf8),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Scalar::Null)
    }

    /// Numeric view for comparisons. Booleans count as 0/1; NaN is not a
    /// number here because the relational store can only hold it as NULL.
    fn as_number(&self) -> Option<Number> {
        match self {
            Scalar::Bool(b) => Some(Number::Int(*b as i64)),
            Scalar::I64(i) => Some(Number::Int(*i)),
            Scalar::F64(f) if !f.is_nan() => Some(Number::Float(*f)),
            _ => None,
        }
    }
}

#[derive(Clone, Copy)]
enum Number {
    Int(i64),
    Float(f64),
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Null => Ok(()),
            Scalar::Bool(b) => write!(f, "{}", b),
            Scalar::I64(i) => write!(f, "{}", i),
            Scalar::F64(x) if x.fract() == 0.0 && x.abs() < 1e16 => write!(f, "{:.1}", x),
            Scalar::F64(x) => write!(f, "{}", x),
            Scalar::Str(s) => f.write_str(s),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub values: Vec<Scalar>,
}

impl Column {
    pub fn new(name: impl Into<String>, values: Vec<Scalar>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Infer the logical type of this column from its non-null values.
    ///
    /// A column mixing integers and floats is `Float64`; any other mix (or an
    /// all-null column) falls back to `Utf8`.
    pub fn data_type(&self) -> DataType {
        let mut seen: Option<DataType> = None;
        for v in &self.values {
            let Some(t) = v.data_type() else { continue };
            seen = match (seen, t) {
                (None, t) => Some(t),
                (Some(a), b) if a == b => Some(a),
                (Some(DataType::Int64), DataType::Float64)
                | (Some(DataType::Float64), DataType::Int64) => Some(DataType::Float64),
                _ => return DataType::Utf8,
            };
        }
        seen.unwrap_or(DataType::Utf8)
    }

    pub fn field(&self) -> Field {
        Field::new(
            self.name.clone(),
            self.data_type(),
            self.values.iter().any(Scalar::is_null),
        )
    }
}

/// An ordered sequence of uniformly shaped, column-labeled rows.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RowBatch {
    pub columns: Vec<Column>,
}

impl RowBatch {
    /// Build a batch, checking that every column has the same length.
    pub fn new(columns: Vec<Column>) -> Result<Self> {
        if let Some(first) = columns.first() {
            if let Some(bad) = columns.iter().find(|c| c.len() != first.len()) {
                return Err(Error::Schema(format!(
                    "column '{}' has {} values, expected {}",
                    bad.name,
                    bad.len(),
                    first.len()
                )));
            }
        }
        Ok(Self { columns })
    }

    /// Build a batch from row-major data.
    pub fn from_rows(names: &[&str], rows: Vec<Vec<Scalar>>) -> Result<Self> {
        let mut columns: Vec<Column> = names
            .iter()
            .map(|n| Column::new(*n, Vec::with_capacity(rows.len())))
            .collect();
        for (i, row) in rows.into_iter().enumerate() {
            if row.len() != names.len() {
                return Err(Error::Schema(format!(
                    "row {} has {} values, expected {}",
                    i,
                    row.len(),
                    names.len()
                )));
            }
            for (col, v) in columns.iter_mut().zip(row) {
                col.values.push(v);
            }
        }
        Ok(Self { columns })
    }

    pub fn num_rows(&self) -> usize {
        self.columns.first().map(|c| c.len()).unwrap_or(0)
    }

    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn schema(&self) -> Schema {
        Schema::new(self.columns.iter().map(Column::field).collect())
    }

    /// Borrow one row across all columns.
    pub fn row(&self, idx: usize) -> Option<Vec<&Scalar>> {
        if idx >= self.num_rows() {
            return None;
        }
        Some(self.columns.iter().map(|c| &c.values[idx]).collect())
    }

    /// Sort rows by the specified columns (in order).
    ///
    /// The sort is stable: rows with equal keys keep their relative order.
    pub fn sort_by_columns(&mut self, sort_keys: &[String]) -> Result<()> {
        let num_rows = self.num_rows();
        if num_rows == 0 {
            return Ok(());
        }

        let key_indices: Vec<usize> = sort_keys
            .iter()
            .map(|key| {
                self.columns
                    .iter()
                    .position(|c| &c.name == key)
                    .ok_or_else(|| Error::Schema(format!("sort key column '{}' not found", key)))
            })
            .collect::<Result<Vec<_>>>()?;

        let mut order: Vec<usize> = (0..num_rows).collect();
        // `sort_by` is a stable merge sort.
        order.sort_by(|&a, &b| {
            for &ci in &key_indices {
                let values = &self.columns[ci].values;
                match scalar_cmp(&values[a], &values[b]) {
                    Ordering::Equal => continue,
                    other => return other,
                }
            }
            Ordering::Equal
        });

        for col in &mut self.columns {
            let original = std::mem::take(&mut col.values);
            let mut slots: Vec<Option<Scalar>> = original.into_iter().map(Some).collect();
            col.values = order
                .iter()
                .map(|&idx| slots[idx].take().unwrap_or(Scalar::Null))
                .collect();
        }

        Ok(())
    }
}

/// Compare two scalars for sorting.
///
/// Nulls and NaN sort first (as equals), then numbers, then strings by bytes.
/// Integers and floats compare exactly, so keys beyond 2^53 order the same
/// way SQLite orders them.
pub fn scalar_cmp(a: &Scalar, b: &Scalar) -> Ordering {
    match (a.as_number(), b.as_number()) {
        (Some(x), Some(y)) => number_cmp(x, y),
        _ => match (a, b) {
            (Scalar::Str(x), Scalar::Str(y)) => x.as_bytes().cmp(y.as_bytes()),
            _ => scalar_type_order(a).cmp(&scalar_type_order(b)),
        },
    }
}

fn number_cmp(a: Number, b: Number) -> Ordering {
    match (a, b) {
        (Number::Int(x), Number::Int(y)) => x.cmp(&y),
        (Number::Float(x), Number::Float(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
        (Number::Int(i), Number::Float(f)) => int_float_cmp(i, f),
        (Number::Float(f), Number::Int(i)) => int_float_cmp(i, f).reverse(),
    }
}

/// Exact comparison of an integer with a non-NaN float.
fn int_float_cmp(i: i64, f: f64) -> Ordering {
    // 2^63 is exactly representable; every finite float below it in
    // magnitude truncates into i64 range.
    const TWO_POW_63: f64 = 9_223_372_036_854_775_808.0;
    if f >= TWO_POW_63 {
        return Ordering::Less;
    }
    if f < -TWO_POW_63 {
        return Ordering::Greater;
    }
    let whole = f.trunc();
    match i.cmp(&(whole as i64)) {
        Ordering::Equal => 0.0f64.partial_cmp(&(f - whole)).unwrap_or(Ordering::Equal),
        other => other,
    }
}

/// Storage-class order for mixed-type comparisons.
fn scalar_type_order(s: &Scalar) -> u8 {
    match s {
        Scalar::Null => 0,
        Scalar::F64(f) if f.is_nan() => 0,
        Scalar::Bool(_) | Scalar::I64(_) | Scalar::F64(_) => 1,
        Scalar::Str(_) => 2,
    }
}
