//! Cross join executed by a transient SQLite database.
//!
//! Both inputs are loaded into two tables (`shop`, `sku`) holding only the
//! planned columns plus each row's ordinal. The database runs
//!
//! ```sql
//! SELECT ... FROM shop AS s CROSS JOIN sku AS k ORDER BY s.c0, s.ord, k.ord
//! ```
//!
//! which is exactly the stable key sort of the shop-major product. Columns
//! are declared without a type so SQLite keeps each value's storage class.
//! Booleans travel as integers and NaN as NULL; a companion tag column
//! records which, so both come back unchanged. The database lives for one call: in memory, or in a
//! temporary file under the configured directory that is deleted on drop.

use std::path::{Path, PathBuf};

use rusqlite::types::{Value, ValueRef};
use rusqlite::{params_from_iter, Connection};
use skucross_core::prelude::Schema;
use skucross_core::types::{Column, RowBatch, Scalar};
use tempfile::NamedTempFile;
use tracing::debug;

use super::{output_rows, plan_for_schemas, two_inputs};
use crate::plan::{Footprint, OpPlan};
use crate::project::{ProjectedColumn, ProjectionPlan, Side};
use crate::traits::{OpError, Operator};

/// Page cache SQLite keeps by default (2000 KiB).
const SQLITE_CACHE_BYTES: u64 = 2_000 * 1024;

/// Tag values stored next to columns that hold booleans or NaN.
const TAG_PLAIN: i64 = 0;
const TAG_BOOL: i64 = 1;
const TAG_NAN: i64 = 2;

pub struct StoreCrossJoin {
    pub plan: ProjectionPlan,
    /// Directory for the temporary database file; `None` keeps it in memory.
    pub store_dir: Option<PathBuf>,
}

impl StoreCrossJoin {
    pub fn new(plan: ProjectionPlan, store_dir: Option<PathBuf>) -> Self {
        Self { plan, store_dir }
    }
}

impl Operator for StoreCrossJoin {
    fn name(&self) -> &'static str {
        "cross_join_store"
    }

    fn memory_need(&self, _rows: u64, bytes: u64) -> Footprint {
        // The product is sorted inside the store; only the result is held.
        Footprint {
            bytes_per_row: bytes,
            overhead_bytes: SQLITE_CACHE_BYTES,
        }
    }

    fn plan(&self, input_schemas: &[Schema]) -> Result<OpPlan, OpError> {
        plan_for_schemas(&self.plan, input_schemas, self.memory_need(0, 0))
    }

    fn eval_block(&self, inputs: &[&RowBatch]) -> Result<RowBatch, OpError> {
        let (shop, sku) = two_inputs(inputs)?;
        self.plan.check_inputs(shop, sku)?;
        let total = output_rows(shop, sku)?;

        let mut store = TransientStore::open(self.store_dir.as_deref())?;

        let shop_cols: Vec<&ProjectedColumn> =
            self.plan.columns_from(Side::Shop).map(|(_, c)| c).collect();
        let sku_cols: Vec<&ProjectedColumn> =
            self.plan.columns_from(Side::Sku).map(|(_, c)| c).collect();

        let tx = store.conn.transaction()?;
        let shop_tags = load_table(&tx, "shop", shop, &shop_cols)?;
        let sku_tags = load_table(&tx, "sku", sku, &sku_cols)?;
        tx.commit()?;

        // Output expressions in plan order, then any tags after them.
        let mut select: Vec<String> = Vec::with_capacity(self.plan.columns.len());
        let mut tags: Vec<(usize, String)> = Vec::new();
        let (mut si, mut ki) = (0usize, 0usize);
        for (pos, pc) in self.plan.columns.iter().enumerate() {
            let (alias, j, tagged) = match pc.side {
                Side::Shop => {
                    si += 1;
                    ("s", si - 1, shop_tags[si - 1])
                }
                Side::Sku => {
                    ki += 1;
                    ("k", ki - 1, sku_tags[ki - 1])
                }
            };
            select.push(format!("{}.c{}", alias, j));
            if tagged {
                tags.push((pos, format!("{}.t{}", alias, j)));
            }
        }
        let width = select.len();
        select.extend(tags.iter().map(|(_, expr)| expr.clone()));

        // The key is always the first shop column.
        let sql = format!(
            "SELECT {} FROM shop AS s CROSS JOIN sku AS k ORDER BY s.c0, s.ord, k.ord",
            select.join(", ")
        );
        debug!(%sql, rows = total, "store cross join");

        let mut columns: Vec<Column> = self
            .plan
            .columns
            .iter()
            .map(|pc| Column::new(pc.field.name.clone(), Vec::with_capacity(total)))
            .collect();
        let mut kinds = vec![TAG_PLAIN; width];

        let mut stmt = store.conn.prepare(&sql)?;
        let mut rows = stmt.query([])?;
        while let Some(row) = rows.next()? {
            for (t, (pos, _)) in tags.iter().enumerate() {
                kinds[*pos] = match row.get_ref(width + t)? {
                    ValueRef::Integer(k) => k,
                    _ => TAG_PLAIN,
                };
            }
            for (j, col) in columns.iter_mut().enumerate() {
                col.values.push(from_sql(row.get_ref(j)?, kinds[j])?);
            }
        }

        Ok(RowBatch::new(columns)?)
    }
}

/// Connection plus the temp file backing it, if any. Fields drop in order,
/// so the connection closes before the file is removed.
struct TransientStore {
    conn: Connection,
    _file: Option<NamedTempFile>,
}

impl TransientStore {
    fn open(dir: Option<&Path>) -> Result<Self, OpError> {
        match dir {
            None => Ok(Self {
                conn: Connection::open_in_memory()?,
                _file: None,
            }),
            Some(dir) => {
                let file = tempfile::Builder::new()
                    .prefix("skucross-")
                    .suffix(".sqlite")
                    .tempfile_in(dir)?;
                let conn = Connection::open(file.path())?;
                conn.execute_batch("PRAGMA synchronous = OFF;")?;
                Ok(Self {
                    conn,
                    _file: Some(file),
                })
            }
        }
    }
}

/// Create and fill one input table. Returns, per loaded column, whether it
/// got a tag column.
fn load_table(
    conn: &Connection,
    table: &str,
    batch: &RowBatch,
    cols: &[&ProjectedColumn],
) -> Result<Vec<bool>, OpError> {
    let tagged: Vec<bool> = cols
        .iter()
        .map(|pc| {
            batch.columns[pc.index]
                .values
                .iter()
                .any(|v| value_tag(v) != TAG_PLAIN)
        })
        .collect();

    let mut defs = String::from("ord INTEGER NOT NULL");
    for (j, t) in tagged.iter().enumerate() {
        defs.push_str(&format!(", c{}", j));
        if *t {
            defs.push_str(&format!(", t{} INTEGER", j));
        }
    }
    conn.execute_batch(&format!("CREATE TABLE {} ({});", table, defs))?;

    let width = 1 + cols.len() + tagged.iter().filter(|t| **t).count();
    let placeholders: Vec<String> = (1..=width).map(|i| format!("?{}", i)).collect();
    let mut stmt = conn.prepare(&format!(
        "INSERT INTO {} VALUES ({})",
        table,
        placeholders.join(", ")
    ))?;

    let mut row: Vec<Value> = Vec::with_capacity(width);
    for r in 0..batch.num_rows() {
        row.clear();
        row.push(Value::Integer(r as i64));
        for (pc, t) in cols.iter().zip(&tagged) {
            let v = &batch.columns[pc.index].values[r];
            row.push(to_sql(v));
            if *t {
                row.push(Value::Integer(value_tag(v)));
            }
        }
        stmt.execute(params_from_iter(row.iter()))?;
    }
    Ok(tagged)
}

fn value_tag(v: &Scalar) -> i64 {
    match v {
        Scalar::Bool(_) => TAG_BOOL,
        Scalar::F64(f) if f.is_nan() => TAG_NAN,
        _ => TAG_PLAIN,
    }
}

fn to_sql(v: &Scalar) -> Value {
    match v {
        Scalar::Null => Value::Null,
        Scalar::F64(f) if f.is_nan() => Value::Null,
        Scalar::Bool(b) => Value::Integer(*b as i64),
        Scalar::I64(i) => Value::Integer(*i),
        Scalar::F64(f) => Value::Real(*f),
        Scalar::Str(s) => Value::Text(s.clone()),
    }
}

fn from_sql(v: ValueRef<'_>, tag: i64) -> Result<Scalar, OpError> {
    Ok(match v {
        ValueRef::Null if tag == TAG_NAN => Scalar::F64(f64::NAN),
        ValueRef::Null => Scalar::Null,
        ValueRef::Integer(i) if tag == TAG_BOOL => Scalar::Bool(i != 0),
        ValueRef::Integer(i) => Scalar::I64(i),
        ValueRef::Real(f) => Scalar::F64(f),
        ValueRef::Text(t) | ValueRef::Blob(t) => Scalar::Str(
            std::str::from_utf8(t)
                .map_err(|e| OpError::Exec(format!("store returned invalid text: {}", e)))?
                .to_string(),
        ),
    })
}
