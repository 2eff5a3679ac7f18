//! CSV writer.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use skucross_core::types::RowBatch;

use crate::error::{IoError, Result};

pub fn write_csv<W: Write>(batch: &RowBatch, writer: W) -> Result<()> {
    let mut w = csv::Writer::from_writer(writer);
    w.write_record(batch.column_names()).map_err(write_err)?;
    let mut record: Vec<String> = Vec::with_capacity(batch.num_columns());
    for r in 0..batch.num_rows() {
        record.clear();
        record.extend(batch.columns.iter().map(|c| c.values[r].to_string()));
        w.write_record(&record).map_err(write_err)?;
    }
    w.flush()?;
    Ok(())
}

pub fn write_csv_to_path(batch: &RowBatch, path: &Path) -> Result<()> {
    let f = File::create(path)?;
    write_csv(batch, f)
}

fn write_err(e: csv::Error) -> IoError {
    IoError::Write(e.to_string())
}
