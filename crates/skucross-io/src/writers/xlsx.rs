//! Spreadsheet writer for the downloadable output.
//!
//! Layout matches a dataframe export without index: one worksheet, a bold
//! header row, then one row per dataset row.

use std::path::Path;

use rust_xlsxwriter::{Format, Workbook};
use skucross_core::types::{RowBatch, Scalar};

use crate::error::{IoError, Result};

pub const XLSX_MIME: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Rows per worksheet, header included.
pub const MAX_SHEET_ROWS: usize = 1_048_576;
pub const MAX_SHEET_COLUMNS: usize = 16_384;

const SHEET_NAME: &str = "Sheet1";

pub fn write_xlsx_to_buffer(batch: &RowBatch) -> Result<Vec<u8>> {
    let mut workbook = build_workbook(batch)?;
    Ok(workbook.save_to_buffer()?)
}

pub fn write_xlsx_to_path(batch: &RowBatch, path: &Path) -> Result<()> {
    let mut workbook = build_workbook(batch)?;
    workbook.save(path)?;
    Ok(())
}

fn build_workbook(batch: &RowBatch) -> Result<Workbook> {
    if batch.num_rows() + 1 > MAX_SHEET_ROWS {
        return Err(IoError::Write(format!(
            "{} rows exceed the worksheet limit of {}",
            batch.num_rows(),
            MAX_SHEET_ROWS - 1
        )));
    }
    if batch.num_columns() > MAX_SHEET_COLUMNS {
        return Err(IoError::Write(format!(
            "{} columns exceed the worksheet limit of {}",
            batch.num_columns(),
            MAX_SHEET_COLUMNS
        )));
    }

    let mut workbook = Workbook::new();
    let header = Format::new().set_bold();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(SHEET_NAME)?;

    for (ci, column) in batch.columns.iter().enumerate() {
        // Bounds checked above.
        let col = ci as u16;
        worksheet.write_string_with_format(0, col, &column.name, &header)?;
        for (ri, value) in column.values.iter().enumerate() {
            let row = (ri + 1) as u32;
            match value {
                Scalar::Null => {}
                Scalar::Bool(b) => {
                    worksheet.write_boolean(row, col, *b)?;
                }
                Scalar::I64(i) => {
                    worksheet.write_number(row, col, *i as f64)?;
                }
                Scalar::F64(f) => {
                    worksheet.write_number(row, col, *f)?;
                }
                Scalar::Str(s) => {
                    worksheet.write_string(row, col, s)?;
                }
            }
        }
    }

    Ok(workbook)
}
