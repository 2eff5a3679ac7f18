//! Readers that load a whole input file into one `RowBatch`.
//!
//! Both formats share header normalization and the missing-value markers a
//! dataframe loader would treat as null.

pub mod csv;
pub mod infer;
pub mod xlsx;

use std::collections::HashMap;
use std::fs::File;
use std::io::Cursor;
use std::path::Path;

use skucross_core::types::RowBatch;
use tracing::debug;

use crate::error::{IoError, Result};
use crate::format::FileFormat;

/// Read a dataset from disk, choosing the reader from the extension.
pub fn read_dataset(path: &Path) -> Result<RowBatch> {
    let format = FileFormat::from_path(path)?;
    let file = File::open(path)
        .map_err(|e| IoError::InputRead(format!("{}: {}", path.display(), e)))?;
    let batch = match format {
        FileFormat::Csv => csv::CsvReader::from_reader(file).read_all()?,
        FileFormat::Xlsx => xlsx::read_xlsx(std::io::BufReader::new(file))?,
    };
    debug!(
        path = %path.display(),
        rows = batch.num_rows(),
        columns = batch.num_columns(),
        "dataset loaded"
    );
    Ok(batch)
}

/// Read an uploaded file held in memory. `file_name` only selects the format.
pub fn read_dataset_from_bytes(file_name: &str, bytes: &[u8]) -> Result<RowBatch> {
    match FileFormat::from_path(file_name)? {
        FileFormat::Csv => csv::CsvReader::from_reader(bytes).read_all(),
        FileFormat::Xlsx => xlsx::read_xlsx(Cursor::new(bytes)),
    }
}

/// Strip a leading BOM, give empty headers a positional name and suffix
/// repeats (`a`, `a.1`, ...). Surrounding whitespace is kept, so `" SOS "`
/// does not match `SOS`.
pub(crate) fn normalize_headers(raw: Vec<String>) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    let mut out = Vec::with_capacity(raw.len());
    for (i, name) in raw.into_iter().enumerate() {
        let name = name.trim_start_matches('\u{feff}').to_string();
        let base = if name.is_empty() {
            format!("Unnamed: {}", i)
        } else {
            name
        };
        let mut candidate = base.clone();
        if let Some(&last) = seen.get(&base) {
            let mut n = last;
            loop {
                n += 1;
                candidate = format!("{}.{}", base, n);
                if !seen.contains_key(&candidate) {
                    break;
                }
            }
            seen.insert(base, n);
        }
        seen.insert(candidate.clone(), 0);
        out.push(candidate);
    }
    out
}
