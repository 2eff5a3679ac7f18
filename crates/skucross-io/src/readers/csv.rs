//! CSV reader: header row plus per-column type inference.
//!
//! Records shorter than the header are padded with empty cells (read as
//! null); records longer than the header are an input error.

use std::io::Read;

use skucross_core::types::RowBatch;

use super::infer::infer_column;
use super::normalize_headers;
use crate::error::{IoError, Result};

pub struct CsvReader<R: Read> {
    inner: csv::Reader<R>,
}

impl<R: Read> CsvReader<R> {
    pub fn from_reader(reader: R) -> Self {
        let inner = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);
        Self { inner }
    }

    /// Consume the input and return it as one batch.
    pub fn read_all(&mut self) -> Result<RowBatch> {
        let headers = self.inner.headers().map_err(read_err)?.clone();
        if headers.is_empty() {
            return Err(IoError::InputRead("no columns to parse from file".into()));
        }
        let names = normalize_headers(headers.iter().map(str::to_string).collect());

        let mut raw: Vec<Vec<String>> = vec![Vec::new(); names.len()];
        for record in self.inner.records() {
            let record = record.map_err(read_err)?;
            if record.len() > names.len() {
                let line = record.position().map(|p| p.line()).unwrap_or(0);
                return Err(IoError::InputRead(format!(
                    "expected {} fields in line {}, saw {}",
                    names.len(),
                    line,
                    record.len()
                )));
            }
            for (i, cells) in raw.iter_mut().enumerate() {
                cells.push(record.get(i).unwrap_or("").to_string());
            }
        }

        let columns = names
            .into_iter()
            .zip(raw)
            .map(|(name, cells)| infer_column(name, cells))
            .collect();
        RowBatch::new(columns).map_err(|e| IoError::InputRead(e.to_string()))
    }
}

fn read_err(e: csv::Error) -> IoError {
    IoError::InputRead(e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use skucross_core::types::Scalar;

    #[test]
    fn reads_typed_columns() {
        let data = "Shop_Id,Region,Perfect_Store_Threshold\n2,North,0.8\n1,,0.75\n";
        let batch = CsvReader::from_reader(data.as_bytes()).read_all().unwrap();
        assert_eq!(
            batch.column_names(),
            vec!["Shop_Id", "Region", "Perfect_Store_Threshold"]
        );
        assert_eq!(batch.columns[0].values, vec![Scalar::I64(2), Scalar::I64(1)]);
        assert_eq!(
            batch.columns[1].values,
            vec![Scalar::Str("North".into()), Scalar::Null]
        );
        assert_eq!(
            batch.columns[2].values,
            vec![Scalar::F64(0.8), Scalar::F64(0.75)]
        );
    }

    #[test]
    fn quoted_fields_keep_commas() {
        let data = "SKU_Name,SOS\n\"Cola, 1L\",3\n";
        let batch = CsvReader::from_reader(data.as_bytes()).read_all().unwrap();
        assert_eq!(batch.columns[0].values, vec![Scalar::Str("Cola, 1L".into())]);
    }

    #[test]
    fn header_only_file_has_zero_rows() {
        let batch = CsvReader::from_reader("Shop_Id,Name\n".as_bytes())
            .read_all()
            .unwrap();
        assert_eq!(batch.num_rows(), 0);
        assert_eq!(batch.num_columns(), 2);
    }

    #[test]
    fn short_rows_are_padded() {
        let batch = CsvReader::from_reader("a,b,c\n1,2,x\n3\n".as_bytes())
            .read_all()
            .unwrap();
        assert_eq!(batch.columns[0].values, vec![Scalar::I64(1), Scalar::I64(3)]);
        assert_eq!(batch.columns[1].values, vec![Scalar::I64(2), Scalar::Null]);
        assert_eq!(batch.columns[2].values, vec![Scalar::Str("x".into()), Scalar::Null]);
    }

    #[test]
    fn long_rows_fail() {
        let err = CsvReader::from_reader("a,b\n1,2\n3,4,5\n".as_bytes())
            .read_all()
            .unwrap_err();
        match err {
            IoError::InputRead(msg) => assert_eq!(msg, "expected 2 fields in line 3, saw 3"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn empty_input_fails() {
        let err = CsvReader::from_reader("".as_bytes()).read_all().unwrap_err();
        assert!(matches!(err, IoError::InputRead(_)));
    }
}
