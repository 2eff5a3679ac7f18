//! Input format detection by file extension.

use std::path::Path;

use crate::error::{IoError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Csv,
    Xlsx,
}

impl FileFormat {
    /// Classify a file name or path. Only `.csv` and `.xlsx` are accepted.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        match ext.as_deref() {
            Some("csv") => Ok(FileFormat::Csv),
            Some("xlsx") => Ok(FileFormat::Xlsx),
            _ => Err(IoError::UnsupportedFileType(path.display().to_string())),
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            FileFormat::Csv => "csv",
            FileFormat::Xlsx => "xlsx",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_by_extension() {
        assert_eq!(FileFormat::from_path("shops.csv").unwrap(), FileFormat::Csv);
        assert_eq!(
            FileFormat::from_path("/data/SKU_Master.XLSX").unwrap(),
            FileFormat::Xlsx
        );
    }

    #[test]
    fn rejects_other_types() {
        for name in ["sku.xls", "sku.json", "sku", "csv"] {
            let err = FileFormat::from_path(name).unwrap_err();
            assert!(matches!(err, IoError::UnsupportedFileType(_)), "{name}");
        }
    }
}
