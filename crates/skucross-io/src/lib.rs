#![forbid(unsafe_code)]
//! skucross-io: the file collaborators around the projector.
//!
//! - `readers`: CSV and XLSX → `RowBatch`, dispatched on file extension.
//! - `writers`: `RowBatch` → XLSX (the downloadable output) or CSV.
//! - `preview`: fixed-width text rendering of the first rows.

pub mod error;
pub mod format;
pub mod preview;
pub mod readers;
pub mod writers;

pub use error::{IoError, Result};
pub use format::FileFormat;
pub use preview::render_preview;
pub use readers::{read_dataset, read_dataset_from_bytes};
pub use writers::xlsx::{write_xlsx_to_buffer, write_xlsx_to_path, XLSX_MIME};
