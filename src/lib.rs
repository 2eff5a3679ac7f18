//! skucross: pair every shop with every SKU, keep the allow-listed columns,
//! and sort by shop.
//!
//! Re-exports the workspace members so callers can depend on one package.

pub use skucross_core::prelude::*;
pub use skucross_exec::{Download, Engine, ExecError, RunOutcome, Upload};
pub use skucross_io::{read_dataset, read_dataset_from_bytes, render_preview, FileFormat, IoError};
pub use skucross_operators::{project_cross_join, CrossJoinProjector, OpError, Projection};
