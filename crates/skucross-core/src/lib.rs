#![forbid(unsafe_code)]
//! skucross-core: the Dataset model (`RowBatch`), the output allow-list,
//! job configuration, and the deterministic run manifest.
//!
//! This crate does no file I/O of datasets; readers/writers live in
//! `skucross-io` and the join itself lives in `skucross-operators`.

pub mod columns;
pub mod config;
pub mod error;
pub mod hash;
pub mod manifest;
pub mod prelude;
pub mod schema;
pub mod types;

/// Crate version recorded in run manifests.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
