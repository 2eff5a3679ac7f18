#![forbid(unsafe_code)]
//! skucross-exec: one request = read both inputs, project, write the
//! spreadsheet, emit a `RunManifest`.
//!
//! Nothing is shared between requests; every error ends the request with no
//! output and maps to a single user-facing message.

pub mod metrics;
pub mod runtime;
pub mod upload;

pub use runtime::{Engine, ExecError, RunOutcome};
pub use upload::{Download, Upload};
