//! Runtime: execute one cross-join request and emit a `RunManifest`.
//!
//! - Reads the shop and SKU inputs (CSV or XLSX).
//! - Runs the `CrossJoinProjector` with the configured strategy.
//! - Writes the result next to its destination and renames it into place,
//!   so a failed request never leaves a partial output file.

use std::io::Write;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use thiserror::Error;
use tracing::{error, info};

use skucross_core::config::{JobConfig, StrategyKind};
use skucross_core::hash::{hash_batch, hash_serde};
use skucross_core::manifest::RunManifest;
use skucross_core::types::RowBatch;

use skucross_io::writers::{csv as csv_writer, xlsx as xlsx_writer};
use skucross_io::{read_dataset, read_dataset_from_bytes, render_preview, FileFormat, IoError};

use skucross_operators::{CrossJoinProjector, OpError, OpPlan, Projection};

use crate::metrics;
use crate::upload::{Download, Upload};

#[derive(Debug, Error)]
pub enum ExecError {
    #[error("{0}")]
    Config(String),
    #[error("{0}")]
    Input(IoError),
    #[error("{0}")]
    Project(#[from] OpError),
    #[error("{0}")]
    Output(IoError),
    /// Hashing or serializing run metadata failed.
    #[error("{0}")]
    Hash(String),
}

impl ExecError {
    /// The single message shown to the user for any failed request.
    pub fn user_message(&self) -> String {
        format!("Error: {}", self)
    }
}

/// Projection plus the manifest describing it.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub projection: Projection,
    pub manifest: RunManifest,
}

impl RunOutcome {
    pub fn preview(&self, limit: usize) -> String {
        render_preview(&self.projection.batch, limit)
    }

    /// Manifest as pretty-printed JSON.
    pub fn manifest_json(&self) -> Result<String, ExecError> {
        serde_json::to_string_pretty(&self.manifest).map_err(|e| ExecError::Hash(e.to_string()))
    }
}

/// Engine owns the validated job configuration. It holds no state between
/// requests.
pub struct Engine {
    cfg: JobConfig,
    projector: CrossJoinProjector,
}

impl Engine {
    pub fn new(cfg: JobConfig) -> Result<Self, ExecError> {
        cfg.validate().map_err(|e| ExecError::Config(e.to_string()))?;
        let projector = CrossJoinProjector::from_config(&cfg);
        Ok(Self { cfg, projector })
    }

    pub fn config(&self) -> &JobConfig {
        &self.cfg
    }

    /// Read both files, project, and write the result to `out_path`
    /// (`.xlsx` or `.csv`).
    pub fn run_files(
        &self,
        shop_path: &Path,
        sku_path: &Path,
        out_path: &Path,
    ) -> Result<RunOutcome, ExecError> {
        let out_format = FileFormat::from_path(out_path).map_err(ExecError::Output)?;
        let outcome = self.preview_files(shop_path, sku_path)?;
        write_atomically(&outcome.projection.batch, out_format, out_path)
            .map_err(ExecError::Output)
            .inspect_err(|e| error!(path = %out_path.display(), "write failed: {}", e))?;
        info!(path = %out_path.display(), "output written");
        Ok(outcome)
    }

    /// Read both files and project, without writing anything.
    pub fn preview_files(&self, shop_path: &Path, sku_path: &Path) -> Result<RunOutcome, ExecError> {
        let shop = read_dataset(shop_path).map_err(ExecError::Input)?;
        let sku = read_dataset(sku_path).map_err(ExecError::Input)?;
        self.execute(&shop, &sku)
    }

    /// Report the output columns, missing columns and strategy for two files.
    pub fn explain_files(
        &self,
        shop_path: &Path,
        sku_path: &Path,
    ) -> Result<(OpPlan, StrategyKind), ExecError> {
        let shop = read_dataset(shop_path).map_err(ExecError::Input)?;
        let sku = read_dataset(sku_path).map_err(ExecError::Input)?;
        Ok(self.projector.explain(&shop, &sku)?)
    }

    /// Upload-in, download-out variant: the spreadsheet comes back as bytes
    /// named after the configured output file.
    pub fn run_uploads(
        &self,
        shop: &Upload,
        sku: &Upload,
    ) -> Result<(Download, RunOutcome), ExecError> {
        let shop_batch =
            read_dataset_from_bytes(&shop.file_name, &shop.bytes).map_err(ExecError::Input)?;
        let sku_batch =
            read_dataset_from_bytes(&sku.file_name, &sku.bytes).map_err(ExecError::Input)?;
        let outcome = self.execute(&shop_batch, &sku_batch)?;
        let bytes = xlsx_writer::write_xlsx_to_buffer(&outcome.projection.batch)
            .map_err(ExecError::Output)?;
        let download = Download {
            file_name: self.cfg.output_file_name.clone(),
            mime: xlsx_writer::XLSX_MIME.to_string(),
            bytes,
        };
        Ok((download, outcome))
    }

    /// Project two in-memory datasets and build the manifest.
    pub fn execute(&self, shop: &RowBatch, sku: &RowBatch) -> Result<RunOutcome, ExecError> {
        let started_ms = now_ms();
        let config_hash = hash_serde(&self.cfg).map_err(|e| ExecError::Hash(e.to_string()))?;
        info!(
            shop_rows = shop.num_rows(),
            sku_rows = sku.num_rows(),
            "cross join started"
        );

        let projection = self.projector.project(shop, sku)?;

        let mut manifest = RunManifest::new(config_hash, started_ms);
        manifest.strategy = projection.strategy;
        manifest.shop_rows = shop.num_rows();
        manifest.sku_rows = sku.num_rows();
        manifest.output_rows = projection.batch.num_rows();
        manifest.columns = projection
            .batch
            .column_names()
            .into_iter()
            .map(str::to_string)
            .collect();
        manifest.missing_columns = projection.missing_columns.clone();
        let manifest = manifest.finish(now_ms(), Some(hash_batch(&projection.batch)));
        metrics::emit_run(&manifest);

        Ok(RunOutcome {
            projection,
            manifest,
        })
    }
}

fn write_atomically(batch: &RowBatch, format: FileFormat, out_path: &Path) -> Result<(), IoError> {
    let dir = match out_path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut tmp = tempfile::Builder::new()
        .prefix(".skucross-")
        .suffix(&format!(".{}", format.extension()))
        .tempfile_in(dir)?;
    match format {
        FileFormat::Xlsx => {
            let bytes = xlsx_writer::write_xlsx_to_buffer(batch)?;
            tmp.write_all(&bytes)?;
        }
        FileFormat::Csv => csv_writer::write_csv(batch, tmp.as_file_mut())?,
    }
    tmp.as_file().sync_all()?;
    tmp.persist(out_path).map_err(|e| IoError::Io(e.error))?;
    Ok(())
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
