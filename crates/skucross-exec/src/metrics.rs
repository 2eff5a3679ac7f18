//! Run metrics as structured log events.

use skucross_core::manifest::RunManifest;
use tracing::info;

pub fn emit_run(manifest: &RunManifest) {
    info!(
        run_id = %manifest.id.0,
        strategy = manifest.strategy.as_str(),
        shop_rows = manifest.shop_rows,
        sku_rows = manifest.sku_rows,
        output_rows = manifest.output_rows,
        columns = manifest.columns.len(),
        missing = manifest.missing_columns.len(),
        duration_ms = manifest.duration_ms(),
        "cross join completed"
    );
}
