//! skucross CLI: cross-join a shop list with a SKU master and write a spreadsheet.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use skucross_core::columns::OUTPUT_FILE_NAME;
use skucross_core::config::{JobConfig, JobFile, StrategyKind};
use skucross_exec::{Engine, ExecError};
use tracing::debug;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "skucross")]
#[command(about = "Pair every shop with every SKU and keep the allow-listed columns", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the cross join and write it to a spreadsheet
    Run {
        #[command(flatten)]
        inputs: Inputs,

        /// Output file (.xlsx or .csv)
        #[arg(short, long, default_value = OUTPUT_FILE_NAME)]
        out: PathBuf,

        /// Also write the run manifest as JSON
        #[arg(long)]
        manifest: Option<PathBuf>,

        #[command(flatten)]
        job: JobArgs,
    },

    /// Print the first rows of the cross join without writing a file
    Preview {
        #[command(flatten)]
        inputs: Inputs,

        #[command(flatten)]
        job: JobArgs,
    },

    /// Show output columns, missing columns and the chosen strategy (EXPLAIN)
    Plan {
        #[command(flatten)]
        inputs: Inputs,

        #[command(flatten)]
        job: JobArgs,
    },

    /// List the effective allow-list, in output order
    Columns {
        #[command(flatten)]
        job: JobArgs,
    },
}

#[derive(Args)]
struct Inputs {
    /// Shop dataset (.csv or .xlsx); must carry the key column
    #[arg(long)]
    shop: PathBuf,

    /// SKU master dataset (.csv or .xlsx)
    #[arg(long)]
    sku: PathBuf,
}

#[derive(Args, Default)]
struct JobArgs {
    /// YAML job file (overrides environment)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Execution strategy: memory, sqlite or auto
    #[arg(long)]
    strategy: Option<StrategyKind>,

    /// Directory for the relational store's temporary database
    #[arg(long)]
    store_dir: Option<String>,

    /// Estimated output bytes above which `auto` uses the store
    #[arg(long)]
    store_threshold_bytes: Option<u64>,

    /// Key column name
    #[arg(long)]
    key_column: Option<String>,

    /// Comma-separated allow-list replacing the default one
    #[arg(long, value_delimiter = ',')]
    columns: Option<Vec<String>>,

    /// Rows shown in the preview
    #[arg(long)]
    preview_rows: Option<usize>,
}

fn main() {
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Run {
            inputs,
            out,
            manifest,
            job,
        } => run(&inputs, &out, manifest.as_deref(), &job),
        Commands::Preview { inputs, job } => preview(&inputs, &job),
        Commands::Plan { inputs, job } => plan(&inputs, &job),
        Commands::Columns { job } => columns(&job),
    };

    if let Err(err) = result {
        match err.downcast_ref::<ExecError>() {
            Some(e) => eprintln!("{}", e.user_message()),
            None => eprintln!("Error: {:#}", err),
        }
        std::process::exit(1);
    }
}

fn run(
    inputs: &Inputs,
    out: &Path,
    manifest_path: Option<&Path>,
    job: &JobArgs,
) -> anyhow::Result<()> {
    let engine = Engine::new(build_config(job)?)?;
    let outcome = engine.run_files(&inputs.shop, &inputs.sku, out)?;

    println!("{}", outcome.preview(engine.config().preview_rows));
    println!();
    println!("✓ Wrote {} rows to {}", outcome.manifest.output_rows, out.display());
    println!("  Strategy: {}", outcome.manifest.strategy.as_str());
    println!("  Duration: {}ms", outcome.manifest.duration_ms());
    if let Some(digest) = &outcome.manifest.outputs_digest {
        println!("  Output digest: {}", digest);
    }
    if !outcome.manifest.missing_columns.is_empty() {
        println!(
            "  Missing columns: {}",
            outcome.manifest.missing_columns.join(", ")
        );
    }

    if let Some(path) = manifest_path {
        fs::write(path, outcome.manifest_json()?)
            .with_context(|| format!("writing manifest to {}", path.display()))?;
    }
    Ok(())
}

fn preview(inputs: &Inputs, job: &JobArgs) -> anyhow::Result<()> {
    let engine = Engine::new(build_config(job)?)?;
    let outcome = engine.preview_files(&inputs.shop, &inputs.sku)?;
    println!("{}", outcome.preview(engine.config().preview_rows));
    Ok(())
}

fn plan(inputs: &Inputs, job: &JobArgs) -> anyhow::Result<()> {
    let engine = Engine::new(build_config(job)?)?;
    let (op_plan, strategy) = engine.explain_files(&inputs.shop, &inputs.sku)?;

    println!("Cross Join Plan");
    println!("===============");
    println!();
    println!("Strategy: {}", strategy.as_str());
    println!("Sort key: {}", op_plan.sort_keys.join(", "));
    println!(
        "Estimated bytes/row: {} (+{} overhead)",
        op_plan.footprint.bytes_per_row, op_plan.footprint.overhead_bytes
    );
    println!();
    println!("Output columns:");
    for (i, field) in op_plan.output_schema.fields.iter().enumerate() {
        println!("  {}. {} ({:?})", i + 1, field.name, field.data_type);
    }
    if !op_plan.missing_columns.is_empty() {
        println!();
        println!("Missing columns (omitted):");
        for name in &op_plan.missing_columns {
            println!("  - {}", name);
        }
    }
    Ok(())
}

fn columns(job: &JobArgs) -> anyhow::Result<()> {
    let cfg = build_config(job)?;
    cfg.validate()?;
    for name in &cfg.allowed_columns {
        println!("{}", name);
    }
    Ok(())
}

/// Environment, then the job file, then flags.
fn build_config(job: &JobArgs) -> anyhow::Result<JobConfig> {
    let mut cfg = JobConfig::from_env();
    if let Some(path) = &job.config {
        let file = JobFile::load(path)?;
        cfg.apply_file(&file);
        debug!(path = %path.display(), "job file applied");
    }
    apply_flags(&mut cfg, job);
    Ok(cfg)
}

fn apply_flags(cfg: &mut JobConfig, job: &JobArgs) {
    if let Some(strategy) = job.strategy {
        cfg.strategy = strategy;
    }
    if let Some(dir) = &job.store_dir {
        cfg.store_dir = Some(dir.clone());
    }
    if let Some(threshold) = job.store_threshold_bytes {
        cfg.store_threshold_bytes = threshold;
    }
    if let Some(key) = &job.key_column {
        cfg.key_column = key.clone();
    }
    if let Some(cols) = &job.columns {
        cfg.allowed_columns = cols
            .iter()
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .collect();
    }
    if let Some(rows) = job.preview_rows {
        cfg.preview_rows = rows;
    }
}
