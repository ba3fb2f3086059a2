//! Stable resting orientations for batches of mesh files.
//!
//! For every model the tool finds the faces it can lie on without tipping
//! and writes one mesh per orientation, already resting on `z = 0`, into a
//! folder named after the model:
//!
//! ```text
//! stable-poses models/                 # every .stl/.obj in the directory
//! stable-poses chair.obj -o out --format stl
//! stable-poses parts/ --params tuned.json --jobs 4 -v
//! ```

mod batch;
mod export;
mod params;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use mesh_io::MeshFormat;
use owo_colors::OwoColorize;
use tracing_subscriber::EnvFilter;

use crate::batch::{collect_inputs, run_batch, BatchOptions};
use crate::params::Tuning;

/// Find the physically sound resting orientations of rigid objects.
#[derive(Parser)]
#[command(name = "stable-poses")]
#[command(version, long_about = None)]
struct Cli {
    /// Model files or directories of models (.stl, .obj)
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Root folder for output; defaults to each model's own folder
    #[arg(short, long, value_name = "DIR")]
    output: Option<PathBuf>,

    /// File format of the written orientations
    #[arg(long, value_enum, default_value_t = ExportFormat::Obj)]
    format: ExportFormat,

    /// Report orientations without writing any files
    #[arg(long)]
    dry_run: bool,

    /// Number of models processed in parallel (all cores by default)
    #[arg(short, long)]
    jobs: Option<usize>,

    /// More log output (-v debug, -vv trace); RUST_LOG overrides
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(flatten)]
    tuning: Tuning,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ExportFormat {
    Obj,
    Stl,
}

impl From<ExportFormat> for MeshFormat {
    fn from(format: ExportFormat) -> Self {
        match format {
            ExportFormat::Obj => Self::Obj,
            ExportFormat::Stl => Self::Stl,
        }
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let options = BatchOptions {
        params: cli.tuning.resolve()?,
        output: cli.output,
        format: cli.format.into(),
        dry_run: cli.dry_run,
    };
    let models = collect_inputs(&cli.inputs)?;
    if models.is_empty() {
        println!("{}", "No .stl or .obj files found".yellow());
        return Ok(ExitCode::SUCCESS);
    }

    let results = run_batch(&models, &options, cli.jobs)?;

    println!();
    let mut failed = 0_usize;
    for (path, outcome) in &results {
        match outcome {
            Ok(outcome) => {
                println!("{} {}: {}", "✓".green(), path.display(), outcome.summary);
                if let Some(first) = outcome.written.first().and_then(|p| p.parent()) {
                    println!("    {} files in {}", outcome.written.len(), first.display());
                }
            }
            Err(err) => {
                failed += 1;
                println!("{} {}: {err:#}", "✗".red(), path.display());
            }
        }
    }

    let orientations: usize = results
        .iter()
        .filter_map(|(_, outcome)| outcome.as_ref().ok())
        .map(|outcome| outcome.orientations)
        .sum();
    println!();
    println!(
        "{} models, {} orientations, {} failed",
        results.len().bold(),
        orientations.bold(),
        if failed > 0 {
            failed.red().to_string()
        } else {
            failed.green().to_string()
        }
    );

    Ok(if failed > 0 {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}
