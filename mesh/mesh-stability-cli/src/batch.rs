//! Batch processing of model files.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use mesh_io::{load_mesh, MeshFormat};
use mesh_stability::{find_stable_orientations, StabilityParams};
use mesh_types::MeshTopology;
use rayon::prelude::*;
use tracing::{error, info, info_span};

use crate::export::{output_dir, OrientationWriter};

/// Settings shared by every model of a batch.
#[derive(Debug, Clone)]
pub struct BatchOptions {
    pub params: StabilityParams,
    /// Root for per-model output folders; next to each model when `None`.
    pub output: Option<PathBuf>,
    pub format: MeshFormat,
    /// Skip writing meshes, only report.
    pub dry_run: bool,
}

/// What happened to one model.
#[derive(Debug, Clone)]
pub struct ModelOutcome {
    pub orientations: usize,
    pub written: Vec<PathBuf>,
    pub summary: String,
}

/// Expand directories into the mesh files they contain.
///
/// Directory entries are sorted by name; files with unsupported extensions
/// inside directories are skipped, explicitly named files are kept as-is.
pub fn collect_inputs(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut models = Vec::new();
    for path in paths {
        if path.is_dir() {
            let mut entries: Vec<PathBuf> = fs::read_dir(path)
                .with_context(|| format!("failed to list {}", path.display()))?
                .filter_map(|entry| entry.ok().map(|e| e.path()))
                .filter(|p| p.is_file() && MeshFormat::from_path(p).is_some())
                .collect();
            entries.sort();
            models.extend(entries);
        } else if path.exists() {
            models.push(path.clone());
        } else {
            bail!("input not found: {}", path.display());
        }
    }
    Ok(models)
}

/// Find and export the resting orientations of one model.
pub fn process_model(path: &Path, options: &BatchOptions) -> Result<ModelOutcome> {
    let _span = info_span!("model", path = %path.display()).entered();

    let mesh = load_mesh(path).with_context(|| format!("failed to load {}", path.display()))?;
    info!(
        vertices = mesh.vertex_count(),
        faces = mesh.face_count(),
        "Loaded model"
    );

    let report = find_stable_orientations(&mesh, &options.params)
        .with_context(|| format!("failed to analyse {}", path.display()))?;

    let mut written = Vec::new();
    if !options.dry_run {
        let mut writer = OrientationWriter::new(
            output_dir(path, options.output.as_deref())?,
            options.format,
        );
        for orientation in &report.orientations {
            written.push(writer.write(&mesh, orientation)?);
        }
    }

    Ok(ModelOutcome {
        orientations: report.orientations.len(),
        written,
        summary: report.summary(),
    })
}

/// Process every model, continuing past failures.
///
/// Results come back in input order. With `jobs` of `Some(1)` models are
/// processed one after another; otherwise on a rayon pool of `jobs` threads
/// (all cores when `None`).
pub fn run_batch(
    models: &[PathBuf],
    options: &BatchOptions,
    jobs: Option<usize>,
) -> Result<Vec<(PathBuf, Result<ModelOutcome>)>> {
    let run = |path: &PathBuf| {
        let outcome = process_model(path, options);
        if let Err(err) = &outcome {
            error!(path = %path.display(), "{err:#}");
        }
        (path.clone(), outcome)
    };

    if jobs == Some(1) {
        return Ok(models.iter().map(run).collect());
    }

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(jobs.unwrap_or(0))
        .build()
        .context("failed to start worker pool")?;
    Ok(pool.install(|| models.par_iter().map(run).collect()))
}
