//! Writing rested meshes to disk.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use mesh_io::{save_mesh, MeshFormat};
use mesh_stability::Orientation;
use mesh_types::IndexedMesh;
use tracing::debug;

/// Folder receiving the orientations of `model`: a directory named after
/// the model's file stem, under `root` or next to the model.
pub fn output_dir(model: &Path, root: Option<&Path>) -> Result<PathBuf> {
    let stem = model
        .file_stem()
        .with_context(|| format!("model path has no file name: {}", model.display()))?;
    let parent = root.unwrap_or_else(|| model.parent().unwrap_or_else(|| Path::new(".")));
    Ok(parent.join(stem))
}

/// Writes `orientation_<n>` files for one model.
///
/// The target directory is only created when the first orientation is
/// written, so models without orientations leave nothing behind.
#[derive(Debug)]
pub struct OrientationWriter {
    dir: PathBuf,
    format: MeshFormat,
    created: bool,
}

impl OrientationWriter {
    pub const fn new(dir: PathBuf, format: MeshFormat) -> Self {
        Self {
            dir,
            format,
            created: false,
        }
    }

    /// Path of the file for orientation number `index`.
    pub fn file_path(&self, index: usize) -> PathBuf {
        self.dir
            .join(format!("orientation_{index}.{}", self.format.extension()))
    }

    /// Rest `mesh` as described by `orientation` and save it.
    pub fn write(&mut self, mesh: &IndexedMesh, orientation: &Orientation) -> Result<PathBuf> {
        if !self.created {
            fs::create_dir_all(&self.dir)
                .with_context(|| format!("failed to create {}", self.dir.display()))?;
            self.created = true;
        }

        let path = self.file_path(orientation.index);
        let rested = orientation.pose.apply_to_mesh(mesh);
        save_mesh(&rested, &path).with_context(|| format!("failed to write {}", path.display()))?;

        debug!(path = %path.display(), height = orientation.pose.height(), "Wrote orientation");
        Ok(path)
    }
}
