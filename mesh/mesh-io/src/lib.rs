//! Mesh file I/O for resting-pose analysis.
//!
//! Loads models to analyse and saves the rested meshes:
//!
//! - **STL** (Stereolithography) - Binary and ASCII, vertices welded on load
//! - **OBJ** (Wavefront) - ASCII, geometry only
//!
//! # Format Detection
//!
//! ```no_run
//! use mesh_io::{load_mesh, save_mesh};
//!
//! // Format detected from .stl extension
//! let mesh = load_mesh("model.stl").unwrap();
//!
//! // Save to a different format
//! save_mesh(&mesh, "model.obj").unwrap();
//! ```

// Safety: Deny unwrap/expect in library code. Tests may use them (workspace warns).
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod error;
mod obj;
mod stl;
mod weld;

pub use error::{IoError, IoResult};
pub use obj::{load_obj, save_obj};
pub use stl::{load_stl, save_stl};

use std::path::Path;

use mesh_types::IndexedMesh;

/// Supported mesh file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MeshFormat {
    /// STL, binary or ASCII.
    Stl,
    /// Wavefront OBJ.
    Obj,
}

impl MeshFormat {
    /// Detect format from file extension (case-insensitive).
    ///
    /// Returns `None` if the extension is missing or not recognized.
    #[must_use]
    pub fn from_path<P: AsRef<Path>>(path: P) -> Option<Self> {
        let ext = path.as_ref().extension()?.to_str()?.to_lowercase();
        match ext.as_str() {
            "stl" => Some(Self::Stl),
            "obj" => Some(Self::Obj),
            _ => None,
        }
    }

    /// Get the canonical file extension for this format.
    #[must_use]
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::Stl => "stl",
            Self::Obj => "obj",
        }
    }
}

fn detect(path: &Path) -> IoResult<MeshFormat> {
    MeshFormat::from_path(path).ok_or_else(|| IoError::UnknownFormat {
        extension: path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("(none)")
            .to_string(),
    })
}

/// Load a mesh from a file, detecting format from extension.
///
/// # Errors
///
/// Returns an error if the extension is not recognized, the file cannot be
/// read, or its content is invalid for the detected format.
pub fn load_mesh<P: AsRef<Path>>(path: P) -> IoResult<IndexedMesh> {
    let path = path.as_ref();
    match detect(path)? {
        MeshFormat::Stl => load_stl(path),
        MeshFormat::Obj => load_obj(path),
    }
}

/// Save a mesh to a file, detecting format from extension.
///
/// STL output is binary.
///
/// # Errors
///
/// Returns an error if the extension is not recognized or the file cannot
/// be written.
pub fn save_mesh<P: AsRef<Path>>(mesh: &IndexedMesh, path: P) -> IoResult<()> {
    let path = path.as_ref();
    match detect(path)? {
        MeshFormat::Stl => save_stl(mesh, path, true),
        MeshFormat::Obj => save_obj(mesh, path),
    }
}
