//! Wavefront OBJ support (geometry only).
//!
//! Reads `v` and `f` records; texture and normal references in face
//! corners (`f 1/2/3`) are ignored, polygons are fan-triangulated and
//! negative (relative) indices are resolved. Everything else is skipped.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use mesh_types::{IndexedMesh, Vertex};

use crate::error::{IoError, IoResult};

/// Load a mesh from an OBJ file.
///
/// # Errors
///
/// Returns an error if the file cannot be read, a number fails to parse,
/// or a face references an undefined vertex.
pub fn load_obj<P: AsRef<Path>>(path: P) -> IoResult<IndexedMesh> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| IoError::from_open(e, path))?;
    read_obj(BufReader::new(file))
}

fn read_obj<R: BufRead>(reader: R) -> IoResult<IndexedMesh> {
    let mut mesh = IndexedMesh::new();
    let mut polygon: Vec<u32> = Vec::with_capacity(4);

    for (line_no, line) in reader.lines().enumerate() {
        let line = line?;
        let mut parts = line.split_whitespace();

        match parts.next() {
            Some("v") => {
                let coords = parts
                    .take(3)
                    .map(str::parse::<f64>)
                    .collect::<Result<Vec<_>, _>>()?;
                let [x, y, z] = coords[..] else {
                    return Err(IoError::invalid_content(format!(
                        "vertex on line {} has fewer than 3 coordinates",
                        line_no + 1
                    )));
                };
                mesh.vertices.push(Vertex::from_coords(x, y, z));
            }
            Some("f") => {
                polygon.clear();
                for corner in parts {
                    polygon.push(resolve_index(corner, mesh.vertices.len(), line_no + 1)?);
                }
                for i in 1..polygon.len().saturating_sub(1) {
                    mesh.faces.push([polygon[0], polygon[i], polygon[i + 1]]);
                }
            }
            _ => {}
        }
    }

    Ok(mesh)
}

/// Resolve a face corner (`7`, `7/1`, `7//3`, `-1`) to a zero-based index.
#[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap, clippy::cast_sign_loss)]
// Index arithmetic is range-checked against `count` before narrowing
fn resolve_index(corner: &str, count: usize, line: usize) -> IoResult<u32> {
    let raw: i64 = corner.split('/').next().unwrap_or(corner).parse()?;
    let resolved = if raw < 0 { count as i64 + raw } else { raw - 1 };

    if raw == 0 || resolved < 0 || resolved >= count as i64 {
        return Err(IoError::VertexIndexOutOfRange {
            line,
            index: raw,
            count,
        });
    }
    Ok(resolved as u32)
}

/// Save a mesh as OBJ.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
///
/// # Example
///
/// ```no_run
/// use mesh_io::save_obj;
/// use mesh_types::unit_cube;
///
/// save_obj(&unit_cube(), "cube.obj").unwrap();
/// ```
pub fn save_obj<P: AsRef<Path>>(mesh: &IndexedMesh, path: P) -> IoResult<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    write_obj(mesh, &mut writer)?;
    writer.flush()?;
    Ok(())
}

fn write_obj<W: Write>(mesh: &IndexedMesh, writer: &mut W) -> IoResult<()> {
    writeln!(
        writer,
        "# {} vertices, {} faces",
        mesh.vertices.len(),
        mesh.faces.len()
    )?;
    for v in &mesh.vertices {
        let p = v.position;
        writeln!(writer, "v {} {} {}", p.x, p.y, p.z)?;
    }
    for &[a, b, c] in &mesh.faces {
        writeln!(writer, "f {} {} {}", a + 1, b + 1, c + 1)?;
    }
    Ok(())
}
