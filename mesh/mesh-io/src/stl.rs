//! STL (Stereolithography) file format support.
//!
//! Supports both ASCII and binary STL. Loaded triangles are welded on
//! exact coordinate matches so the returned mesh shares vertices.
//!
//! # Binary Format
//!
//! ```text
//! UINT8[80]    – Header (ignored)
//! UINT32       – Number of triangles
//! foreach triangle
//!     REAL32[3] – Normal vector (ignored, recomputed on save)
//!     REAL32[3] – Vertex 1
//!     REAL32[3] – Vertex 2
//!     REAL32[3] – Vertex 3
//!     UINT16    – Attribute byte count
//! end
//! ```

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Read, Write};
use std::path::Path;

use mesh_types::{IndexedMesh, MeshTopology, Point3, Triangle};

use crate::error::{IoError, IoResult};
use crate::weld::Welder;

/// STL binary header size in bytes.
const HEADER_SIZE: usize = 80;

/// Size of one triangle in binary STL (normal + 3 vertices + attribute).
const TRIANGLE_SIZE: usize = 50;

/// Load a mesh from an STL file.
///
/// Automatically detects ASCII vs binary format.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not valid STL.
///
/// # Example
///
/// ```no_run
/// use mesh_io::load_stl;
///
/// let mesh = load_stl("model.stl").unwrap();
/// println!("Loaded {} faces", mesh.faces.len());
/// ```
pub fn load_stl<P: AsRef<Path>>(path: P) -> IoResult<IndexedMesh> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| IoError::from_open(e, path))?;
    let mut reader = BufReader::new(file);

    let mut header = Vec::with_capacity(HEADER_SIZE + 4);
    reader
        .by_ref()
        .take((HEADER_SIZE + 4) as u64)
        .read_to_end(&mut header)?;

    if header.len() < 6 {
        return Err(IoError::invalid_content("file too small to be valid STL"));
    }

    let header_str = String::from_utf8_lossy(&header[..header.len().min(HEADER_SIZE)]);
    if header_str.trim_start().starts_with("solid") && !looks_binary(&header) {
        // ASCII: parse the header bytes followed by the rest of the stream.
        load_stl_ascii(BufReader::new(header.as_slice().chain(reader)))
    } else {
        load_stl_binary(&header, reader)
    }
}

/// Binary files that start with "solid" usually carry NUL padding.
fn looks_binary(header: &[u8]) -> bool {
    header.len() >= HEADER_SIZE + 4 && header[..HEADER_SIZE].contains(&0)
}

fn load_stl_binary<R: Read>(header: &[u8], mut reader: R) -> IoResult<IndexedMesh> {
    if header.len() < HEADER_SIZE + 4 {
        return Err(IoError::InvalidHeader {
            expected: HEADER_SIZE + 4,
            got: header.len(),
        });
    }

    let face_count = u32::from_le_bytes([
        header[HEADER_SIZE],
        header[HEADER_SIZE + 1],
        header[HEADER_SIZE + 2],
        header[HEADER_SIZE + 3],
    ]);

    let mut welder = Welder::with_capacity(face_count as usize);
    let mut triangle_buf = [0u8; TRIANGLE_SIZE];
    for i in 0..face_count {
        reader
            .read_exact(&mut triangle_buf)
            .map_err(|_| IoError::InvalidFaceCount {
                expected: face_count,
                got: i,
            })?;

        // Skip the stored normal (12 bytes)
        welder.push_triangle(
            read_point(&triangle_buf[12..24]),
            read_point(&triangle_buf[24..36]),
            read_point(&triangle_buf[36..48]),
        );
    }

    Ok(welder.finish())
}

fn read_point(buf: &[u8]) -> Point3<f64> {
    let f = |o: usize| f64::from(f32::from_le_bytes([buf[o], buf[o + 1], buf[o + 2], buf[o + 3]]));
    Point3::new(f(0), f(4), f(8))
}

fn load_stl_ascii<R: BufRead>(reader: R) -> IoResult<IndexedMesh> {
    let mut welder = Welder::default();
    let mut corners: Vec<Point3<f64>> = Vec::with_capacity(3);
    let mut in_loop = false;

    for line in reader.lines() {
        let line = line?;
        let mut parts = line.split_whitespace();
        let Some(keyword) = parts.next() else {
            continue;
        };

        match keyword.to_ascii_lowercase().as_str() {
            "outer" => {
                in_loop = true;
                corners.clear();
            }
            "vertex" if in_loop => {
                let mut coord = || -> IoResult<f64> {
                    parts
                        .next()
                        .ok_or_else(|| IoError::invalid_content("vertex with fewer than 3 coordinates"))?
                        .parse::<f64>()
                        .map_err(IoError::from)
                };
                let p = Point3::new(coord()?, coord()?, coord()?);
                corners.push(p);
            }
            "endloop" => {
                in_loop = false;
                if let [a, b, c] = corners[..] {
                    welder.push_triangle(a, b, c);
                }
            }
            "endsolid" => break,
            _ => {}
        }
    }

    Ok(welder.finish())
}

/// Save a mesh to an STL file.
///
/// # Arguments
///
/// * `mesh` - The mesh to save
/// * `path` - Output file path
/// * `binary` - If true, save as binary STL; if false, save as ASCII
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn save_stl<P: AsRef<Path>>(mesh: &IndexedMesh, path: P, binary: bool) -> IoResult<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);

    if binary {
        write_stl_binary(mesh, &mut writer)?;
    } else {
        write_stl_ascii(mesh, &mut writer)?;
    }
    writer.flush()?;
    Ok(())
}

fn unit_normal(tri: &Triangle) -> [f64; 3] {
    tri.normal().map_or([0.0; 3], |n| [n.x, n.y, n.z])
}

fn write_stl_binary<W: Write>(mesh: &IndexedMesh, writer: &mut W) -> IoResult<()> {
    let mut header = [b' '; HEADER_SIZE];
    let text = b"Binary STL resting pose export";
    header[..text.len()].copy_from_slice(text);
    writer.write_all(&header)?;

    #[allow(clippy::cast_possible_truncation)]
    // Face count: mesh faces limited to u32 range by design
    let face_count = mesh.triangles().count() as u32;
    writer.write_all(&face_count.to_le_bytes())?;

    for tri in mesh.triangles() {
        let n = unit_normal(&tri);
        for value in n
            .into_iter()
            .chain([tri.v0, tri.v1, tri.v2].into_iter().flat_map(|p| [p.x, p.y, p.z]))
        {
            #[allow(clippy::cast_possible_truncation)]
            // Truncation: STL stores f32
            writer.write_all(&(value as f32).to_le_bytes())?;
        }
        writer.write_all(&0u16.to_le_bytes())?;
    }

    Ok(())
}

fn write_stl_ascii<W: Write>(mesh: &IndexedMesh, writer: &mut W) -> IoResult<()> {
    writeln!(writer, "solid mesh")?;

    for tri in mesh.triangles() {
        let [nx, ny, nz] = unit_normal(&tri);
        writeln!(writer, "  facet normal {nx:.6e} {ny:.6e} {nz:.6e}")?;
        writeln!(writer, "    outer loop")?;
        for p in [tri.v0, tri.v1, tri.v2] {
            writeln!(writer, "      vertex {:.6e} {:.6e} {:.6e}", p.x, p.y, p.z)?;
        }
        writeln!(writer, "    endloop")?;
        writeln!(writer, "  endfacet")?;
    }

    writeln!(writer, "endsolid mesh")?;
    Ok(())
}
