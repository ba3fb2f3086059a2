//! Indexed triangle mesh.

use crate::{Aabb, MeshBounds, MeshTopology, Triangle, Vertex};
use hashbrown::HashMap;
use nalgebra::{Point3, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Relative volume below which a closed mesh is treated as flat when
/// computing its center of mass.
const CLOSED_VOLUME_RATIO: f64 = 1e-9;

/// An indexed triangle mesh.
///
/// Vertices and faces are stored separately, with faces referencing
/// vertices by index. Faces use **counter-clockwise (CCW) winding** when
/// viewed from outside.
///
/// # Example
///
/// ```
/// use mesh_types::{IndexedMesh, Vertex, MeshTopology};
///
/// let mut mesh = IndexedMesh::new();
/// mesh.vertices.push(Vertex::from_coords(0.0, 0.0, 0.0));
/// mesh.vertices.push(Vertex::from_coords(1.0, 0.0, 0.0));
/// mesh.vertices.push(Vertex::from_coords(0.0, 1.0, 0.0));
/// mesh.faces.push([0, 1, 2]);
///
/// assert_eq!(mesh.vertex_count(), 3);
/// assert_eq!(mesh.face_count(), 1);
/// ```
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct IndexedMesh {
    /// Vertex data.
    pub vertices: Vec<Vertex>,

    /// Triangle faces as indices into the vertex array.
    pub faces: Vec<[u32; 3]>,
}

impl IndexedMesh {
    /// Create a new empty mesh.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            vertices: Vec::new(),
            faces: Vec::new(),
        }
    }

    /// Create a mesh with pre-allocated capacity.
    #[inline]
    #[must_use]
    pub fn with_capacity(vertex_count: usize, face_count: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(vertex_count),
            faces: Vec::with_capacity(face_count),
        }
    }

    /// Create a mesh from vertices and faces.
    #[inline]
    #[must_use]
    pub const fn from_parts(vertices: Vec<Vertex>, faces: Vec<[u32; 3]>) -> Self {
        Self { vertices, faces }
    }

    /// Create a mesh from flat coordinate and index arrays.
    ///
    /// Returns an empty mesh if either array length is not a multiple of 3.
    ///
    /// # Example
    ///
    /// ```
    /// use mesh_types::{IndexedMesh, MeshTopology};
    ///
    /// let positions = [0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0];
    /// let mesh = IndexedMesh::from_raw(&positions, &[0, 1, 2]);
    /// assert_eq!(mesh.face_count(), 1);
    /// ```
    #[must_use]
    pub fn from_raw(positions: &[f64], indices: &[u32]) -> Self {
        if positions.len() % 3 != 0 || indices.len() % 3 != 0 {
            return Self::new();
        }

        let vertices = positions
            .chunks_exact(3)
            .map(|c| Vertex::from_coords(c[0], c[1], c[2]))
            .collect();

        let faces = indices
            .chunks_exact(3)
            .map(|c| [c[0], c[1], c[2]])
            .collect();

        Self { vertices, faces }
    }

    /// Vertex positions in index order.
    #[must_use]
    pub fn positions(&self) -> Vec<Point3<f64>> {
        self.vertices.iter().map(|v| v.position).collect()
    }

    /// Compute the signed volume of the mesh.
    ///
    /// Positive for a closed mesh with outward (CCW) winding, negative when
    /// inside-out, meaningless for open meshes.
    #[must_use]
    pub fn signed_volume(&self) -> f64 {
        self.triangles()
            .map(|tri| tri.signed_volume_from_origin())
            .sum()
    }

    /// Compute the absolute volume of the mesh.
    #[inline]
    #[must_use]
    pub fn volume(&self) -> f64 {
        self.signed_volume().abs()
    }

    /// Compute the total surface area of the mesh.
    #[must_use]
    pub fn surface_area(&self) -> f64 {
        self.triangles().map(|tri| tri.area()).sum()
    }

    /// Mean of all vertex positions.
    ///
    /// Returns `None` for a mesh without vertices.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn vertex_centroid(&self) -> Option<Point3<f64>> {
        if self.vertices.is_empty() {
            return None;
        }
        let sum: Vector3<f64> = self.vertices.iter().map(|v| v.position.coords).sum();
        Some(Point3::from(sum / self.vertices.len() as f64))
    }

    /// Number of edges used by exactly one face.
    ///
    /// A closed surface has none; each boundary edge borders a hole.
    ///
    /// # Example
    ///
    /// ```
    /// use mesh_types::unit_cube;
    ///
    /// let mut cube = unit_cube();
    /// assert_eq!(cube.boundary_edge_count(), 0);
    /// cube.faces.pop();
    /// assert_eq!(cube.boundary_edge_count(), 3);
    /// ```
    #[must_use]
    pub fn boundary_edge_count(&self) -> usize {
        let mut edge_faces: HashMap<(u32, u32), usize> =
            HashMap::with_capacity(self.faces.len() * 2);
        for face in &self.faces {
            for i in 0..3 {
                let (a, b) = (face[i], face[(i + 1) % 3]);
                if a != b {
                    *edge_faces.entry((a.min(b), a.max(b))).or_default() += 1;
                }
            }
        }
        edge_faces.values().filter(|&&count| count == 1).count()
    }

    /// Center of mass of the solid, assuming uniform density.
    ///
    /// Closed meshes use the volume-weighted centroids of the tetrahedra
    /// each face spans with the vertex centroid. Open meshes, and closed
    /// ones whose enclosed volume vanishes, use the area-weighted centroid
    /// of the surface; fully degenerate faces fall back to the vertex
    /// centroid.
    ///
    /// Returns `None` for a mesh without vertices.
    ///
    /// # Example
    ///
    /// ```
    /// use mesh_types::cuboid;
    ///
    /// let slab = cuboid(4.0, 2.0, 1.0);
    /// let com = slab.center_of_mass().unwrap();
    /// assert!((com.x - 2.0).abs() < 1e-10);
    /// assert!((com.y - 1.0).abs() < 1e-10);
    /// assert!((com.z - 0.5).abs() < 1e-10);
    /// ```
    #[must_use]
    pub fn center_of_mass(&self) -> Option<Point3<f64>> {
        let reference = self.vertex_centroid()?;
        let closed = !self.faces.is_empty() && self.boundary_edge_count() == 0;

        let mut volume = 0.0;
        let mut weighted = Vector3::zeros();
        let mut area = 0.0;
        let mut area_weighted = Vector3::zeros();

        for tri in self.triangles() {
            let (d0, d1, d2) = (tri.v0 - reference, tri.v1 - reference, tri.v2 - reference);
            let v = d0.dot(&d1.cross(&d2)) / 6.0;
            volume += v;
            // Tetrahedron (reference, v0, v1, v2) has its centroid at the
            // corner sum over four.
            weighted += (d0 + d1 + d2) * (v / 4.0);

            let a = tri.area();
            area += a;
            area_weighted += (tri.centroid() - reference) * a;
        }

        let scale = self.bounds().diagonal();
        if closed && volume.abs() > CLOSED_VOLUME_RATIO * scale.powi(3) {
            return Some(reference + weighted / volume);
        }
        if area > CLOSED_VOLUME_RATIO * scale.powi(2) {
            return Some(reference + area_weighted / area);
        }
        Some(reference)
    }
}

impl MeshTopology for IndexedMesh {
    #[inline]
    fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    #[inline]
    fn face_count(&self) -> usize {
        self.faces.len()
    }

    fn vertex(&self, index: usize) -> Option<&Vertex> {
        self.vertices.get(index)
    }

    fn triangle(&self, face_index: usize) -> Option<Triangle> {
        let [i0, i1, i2] = *self.faces.get(face_index)?;
        Some(Triangle {
            v0: self.vertices.get(i0 as usize)?.position,
            v1: self.vertices.get(i1 as usize)?.position,
            v2: self.vertices.get(i2 as usize)?.position,
        })
    }

    fn triangles(&self) -> impl Iterator<Item = Triangle> {
        (0..self.faces.len()).filter_map(|i| self.triangle(i))
    }
}

impl MeshBounds for IndexedMesh {
    fn bounds(&self) -> Aabb {
        Aabb::from_points(self.vertices.iter().map(|v| &v.position))
    }
}

/// Create an axis-aligned box from the origin to `(sx, sy, sz)`.
///
/// Every side is split into two CCW triangles, so each box face yields two
/// coplanar hull facets.
#[must_use]
pub fn cuboid(sx: f64, sy: f64, sz: f64) -> IndexedMesh {
    let corners = [
        [0.0, 0.0, 0.0],
        [sx, 0.0, 0.0],
        [sx, sy, 0.0],
        [0.0, sy, 0.0],
        [0.0, 0.0, sz],
        [sx, 0.0, sz],
        [sx, sy, sz],
        [0.0, sy, sz],
    ];

    let faces = vec![
        // Bottom (-Z)
        [0, 2, 1],
        [0, 3, 2],
        // Top (+Z)
        [4, 5, 6],
        [4, 6, 7],
        // Front (-Y)
        [0, 1, 5],
        [0, 5, 4],
        // Back (+Y)
        [3, 7, 6],
        [3, 6, 2],
        // Left (-X)
        [0, 4, 7],
        [0, 7, 3],
        // Right (+X)
        [1, 2, 6],
        [1, 6, 5],
    ];

    IndexedMesh::from_parts(corners.into_iter().map(Vertex::from).collect(), faces)
}

/// Create a unit cube from (0,0,0) to (1,1,1) with outward-facing winding.
///
/// # Example
///
/// ```
/// use mesh_types::{unit_cube, MeshTopology};
///
/// let cube = unit_cube();
/// assert_eq!(cube.vertex_count(), 8);
/// assert_eq!(cube.face_count(), 12);
/// ```
#[must_use]
pub fn unit_cube() -> IndexedMesh {
    cuboid(1.0, 1.0, 1.0)
}
