//! Exact vertex welding for triangle-soup formats.
//!
//! STL stores every triangle with its own three corners. Welding corners
//! with bit-identical coordinates restores shared vertices so downstream
//! hull and mass computations see each point once.

use hashbrown::HashMap;
use mesh_types::{position_key, IndexedMesh, Point3, PositionKey, Vertex};

/// Incrementally builds an indexed mesh from loose triangles.
#[derive(Debug, Default)]
pub(crate) struct Welder {
    mesh: IndexedMesh,
    lookup: HashMap<PositionKey, u32>,
}

impl Welder {
    pub(crate) fn with_capacity(faces: usize) -> Self {
        Self {
            mesh: IndexedMesh::with_capacity(faces / 2 + 3, faces),
            lookup: HashMap::with_capacity(faces / 2 + 3),
        }
    }

    #[allow(clippy::cast_possible_truncation)]
    // Truncation: mesh indices are u32, meshes with >4B vertices are unsupported
    fn index_of(&mut self, p: Point3<f64>) -> u32 {
        let next = self.mesh.vertices.len() as u32;
        let index = *self.lookup.entry(position_key(&p)).or_insert(next);
        if index == next {
            self.mesh.vertices.push(Vertex::new(p));
        }
        index
    }

    pub(crate) fn push_triangle(&mut self, a: Point3<f64>, b: Point3<f64>, c: Point3<f64>) {
        let face = [self.index_of(a), self.index_of(b), self.index_of(c)];
        self.mesh.faces.push(face);
    }

    pub(crate) fn finish(self) -> IndexedMesh {
        self.mesh
    }
}
