//! Vertex type.

use nalgebra::Point3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A vertex in 3D space.
///
/// Resting-pose analysis only ever reads positions, so a vertex carries no
/// per-vertex attributes. Normals are recomputed from faces when needed.
///
/// # Example
///
/// ```
/// use mesh_types::{Vertex, Point3};
///
/// let v1 = Vertex::new(Point3::new(1.0, 2.0, 3.0));
/// let v2 = Vertex::from_coords(1.0, 2.0, 3.0);
///
/// assert_eq!(v1, v2);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Vertex {
    /// 3D position.
    pub position: Point3<f64>,
}

impl Vertex {
    /// Create a new vertex at the given position.
    #[inline]
    #[must_use]
    pub const fn new(position: Point3<f64>) -> Self {
        Self { position }
    }

    /// Create a vertex from raw coordinates.
    #[inline]
    #[must_use]
    #[allow(clippy::missing_const_for_fn)] // Point3::new is not const in nalgebra
    pub fn from_coords(x: f64, y: f64, z: f64) -> Self {
        Self::new(Point3::new(x, y, z))
    }
}

impl From<Point3<f64>> for Vertex {
    fn from(position: Point3<f64>) -> Self {
        Self::new(position)
    }
}

impl From<[f64; 3]> for Vertex {
    fn from([x, y, z]: [f64; 3]) -> Self {
        Self::from_coords(x, y, z)
    }
}

/// Bit pattern of a position, with `-0.0` folded onto `0.0`.
///
/// Two positions share a key exactly when their coordinates compare equal,
/// which makes the key usable for welding and deduplication in hash maps.
pub type PositionKey = [u64; 3];

/// Compute the [`PositionKey`] of a point.
///
/// # Example
///
/// ```
/// use mesh_types::{position_key, Point3};
///
/// let a = Point3::new(-0.0, 1.0, 2.0);
/// let b = Point3::new(0.0, 1.0, 2.0);
/// assert_eq!(position_key(&a), position_key(&b));
/// ```
#[must_use]
pub fn position_key(p: &Point3<f64>) -> PositionKey {
    // Adding +0.0 maps -0.0 to +0.0 and leaves every other value alone.
    [
        (p.x + 0.0).to_bits(),
        (p.y + 0.0).to_bits(),
        (p.z + 0.0).to_bits(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vertex_from_array() {
        let v: Vertex = [1.0, -2.0, 3.5].into();
        assert!((v.position.x - 1.0).abs() < f64::EPSILON);
        assert!((v.position.y + 2.0).abs() < f64::EPSILON);
        assert!((v.position.z - 3.5).abs() < f64::EPSILON);
    }

    #[test]
    fn vertex_from_point() {
        let p = Point3::new(4.0, 5.0, 6.0);
        assert_eq!(Vertex::from(p).position, p);
    }

    #[test]
    fn distinct_positions_have_distinct_keys() {
        let a = Point3::new(0.1, 0.2, 0.3);
        let b = Point3::new(0.1, 0.2, 0.300_000_000_000_000_04);
        assert_ne!(position_key(&a), position_key(&b));
        assert_eq!(position_key(&a), position_key(&Point3::new(0.1, 0.2, 0.3)));
    }
}
