//! Rigid placement of an object on the floor plane.

use std::f64::consts::PI;

use mesh_types::{IndexedMesh, MeshTopology, Vertex};
use nalgebra::{Isometry3, Point3, Translation3, UnitQuaternion, Vector3};

use crate::error::{StabilityError, StabilityResult};

/// Rigid transform that puts an object down on `z = 0`, plus where its
/// center of mass ends up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RestingPose {
    /// Rotation applied first, about the origin.
    pub rotation: UnitQuaternion<f64>,
    /// Translation applied after the rotation.
    pub translation: Vector3<f64>,
    /// Center of mass in the resting frame.
    pub center_of_mass: Point3<f64>,
}

impl RestingPose {
    /// Map a point from the object frame into the resting frame.
    #[inline]
    #[must_use]
    pub fn transform_point(&self, point: &Point3<f64>) -> Point3<f64> {
        self.rotation * point + self.translation
    }

    /// Pose as a single isometry.
    #[must_use]
    pub fn isometry(&self) -> Isometry3<f64> {
        Isometry3::from_parts(Translation3::from(self.translation), self.rotation)
    }

    /// Height of the center of mass above the floor.
    #[inline]
    #[must_use]
    pub fn height(&self) -> f64 {
        self.center_of_mass.z
    }

    /// Copy of `mesh` moved into the resting frame.
    ///
    /// Rotations preserve winding, so faces are copied as-is.
    #[must_use]
    pub fn apply_to_mesh(&self, mesh: &IndexedMesh) -> IndexedMesh {
        let vertices = mesh
            .vertices
            .iter()
            .map(|v| Vertex::new(self.transform_point(&v.position)))
            .collect();
        IndexedMesh::from_parts(vertices, mesh.faces.clone())
    }
}

/// Something that can be rested on one of its faces.
///
/// Implementations must be deterministic: the same normal always yields
/// the same pose.
pub trait Reorient {
    /// Pose that turns `outward_normal` straight down and lifts the lowest
    /// point onto `z = 0`.
    fn rest_on(&self, outward_normal: &Vector3<f64>) -> RestingPose;
}

/// A mesh with its center of mass computed once.
#[derive(Debug, Clone, Copy)]
pub struct RigidBody<'a> {
    mesh: &'a IndexedMesh,
    center_of_mass: Point3<f64>,
}

impl<'a> RigidBody<'a> {
    /// Wrap a mesh.
    ///
    /// # Errors
    ///
    /// Returns [`StabilityError::EmptyMesh`] if the mesh has no vertices or
    /// no faces.
    pub fn new(mesh: &'a IndexedMesh) -> StabilityResult<Self> {
        if mesh.is_empty() {
            return Err(StabilityError::EmptyMesh);
        }
        let center_of_mass = mesh.center_of_mass().ok_or(StabilityError::EmptyMesh)?;
        Ok(Self {
            mesh,
            center_of_mass,
        })
    }

    /// The wrapped mesh.
    #[must_use]
    pub const fn mesh(&self) -> &'a IndexedMesh {
        self.mesh
    }

    /// Center of mass in the object frame.
    #[must_use]
    pub const fn center_of_mass(&self) -> Point3<f64> {
        self.center_of_mass
    }
}

impl Reorient for RigidBody<'_> {
    fn rest_on(&self, outward_normal: &Vector3<f64>) -> RestingPose {
        let rotation = rotation_to_floor(outward_normal);
        let lowest = self
            .mesh
            .vertices
            .iter()
            .map(|v| (rotation * v.position).z)
            .fold(f64::INFINITY, f64::min);
        let translation = Vector3::new(0.0, 0.0, -lowest);

        RestingPose {
            rotation,
            translation,
            center_of_mass: rotation * self.center_of_mass + translation,
        }
    }
}

/// Rotation taking `normal` onto `-Z`.
///
/// When `normal` already points up the rotation turns half way round the
/// X axis.
#[must_use]
pub fn rotation_to_floor(normal: &Vector3<f64>) -> UnitQuaternion<f64> {
    UnitQuaternion::rotation_between(normal, &-Vector3::z())
        .unwrap_or_else(|| UnitQuaternion::from_axis_angle(&Vector3::x_axis(), PI))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use mesh_types::{cuboid, unit_cube};

    #[test]
    fn rotation_sends_normal_down() {
        for normal in [
            Vector3::x(),
            -Vector3::y(),
            Vector3::new(1.0, 2.0, -0.5).normalize(),
            -Vector3::z(),
            Vector3::z(),
        ] {
            let down = rotation_to_floor(&normal) * normal;
            assert_relative_eq!(down, -Vector3::z(), epsilon = 1e-12);
        }
    }

    #[test]
    fn cube_rests_on_floor() {
        let cube = unit_cube();
        let body = RigidBody::new(&cube).unwrap();

        let pose = body.rest_on(&Vector3::x());
        let rested = pose.apply_to_mesh(&cube);
        let min_z = rested
            .vertices
            .iter()
            .map(|v| v.position.z)
            .fold(f64::INFINITY, f64::min);
        assert_relative_eq!(min_z, 0.0, epsilon = 1e-12);
        assert_relative_eq!(pose.height(), 0.5, epsilon = 1e-12);
    }

    #[test]
    fn pose_matches_recomputed_center_of_mass() {
        let block = cuboid(1.0, 2.0, 3.0);
        let body = RigidBody::new(&block).unwrap();
        let pose = body.rest_on(&Vector3::y());

        let recomputed = pose.apply_to_mesh(&block).center_of_mass().unwrap();
        assert_relative_eq!(pose.center_of_mass, recomputed, epsilon = 1e-9);
        // Lying on a 1 x 3 side, the 2-unit edge stands up.
        assert_relative_eq!(pose.height(), 1.0, epsilon = 1e-9);
    }

    #[test]
    fn isometry_agrees_with_transform_point() {
        let block = cuboid(2.0, 1.0, 1.0);
        let pose = RigidBody::new(&block)
            .unwrap()
            .rest_on(&Vector3::new(1.0, 1.0, 0.0).normalize());
        let p = Point3::new(0.3, -0.7, 1.1);
        assert_relative_eq!(pose.isometry() * p, pose.transform_point(&p), epsilon = 1e-12);
    }

    #[test]
    fn empty_mesh_rejected() {
        let empty = IndexedMesh::new();
        assert!(matches!(RigidBody::new(&empty), Err(StabilityError::EmptyMesh)));
    }
}
