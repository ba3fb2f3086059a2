//! Core mesh types for resting-pose analysis.
//!
//! This crate provides the foundational types shared by the pose crates:
//!
//! - [`Vertex`] - A point in 3D space
//! - [`IndexedMesh`] - A triangle mesh with indexed vertices and mass properties
//! - [`Triangle`] - A concrete triangle with vertex positions
//! - [`Aabb`] - Axis-aligned bounding box
//!
//! # Units
//!
//! This library is **unit-agnostic**. All coordinates are `f64`.
//!
//! # Coordinate System
//!
//! Uses a **right-handed coordinate system** with Z pointing up. A resting
//! object lies on the plane `z = 0` and gravity acts along `-Z`.
//!
//! Face winding is **counter-clockwise (CCW) when viewed from outside**.
//!
//! # Example
//!
//! ```
//! use mesh_types::{unit_cube, MeshTopology};
//!
//! let cube = unit_cube();
//! assert_eq!(cube.face_count(), 12);
//!
//! let com = cube.center_of_mass().unwrap();
//! assert!((com.z - 0.5).abs() < 1e-10);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

mod bounds;
mod mesh;
mod traits;
mod triangle;
mod vertex;

pub use bounds::Aabb;
pub use mesh::{cuboid, unit_cube, IndexedMesh};
pub use traits::{MeshBounds, MeshTopology};
pub use triangle::Triangle;
pub use vertex::{position_key, PositionKey, Vertex};

// Re-export nalgebra types for convenience
pub use nalgebra::{Point3, Vector3};
