//! Physically sound resting orientations of rigid objects.
//!
//! Given a triangle mesh, this crate finds the ways the object can lie on a
//! flat floor without tipping over. Candidate contact patches come from the
//! object's convex hull:
//!
//! 1. **Hull**: triangulated convex hull of the vertices ([`ConvexHull`])
//! 2. **Merging**: near-coplanar hull facets are grouped into support
//!    planes ([`merge_facets`])
//! 3. **Ranking**: only the largest planes are kept ([`rank_planes`])
//! 4. **Redundancy**: repeated planes of curved surfaces are thinned and
//!    each remaining plane is rested on the floor ([`reduce_redundancy`])
//! 5. **Stability**: the center of mass must project into the contact
//!    patch ([`is_statically_stable`])
//! 6. **Selection**: implausibly high poses and near-duplicate normals are
//!    removed ([`select_orientations`])
//!
//! [`find_stable_orientations`] runs all stages for one object.
//!
//! # Coordinate System
//!
//! Z points up and the floor is `z = 0`. A resting pose turns the chosen
//! outward normal to `-Z` and lifts the object until its lowest vertex
//! touches the floor.
//!
//! # Example
//!
//! ```
//! use mesh_stability::{find_stable_orientations, StabilityParams};
//! use mesh_types::unit_cube;
//!
//! let cube = unit_cube();
//! let params = StabilityParams::default().with_max_curved_repeats(u32::MAX);
//! let report = find_stable_orientations(&cube, &params).unwrap();
//!
//! assert_eq!(report.orientations.len(), 6);
//! for orientation in &report.orientations {
//!     assert!((orientation.pose.height() - 0.5).abs() < 1e-9);
//! }
//! ```

// Safety: Deny unwrap/expect in library code. Tests may use them (workspace warns).
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod config;
mod error;
mod facets;
mod hull;
mod pipeline;
mod pose;
mod ranking;
mod redundancy;
mod selector;
mod stability;

pub use config::StabilityParams;
pub use error::{StabilityError, StabilityResult};
pub use facets::{merge_facets, outward_normal, polygon_area, MergedPlanes, SupportPlane};
pub use hull::{ConvexHull, Facet};
pub use pipeline::{find_stable_orientations, OrientationReport};
pub use pose::{rotation_to_floor, Reorient, RestingPose, RigidBody};
pub use ranking::rank_planes;
pub use redundancy::{reduce_redundancy, Candidate, ReducedPlanes};
pub use selector::{
    distinct_normals, select_orientations, CandidateEvaluation, CandidateVerdict, Orientation,
    Selection,
};
pub use stability::{barycentric, is_statically_stable};
