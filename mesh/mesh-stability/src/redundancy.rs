//! Thinning of near-identical planes from curved surfaces.
//!
//! A tessellated cylinder or rounded cap produces many support planes of
//! almost the same area. Those are grouped into buckets by area and only
//! the first few planes of each bucket survive. Every surviving plane is
//! rested on the floor so later stages can look at its center of mass.

use tracing::debug;

use crate::facets::SupportPlane;
use crate::pose::{Reorient, RestingPose};

/// A support plane together with the pose of the object resting on it.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    /// The support plane.
    pub plane: SupportPlane,
    /// Pose with the plane's normal pointing down.
    pub pose: RestingPose,
}

/// Output of [`reduce_redundancy`].
#[derive(Debug, Clone, Default)]
pub struct ReducedPlanes {
    /// Surviving planes, in input order.
    pub candidates: Vec<Candidate>,
    /// Lowest center-of-mass height over all candidates, `None` if there
    /// are none.
    pub lowest_height: Option<f64>,
}

/// Area bucket: representative area and how many later planes matched it.
#[derive(Debug, Clone, Copy)]
struct AreaBucket {
    area: f64,
    repeats: u32,
}

impl AreaBucket {
    fn matches(&self, area: f64, tolerance: f64) -> bool {
        area > self.area * (1.0 - tolerance) && area < self.area * (1.0 + tolerance)
    }
}

/// Drop planes that repeat an already well-represented area.
///
/// Planes are visited in order. A plane whose area lies strictly within
/// `±tolerance` (relative) of a bucket counts against the first such
/// bucket and is dropped once that bucket has seen more than `max_repeats`
/// repeats. A plane matching no bucket opens a new one. Each kept plane is
/// rested with `body`.
///
/// # Example
///
/// ```
/// use mesh_stability::{reduce_redundancy, Facet, RigidBody, SupportPlane};
/// use mesh_types::unit_cube;
/// use nalgebra::Vector3;
///
/// let cube = unit_cube();
/// let body = RigidBody::new(&cube).unwrap();
/// let planes: Vec<_> = [10.0, 10.02, 9.99, 10.01, 10.0, 50.0]
///     .into_iter()
///     .map(|area| SupportPlane::new(Facet([0, 1, 2]), -Vector3::z(), area))
///     .collect();
///
/// let reduced = reduce_redundancy(planes, &body, 0.075, 2);
/// let kept: Vec<f64> = reduced.candidates.iter().map(|c| c.plane.area).collect();
/// assert_eq!(kept, vec![10.0, 10.02, 9.99, 50.0]);
/// ```
#[must_use]
pub fn reduce_redundancy<R>(
    planes: Vec<SupportPlane>,
    body: &R,
    tolerance: f64,
    max_repeats: u32,
) -> ReducedPlanes
where
    R: Reorient + ?Sized,
{
    let input = planes.len();
    let mut buckets: Vec<AreaBucket> = Vec::new();
    let mut reduced = ReducedPlanes::default();

    for plane in planes {
        if let Some(bucket) = buckets.iter_mut().find(|b| b.matches(plane.area, tolerance)) {
            bucket.repeats = bucket.repeats.saturating_add(1);
            if bucket.repeats > max_repeats {
                debug!(
                    area = plane.area,
                    bucket = bucket.area,
                    "Dropping repeated curved-surface plane"
                );
                continue;
            }
        } else {
            buckets.push(AreaBucket {
                area: plane.area,
                repeats: 0,
            });
        }

        let pose = body.rest_on(&plane.normal);
        let height = pose.height();
        reduced.lowest_height = Some(reduced.lowest_height.map_or(height, |h| h.min(height)));
        reduced.candidates.push(Candidate { plane, pose });
    }

    debug!(
        input,
        kept = reduced.candidates.len(),
        buckets = buckets.len(),
        lowest_height = ?reduced.lowest_height,
        "Reduced curved-surface redundancy"
    );

    reduced
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hull::Facet;
    use approx::assert_relative_eq;
    use nalgebra::{Point3, UnitQuaternion, Vector3};

    /// Rests every plane at a height equal to its normal's x component + 2.
    struct Lift;

    impl Reorient for Lift {
        fn rest_on(&self, outward_normal: &Vector3<f64>) -> RestingPose {
            RestingPose {
                rotation: UnitQuaternion::identity(),
                translation: Vector3::zeros(),
                center_of_mass: Point3::new(0.0, 0.0, outward_normal.x + 2.0),
            }
        }
    }

    fn planes(areas: &[f64]) -> Vec<SupportPlane> {
        areas
            .iter()
            .enumerate()
            .map(|(i, &area)| {
                #[allow(clippy::cast_precision_loss)]
                let x = i as f64 * 0.1;
                SupportPlane::new(Facet([0, 1, 2]), Vector3::new(x, 0.0, -1.0), area)
            })
            .collect()
    }

    fn kept_areas(reduced: &ReducedPlanes) -> Vec<f64> {
        reduced.candidates.iter().map(|c| c.plane.area).collect()
    }

    #[test]
    fn keeps_three_of_a_cluster() {
        let reduced = reduce_redundancy(
            planes(&[10.0, 10.02, 9.99, 10.01, 10.0, 50.0]),
            &Lift,
            0.075,
            2,
        );
        assert_eq!(kept_areas(&reduced), vec![10.0, 10.02, 9.99, 50.0]);
    }

    #[test]
    fn outside_band_opens_new_bucket() {
        let reduced = reduce_redundancy(planes(&[10.0, 10.8, 10.8, 9.2]), &Lift, 0.075, 0);
        assert_eq!(kept_areas(&reduced), vec![10.0, 10.8, 9.2]);
    }

    #[test]
    fn zero_repeats_keeps_one_per_bucket() {
        let reduced = reduce_redundancy(planes(&[1.0, 1.0, 2.0, 2.0, 1.0]), &Lift, 0.075, 0);
        assert_eq!(kept_areas(&reduced), vec![1.0, 2.0]);
    }

    #[test]
    fn lowest_height_over_kept_planes() {
        let reduced = reduce_redundancy(planes(&[1.0, 5.0, 9.0]), &Lift, 0.075, 2);
        assert_relative_eq!(reduced.lowest_height.unwrap(), 2.0, epsilon = 1e-12);
        assert_relative_eq!(reduced.candidates[2].pose.height(), 2.2, epsilon = 1e-12);
    }

    #[test]
    fn empty_input() {
        let reduced = reduce_redundancy(Vec::new(), &Lift, 0.075, 2);
        assert!(reduced.candidates.is_empty());
        assert!(reduced.lowest_height.is_none());
    }
}
