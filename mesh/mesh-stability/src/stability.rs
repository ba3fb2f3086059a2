//! Static stability of a resting pose.
//!
//! An object at rest on a plane does not tip while the vertical projection
//! of its center of mass stays inside the contact patch. The patch is the
//! union of the plane's member triangles, each tested on its own.

use nalgebra::Point3;

use crate::facets::SupportPlane;
use crate::pose::RestingPose;

/// Barycentric coordinates of `p` in the triangle `a b c`, all projected
/// onto the XY plane.
///
/// Returns `None` when the projected triangle has (near) zero area.
///
/// # Example
///
/// ```
/// use mesh_stability::barycentric;
/// use nalgebra::Point3;
///
/// let a = Point3::new(0.0, 0.0, 0.0);
/// let b = Point3::new(1.0, 0.0, 0.0);
/// let c = Point3::new(0.0, 1.0, 0.0);
///
/// let [alpha, beta, gamma] = barycentric(&Point3::new(0.25, 0.25, 7.0), &a, &b, &c).unwrap();
/// assert!((alpha - 0.5).abs() < 1e-12);
/// assert!((beta - 0.25).abs() < 1e-12);
/// assert!((gamma - 0.25).abs() < 1e-12);
/// ```
#[must_use]
pub fn barycentric(
    p: &Point3<f64>,
    a: &Point3<f64>,
    b: &Point3<f64>,
    c: &Point3<f64>,
) -> Option<[f64; 3]> {
    let denominator = (b.y - c.y) * (a.x - c.x) + (c.x - b.x) * (a.y - c.y);
    let scale = (b.xy() - a.xy()).norm_squared() + (c.xy() - a.xy()).norm_squared();
    if denominator.abs() <= f64::EPSILON * scale {
        return None;
    }

    let alpha = ((b.y - c.y) * (p.x - c.x) + (c.x - b.x) * (p.y - c.y)) / denominator;
    let beta = ((c.y - a.y) * (p.x - c.x) + (a.x - c.x) * (p.y - c.y)) / denominator;
    Some([alpha, beta, 1.0 - alpha - beta])
}

/// Check whether `pose` keeps the object on `plane` without tipping.
///
/// `points` are the object-frame positions the plane's facets index into.
/// Member triangles are tried in order; the first one containing the
/// projected center of mass (coordinates not below `-tolerance`) makes the
/// pose stable. Degenerate or out-of-range triangles are skipped.
#[must_use]
pub fn is_statically_stable(
    points: &[Point3<f64>],
    pose: &RestingPose,
    plane: &SupportPlane,
    tolerance: f64,
) -> bool {
    plane.facets.iter().any(|facet| {
        let Some([a, b, c]) = facet.corners(points) else {
            return false;
        };
        let [a, b, c] = [a, b, c].map(|p| pose.transform_point(&p));
        barycentric(&pose.center_of_mass, &a, &b, &c)
            .is_some_and(|coords| coords.iter().all(|&w| w >= -tolerance))
    })
}
