//! Selection of the largest support planes.

use tracing::debug;

use crate::facets::SupportPlane;

/// Keep the `max_planes` planes with the largest area.
///
/// Works like a bounded insertion sort: a fixed number of slots is kept in
/// ascending area order and each new plane is slotted in above every plane
/// it beats, pushing the smallest one out. The result is therefore
/// **ascending** by area. Among equal areas the plane seen first ends up
/// higher. Planes with a non-positive area are never selected.
///
/// # Example
///
/// ```
/// use mesh_stability::{rank_planes, Facet, SupportPlane};
/// use nalgebra::Vector3;
///
/// let planes: Vec<_> = [3.0, 1.0, 4.0, 1.5]
///     .into_iter()
///     .map(|area| SupportPlane::new(Facet([0, 1, 2]), Vector3::z(), area))
///     .collect();
///
/// let ranked = rank_planes(planes, 2);
/// let areas: Vec<f64> = ranked.iter().map(|p| p.area).collect();
/// assert_eq!(areas, vec![3.0, 4.0]);
/// ```
#[must_use]
pub fn rank_planes(planes: Vec<SupportPlane>, max_planes: usize) -> Vec<SupportPlane> {
    let input = planes.len();
    let mut slots: Vec<SupportPlane> = Vec::with_capacity(max_planes.min(input));
    if max_planes == 0 {
        return slots;
    }

    for plane in planes {
        if plane.area.is_nan() || plane.area <= 0.0 {
            continue;
        }
        // Below any equal area already slotted.
        let position = slots.partition_point(|slot| slot.area < plane.area);

        if slots.len() < max_planes {
            slots.insert(position, plane);
        } else if position > 0 {
            slots.remove(0);
            slots.insert(position - 1, plane);
        }
    }

    debug!(input, kept = slots.len(), max_planes, "Ranked support planes");
    slots
}
