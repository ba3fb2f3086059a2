//! Grouping of hull facets into support planes.
//!
//! Neighbouring hull triangles that face the same way form one flat patch
//! the object can rest on. Facets are clustered greedily: each facet joins
//! the first plane whose normal is within the merge angle, otherwise it
//! opens a new plane. The first member's normal stays the plane normal.

use nalgebra::{Point3, Vector3};
use tracing::{debug, warn};

use crate::hull::Facet;

/// A group of near-coplanar hull facets.
#[derive(Debug, Clone, PartialEq)]
pub struct SupportPlane {
    /// Combined area of all member facets.
    pub area: f64,
    /// Outward unit normal of the first member facet.
    pub normal: Vector3<f64>,
    /// Member facets in the order they were merged.
    pub facets: Vec<Facet>,
}

impl SupportPlane {
    /// Start a plane from a single facet.
    #[must_use]
    pub fn new(facet: Facet, normal: Vector3<f64>, area: f64) -> Self {
        Self {
            area,
            normal,
            facets: vec![facet],
        }
    }

    /// Add a facet to the plane without touching its normal.
    pub fn absorb(&mut self, facet: Facet, area: f64) {
        self.area += area;
        self.facets.push(facet);
    }
}

/// Output of [`merge_facets`].
#[derive(Debug, Clone, Default)]
pub struct MergedPlanes {
    /// Support planes in creation order.
    pub planes: Vec<SupportPlane>,
    /// Sum of all facet areas, equal to the hull surface area.
    pub total_area: f64,
}

/// Area of a planar polygon.
///
/// The polygon normal is taken from its first three vertices. Returns 0 for
/// fewer than three vertices or when those vertices are collinear.
///
/// # Example
///
/// ```
/// use mesh_stability::polygon_area;
/// use nalgebra::Point3;
///
/// let square = [
///     Point3::new(0.0, 0.0, 1.0),
///     Point3::new(2.0, 0.0, 1.0),
///     Point3::new(2.0, 2.0, 1.0),
///     Point3::new(0.0, 2.0, 1.0),
/// ];
/// assert!((polygon_area(&square) - 4.0).abs() < 1e-12);
/// ```
#[must_use]
pub fn polygon_area(points: &[Point3<f64>]) -> f64 {
    let [p0, p1, p2, ..] = points else {
        return 0.0;
    };
    let Some(unit) = (p1 - p0).cross(&(p2 - p0)).try_normalize(0.0) else {
        return 0.0;
    };

    let total = points
        .iter()
        .zip(points.iter().cycle().skip(1))
        .fold(Vector3::zeros(), |acc, (a, b)| acc + a.coords.cross(&b.coords));

    (total.dot(&unit) * 0.5).abs()
}

/// Unit normal of the triangle `p0 p1 p2` pointing away from `interior`.
///
/// Hull winding is not trusted: the raw cross product is flipped whenever
/// it points towards the interior. Degenerate triangles give a zero vector.
#[must_use]
pub fn outward_normal(
    p0: &Point3<f64>,
    p1: &Point3<f64>,
    p2: &Point3<f64>,
    interior: &Point3<f64>,
) -> Vector3<f64> {
    let raw = (p1 - p0).cross(&(p2 - p0));
    let Some(unit) = raw.try_normalize(0.0) else {
        return Vector3::zeros();
    };
    if unit.dot(&(interior - p0)) > 0.0 {
        -unit
    } else {
        unit
    }
}

/// Cluster hull facets into support planes.
///
/// Facets are visited in order; each one joins the first existing plane
/// whose normal is less than `merge_angle` radians from its own, or starts
/// a new plane. Facets with out-of-range indices are skipped.
#[must_use]
pub fn merge_facets(
    points: &[Point3<f64>],
    facets: &[Facet],
    interior: &Point3<f64>,
    merge_angle: f64,
) -> MergedPlanes {
    let mut merged = MergedPlanes::default();
    let mut degenerate = 0_usize;

    for facet in facets {
        let Some(corners @ [p0, p1, p2]) = facet.corners(points) else {
            warn!(facet = ?facet.indices(), "Skipping facet with out-of-range index");
            continue;
        };
        let area = polygon_area(&corners);
        merged.total_area += area;

        let normal = outward_normal(&p0, &p1, &p2, interior);
        if normal == Vector3::zeros() {
            degenerate += 1;
            continue;
        }

        match merged
            .planes
            .iter_mut()
            .find(|plane| plane.normal.angle(&normal) < merge_angle)
        {
            Some(plane) => plane.absorb(*facet, area),
            None => merged.planes.push(SupportPlane::new(*facet, normal, area)),
        }
    }

    debug!(
        facets = facets.len(),
        planes = merged.planes.len(),
        degenerate,
        total_area = merged.total_area,
        "Merged hull facets"
    );

    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn square_pyramid() -> (Vec<Point3<f64>>, Vec<Facet>) {
        let points = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(0.5, 0.5, 1.0),
        ];
        let facets = vec![
            Facet([0, 1, 2]),
            Facet([0, 2, 3]),
            Facet([0, 1, 4]),
            Facet([1, 2, 4]),
            Facet([2, 3, 4]),
            Facet([3, 0, 4]),
        ];
        (points, facets)
    }

    #[test]
    fn triangle_area() {
        let tri = [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(3.0, 0.0, 0.0),
            Point3::new(0.0, 4.0, 0.0),
        ];
        assert_relative_eq!(polygon_area(&tri), 6.0, epsilon = 1e-12);
    }

    #[test]
    fn tilted_polygon_area() {
        // Unit square in the plane x + z = 1 has area sqrt(2).
        let quad = [
            Point3::new(0.0, 0.0, 1.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 1.0),
        ];
        assert_relative_eq!(polygon_area(&quad), 2.0_f64.sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn degenerate_polygon_area_is_zero() {
        assert_relative_eq!(polygon_area(&[]), 0.0);
        let line = [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 1.0),
            Point3::new(2.0, 2.0, 2.0),
        ];
        assert_relative_eq!(polygon_area(&line), 0.0);
    }

    #[test]
    fn normal_points_away_from_interior() {
        let interior = Point3::new(0.0, 0.0, 1.0);
        // Counter-clockwise seen from above, raw normal is +Z.
        let n = outward_normal(
            &Point3::new(0.0, 0.0, 0.0),
            &Point3::new(1.0, 0.0, 0.0),
            &Point3::new(0.0, 1.0, 0.0),
            &interior,
        );
        assert_relative_eq!(n, Vector3::new(0.0, 0.0, -1.0), epsilon = 1e-12);
    }

    #[test]
    fn normal_of_degenerate_triangle_is_zero() {
        let p = Point3::new(1.0, 2.0, 3.0);
        assert_eq!(outward_normal(&p, &p, &p, &Point3::origin()), Vector3::zeros());
    }

    #[test]
    fn base_triangles_merge_into_one_plane() {
        let (points, facets) = square_pyramid();
        let interior = Point3::new(0.5, 0.5, 0.25);
        let merged = merge_facets(&points, &facets, &interior, 0.025);

        assert_eq!(merged.planes.len(), 5);
        let base = &merged.planes[0];
        assert_eq!(base.facets, vec![Facet([0, 1, 2]), Facet([0, 2, 3])]);
        assert_relative_eq!(base.area, 1.0, epsilon = 1e-12);
        assert_relative_eq!(base.normal, Vector3::new(0.0, 0.0, -1.0), epsilon = 1e-12);
    }

    #[test]
    fn total_area_matches_surface() {
        let (points, facets) = square_pyramid();
        let merged = merge_facets(&points, &facets, &Point3::new(0.5, 0.5, 0.25), 0.025);

        let side = 0.5 * (1.25_f64).sqrt();
        assert_relative_eq!(merged.total_area, 1.0 + 4.0 * side, epsilon = 1e-12);
        let plane_sum: f64 = merged.planes.iter().map(|p| p.area).sum();
        assert_relative_eq!(plane_sum, merged.total_area, epsilon = 1e-12);
    }

    #[test]
    fn first_match_wins_and_normal_is_kept() {
        // Three facets fanning away by 0.015 rad each: the third is within
        // 0.025 of the second but not of the first, so it opens a new plane.
        let tilt = |angle: f64| {
            let (s, c) = angle.sin_cos();
            [
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(0.0, c, s),
            ]
        };
        let mut points = Vec::new();
        let mut facets = Vec::new();
        for (i, angle) in [0.0, 0.015, 0.03].into_iter().enumerate() {
            points.extend(tilt(angle));
            let base = u32::try_from(i * 3).unwrap();
            facets.push(Facet([base, base + 1, base + 2]));
        }
        let interior = Point3::new(0.2, 0.2, 5.0);
        let merged = merge_facets(&points, &facets, &interior, 0.025);

        assert_eq!(merged.planes.len(), 2);
        assert_eq!(merged.planes[0].facets.len(), 2);
        assert_relative_eq!(
            merged.planes[0].normal,
            Vector3::new(0.0, 0.0, -1.0),
            epsilon = 1e-12
        );
    }

    #[test]
    fn out_of_range_facet_skipped() {
        let (points, mut facets) = square_pyramid();
        facets.push(Facet([0, 1, 99]));
        let merged = merge_facets(&points, &facets, &Point3::new(0.5, 0.5, 0.25), 0.025);
        assert_eq!(merged.planes.len(), 5);
    }
}
