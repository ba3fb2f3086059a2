//! Convex hull of an object's vertices.

use chull::ConvexHullWrapper;
use hashbrown::HashMap;
use mesh_types::{position_key, PositionKey};
use nalgebra::Point3;
use tracing::debug;

use crate::error::{StabilityError, StabilityResult};

/// Minimum number of distinct points that can span a solid.
const MIN_HULL_POINTS: usize = 4;

/// One triangular face of a convex hull.
///
/// The indices refer to the point slice that was handed to
/// [`ConvexHull::compute`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Facet(pub [u32; 3]);

impl Facet {
    /// Vertex indices of the facet.
    #[inline]
    #[must_use]
    pub const fn indices(&self) -> [u32; 3] {
        self.0
    }

    /// Resolve the facet's corner positions.
    ///
    /// Returns `None` if any index is out of range for `points`.
    #[must_use]
    pub fn corners(&self, points: &[Point3<f64>]) -> Option<[Point3<f64>; 3]> {
        let [a, b, c] = self.0;
        Some([
            *points.get(a as usize)?,
            *points.get(b as usize)?,
            *points.get(c as usize)?,
        ])
    }
}

/// Triangulated convex hull of a point set.
#[derive(Debug, Clone)]
pub struct ConvexHull {
    facets: Vec<Facet>,
    interior: Point3<f64>,
}

impl ConvexHull {
    /// Compute the convex hull of `points`.
    ///
    /// Exact duplicate points are collapsed before the hull is built; the
    /// first occurrence is the one facets refer to.
    ///
    /// # Errors
    ///
    /// Returns [`StabilityError::InsufficientPoints`] when fewer than four
    /// distinct points are given and [`StabilityError::HullFailed`] when the
    /// points are flat, collinear or not finite.
    pub fn compute(points: &[Point3<f64>]) -> StabilityResult<Self> {
        if points.iter().any(|p| !p.coords.iter().all(|c| c.is_finite())) {
            return Err(StabilityError::HullFailed {
                message: "point set contains non-finite coordinates".to_string(),
            });
        }

        let mut first_index: HashMap<PositionKey, u32> = HashMap::with_capacity(points.len());
        let mut distinct = Vec::with_capacity(points.len());
        for (i, point) in points.iter().enumerate() {
            let index = u32::try_from(i).map_err(|_| StabilityError::HullFailed {
                message: format!("too many points: {}", points.len()),
            })?;
            first_index.entry(position_key(point)).or_insert_with(|| {
                distinct.push((*point, index));
                index
            });
        }

        if distinct.len() < MIN_HULL_POINTS {
            return Err(StabilityError::InsufficientPoints {
                required: MIN_HULL_POINTS,
                actual: distinct.len(),
            });
        }

        let lookup = PointLookup::new(&distinct, check_spans_volume(&distinct)?);

        let coords: Vec<Vec<f64>> = distinct
            .iter()
            .map(|(p, _)| vec![p.x, p.y, p.z])
            .collect();
        let hull = ConvexHullWrapper::try_new(&coords, None).map_err(|err| {
            StabilityError::HullFailed {
                message: format!("{err:?}"),
            }
        })?;
        let (hull_vertices, hull_indices) = hull.vertices_indices();

        let mut remap = Vec::with_capacity(hull_vertices.len());
        for vertex in &hull_vertices {
            let [x, y, z] = vertex[..] else {
                return Err(StabilityError::HullFailed {
                    message: format!("hull vertex has {} coordinates", vertex.len()),
                });
            };
            let original = lookup.nearest(&Point3::new(x, y, z)).ok_or_else(|| {
                StabilityError::HullFailed {
                    message: format!("hull vertex ({x}, {y}, {z}) does not match any input point"),
                }
            })?;
            remap.push(original);
        }

        let mut facets = Vec::with_capacity(hull_indices.len() / 3);
        for chunk in hull_indices.chunks_exact(3) {
            let resolve = |i: usize| {
                remap.get(i).copied().ok_or_else(|| StabilityError::HullFailed {
                    message: format!("hull index {i} out of range"),
                })
            };
            facets.push(Facet([resolve(chunk[0])?, resolve(chunk[1])?, resolve(chunk[2])?]));
        }

        if facets.is_empty() {
            return Err(StabilityError::HullFailed {
                message: "hull has no facets".to_string(),
            });
        }

        let interior = centroid_of(remap.iter().filter_map(|&i| points.get(i as usize)));

        debug!(
            points = points.len(),
            distinct = distinct.len(),
            hull_vertices = remap.len(),
            facets = facets.len(),
            "Computed convex hull"
        );

        Ok(Self { facets, interior })
    }

    /// Hull facets, in the order the hull backend enumerated them.
    #[must_use]
    pub fn facets(&self) -> &[Facet] {
        &self.facets
    }

    /// Number of facets.
    #[must_use]
    pub fn facet_count(&self) -> usize {
        self.facets.len()
    }

    /// A point strictly inside the hull: the mean of the hull's vertices.
    #[must_use]
    pub const fn interior_point(&self) -> Point3<f64> {
        self.interior
    }
}

/// Relative extent below which a point set counts as flat.
const FLATNESS_RATIO: f64 = 1e-9;

/// Reject point sets that are collinear or coplanar.
///
/// Returns the largest distance from the first point, a measure of the
/// set's extent.
fn check_spans_volume(distinct: &[(Point3<f64>, u32)]) -> StabilityResult<f64> {
    let points: Vec<Point3<f64>> = distinct.iter().map(|(p, _)| *p).collect();
    let Some(&origin) = points.first() else {
        return Err(StabilityError::InsufficientPoints {
            required: MIN_HULL_POINTS,
            actual: 0,
        });
    };
    let farthest = |score: &dyn Fn(&Point3<f64>) -> f64| {
        points
            .iter()
            .map(|p| (score(p), *p))
            .fold((0.0, origin), |best, next| if next.0 > best.0 { next } else { best })
    };

    let (extent, far) = farthest(&|p| (p - origin).norm());
    let axis = (far - origin).try_normalize(0.0);
    let (off_line, side) = farthest(&|p| {
        let d = p - origin;
        axis.map_or(0.0, |a| (d - a * d.dot(&a)).norm())
    });
    if off_line <= FLATNESS_RATIO * extent {
        return Err(StabilityError::HullFailed {
            message: "points are collinear".to_string(),
        });
    }

    let normal = (far - origin).cross(&(side - origin)).try_normalize(0.0);
    let (off_plane, _) = farthest(&|p| normal.map_or(0.0, |n| (p - origin).dot(&n).abs()));
    if off_plane <= FLATNESS_RATIO * extent {
        return Err(StabilityError::HullFailed {
            message: "points are coplanar".to_string(),
        });
    }
    Ok(extent)
}

/// Relative distance within which a hull vertex is matched to an input
/// point. The hull backend works on a fixed-point grid, so the vertices it
/// returns can differ from the inputs in the last bits.
const MATCH_RATIO: f64 = 1e-9;

/// Nearest-point lookup over the distinct inputs, bucketed on a uniform
/// grid whose cell size equals the match tolerance.
struct PointLookup<'a> {
    points: &'a [(Point3<f64>, u32)],
    tolerance: f64,
    cells: HashMap<[i64; 3], Vec<usize>>,
}

impl<'a> PointLookup<'a> {
    fn new(points: &'a [(Point3<f64>, u32)], extent: f64) -> Self {
        let magnitude = points
            .iter()
            .flat_map(|(p, _)| p.coords.iter().map(|c| c.abs()))
            .fold(0.0, f64::max);
        let tolerance = MATCH_RATIO * extent + 4.0 * f64::EPSILON * (1.0 + magnitude);

        let mut cells: HashMap<[i64; 3], Vec<usize>> = HashMap::with_capacity(points.len());
        for (slot, (p, _)) in points.iter().enumerate() {
            cells.entry(cell_of(p, tolerance)).or_default().push(slot);
        }
        Self {
            points,
            tolerance,
            cells,
        }
    }

    /// Original index of the input point closest to `query`, if one lies
    /// within the tolerance.
    fn nearest(&self, query: &Point3<f64>) -> Option<u32> {
        let [cx, cy, cz] = cell_of(query, self.tolerance);
        let mut best: Option<(f64, u32)> = None;
        for dx in -1..=1 {
            for dy in -1..=1 {
                for dz in -1..=1 {
                    let key = [
                        cx.saturating_add(dx),
                        cy.saturating_add(dy),
                        cz.saturating_add(dz),
                    ];
                    for &slot in self.cells.get(&key).into_iter().flatten() {
                        let (p, index) = self.points[slot];
                        let distance = (p - query).norm();
                        if distance <= self.tolerance && best.is_none_or(|(d, _)| distance < d) {
                            best = Some((distance, index));
                        }
                    }
                }
            }
        }
        best.map(|(_, index)| index)
    }
}

#[allow(clippy::cast_possible_truncation)]
// Truncation: out-of-range cells saturate, which only merges far buckets
fn cell_of(p: &Point3<f64>, cell: f64) -> [i64; 3] {
    [
        (p.x / cell).floor() as i64,
        (p.y / cell).floor() as i64,
        (p.z / cell).floor() as i64,
    ]
}

#[allow(clippy::cast_precision_loss)]
fn centroid_of<'a>(points: impl Iterator<Item = &'a Point3<f64>>) -> Point3<f64> {
    let (sum, count) = points.fold((nalgebra::Vector3::zeros(), 0_usize), |(sum, n), p| {
        (sum + p.coords, n + 1)
    });
    if count == 0 {
        return Point3::origin();
    }
    Point3::from(sum / count as f64)
}
