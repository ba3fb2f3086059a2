//! End-to-end resting-pose search for one object.

use std::fmt;

use mesh_types::{IndexedMesh, MeshTopology};
use tracing::info;

use crate::config::StabilityParams;
use crate::error::{StabilityError, StabilityResult};
use crate::facets::merge_facets;
use crate::hull::ConvexHull;
use crate::pose::RigidBody;
use crate::ranking::rank_planes;
use crate::redundancy::reduce_redundancy;
use crate::selector::{select_orientations, CandidateEvaluation, CandidateVerdict, Orientation};

/// Result of [`find_stable_orientations`].
#[derive(Debug, Clone, Default)]
pub struct OrientationReport {
    /// Accepted orientations, numbered from 0.
    pub orientations: Vec<Orientation>,
    /// Outcome for every candidate that reached the selector.
    pub evaluations: Vec<CandidateEvaluation>,
    /// Support planes found on the hull.
    pub plane_count: usize,
    /// Planes left after keeping the largest.
    pub ranked_count: usize,
    /// Planes left after removing curved-surface repeats.
    pub reduced_count: usize,
    /// Hull surface area.
    pub total_area: f64,
    /// Lowest center-of-mass height among the candidates.
    pub lowest_height: Option<f64>,
}

impl OrientationReport {
    /// Whether at least one orientation was found.
    #[must_use]
    pub fn has_orientations(&self) -> bool {
        !self.orientations.is_empty()
    }

    /// Number of candidates with the given verdict.
    #[must_use]
    pub fn count(&self, verdict: CandidateVerdict) -> usize {
        self.evaluations
            .iter()
            .filter(|e| e.verdict == verdict)
            .count()
    }

    /// One-line summary.
    #[must_use]
    pub fn summary(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for OrientationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} orientations from {} planes ({} ranked, {} reduced; {} unstable, {} too high, {} duplicate)",
            self.orientations.len(),
            self.plane_count,
            self.ranked_count,
            self.reduced_count,
            self.count(CandidateVerdict::Unstable),
            self.count(CandidateVerdict::TooHigh),
            self.count(CandidateVerdict::Duplicate),
        )
    }
}

/// Find the physically sound resting orientations of a rigid object.
///
/// Runs hull construction, facet merging, plane ranking, redundancy
/// reduction, the stability test and orientation selection in that order.
/// An object that cannot rest stably on any plane yields an empty report,
/// not an error.
///
/// # Errors
///
/// Returns an error if `params` are invalid, the mesh is empty, or its
/// vertices do not span a solid.
///
/// # Example
///
/// ```
/// use mesh_stability::{find_stable_orientations, StabilityParams};
/// use mesh_types::cuboid;
///
/// let block = cuboid(1.0, 2.0, 3.0);
/// let report = find_stable_orientations(&block, &StabilityParams::default()).unwrap();
///
/// assert_eq!(report.orientations.len(), 6);
/// println!("{}", report.summary());
/// ```
pub fn find_stable_orientations(
    mesh: &IndexedMesh,
    params: &StabilityParams,
) -> StabilityResult<OrientationReport> {
    params.validate()?;
    if mesh.is_empty() {
        return Err(StabilityError::EmptyMesh);
    }

    let body = RigidBody::new(mesh)?;
    let points = mesh.positions();
    let hull = ConvexHull::compute(&points)?;

    let merged = merge_facets(
        &points,
        hull.facets(),
        &hull.interior_point(),
        params.plane_merge_angle,
    );
    let plane_count = merged.planes.len();

    let ranked = rank_planes(merged.planes, params.max_planes);
    let ranked_count = ranked.len();

    let reduced = reduce_redundancy(
        ranked,
        &body,
        params.curvature_area_tolerance,
        params.max_curved_repeats,
    );
    let reduced_count = reduced.candidates.len();

    info!(
        vertices = mesh.vertex_count(),
        hull_facets = hull.facet_count(),
        planes = plane_count,
        ranked = ranked_count,
        reduced = reduced_count,
        "Collected candidate support planes"
    );

    let selection = select_orientations(reduced.candidates, &points, reduced.lowest_height, params);

    let report = OrientationReport {
        orientations: selection.orientations,
        evaluations: selection.evaluations,
        plane_count,
        ranked_count,
        reduced_count,
        total_area: merged.total_area,
        lowest_height: reduced.lowest_height,
    };

    info!(
        orientations = report.orientations.len(),
        unstable = report.count(CandidateVerdict::Unstable),
        too_high = report.count(CandidateVerdict::TooHigh),
        duplicates = report.count(CandidateVerdict::Duplicate),
        "Selected resting orientations"
    );

    Ok(report)
}
