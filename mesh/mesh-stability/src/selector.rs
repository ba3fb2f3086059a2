//! Final choice of resting orientations.

use std::fmt;

use nalgebra::{Point3, Vector3};
use tracing::debug;

use crate::config::StabilityParams;
use crate::facets::SupportPlane;
use crate::pose::RestingPose;
use crate::redundancy::Candidate;
use crate::stability::is_statically_stable;

/// A physically plausible resting orientation.
#[derive(Debug, Clone, PartialEq)]
pub struct Orientation {
    /// Sequence number, starting at 0.
    pub index: usize,
    /// Outward normal of the support plane in the object frame.
    pub normal: Vector3<f64>,
    /// The plane the object rests on.
    pub plane: SupportPlane,
    /// Pose putting the object down on the plane.
    pub pose: RestingPose,
    /// Whether the pose passed the static stability test.
    pub stable: bool,
}

/// Why a candidate was accepted or rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CandidateVerdict {
    /// Emitted as an orientation.
    Accepted,
    /// Center of mass falls outside the support patch.
    Unstable,
    /// Center of mass too high above the lowest candidate.
    TooHigh,
    /// A later candidate faces almost the same way.
    Duplicate,
}

impl fmt::Display for CandidateVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Accepted => "accepted",
            Self::Unstable => "unstable",
            Self::TooHigh => "too high",
            Self::Duplicate => "duplicate",
        };
        f.write_str(label)
    }
}

/// Outcome for one candidate plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CandidateEvaluation {
    /// Area of the candidate plane.
    pub area: f64,
    /// Outward normal of the candidate plane.
    pub normal: Vector3<f64>,
    /// Center-of-mass height when resting on the plane.
    pub height: f64,
    /// Decision taken.
    pub verdict: CandidateVerdict,
}

/// Output of [`select_orientations`].
#[derive(Debug, Clone, Default)]
pub struct Selection {
    /// Accepted orientations, numbered in candidate order.
    pub orientations: Vec<Orientation>,
    /// One evaluation per input candidate, in input order.
    pub evaluations: Vec<CandidateEvaluation>,
}

/// Pick the stable, low and distinct candidates.
///
/// Candidates are filtered in three passes, each working on the survivors
/// of the previous one:
///
/// 1. poses whose center of mass is not above the support patch are
///    dropped;
/// 2. poses whose center of mass is higher than `lowest_height` times
///    [`StabilityParams::height_multiplier`] are dropped;
/// 3. a pose is dropped when any later survivor has a normal within
///    [`StabilityParams::duplicate_angle`].
///
/// `points` are the object-frame positions the planes' facets index into.
#[must_use]
pub fn select_orientations(
    candidates: Vec<Candidate>,
    points: &[Point3<f64>],
    lowest_height: Option<f64>,
    params: &StabilityParams,
) -> Selection {
    let height_limit = lowest_height.map(|h| h * params.height_multiplier);

    let mut verdicts: Vec<CandidateVerdict> = candidates
        .iter()
        .map(|candidate| {
            let height = candidate.pose.height();
            if !is_statically_stable(
                points,
                &candidate.pose,
                &candidate.plane,
                params.barycentric_tolerance,
            ) {
                debug!(area = candidate.plane.area, height, "Candidate not stable");
                CandidateVerdict::Unstable
            } else if height_limit.is_some_and(|limit| height > limit) {
                debug!(
                    area = candidate.plane.area,
                    height,
                    limit = ?height_limit,
                    "Candidate stable but center of mass very high"
                );
                CandidateVerdict::TooHigh
            } else {
                debug!(area = candidate.plane.area, height, "Candidate stable and low");
                CandidateVerdict::Accepted
            }
        })
        .collect();

    let survivors: Vec<usize> = (0..candidates.len())
        .filter(|&i| verdicts[i] == CandidateVerdict::Accepted)
        .collect();
    let normals: Vec<Vector3<f64>> = survivors
        .iter()
        .map(|&i| candidates[i].plane.normal)
        .collect();
    let distinct = distinct_normals(&normals, params.duplicate_angle);
    for (position, &i) in survivors.iter().enumerate() {
        if !distinct.contains(&position) {
            debug!(area = candidates[i].plane.area, "Candidate duplicates a later one");
            verdicts[i] = CandidateVerdict::Duplicate;
        }
    }

    let evaluations = candidates
        .iter()
        .zip(&verdicts)
        .map(|(candidate, &verdict)| CandidateEvaluation {
            area: candidate.plane.area,
            normal: candidate.plane.normal,
            height: candidate.pose.height(),
            verdict,
        })
        .collect();

    let orientations = candidates
        .into_iter()
        .zip(verdicts)
        .filter(|(_, verdict)| *verdict == CandidateVerdict::Accepted)
        .enumerate()
        .map(|(index, (candidate, _))| Orientation {
            index,
            normal: candidate.plane.normal,
            plane: candidate.plane,
            pose: candidate.pose,
            stable: true,
        })
        .collect();

    Selection {
        orientations,
        evaluations,
    }
}

/// Indices of the normals that have no later normal within `angle`.
///
/// Of a group of near-equal normals only the last one survives.
///
/// # Example
///
/// ```
/// use mesh_stability::distinct_normals;
/// use nalgebra::Vector3;
///
/// let normals = [Vector3::x(), Vector3::y(), Vector3::new(1.0, 0.01, 0.0).normalize()];
/// assert_eq!(distinct_normals(&normals, 0.05), vec![1, 2]);
/// ```
#[must_use]
pub fn distinct_normals(normals: &[Vector3<f64>], angle: f64) -> Vec<usize> {
    normals
        .iter()
        .enumerate()
        .filter(|&(i, normal)| normals[i + 1..].iter().all(|later| normal.angle(later) >= angle))
        .map(|(i, _)| i)
        .collect()
}
