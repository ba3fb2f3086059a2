//! Tunable thresholds of the orientation pipeline.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{StabilityError, StabilityResult};

/// Parameters for resting-pose selection.
///
/// The defaults reproduce the reference thresholds used to build the
/// existing pose datasets; change them only when regenerating data.
///
/// # Example
///
/// ```
/// use mesh_stability::StabilityParams;
///
/// let params = StabilityParams::default()
///     .with_max_planes(40)
///     .with_height_multiplier(3.0);
/// assert!(params.validate().is_ok());
/// assert_eq!(params.max_planes, 40);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct StabilityParams {
    /// Angle in radians below which two hull facets belong to the same
    /// support plane. Default: 0.025
    pub plane_merge_angle: f64,

    /// Number of largest support planes kept as candidates. Default: 80
    pub max_planes: usize,

    /// Relative area window treated as "the same curved surface" by the
    /// redundancy reducer. Default: 0.075 (±7.5%)
    pub curvature_area_tolerance: f64,

    /// Extra near-equal-area planes tolerated per curvature bucket before
    /// further ones are dropped. Default: 2 (three views per surface)
    pub max_curved_repeats: u32,

    /// A stable pose is discarded when its center of mass is higher than
    /// this multiple of the lowest center of mass seen. Must be finite so
    /// the parameters survive a JSON round trip. Default: 4.0
    pub height_multiplier: f64,

    /// Angle in radians below which two accepted normals are considered
    /// the same orientation. Default: 0.05
    pub duplicate_angle: f64,

    /// Slack on barycentric coordinates so a center of mass lying exactly
    /// on an edge shared by two support triangles is not lost to
    /// rounding. Default: 1e-9
    pub barycentric_tolerance: f64,
}

impl Default for StabilityParams {
    fn default() -> Self {
        Self {
            plane_merge_angle: 0.025,
            max_planes: 80,
            curvature_area_tolerance: 0.075,
            max_curved_repeats: 2,
            height_multiplier: 4.0,
            duplicate_angle: 0.05,
            barycentric_tolerance: 1e-9,
        }
    }
}

impl StabilityParams {
    /// Fewer, more clearly distinct poses: tighter height limit and a
    /// wider duplicate window.
    #[must_use]
    pub fn strict() -> Self {
        Self {
            max_planes: 40,
            max_curved_repeats: 1,
            height_multiplier: 2.0,
            duplicate_angle: 0.1,
            ..Self::default()
        }
    }

    /// More poses: every stable plane short of absurd heights, and all
    /// repeats of curved surfaces.
    #[must_use]
    pub fn permissive() -> Self {
        Self {
            max_planes: 200,
            max_curved_repeats: u32::MAX,
            height_multiplier: 1e6,
            ..Self::default()
        }
    }

    /// Set the facet merge angle (radians).
    #[must_use]
    pub const fn with_plane_merge_angle(mut self, angle: f64) -> Self {
        self.plane_merge_angle = angle;
        self
    }

    /// Set the number of candidate planes.
    #[must_use]
    pub const fn with_max_planes(mut self, count: usize) -> Self {
        self.max_planes = count;
        self
    }

    /// Set the curvature bucket tolerance (fraction of area).
    #[must_use]
    pub const fn with_curvature_area_tolerance(mut self, tolerance: f64) -> Self {
        self.curvature_area_tolerance = tolerance;
        self
    }

    /// Set how many repeats a curvature bucket tolerates.
    #[must_use]
    pub const fn with_max_curved_repeats(mut self, repeats: u32) -> Self {
        self.max_curved_repeats = repeats;
        self
    }

    /// Set the center-of-mass height multiplier.
    #[must_use]
    pub const fn with_height_multiplier(mut self, multiplier: f64) -> Self {
        self.height_multiplier = multiplier;
        self
    }

    /// Set the duplicate-orientation angle (radians).
    #[must_use]
    pub const fn with_duplicate_angle(mut self, angle: f64) -> Self {
        self.duplicate_angle = angle;
        self
    }

    /// Check that every parameter is usable.
    ///
    /// # Errors
    ///
    /// Returns [`StabilityError::InvalidParams`] naming the first bad value.
    pub fn validate(&self) -> StabilityResult<()> {
        let positive_angle = |name, value: f64| {
            if value > 0.0 && value < std::f64::consts::PI {
                Ok(())
            } else {
                Err(StabilityError::invalid_param(
                    name,
                    format!("expected an angle in (0, pi), got {value}"),
                ))
            }
        };
        positive_angle("plane_merge_angle", self.plane_merge_angle)?;
        positive_angle("duplicate_angle", self.duplicate_angle)?;

        if self.max_planes == 0 {
            return Err(StabilityError::invalid_param(
                "max_planes",
                "at least one candidate plane is required",
            ));
        }
        if !(0.0..1.0).contains(&self.curvature_area_tolerance) {
            return Err(StabilityError::invalid_param(
                "curvature_area_tolerance",
                format!("expected a fraction in [0, 1), got {}", self.curvature_area_tolerance),
            ));
        }
        if !self.height_multiplier.is_finite() || self.height_multiplier < 1.0 {
            return Err(StabilityError::invalid_param(
                "height_multiplier",
                format!("expected a finite value >= 1, got {}", self.height_multiplier),
            ));
        }
        if !self.barycentric_tolerance.is_finite() || self.barycentric_tolerance < 0.0 {
            return Err(StabilityError::invalid_param(
                "barycentric_tolerance",
                format!("expected a finite value >= 0, got {}", self.barycentric_tolerance),
            ));
        }
        Ok(())
    }
}
