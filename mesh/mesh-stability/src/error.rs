//! Error types for resting-pose analysis.

use thiserror::Error;

/// Result type for resting-pose analysis.
pub type StabilityResult<T> = Result<T, StabilityError>;

/// Errors that can occur while analysing an object.
///
/// All of these are local to one object; a batch driver reports them and
/// moves on to the next object.
#[derive(Debug, Error)]
pub enum StabilityError {
    /// Mesh has no vertices or no faces.
    #[error("mesh is empty")]
    EmptyMesh,

    /// Too few distinct points to span a solid.
    #[error("insufficient points for a 3D hull: need at least {required}, got {actual}")]
    InsufficientPoints {
        /// Minimum number of distinct points required.
        required: usize,
        /// Distinct points provided.
        actual: usize,
    },

    /// The hull backend rejected the point set (flat or collinear input).
    #[error("convex hull computation failed: {message}")]
    HullFailed {
        /// Backend error description.
        message: String,
    },

    /// Invalid configuration parameter.
    #[error("invalid parameter `{name}`: {message}")]
    InvalidParams {
        /// Name of the offending parameter.
        name: &'static str,
        /// Description of the problem.
        message: String,
    },
}

impl StabilityError {
    pub(crate) fn invalid_param(name: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidParams {
            name,
            message: message.into(),
        }
    }
}
