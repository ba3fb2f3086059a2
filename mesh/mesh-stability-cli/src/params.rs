//! Parameter resolution: preset, optional JSON file, then flag overrides.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use mesh_stability::StabilityParams;
use tracing::debug;

/// Named parameter sets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum Preset {
    /// Reference thresholds.
    #[default]
    Default,
    /// Fewer, clearly distinct poses.
    Strict,
    /// Every stable plane under a very loose height cap.
    Permissive,
}

impl Preset {
    fn params(self) -> StabilityParams {
        match self {
            Self::Default => StabilityParams::default(),
            Self::Strict => StabilityParams::strict(),
            Self::Permissive => StabilityParams::permissive(),
        }
    }
}

/// Tuning flags shared by all models of a batch.
#[derive(Debug, Clone, Default, Args)]
pub struct Tuning {
    /// Starting parameter set
    #[arg(long, value_enum, default_value_t = Preset::Default)]
    pub preset: Preset,

    /// JSON file with parameters (replaces the preset; missing fields use defaults)
    #[arg(long, value_name = "FILE")]
    pub params: Option<PathBuf>,

    /// Angle in radians under which hull facets merge into one plane
    #[arg(long)]
    pub merge_angle: Option<f64>,

    /// Number of largest planes considered
    #[arg(long)]
    pub max_planes: Option<usize>,

    /// Relative area window for curved-surface repeats
    #[arg(long)]
    pub curvature_tolerance: Option<f64>,

    /// Repeats of one curved surface kept beyond the first plane
    #[arg(long)]
    pub max_curved_repeats: Option<u32>,

    /// Drop poses whose center of mass exceeds this multiple of the lowest one
    #[arg(long)]
    pub height_multiplier: Option<f64>,

    /// Angle in radians under which two orientations are duplicates
    #[arg(long)]
    pub duplicate_angle: Option<f64>,
}

impl Tuning {
    /// Build and validate the parameters.
    pub fn resolve(&self) -> Result<StabilityParams> {
        let mut params = match &self.params {
            Some(path) => load_params(path)?,
            None => self.preset.params(),
        };

        if let Some(angle) = self.merge_angle {
            params = params.with_plane_merge_angle(angle);
        }
        if let Some(count) = self.max_planes {
            params = params.with_max_planes(count);
        }
        if let Some(tolerance) = self.curvature_tolerance {
            params = params.with_curvature_area_tolerance(tolerance);
        }
        if let Some(repeats) = self.max_curved_repeats {
            params = params.with_max_curved_repeats(repeats);
        }
        if let Some(multiplier) = self.height_multiplier {
            params = params.with_height_multiplier(multiplier);
        }
        if let Some(angle) = self.duplicate_angle {
            params = params.with_duplicate_angle(angle);
        }

        params.validate().context("invalid parameters")?;
        debug!(?params, "Resolved parameters");
        Ok(params)
    }
}

fn load_params(path: &Path) -> Result<StabilityParams> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read parameter file {}", path.display()))?;
    serde_json::from_str(&text)
        .with_context(|| format!("failed to parse parameter file {}", path.display()))
}
