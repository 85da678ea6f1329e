//! Elevation configuration.

use serde::{Deserialize, Serialize};

/// Which backend runs the elevation stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ElevationBackend {
    /// Prefer GPU; if GPU init fails, fall back to CPU.
    Auto,
    /// Require GPU (fail construction if unavailable).
    GpuOnly,
    /// Force the sequential CPU implementation.
    CpuOnly,
}

impl Default for ElevationBackend {
    fn default() -> Self {
        Self::Auto
    }
}

/// Parameters for the two elevation passes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ElevationConfig {
    /// Continent frequency multiplier (>0). Higher values mean more,
    /// smaller landmasses.
    pub continent_scale: f32,
    /// Fraction of tiles below sea level (0-1). Values >= 1.0 produce an
    /// ocean world.
    pub ocean_ratio: f32,
    /// Reserved parameter slot carried for preset compatibility; not read
    /// by the generation formulas.
    pub variance: f32,
    /// Fraction of the ocean depth span past which trenches may open (0-1).
    pub deep_ocean_start: f32,
    /// Which backend runs the stages.
    pub backend: ElevationBackend,
}

impl Default for ElevationConfig {
    fn default() -> Self {
        Self {
            continent_scale: 2.5,
            ocean_ratio: 0.65,
            variance: 1.0,
            deep_ocean_start: 0.5,
            backend: ElevationBackend::default(),
        }
    }
}
