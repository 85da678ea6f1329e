//! Per-tile temperature derived from latitude, elevation, and noise.

use glam::Vec3;
use rayon::prelude::*;

use crate::climate::TemperatureConfig;
use crate::noise::SeededNoise;

/// Perturbation amplitude of the noise term.
const NOISE_INFLUENCE: f32 = 0.1;
/// Sampling frequency of the noise term.
const NOISE_FREQUENCY: f32 = 4.0;
/// Elevation at which the full lapse-rate drop applies.
const REFERENCE_MAX_ELEVATION: f32 = 1.0;
/// Decorrelates the temperature field from the elevation noise while keeping
/// the whole planet reproducible from one master seed.
const SEED_OFFSET: u64 = 0x9e37;

/// Owns the temperature map and re-derives it on demand.
///
/// Derivation is per-tile independent; the parallel iterator writes each
/// slot exactly once, so repeated runs are deterministic.
pub struct TemperatureGenerator {
    noise: SeededNoise,
    config: TemperatureConfig,
    map: Vec<f32>,
}

impl TemperatureGenerator {
    pub fn new(seed: u64, config: TemperatureConfig) -> Self {
        Self {
            noise: SeededNoise::new(seed.wrapping_add(SEED_OFFSET)),
            config,
            map: Vec::new(),
        }
    }

    /// Rebuilds the noise field from a new master seed. The map is stale
    /// until the next [`generate`](Self::generate).
    pub fn reseed(&mut self, seed: u64) {
        self.noise = SeededNoise::new(seed.wrapping_add(SEED_OFFSET));
    }

    pub fn set_config(&mut self, config: TemperatureConfig) {
        self.config = config;
    }

    /// Per-tile values in [0, 1]; empty until the first generation.
    pub fn map(&self) -> &[f32] {
        &self.map
    }

    /// Recomputes the whole map from tile positions and the height map.
    ///
    /// A height map whose length does not match the tile count means the
    /// mesh was rebuilt and elevation has not caught up yet; the derivation
    /// is skipped and the prior valid map retained.
    pub fn generate(&mut self, positions: &[Vec3], heights: &[f32]) {
        if heights.len() != positions.len() {
            log::warn!(
                "temperature: height map has {} entries for {} tiles, skipping",
                heights.len(),
                positions.len()
            );
            return;
        }

        let noise = &self.noise;
        let config = self.config;
        self.map = positions
            .par_iter()
            .zip(heights.par_iter())
            .map(|(&pos, &height)| tile_temperature(noise, &config, pos, height))
            .collect();
    }
}

/// Latitude gradient minus lapse-rate cooling, plus a small noise
/// perturbation, clamped to [0, 1].
fn tile_temperature(noise: &SeededNoise, config: &TemperatureConfig, pos: Vec3, height: f32) -> f32 {
    // Y is the polar axis: 0 at the equator, 1 at either pole.
    let latitude = pos.y.abs();
    let latitude_temperature = config.equator_temperature * (1.0 - latitude * config.polar_drop);

    // Only elevation above sea level cools; the drop is capped at the full range.
    let above_sea = height.max(0.0);
    let elevation_drop = (above_sea / REFERENCE_MAX_ELEVATION * config.lapse_rate).min(1.0);

    let normalized_noise = (noise.sample(pos * NOISE_FREQUENCY) + 1.0) * 0.5;
    let noise_effect = (normalized_noise - 0.5) * NOISE_INFLUENCE;

    (latitude_temperature - elevation_drop + noise_effect).clamp(0.0, 1.0)
}
