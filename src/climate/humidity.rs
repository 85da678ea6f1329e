//! Per-tile humidity derived from latitude, elevation, and water proximity.

use glam::Vec3;
use rayon::prelude::*;

use crate::climate::HumidityConfig;
use crate::noise::SeededNoise;

/// Perturbation amplitude of the noise term.
const NOISE_INFLUENCE: f32 = 0.2;
/// Sampling frequency of the noise term.
const NOISE_FREQUENCY: f32 = 3.0;
/// Decorrelates the humidity field from the other noise fields.
const SEED_OFFSET: u64 = 0x51ed;

/// Owns the humidity map and re-derives it on demand.
pub struct HumidityGenerator {
    noise: SeededNoise,
    config: HumidityConfig,
    map: Vec<f32>,
}

impl HumidityGenerator {
    pub fn new(seed: u64, config: HumidityConfig) -> Self {
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

    pub fn set_config(&mut self, config: HumidityConfig) {
        self.config = config;
    }

    /// Per-tile values in [0, 1]; empty until the first generation.
    pub fn map(&self) -> &[f32] {
        &self.map
    }

    /// Recomputes the whole map from tile positions and the height map.
    ///
    /// Skipped with a warning when the height map length does not match the
    /// tile count; the prior valid map is retained.
    pub fn generate(&mut self, positions: &[Vec3], heights: &[f32]) {
        if heights.len() != positions.len() {
            log::warn!(
                "humidity: height map has {} entries for {} tiles, skipping",
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
            .map(|(&pos, &height)| tile_humidity(noise, &config, pos, height))
            .collect();
    }
}

/// Latitude gradient minus elevation drying, plus a water-proximity bonus
/// at or below sea level and a noise perturbation, clamped to [0, 1].
fn tile_humidity(noise: &SeededNoise, config: &HumidityConfig, pos: Vec3, height: f32) -> f32 {
    let latitude = pos.y.abs();
    let latitude_humidity = config.equator_humidity * (1.0 - latitude * config.polar_drop);

    let elevation_factor = height.max(0.0);
    let mut humidity = latitude_humidity - elevation_factor * config.elevation_drop;

    if height <= 0.0 {
        humidity += config.water_influence * (1.0 - elevation_factor);
    }

    let normalized_noise = (noise.sample(pos * NOISE_FREQUENCY) + 1.0) * 0.5;
    humidity += (normalized_noise - 0.5) * NOISE_INFLUENCE;

    humidity.clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::TileMesh;

    fn generated(seed: u64) -> (Vec<Vec3>, HumidityGenerator) {
        let positions = TileMesh::new(1.0, 2).unit_tile_centers();
        let heights: Vec<f32> = positions
            .iter()
            .enumerate()
            .map(|(i, _)| if i % 3 == 0 { -0.4 } else { 0.2 })
            .collect();
        let mut generator = HumidityGenerator::new(seed, HumidityConfig::default());
        generator.generate(&positions, &heights);
        (positions, generator)
    }

    #[test]
    fn values_stay_in_the_unit_range() {
        let (positions, generator) = generated(42);
        assert_eq!(generator.map().len(), positions.len());
        assert!(generator.map().iter().all(|v| (0.0..=1.0).contains(v)));
    }

    #[test]
    fn water_tiles_are_wetter_than_highlands() {
        let noise = SeededNoise::new(5);
        let config = HumidityConfig::default();
        let pos = Vec3::new(0.9, 0.1, 0.42).normalize();
        let ocean = tile_humidity(&noise, &config, pos, -0.3);
        let mountain = tile_humidity(&noise, &config, pos, 0.6);
        assert!(ocean > mountain, "ocean {ocean} vs mountain {mountain}");
    }

    #[test]
    fn poles_are_drier_than_the_equator() {
        let noise = SeededNoise::new(5);
        let config = HumidityConfig::default();
        let equator = tile_humidity(&noise, &config, Vec3::new(1.0, 0.0, 0.0), 0.1);
        let pole = tile_humidity(&noise, &config, Vec3::new(0.0, 1.0, 0.0), 0.1);
        assert!(equator > pole);
    }

    #[test]
    fn mismatched_height_map_keeps_the_prior_map() {
        let (positions, mut generator) = generated(3);
        let before = generator.map().to_vec();
        generator.generate(&positions, &[0.0, 1.0]);
        assert_eq!(generator.map(), before.as_slice());
    }

    #[test]
    fn generation_is_deterministic() {
        let (_, a) = generated(11);
        let (_, b) = generated(11);
        assert_eq!(a.map(), b.map());
    }

    #[test]
    fn reseeding_changes_the_field() {
        let (positions, mut generator) = generated(1);
        let before = generator.map().to_vec();
        generator.reseed(2);
        let heights: Vec<f32> = positions
            .iter()
            .enumerate()
            .map(|(i, _)| if i % 3 == 0 { -0.4 } else { 0.2 })
            .collect();
        generator.generate(&positions, &heights);
        assert_ne!(generator.map(), before.as_slice());
    }
}
