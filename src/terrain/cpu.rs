//! Sequential elevation stages.
//!
//! The reference implementation of the height pipeline: continent mask,
//! mask smoothing, percentile threshold, land/ocean shaping, final
//! smoothing with classification clamps. The GPU kernels mirror these
//! stages; the threshold always runs here because it needs a full sort.

use std::f32::consts::PI;

use glam::Vec3;

use crate::noise::{FractalLayer, SeededNoise, fractal};
use crate::terrain::config::ElevationConfig;
use crate::terrain::smoothing::SpatialSmoother;

/// Continent mask octave stack; its frequency is multiplied by the
/// configured continent scale.
pub const CONTINENT_LAYER: FractalLayer = FractalLayer::new(3, 0.5, 0.5, 1.2);
/// Land surface detail.
pub const LAND_DETAIL_LAYER: FractalLayer = FractalLayer::new(6, 2.0, 0.5, 1.2);
/// Ocean floor detail, fewer octaves so the floor rolls instead of crags.
pub const OCEAN_DETAIL_LAYER: FractalLayer = FractalLayer::new(4, 2.0, 0.5, 1.0);
/// Modulation noise for the coastal mountain band.
pub const MOUNTAIN_LAYER: FractalLayer = FractalLayer::new(4, 3.0, 0.5, 1.0);
/// High-frequency field gating trench placement.
pub const TRENCH_LAYER: FractalLayer = FractalLayer::new(2, 6.0, 0.5, 1.0);

/// Continent mask smoothing, wide enough to merge noise islands into
/// coherent landmasses.
pub const MASK_SMOOTH: SpatialSmoother = SpatialSmoother {
    radius: 0.2,
    iterations: 3,
};
/// Final smoothing, just enough to soften pass-2 seams.
pub const FINAL_SMOOTH: SpatialSmoother = SpatialSmoother {
    radius: 0.05,
    iterations: 1,
};

pub const SEA_LEVEL: f32 = 0.0;
/// Top of the land range.
pub const HIGH_PEAK_LEVEL: f32 = 0.8;
/// Bottom of the ocean range at ocean ratio 1.0.
pub const DEEP_FLOOR_LEVEL: f32 = -1.0;
/// Ocean tiles never rise above this; keeps them strictly below sea level.
pub const OCEAN_CEILING: f32 = -0.01;

/// Share of a land tile's height taken from detail noise vs. the mask base.
const LAND_DETAIL_BLEND: f32 = 0.35;
/// Share of an ocean tile's depth taken from floor detail noise.
const OCEAN_DETAIL_BLEND: f32 = 0.3;
/// Peak contribution of the coastal mountain band.
const MOUNTAIN_BAND_HEIGHT: f32 = 0.45;
/// How strongly the band decays toward continent interiors.
const MOUNTAIN_SHORE_FALLOFF: f32 = 0.5;
/// Trench gate: the trench field must exceed this.
const TRENCH_NOISE_THRESHOLD: f32 = 0.6;
/// Extra depth of a trench, as a fraction of the ocean floor depth.
const TRENCH_DEPTH: f32 = 0.2;

/// Pass 1: raw continent mask in [0, 1], one value per tile.
pub fn continent_mask(noise: &SeededNoise, positions: &[Vec3], continent_scale: f32) -> Vec<f32> {
    let layer = CONTINENT_LAYER.scaled(continent_scale);
    positions
        .iter()
        .map(|&p| fractal::sample_normalized(noise, layer, p))
        .collect()
}

/// Ocean/land cutoff: the smoothed mask value at the ocean-ratio
/// percentile, so the realized ocean fraction tracks the configured ratio
/// regardless of the mask's distribution shape.
pub fn ocean_threshold(mask: &[f32], ocean_ratio: f32) -> f32 {
    if mask.is_empty() {
        return 0.0;
    }
    let mut sorted = mask.to_vec();
    sorted.sort_by(f32::total_cmp);
    let idx = ((mask.len() as f32 * ocean_ratio).floor() as usize).min(mask.len() - 1);
    sorted[idx]
}

/// Pass 2 for a single tile.
pub fn shape_tile(
    noise: &SeededNoise,
    pos: Vec3,
    mask: f32,
    threshold: f32,
    config: &ElevationConfig,
) -> f32 {
    let ocean_world = config.ocean_ratio >= 1.0;
    if !ocean_world && mask >= threshold {
        let land_ratio = 1.0 - config.ocean_ratio;
        let span = if 1.0 - threshold > f32::EPSILON {
            ((mask - threshold) / (1.0 - threshold)).clamp(0.0, 1.0)
        } else {
            0.0
        };

        let base = span * land_ratio * HIGH_PEAK_LEVEL;
        let detail = fractal::sample_normalized(noise, LAND_DETAIL_LAYER, pos);
        let mut height =
            base * (1.0 - LAND_DETAIL_BLEND) + detail * HIGH_PEAK_LEVEL * LAND_DETAIL_BLEND;

        // Mountain band: peaks between coast and interior, fading both ways.
        let band = (span * PI).sin().clamp(0.0, 1.0);
        let ridge = fractal::sample_normalized(noise, MOUNTAIN_LAYER, pos);
        height += band * ridge * MOUNTAIN_BAND_HEIGHT * (1.0 - span * MOUNTAIN_SHORE_FALLOFF);

        height.clamp(SEA_LEVEL, HIGH_PEAK_LEVEL)
    } else {
        let floor = DEEP_FLOOR_LEVEL * config.ocean_ratio.min(1.0);
        let span = if threshold > f32::EPSILON {
            ((threshold - mask) / threshold).clamp(0.0, 1.0)
        } else {
            0.0
        };

        let detail = fractal::sample_normalized(noise, OCEAN_DETAIL_LAYER, pos);
        let mut height = (span * (1.0 - OCEAN_DETAIL_BLEND) + detail * OCEAN_DETAIL_BLEND) * floor;

        let trench = fractal::sample_normalized(noise, TRENCH_LAYER, pos);
        if trench > TRENCH_NOISE_THRESHOLD && span > config.deep_ocean_start {
            height += TRENCH_DEPTH * floor;
        }

        height.clamp(DEEP_FLOOR_LEVEL, OCEAN_CEILING)
    }
}

/// Pass 2 over the whole mask.
pub fn shape_heights(
    noise: &SeededNoise,
    positions: &[Vec3],
    mask: &[f32],
    threshold: f32,
    config: &ElevationConfig,
) -> Vec<f32> {
    positions
        .iter()
        .zip(mask)
        .map(|(&p, &m)| shape_tile(noise, p, m, threshold, config))
        .collect()
}

/// Reapplies the land/ocean clamps after smoothing so the thresholded
/// classification survives averaging across coastlines.
pub fn classify_clamp(heights: &mut [f32], mask: &[f32], threshold: f32, config: &ElevationConfig) {
    let ocean_world = config.ocean_ratio >= 1.0;
    for (height, &m) in heights.iter_mut().zip(mask) {
        *height = if ocean_world || m < threshold {
            height.clamp(DEEP_FLOOR_LEVEL, OCEAN_CEILING)
        } else {
            height.clamp(SEA_LEVEL, HIGH_PEAK_LEVEL)
        };
    }
}

/// The full sequential pipeline: both passes, both smoothing steps.
pub fn run(noise: &SeededNoise, positions: &[Vec3], config: &ElevationConfig) -> Vec<f32> {
    let raw = continent_mask(noise, positions, config.continent_scale);
    let mask = MASK_SMOOTH.apply(&raw, positions);
    let threshold = ocean_threshold(&mask, config.ocean_ratio);
    let shaped = shape_heights(noise, positions, &mask, threshold, config);
    let mut heights = FINAL_SMOOTH.apply(&shaped, positions);
    classify_clamp(&mut heights, &mask, threshold, config);
    heights
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::TileMesh;

    #[test]
    fn threshold_picks_the_requested_percentile() {
        let mask: Vec<f32> = (0..10).map(|i| i as f32 / 10.0).collect();
        assert_eq!(ocean_threshold(&mask, 0.3), 0.3);
        assert_eq!(ocean_threshold(&mask, 0.0), 0.0);
        assert_eq!(ocean_threshold(&mask, 1.0), 0.9);
    }

    #[test]
    fn threshold_handles_degenerate_inputs() {
        assert_eq!(ocean_threshold(&[], 0.5), 0.0);
        assert_eq!(ocean_threshold(&[0.4], 0.65), 0.4);
    }

    #[test]
    fn land_tiles_stay_in_the_land_range() {
        let noise = SeededNoise::new(11);
        let config = ElevationConfig::default();
        for i in 0..50 {
            let pos = Vec3::new((i as f32).sin(), (i as f32 * 0.7).cos(), 0.3).normalize();
            let h = shape_tile(&noise, pos, 0.8, 0.5, &config);
            assert!((SEA_LEVEL..=HIGH_PEAK_LEVEL).contains(&h), "land height {h}");
        }
    }

    #[test]
    fn ocean_tiles_stay_strictly_below_sea_level() {
        let noise = SeededNoise::new(11);
        let config = ElevationConfig::default();
        for i in 0..50 {
            let pos = Vec3::new((i as f32).cos(), (i as f32 * 0.3).sin(), -0.4).normalize();
            let h = shape_tile(&noise, pos, 0.2, 0.5, &config);
            assert!(h <= OCEAN_CEILING, "ocean height {h}");
            assert!(h >= DEEP_FLOOR_LEVEL);
        }
    }

    #[test]
    fn realized_ocean_fraction_tracks_the_ratio() {
        let positions = TileMesh::new(1.0, 2).unit_tile_centers();
        let noise = SeededNoise::new(7);
        let config = ElevationConfig::default();
        let heights = run(&noise, &positions, &config);

        let ocean = heights.iter().filter(|&&h| h < 0.0).count();
        let fraction = ocean as f32 / heights.len() as f32;
        assert!(
            (fraction - config.ocean_ratio).abs() <= 0.02,
            "ocean fraction {fraction} vs configured {}",
            config.ocean_ratio
        );
    }

    #[test]
    fn ocean_world_forces_every_tile_under_water() {
        let positions = TileMesh::new(1.0, 1).unit_tile_centers();
        let noise = SeededNoise::new(3);
        let config = ElevationConfig {
            ocean_ratio: 1.0,
            ..ElevationConfig::default()
        };
        let heights = run(&noise, &positions, &config);
        assert!(heights.iter().all(|&h| h < 0.0));
    }

    #[test]
    fn pipeline_is_deterministic() {
        let positions = TileMesh::new(1.0, 2).unit_tile_centers();
        let config = ElevationConfig::default();
        let a = run(&SeededNoise::new(42), &positions, &config);
        let b = run(&SeededNoise::new(42), &positions, &config);
        assert_eq!(a, b);
    }

    #[test]
    fn heights_are_always_finite() {
        let positions = TileMesh::new(1.0, 2).unit_tile_centers();
        let noise = SeededNoise::new(1234);
        for ratio in [0.0, 0.3, 0.65, 0.99, 1.0] {
            let config = ElevationConfig {
                ocean_ratio: ratio,
                ..ElevationConfig::default()
            };
            let heights = run(&noise, &positions, &config);
            assert!(heights.iter().all(|h| h.is_finite()), "ratio {ratio}");
        }
    }
}
