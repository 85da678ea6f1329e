//! Biome classification and composite tile coloring.
//!
//! A deterministic cascade of height, temperature, and humidity thresholds.
//! The boundary values are fixed constants; they define the visible biome
//! map, so changing one changes every planet.

mod palette;

pub use palette::{elevation_color, humidity_color, lerp_rgba, scale_rgb, temperature_color};

use crate::mesh::Rgba;

// Ocean depth bands (heights strictly below sea level).
const DEEP_OCEAN_MAX: f32 = -0.5;
const OCEAN_MAX: f32 = -0.15;

// Land height bands.
const LOWLAND_MAX: f32 = 0.3;
const HILLS_MAX: f32 = 0.55;
const MOUNTAINS_MAX: f32 = 0.7;
const PEAKS_MAX: f32 = 0.8;

// Temperature cascade, coldest first.
const FROZEN_MAX_TEMP: f32 = 0.15;
const COLD_MAX_TEMP: f32 = 0.35;
const TEMPERATE_MAX_TEMP: f32 = 0.7;

// Wet/dry discriminators per temperature band.
const BOREAL_MIN_HUMIDITY: f32 = 0.4;
const TEMPERATE_MIN_HUMIDITY: f32 = 0.35;
const RAINFOREST_MIN_HUMIDITY: f32 = 0.45;

// Floor of the ocean range, used for band-relative shading.
const OCEAN_FLOOR: f32 = -1.0;

/// Discrete biome label for one tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Biome {
    DeepOcean,
    Ocean,
    Shallows,
    Frozen,
    Tundra,
    Boreal,
    Temperate,
    Desert,
    Rainforest,
}

impl Biome {
    pub fn name(&self) -> &'static str {
        match self {
            Biome::DeepOcean => "deep ocean",
            Biome::Ocean => "ocean",
            Biome::Shallows => "shallows",
            Biome::Frozen => "frozen",
            Biome::Tundra => "tundra",
            Biome::Boreal => "boreal",
            Biome::Temperate => "temperate",
            Biome::Desert => "desert",
            Biome::Rainforest => "rainforest",
        }
    }

    pub fn is_water(&self) -> bool {
        matches!(self, Biome::DeepOcean | Biome::Ocean | Biome::Shallows)
    }

    /// Base color before band-relative shading.
    pub fn base_color(&self) -> Rgba {
        match self {
            Biome::DeepOcean => [0.02, 0.07, 0.24, 1.0],
            Biome::Ocean => [0.05, 0.18, 0.45, 1.0],
            Biome::Shallows => [0.22, 0.48, 0.72, 1.0],
            Biome::Frozen => [0.88, 0.92, 0.96, 1.0],
            Biome::Tundra => [0.62, 0.64, 0.56, 1.0],
            Biome::Boreal => [0.13, 0.34, 0.20, 1.0],
            Biome::Temperate => [0.22, 0.52, 0.24, 1.0],
            Biome::Desert => [0.82, 0.72, 0.42, 1.0],
            Biome::Rainforest => [0.06, 0.40, 0.14, 1.0],
        }
    }
}

/// Classifies one tile. Ocean tiles split by depth alone; land tiles run
/// the temperature cascade with humidity as the wet/dry discriminator.
pub fn classify(height: f32, temperature: f32, humidity: f32) -> Biome {
    if height < 0.0 {
        return if height < DEEP_OCEAN_MAX {
            Biome::DeepOcean
        } else if height < OCEAN_MAX {
            Biome::Ocean
        } else {
            Biome::Shallows
        };
    }

    if temperature < FROZEN_MAX_TEMP {
        Biome::Frozen
    } else if temperature < COLD_MAX_TEMP {
        if humidity >= BOREAL_MIN_HUMIDITY {
            Biome::Boreal
        } else {
            Biome::Tundra
        }
    } else if temperature < TEMPERATE_MAX_TEMP {
        if humidity < TEMPERATE_MIN_HUMIDITY {
            Biome::Desert
        } else {
            Biome::Temperate
        }
    } else if humidity < RAINFOREST_MIN_HUMIDITY {
        Biome::Desert
    } else {
        Biome::Rainforest
    }
}

/// Fractional position of `height` within its band, 0 at the bottom edge
/// and 1 at the top.
fn band_position(height: f32) -> f32 {
    let (low, high) = if height < 0.0 {
        if height < DEEP_OCEAN_MAX {
            (OCEAN_FLOOR, DEEP_OCEAN_MAX)
        } else if height < OCEAN_MAX {
            (DEEP_OCEAN_MAX, OCEAN_MAX)
        } else {
            (OCEAN_MAX, 0.0)
        }
    } else if height < LOWLAND_MAX {
        (0.0, LOWLAND_MAX)
    } else if height < HILLS_MAX {
        (LOWLAND_MAX, HILLS_MAX)
    } else if height < MOUNTAINS_MAX {
        (HILLS_MAX, MOUNTAINS_MAX)
    } else {
        (MOUNTAINS_MAX, PEAKS_MAX)
    };
    ((height - low) / (high - low)).clamp(0.0, 1.0)
}

const ROCK: Rgba = [0.46, 0.43, 0.40, 1.0];
const SNOW: Rgba = [0.97, 0.97, 1.0, 1.0];

/// Darkest brightness at the bottom of a band.
const SHADE_FLOOR: f32 = 0.72;

/// Composite layer color: biome base shaded by position inside the height
/// band; the mountain band blends toward rock and the peak band toward snow.
pub fn composite_color(height: f32, temperature: f32, humidity: f32) -> Rgba {
    let biome = classify(height, temperature, humidity);
    let t = band_position(height);
    let base = biome.base_color();

    if biome.is_water() || height < HILLS_MAX {
        return scale_rgb(base, SHADE_FLOOR + (1.0 - SHADE_FLOOR) * t);
    }
    if height < MOUNTAINS_MAX {
        return lerp_rgba(base, ROCK, t);
    }
    lerp_rgba(ROCK, SNOW, t)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn depth_bands_split_the_ocean() {
        assert_eq!(classify(-0.8, 0.5, 0.5), Biome::DeepOcean);
        assert_eq!(classify(-0.3, 0.5, 0.5), Biome::Ocean);
        assert_eq!(classify(-0.05, 0.5, 0.5), Biome::Shallows);
    }

    #[test]
    fn land_cascade_is_order_sensitive() {
        // Frozen wins regardless of humidity.
        assert_eq!(classify(0.1, 0.05, 0.9), Biome::Frozen);
        // Cold band splits on humidity 0.4.
        assert_eq!(classify(0.1, 0.25, 0.3), Biome::Tundra);
        assert_eq!(classify(0.1, 0.25, 0.5), Biome::Boreal);
        // Mid band splits on humidity 0.35.
        assert_eq!(classify(0.1, 0.5, 0.2), Biome::Desert);
        assert_eq!(classify(0.1, 0.5, 0.6), Biome::Temperate);
        // Hot band splits on humidity 0.45.
        assert_eq!(classify(0.1, 0.9, 0.4), Biome::Desert);
        assert_eq!(classify(0.1, 0.9, 0.7), Biome::Rainforest);
    }

    #[test]
    fn band_thresholds_are_inclusive_at_the_top() {
        // Exactly at a boundary belongs to the band above it.
        assert_eq!(classify(0.0, 0.5, 0.5), Biome::Temperate);
        assert_eq!(classify(-0.15, 0.5, 0.5), Biome::Shallows);
    }

    #[test]
    fn band_position_spans_zero_to_one() {
        assert_eq!(band_position(0.0), 0.0);
        assert!((band_position(LOWLAND_MAX - 1e-6) - 1.0).abs() < 1e-4);
        assert_eq!(band_position(PEAKS_MAX), 1.0);
        assert_eq!(band_position(OCEAN_FLOOR), 0.0);
    }

    #[test]
    fn brightness_rises_within_a_band() {
        let dark = composite_color(0.02, 0.5, 0.6);
        let light = composite_color(0.28, 0.5, 0.6);
        assert!(light[1] > dark[1], "expected brighter green near the band top");
    }

    #[test]
    fn peaks_fade_to_snow() {
        let peak = composite_color(0.8, 0.5, 0.5);
        for channel in &peak[0..3] {
            assert!(*channel > 0.9, "peak color {peak:?} is not snow-like");
        }
    }

    #[test]
    fn composite_colors_stay_in_range() {
        for hi in -20..=16 {
            for ti in 0..=10 {
                for wi in 0..=10 {
                    let color = composite_color(
                        hi as f32 * 0.05,
                        ti as f32 * 0.1,
                        wi as f32 * 0.1,
                    );
                    assert!(color.iter().all(|c| (0.0..=1.0).contains(c)));
                }
            }
        }
    }

    #[test]
    fn classification_is_pure() {
        assert_eq!(classify(0.4, 0.6, 0.5), classify(0.4, 0.6, 0.5));
        assert_eq!(
            composite_color(0.4, 0.6, 0.5),
            composite_color(0.4, 0.6, 0.5)
        );
    }
}
