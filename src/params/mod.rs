//! User-facing generation parameters and change notifications.
//!
//! Collaborators hold a [`GenerationParameters`] snapshot and hand it to the
//! pipeline together with a [`ParamChange`] saying which group changed, so
//! only the affected maps are regenerated.

use serde::{Deserialize, Serialize};

use crate::climate::{HumidityConfig, TemperatureConfig};
use crate::terrain::{ElevationBackend, ElevationConfig};

/// Tile counts per subdivision level (`10 * 4^level + 2`).
pub const TILE_COUNTS: [usize; 6] = [12, 42, 162, 642, 2562, 10242];

/// Highest supported subdivision level.
pub const MAX_SUBDIVISIONS: u32 = 5;

/// Which per-tile field is painted onto the mesh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Layer {
    Elevation,
    Temperature,
    Humidity,
    /// Biome classification combining all three maps.
    Composite,
}

impl Layer {
    pub fn name(&self) -> &'static str {
        match self {
            Layer::Elevation => "elevation",
            Layer::Temperature => "temperature",
            Layer::Humidity => "humidity",
            Layer::Composite => "composite",
        }
    }

    pub fn all() -> [Layer; 4] {
        [
            Layer::Elevation,
            Layer::Temperature,
            Layer::Humidity,
            Layer::Composite,
        ]
    }
}

/// Which parameter group a collaborator changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamChange {
    /// Continent scale, ocean ratio, or the reserved variance slot.
    Elevation,
    /// Any temperature controller value.
    Temperature,
    /// Any humidity controller value.
    Humidity,
    /// The master seed; every noise field depends on it.
    Seed,
    /// Subdivision level; the mesh itself is rebuilt.
    Subdivisions,
    /// Active display layer only; no map is regenerated.
    Layer,
}

impl ParamChange {
    pub fn name(&self) -> &'static str {
        match self {
            ParamChange::Elevation => "elevation",
            ParamChange::Temperature => "temperature",
            ParamChange::Humidity => "humidity",
            ParamChange::Seed => "seed",
            ParamChange::Subdivisions => "subdivisions",
            ParamChange::Layer => "layer",
        }
    }
}

/// Snapshot of every generation control.
///
/// All fields are free-standing values; the pipeline converts them into the
/// per-generator configs on each update. The `Default` carries the preset a
/// fresh planet starts from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GenerationParameters {
    /// Master seed; generator noise fields derive sub-seeds from it.
    pub seed: u64,
    /// Icosphere subdivision level (0..=5).
    pub subdivisions: u32,
    /// Active display layer.
    pub layer: Layer,
    /// Which backend runs the elevation stages.
    pub backend: ElevationBackend,

    /// Continent frequency multiplier (>0).
    pub continent_scale: f32,
    /// Fraction of tiles below sea level (0-1).
    pub ocean_ratio: f32,
    /// Reserved elevation slot; serialized for preset compatibility but not
    /// read by the generation formulas.
    pub variance: f32,

    /// Base temperature at the equator (0-1).
    pub equator_temperature: f32,
    /// How much colder the poles are than the equator (0-1).
    pub polar_temperature_drop: f32,
    /// Temperature drop per unit of elevation above sea level.
    pub temperature_lapse_rate: f32,

    /// Base humidity at the equator (0-1).
    pub equator_humidity: f32,
    /// How much drier the poles are than the equator (0-1).
    pub polar_humidity_drop: f32,
    /// Humidity drop per unit of elevation above sea level.
    pub elevation_humidity_drop: f32,
    /// Humidity bonus for tiles at or below sea level (0-1).
    pub water_influence: f32,
}

impl Default for GenerationParameters {
    fn default() -> Self {
        Self {
            seed: 0,
            subdivisions: 3,
            layer: Layer::Composite,
            backend: ElevationBackend::default(),

            continent_scale: 2.5,
            ocean_ratio: 0.65,
            variance: 1.0,

            equator_temperature: 0.8,
            polar_temperature_drop: 0.9,
            temperature_lapse_rate: 0.5,

            equator_humidity: 0.7,
            polar_humidity_drop: 0.8,
            elevation_humidity_drop: 0.6,
            water_influence: 0.4,
        }
    }
}

impl GenerationParameters {
    pub fn elevation_config(&self) -> ElevationConfig {
        ElevationConfig {
            continent_scale: self.continent_scale,
            ocean_ratio: self.ocean_ratio,
            variance: self.variance,
            backend: self.backend,
            ..ElevationConfig::default()
        }
    }

    pub fn temperature_config(&self) -> TemperatureConfig {
        TemperatureConfig {
            equator_temperature: self.equator_temperature,
            polar_drop: self.polar_temperature_drop,
            lapse_rate: self.temperature_lapse_rate,
        }
    }

    pub fn humidity_config(&self) -> HumidityConfig {
        HumidityConfig {
            equator_humidity: self.equator_humidity,
            polar_drop: self.polar_humidity_drop,
            elevation_drop: self.elevation_humidity_drop,
            water_influence: self.water_influence,
        }
    }

    /// Tile count the current subdivision level produces.
    pub fn tile_count(&self) -> usize {
        TILE_COUNTS[self.subdivisions as usize]
    }
}

/// A named parameter snapshot, the unit the CLI saves and loads as JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanetPreset {
    pub name: String,
    pub parameters: GenerationParameters,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_snapshot_matches_the_presets() {
        let params = GenerationParameters::default();
        assert_eq!(params.subdivisions, 3);
        assert_eq!(params.layer, Layer::Composite);
        assert_eq!(
            (params.continent_scale, params.ocean_ratio, params.variance),
            (2.5, 0.65, 1.0)
        );
        assert_eq!(
            (
                params.equator_temperature,
                params.polar_temperature_drop,
                params.temperature_lapse_rate
            ),
            (0.8, 0.9, 0.5)
        );
        assert_eq!(
            (
                params.equator_humidity,
                params.polar_humidity_drop,
                params.elevation_humidity_drop,
                params.water_influence
            ),
            (0.7, 0.8, 0.6, 0.4)
        );
    }

    #[test]
    fn tile_count_table_follows_the_formula() {
        for (level, &count) in TILE_COUNTS.iter().enumerate() {
            assert_eq!(count, 10 * 4usize.pow(level as u32) + 2);
        }
    }

    #[test]
    fn configs_carry_the_snapshot_values() {
        let params = GenerationParameters {
            continent_scale: 1.5,
            ocean_ratio: 0.4,
            equator_temperature: 0.9,
            water_influence: 0.2,
            ..GenerationParameters::default()
        };
        assert_eq!(params.elevation_config().continent_scale, 1.5);
        assert_eq!(params.elevation_config().ocean_ratio, 0.4);
        assert_eq!(params.temperature_config().equator_temperature, 0.9);
        assert_eq!(params.humidity_config().water_influence, 0.2);
    }

    #[test]
    fn preset_round_trips_through_json() {
        let preset = PlanetPreset {
            name: "aqua".to_string(),
            parameters: GenerationParameters {
                seed: 42,
                ocean_ratio: 0.9,
                ..GenerationParameters::default()
            },
        };
        let json = serde_json::to_string(&preset).unwrap();
        let back: PlanetPreset = serde_json::from_str(&json).unwrap();
        assert_eq!(back, preset);
    }
}
