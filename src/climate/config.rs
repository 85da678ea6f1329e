//! Climate generator configuration.

use serde::{Deserialize, Serialize};

/// Parameters for the latitudinal temperature model.
///
/// All values are unitless fractions of the [0, 1] temperature range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TemperatureConfig {
    /// Base temperature at the equator, at sea level (0-1, 1 = hottest).
    pub equator_temperature: f32,
    /// How much colder the poles are than the equator (0-1).
    pub polar_drop: f32,
    /// Temperature drop per unit of elevation above sea level; 0.5 means
    /// the reference maximum elevation cools a tile by half the range.
    pub lapse_rate: f32,
}

impl Default for TemperatureConfig {
    fn default() -> Self {
        Self {
            equator_temperature: 0.8,
            polar_drop: 0.9,
            lapse_rate: 0.5,
        }
    }
}

/// Parameters for the latitudinal humidity model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HumidityConfig {
    /// Base humidity at the equator (0-1, 1 = most humid).
    pub equator_humidity: f32,
    /// How much drier the poles are than the equator (0-1).
    pub polar_drop: f32,
    /// Humidity drop per unit of elevation above sea level.
    pub elevation_drop: f32,
    /// Humidity bonus for tiles at or below sea level (0-1).
    pub water_influence: f32,
}

impl Default for HumidityConfig {
    fn default() -> Self {
        Self {
            equator_humidity: 0.7,
            polar_drop: 0.8,
            elevation_drop: 0.6,
            water_influence: 0.4,
        }
    }
}
