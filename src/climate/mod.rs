//! Climate derivation: temperature and humidity fields over the tile mesh.
//!
//! Both generators consume the current height map and tile positions and
//! re-run fully on any parameter change.

mod config;
mod humidity;
mod temperature;

pub use config::{HumidityConfig, TemperatureConfig};
pub use humidity::HumidityGenerator;
pub use temperature::TemperatureGenerator;
