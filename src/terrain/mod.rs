//! Elevation pipeline: continent mask, ocean thresholding, land/ocean
//! shaping, and spatial smoothing over the tile mesh.

pub mod config;
pub mod cpu;
mod elevation;
pub mod smoothing;
pub mod wgpu;

pub use config::{ElevationBackend, ElevationConfig};
pub use elevation::ElevationGenerator;
pub use smoothing::SpatialSmoother;
