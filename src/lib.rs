//! Seeded tile-planet generator.
//!
//! Builds an icosphere with a dual tile topology and derives per-tile
//! elevation, temperature, humidity, and biome color layers from a single
//! seed. Parameter changes regenerate only the dependent maps and repaint
//! the mesh; elevation can run on a CPU or a wgpu compute backend.

pub mod biomes;
pub mod climate;
pub mod export;
pub mod geometry;
pub mod mesh;
pub mod noise;
pub mod params;
pub mod pipeline;
pub mod terrain;

pub use mesh::TileMesh;
pub use params::{GenerationParameters, Layer, ParamChange, PlanetPreset};
pub use pipeline::{PipelineError, PlanetPipeline};
pub use terrain::{ElevationBackend, ElevationConfig};
