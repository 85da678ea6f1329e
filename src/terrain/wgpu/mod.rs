//! wgpu compute implementation of the elevation stages.

mod context;
mod pipelines;

pub use context::{TerrainGpuContext, TerrainGpuError};
pub use pipelines::ElevationGpu;
