//! Headless wgpu context for the elevation compute path.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TerrainGpuError {
    #[error("No suitable GPU adapter found")]
    NoAdapter,
    #[error("Failed to request device: {0}")]
    RequestDevice(String),
}

/// Holds a wgpu device/queue used for elevation compute.
///
/// This is intentionally small; pipeline setup lives in `pipelines.rs`.
pub struct TerrainGpuContext {
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
}

impl TerrainGpuContext {
    /// Create a headless wgpu device/queue suitable for compute.
    pub async fn new() -> Result<Self, TerrainGpuError> {
        let instance = wgpu::Instance::default();
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: None,
                force_fallback_adapter: false,
            })
            .await
            .ok_or(TerrainGpuError::NoAdapter)?;

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("planetile-terrain-device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: wgpu::MemoryHints::Performance,
                },
                None,
            )
            .await
            .map_err(|e| TerrainGpuError::RequestDevice(e.to_string()))?;

        Ok(Self { device, queue })
    }
}
