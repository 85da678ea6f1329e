//! Elevation generator: one stage sequence, two executors.
//!
//! The CPU path in `cpu.rs` is the reference; the GPU path mirrors it
//! kernel-for-pass. Backend selection happens here so callers only see
//! `regenerate`.

use glam::Vec3;

use crate::noise::SeededNoise;
use crate::terrain::config::{ElevationBackend, ElevationConfig};
use crate::terrain::cpu;
use crate::terrain::wgpu::{ElevationGpu, TerrainGpuContext, TerrainGpuError};

/// Owns the height map, the seeded noise field, and the backend choice.
pub struct ElevationGenerator {
    noise: SeededNoise,
    config: ElevationConfig,
    heights: Vec<f32>,
    gpu: Option<ElevationGpu>,
    gpu_probed: bool,
}

impl ElevationGenerator {
    pub fn new(seed: u64, config: ElevationConfig) -> Self {
        Self {
            noise: SeededNoise::new(seed),
            config,
            heights: Vec::new(),
            gpu: None,
            gpu_probed: false,
        }
    }

    /// Rebuilds the noise field (and its permutation table) from a new
    /// master seed. The map is stale until the next [`regenerate`](Self::regenerate).
    pub fn reseed(&mut self, seed: u64) {
        self.noise = SeededNoise::new(seed);
    }

    pub fn set_config(&mut self, config: ElevationConfig) {
        self.config = config;
    }

    pub fn config(&self) -> &ElevationConfig {
        &self.config
    }

    /// Per-tile heights in [-1, 0.8]; empty until the first generation.
    pub fn heights(&self) -> &[f32] {
        &self.heights
    }

    /// Lazily acquires the GPU executor; the adapter probe runs once and
    /// the outcome is cached either way.
    fn gpu(&mut self) -> Option<&ElevationGpu> {
        if !self.gpu_probed {
            self.gpu_probed = true;
            match pollster::block_on(TerrainGpuContext::new()) {
                Ok(ctx) => {
                    log::info!("elevation: GPU backend available");
                    self.gpu = Some(ElevationGpu::new(ctx));
                }
                Err(e) => log::warn!("elevation: GPU unavailable ({e})"),
            }
        }
        self.gpu.as_ref()
    }

    /// Runs both elevation passes from scratch on the configured backend.
    ///
    /// `Auto` prefers the GPU and falls back to the CPU path on any GPU
    /// failure; `GpuOnly` propagates the failure instead.
    pub fn regenerate(&mut self, positions: &[Vec3]) -> Result<(), TerrainGpuError> {
        self.heights = match self.config.backend {
            ElevationBackend::CpuOnly => cpu::run(&self.noise, positions, &self.config),
            ElevationBackend::GpuOnly => {
                let perm = *self.noise.permutation();
                let config = self.config;
                let gpu = self.gpu().ok_or(TerrainGpuError::NoAdapter)?;
                gpu.run(positions, &perm, &config)?
            }
            ElevationBackend::Auto => {
                let perm = *self.noise.permutation();
                let config = self.config;
                match self.gpu().map(|gpu| gpu.run(positions, &perm, &config)) {
                    Some(Ok(heights)) => heights,
                    Some(Err(e)) => {
                        log::warn!("elevation: GPU run failed ({e}), falling back to CPU");
                        cpu::run(&self.noise, positions, &config)
                    }
                    None => cpu::run(&self.noise, positions, &config),
                }
            }
        };
        Ok(())
    }
}
