//! Orchestration of mesh, generators, and recoloring.
//!
//! [`PlanetPipeline`] owns every generator plus the mesh, runs the
//! elevation → temperature → humidity chain, and reacts to parameter-change
//! notifications by regenerating exactly the dependent maps before
//! repainting the active layer.

use std::time::Instant;

use glam::Vec3;
use thiserror::Error;

use crate::biomes;
use crate::climate::{HumidityGenerator, TemperatureGenerator};
use crate::mesh::{Rgba, TileMesh};
use crate::params::{GenerationParameters, Layer, ParamChange};
use crate::terrain::ElevationGenerator;
use crate::terrain::wgpu::TerrainGpuError;

/// Mesh radius; generators sample unit positions, so only rendering sees it.
const PLANET_RADIUS: f32 = 1.0;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Elevation backend failed: {0}")]
    Backend(#[from] TerrainGpuError),
    #[error("Subdivision level {0} exceeds the supported maximum {1}")]
    SubdivisionOutOfRange(u32, u32),
}

/// Owns the planet state and keeps it consistent with the parameters.
pub struct PlanetPipeline {
    params: GenerationParameters,
    mesh: TileMesh,
    /// Unit tile centers, extracted once per mesh build.
    positions: Vec<Vec3>,
    elevation: ElevationGenerator,
    temperature: TemperatureGenerator,
    humidity: HumidityGenerator,
}

impl PlanetPipeline {
    /// Builds the mesh, runs the full generation chain once, and paints the
    /// selected layer.
    pub fn new(params: GenerationParameters) -> Result<Self, PipelineError> {
        if params.subdivisions > crate::params::MAX_SUBDIVISIONS {
            return Err(PipelineError::SubdivisionOutOfRange(
                params.subdivisions,
                crate::params::MAX_SUBDIVISIONS,
            ));
        }

        let mesh = TileMesh::new(PLANET_RADIUS, params.subdivisions);
        let positions = mesh.unit_tile_centers();
        let mut pipeline = Self {
            elevation: ElevationGenerator::new(params.seed, params.elevation_config()),
            temperature: TemperatureGenerator::new(params.seed, params.temperature_config()),
            humidity: HumidityGenerator::new(params.seed, params.humidity_config()),
            params,
            mesh,
            positions,
        };
        pipeline.regenerate_all()?;
        pipeline.recolor();
        Ok(pipeline)
    }

    pub fn params(&self) -> &GenerationParameters {
        &self.params
    }

    pub fn mesh(&self) -> &TileMesh {
        &self.mesh
    }

    pub fn heights(&self) -> &[f32] {
        self.elevation.heights()
    }

    pub fn temperature_map(&self) -> &[f32] {
        self.temperature.map()
    }

    pub fn humidity_map(&self) -> &[f32] {
        self.humidity.map()
    }

    /// Applies a new snapshot, regenerating only what `change` affects.
    ///
    /// Temperature and humidity consume the height map, so elevation-level
    /// changes re-run them too; a layer switch only repaints.
    pub fn update(
        &mut self,
        params: GenerationParameters,
        change: ParamChange,
    ) -> Result<(), PipelineError> {
        if params.subdivisions > crate::params::MAX_SUBDIVISIONS {
            return Err(PipelineError::SubdivisionOutOfRange(
                params.subdivisions,
                crate::params::MAX_SUBDIVISIONS,
            ));
        }
        self.params = params;

        let started = Instant::now();
        match change {
            ParamChange::Layer => {}
            ParamChange::Elevation => {
                self.elevation.set_config(self.params.elevation_config());
                self.elevation.regenerate(&self.positions)?;
                self.regenerate_climate();
            }
            ParamChange::Temperature => {
                self.temperature.set_config(self.params.temperature_config());
                self.temperature
                    .generate(&self.positions, self.elevation.heights());
            }
            ParamChange::Humidity => {
                self.humidity.set_config(self.params.humidity_config());
                self.humidity
                    .generate(&self.positions, self.elevation.heights());
            }
            ParamChange::Seed => {
                self.elevation.reseed(self.params.seed);
                self.temperature.reseed(self.params.seed);
                self.humidity.reseed(self.params.seed);
                self.regenerate_all()?;
            }
            ParamChange::Subdivisions => {
                self.mesh = TileMesh::new(PLANET_RADIUS, self.params.subdivisions);
                self.positions = self.mesh.unit_tile_centers();
                self.regenerate_all()?;
            }
        }
        if change != ParamChange::Layer {
            log::info!(
                "pipeline: {} update regenerated {} tiles in {:?}",
                change.name(),
                self.mesh.tile_count(),
                started.elapsed()
            );
        }

        self.recolor();
        Ok(())
    }

    fn regenerate_all(&mut self) -> Result<(), PipelineError> {
        self.elevation.set_config(self.params.elevation_config());
        self.temperature.set_config(self.params.temperature_config());
        self.humidity.set_config(self.params.humidity_config());
        self.elevation.regenerate(&self.positions)?;
        self.regenerate_climate();
        Ok(())
    }

    fn regenerate_climate(&mut self) {
        self.temperature
            .generate(&self.positions, self.elevation.heights());
        self.humidity
            .generate(&self.positions, self.elevation.heights());
    }

    /// Repaints every tile from the already-computed maps; no generator runs.
    ///
    /// Skipped with a warning when a map the layer reads does not cover the
    /// current tile count (a failed regeneration after a mesh rebuild); the
    /// mesh keeps its previous colors.
    pub fn recolor(&mut self) {
        let layer = self.params.layer;
        let tiles = self.mesh.tile_count();
        let climate_current = match layer {
            Layer::Elevation => true,
            Layer::Temperature => self.temperature.map().len() == tiles,
            Layer::Humidity => self.humidity.map().len() == tiles,
            Layer::Composite => {
                self.temperature.map().len() == tiles && self.humidity.map().len() == tiles
            }
        };
        if self.elevation.heights().len() != tiles || !climate_current {
            log::warn!(
                "pipeline: {} layer maps do not cover {} tiles, skipping recolor",
                layer.name(),
                tiles
            );
            return;
        }
        for tile in 0..tiles {
            let color = self.layer_color(layer, tile);
            self.mesh.set_tile_color(tile, color);
        }
    }

    fn layer_color(&self, layer: Layer, tile: usize) -> Rgba {
        let height = self.elevation.heights()[tile];
        match layer {
            Layer::Elevation => biomes::elevation_color(height),
            Layer::Temperature => biomes::temperature_color(self.temperature.map()[tile]),
            Layer::Humidity => biomes::humidity_color(self.humidity.map()[tile]),
            Layer::Composite => biomes::composite_color(
                height,
                self.temperature.map()[tile],
                self.humidity.map()[tile],
            ),
        }
    }

    /// Realized fraction of tiles below sea level.
    pub fn ocean_fraction(&self) -> f32 {
        let heights = self.elevation.heights();
        if heights.is_empty() {
            return 0.0;
        }
        heights.iter().filter(|&&h| h < 0.0).count() as f32 / heights.len() as f32
    }

    /// (min, max) of the current height map, (0, 0) while empty.
    pub fn height_range(&self) -> (f32, f32) {
        let heights = self.elevation.heights();
        heights.iter().fold((0.0f32, 0.0f32), |(lo, hi), &h| {
            (lo.min(h), hi.max(h))
        })
    }
}
