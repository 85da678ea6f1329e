//! planetile CLI — seeded tile-planet generator.
//!
//! Generates a planet from a parameter snapshot (CLI flags and/or a saved
//! preset), prints summary stats, and exports equirectangular PNG maps of
//! the requested layers.

use std::path::PathBuf;
use std::process;
use std::time::Instant;

use clap::{Parser, ValueEnum};

use planetile::export::export_equirect_png;
use planetile::params::MAX_SUBDIVISIONS;
use planetile::{
    ElevationBackend, GenerationParameters, Layer, ParamChange, PlanetPipeline, PlanetPreset,
};

/// Seeded tile-planet generator.
#[derive(Parser)]
#[command(name = "planetile")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Master seed; every noise field derives from it.
    #[arg(short, long)]
    seed: Option<u64>,

    /// Icosphere subdivision level (0-5; tile counts 12 to 10242).
    #[arg(long)]
    subdivisions: Option<u32>,

    /// Continent frequency multiplier (>0).
    #[arg(long)]
    continent_scale: Option<f32>,

    /// Fraction of tiles below sea level (0-1; >=1 is an ocean world).
    #[arg(long)]
    ocean_ratio: Option<f32>,

    /// Base temperature at the equator (0-1).
    #[arg(long)]
    equator_temperature: Option<f32>,

    /// Polar temperature drop (0-1).
    #[arg(long)]
    polar_temperature_drop: Option<f32>,

    /// Temperature drop per unit of elevation.
    #[arg(long)]
    temperature_lapse_rate: Option<f32>,

    /// Base humidity at the equator (0-1).
    #[arg(long)]
    equator_humidity: Option<f32>,

    /// Polar humidity drop (0-1).
    #[arg(long)]
    polar_humidity_drop: Option<f32>,

    /// Humidity drop per unit of elevation.
    #[arg(long)]
    elevation_humidity_drop: Option<f32>,

    /// Humidity bonus at or below sea level (0-1).
    #[arg(long)]
    water_influence: Option<f32>,

    /// Elevation backend (auto when neither flag nor preset sets it).
    #[arg(long, value_enum)]
    backend: Option<BackendArg>,

    /// Layer to export (composite when neither flag nor preset sets it).
    #[arg(long, value_enum)]
    layer: Option<LayerArg>,

    /// Export every layer instead of just the selected one.
    #[arg(long)]
    all_layers: bool,

    /// Output directory for exported maps.
    #[arg(short, long, default_value = "./output")]
    output: PathBuf,

    /// Base name for output files.
    #[arg(short, long, default_value = "planet")]
    name: String,

    /// Width of the exported maps in pixels (height is width/2).
    #[arg(long, default_value = "1024")]
    width: u32,

    /// Load a saved parameter preset (JSON) before applying flags.
    #[arg(long)]
    params: Option<PathBuf>,

    /// Save the effective parameters as a named preset (JSON).
    #[arg(long)]
    save_params: Option<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
enum BackendArg {
    Auto,
    Gpu,
    Cpu,
}

impl From<BackendArg> for ElevationBackend {
    fn from(value: BackendArg) -> Self {
        match value {
            BackendArg::Auto => ElevationBackend::Auto,
            BackendArg::Gpu => ElevationBackend::GpuOnly,
            BackendArg::Cpu => ElevationBackend::CpuOnly,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum LayerArg {
    Elevation,
    Temperature,
    Humidity,
    Composite,
}

impl From<LayerArg> for Layer {
    fn from(value: LayerArg) -> Self {
        match value {
            LayerArg::Elevation => Layer::Elevation,
            LayerArg::Temperature => Layer::Temperature,
            LayerArg::Humidity => Layer::Humidity,
            LayerArg::Composite => Layer::Composite,
        }
    }
}

fn effective_parameters(cli: &Cli) -> GenerationParameters {
    let mut params = match &cli.params {
        Some(path) => match load_preset(path) {
            Ok(preset) => {
                println!("Loaded preset '{}' from {}", preset.name, path.display());
                preset.parameters
            }
            Err(e) => {
                eprintln!("Error: failed to load preset {}: {e}", path.display());
                process::exit(1);
            }
        },
        None => GenerationParameters::default(),
    };

    if let Some(seed) = cli.seed {
        params.seed = seed;
    }
    if let Some(level) = cli.subdivisions {
        params.subdivisions = level;
    }
    if let Some(v) = cli.continent_scale {
        params.continent_scale = v;
    }
    if let Some(v) = cli.ocean_ratio {
        params.ocean_ratio = v;
    }
    if let Some(v) = cli.equator_temperature {
        params.equator_temperature = v;
    }
    if let Some(v) = cli.polar_temperature_drop {
        params.polar_temperature_drop = v;
    }
    if let Some(v) = cli.temperature_lapse_rate {
        params.temperature_lapse_rate = v;
    }
    if let Some(v) = cli.equator_humidity {
        params.equator_humidity = v;
    }
    if let Some(v) = cli.polar_humidity_drop {
        params.polar_humidity_drop = v;
    }
    if let Some(v) = cli.elevation_humidity_drop {
        params.elevation_humidity_drop = v;
    }
    if let Some(v) = cli.water_influence {
        params.water_influence = v;
    }
    if let Some(backend) = cli.backend {
        params.backend = backend.into();
    }
    if let Some(layer) = cli.layer {
        params.layer = layer.into();
    }
    params
}

fn load_preset(path: &PathBuf) -> Result<PlanetPreset, Box<dyn std::error::Error>> {
    let text = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}

fn save_preset(path: &PathBuf, name: &str, params: &GenerationParameters) {
    let preset = PlanetPreset {
        name: name.to_string(),
        parameters: *params,
    };
    let result = serde_json::to_string_pretty(&preset)
        .map_err(|e| e.to_string())
        .and_then(|json| std::fs::write(path, json).map_err(|e| e.to_string()));
    match result {
        Ok(()) => println!("Saved parameters to {}", path.display()),
        Err(e) => eprintln!("Warning: could not save parameters: {e}"),
    }
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let params = effective_parameters(&cli);
    if params.subdivisions > MAX_SUBDIVISIONS {
        eprintln!(
            "Error: subdivisions must be 0-{MAX_SUBDIVISIONS} (got {})",
            params.subdivisions
        );
        process::exit(1);
    }
    if params.continent_scale <= 0.0 {
        eprintln!(
            "Error: continent scale must be positive (got {})",
            params.continent_scale
        );
        process::exit(1);
    }
    if !(0.0..=1.0).contains(&params.ocean_ratio) {
        eprintln!(
            "Warning: ocean ratio {} outside 0-1; values >= 1 produce an ocean world",
            params.ocean_ratio
        );
    }

    println!(
        "Generating planet (seed {}, {} tiles)...",
        params.seed,
        params.tile_count()
    );
    let started = Instant::now();
    let mut pipeline = match PlanetPipeline::new(params) {
        Ok(pipeline) => pipeline,
        Err(e) => {
            eprintln!("Error: generation failed: {e}");
            process::exit(1);
        }
    };
    println!("Generated in {:.2?}", started.elapsed());

    let (min_height, max_height) = pipeline.height_range();
    println!("  Tiles:          {}", pipeline.mesh().tile_count());
    println!(
        "  Ocean fraction: {:.1}% (configured {:.1}%)",
        pipeline.ocean_fraction() * 100.0,
        params.ocean_ratio * 100.0
    );
    println!("  Height range:   {min_height:.3} to {max_height:.3}");

    let layers: Vec<Layer> = if cli.all_layers {
        Layer::all().to_vec()
    } else {
        vec![params.layer]
    };

    for layer in layers {
        let mut next = *pipeline.params();
        next.layer = layer;
        if let Err(e) = pipeline.update(next, ParamChange::Layer) {
            eprintln!("Error: could not switch to layer {}: {e}", layer.name());
            process::exit(1);
        }

        let path = cli.output.join(format!("{}_{}.png", cli.name, layer.name()));
        match export_equirect_png(pipeline.mesh(), &path, cli.width) {
            Ok(()) => println!("Exported {}", path.display()),
            Err(e) => {
                eprintln!("Error: export failed for {}: {e}", path.display());
                process::exit(1);
            }
        }
    }

    if let Some(path) = &cli.save_params {
        save_preset(path, &cli.name, pipeline.params());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_preset(dir: &std::path::Path, params: GenerationParameters) -> PathBuf {
        let path = dir.join("preset.json");
        let preset = PlanetPreset {
            name: "saved".to_string(),
            parameters: params,
        };
        std::fs::write(&path, serde_json::to_string(&preset).unwrap()).unwrap();
        path
    }

    #[test]
    fn absent_flags_keep_the_preset_layer_and_backend() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_preset(
            dir.path(),
            GenerationParameters {
                layer: Layer::Humidity,
                backend: ElevationBackend::CpuOnly,
                seed: 77,
                ..GenerationParameters::default()
            },
        );

        let cli = Cli::parse_from(["planetile", "--params", path.to_str().unwrap()]);
        let params = effective_parameters(&cli);
        assert_eq!(params.layer, Layer::Humidity);
        assert_eq!(params.backend, ElevationBackend::CpuOnly);
        assert_eq!(params.seed, 77);
    }

    #[test]
    fn explicit_flags_override_the_preset() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_preset(
            dir.path(),
            GenerationParameters {
                layer: Layer::Humidity,
                ocean_ratio: 0.9,
                ..GenerationParameters::default()
            },
        );

        let cli = Cli::parse_from([
            "planetile",
            "--params",
            path.to_str().unwrap(),
            "--layer",
            "elevation",
            "--ocean-ratio",
            "0.4",
        ]);
        let params = effective_parameters(&cli);
        assert_eq!(params.layer, Layer::Elevation);
        assert_eq!(params.ocean_ratio, 0.4);
    }

    #[test]
    fn no_preset_and_no_flags_use_the_defaults() {
        let cli = Cli::parse_from(["planetile"]);
        let params = effective_parameters(&cli);
        assert_eq!(params, GenerationParameters::default());
    }
}
