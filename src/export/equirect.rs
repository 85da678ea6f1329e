//! Equirectangular (lat/lon) PNG export of the colored tile mesh.
//!
//! Each pixel's direction is resolved to the tile whose center is nearest
//! on the sphere, which reproduces the dual-cell partition without walking
//! the tile polygons.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use glam::Vec3;
use image::ImageEncoder;
use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use rayon::prelude::*;
use thiserror::Error;

use crate::mesh::TileMesh;

/// Errors that can occur during map export.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Image encoding error: {0}")]
    Image(#[from] image::ImageError),
    #[error("Invalid output dimensions: {0}x{1}")]
    InvalidDimensions(u32, u32),
}

#[inline]
fn lat_lon_to_dir(lat: f32, lon: f32) -> Vec3 {
    // lon = 0 points toward +Z; Y is the polar axis.
    let (slon, clon) = lon.sin_cos();
    let (slat, clat) = lat.sin_cos();
    Vec3::new(clat * slon, slat, clat * clon)
}

/// Index of the tile center nearest to `dir` (greatest dot product).
fn nearest_tile(centers: &[Vec3], dir: Vec3) -> usize {
    let mut best = 0;
    let mut best_dot = f32::NEG_INFINITY;
    for (i, &c) in centers.iter().enumerate() {
        let d = c.dot(dir);
        if d > best_dot {
            best_dot = d;
            best = i;
        }
    }
    best
}

/// Writes the mesh's current tile colors as an equirectangular RGBA PNG.
///
/// `width` pixels across 360° of longitude; the height is `width / 2`.
/// Rows are filled in parallel.
pub fn export_equirect_png(mesh: &TileMesh, path: &Path, width: u32) -> Result<(), ExportError> {
    let height = width / 2;
    if width < 2 || height < 1 {
        return Err(ExportError::InvalidDimensions(width, height));
    }

    let centers = mesh.unit_tile_centers();
    let colors: Vec<[u8; 4]> = (0..mesh.tile_count())
        .map(|tile| {
            let c = mesh.tile_color(tile);
            [
                (c[0].clamp(0.0, 1.0) * 255.0) as u8,
                (c[1].clamp(0.0, 1.0) * 255.0) as u8,
                (c[2].clamp(0.0, 1.0) * 255.0) as u8,
                (c[3].clamp(0.0, 1.0) * 255.0) as u8,
            ]
        })
        .collect();

    let rows: Vec<Vec<u8>> = (0..height)
        .into_par_iter()
        .map(|y| {
            let fy = (y as f32 + 0.5) / height as f32;
            let lat = std::f32::consts::FRAC_PI_2 - fy * std::f32::consts::PI;
            let mut row = Vec::with_capacity(width as usize * 4);
            for x in 0..width {
                let fx = (x as f32 + 0.5) / width as f32;
                let lon = -std::f32::consts::PI + fx * (std::f32::consts::PI * 2.0);
                let dir = lat_lon_to_dir(lat, lon);
                let tile = nearest_tile(&centers, dir);
                row.extend_from_slice(&colors[tile]);
            }
            row
        })
        .collect();

    let mut pixels = Vec::with_capacity((width * height * 4) as usize);
    for row in rows {
        pixels.extend_from_slice(&row);
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    let encoder =
        PngEncoder::new_with_quality(writer, CompressionType::Default, FilterType::Adaptive);
    encoder.write_image(&pixels, width, height, image::ExtendedColorType::Rgba8)?;

    Ok(())
}
