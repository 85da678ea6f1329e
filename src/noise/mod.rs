//! Noise primitives for field synthesis.

pub mod fractal;
pub mod perlin;

pub use fractal::FractalLayer;
pub use perlin::SeededNoise;
