//! Scalar layer gradients and color helpers.

use crate::mesh::Rgba;

pub const DEEP_WATER: Rgba = [0.02, 0.09, 0.28, 1.0];
pub const SHALLOW_WATER: Rgba = [0.30, 0.55, 0.80, 1.0];
pub const LOW_LAND: Rgba = [0.20, 0.48, 0.22, 1.0];
pub const HIGH_LAND: Rgba = [0.48, 0.38, 0.26, 1.0];
pub const PEAK_WHITE: Rgba = [0.96, 0.96, 0.98, 1.0];

const COLD_BLUE: Rgba = [0.16, 0.26, 0.78, 1.0];
const MILD_YELLOW: Rgba = [0.92, 0.86, 0.38, 1.0];
const HOT_RED: Rgba = [0.86, 0.16, 0.10, 1.0];

const DRY_SAND: Rgba = [0.80, 0.72, 0.45, 1.0];
const WET_TEAL: Rgba = [0.08, 0.48, 0.54, 1.0];

/// Componentwise blend in the `a·(1−t) + b·t` form, which returns exactly
/// `a` at t=0 and exactly `b` at t=1 despite f32 rounding.
pub fn lerp_rgba(a: Rgba, b: Rgba, t: f32) -> Rgba {
    let t = t.clamp(0.0, 1.0);
    let s = 1.0 - t;
    [
        a[0] * s + b[0] * t,
        a[1] * s + b[1] * t,
        a[2] * s + b[2] * t,
        a[3] * s + b[3] * t,
    ]
}

/// Uniform brightness scaling; alpha is untouched.
pub fn scale_rgb(color: Rgba, factor: f32) -> Rgba {
    [
        (color[0] * factor).clamp(0.0, 1.0),
        (color[1] * factor).clamp(0.0, 1.0),
        (color[2] * factor).clamp(0.0, 1.0),
        color[3],
    ]
}

/// Elevation layer: ocean blues below sea level, green through brown to
/// white above it. `height` is expected in [-1, 0.8].
pub fn elevation_color(height: f32) -> Rgba {
    if height < 0.0 {
        // 0 at the deepest floor, 1 at sea level.
        let t = (height + 1.0).clamp(0.0, 1.0);
        lerp_rgba(DEEP_WATER, SHALLOW_WATER, t)
    } else {
        let t = (height / 0.8).clamp(0.0, 1.0);
        if t < 0.5 {
            lerp_rgba(LOW_LAND, HIGH_LAND, t * 2.0)
        } else {
            lerp_rgba(HIGH_LAND, PEAK_WHITE, (t - 0.5) * 2.0)
        }
    }
}

/// Temperature layer: cold blue through mild yellow to hot red.
pub fn temperature_color(value: f32) -> Rgba {
    let t = value.clamp(0.0, 1.0);
    if t < 0.5 {
        lerp_rgba(COLD_BLUE, MILD_YELLOW, t * 2.0)
    } else {
        lerp_rgba(MILD_YELLOW, HOT_RED, (t - 0.5) * 2.0)
    }
}

/// Humidity layer: dry sand to saturated blue-green.
pub fn humidity_color(value: f32) -> Rgba {
    lerp_rgba(DRY_SAND, WET_TEAL, value.clamp(0.0, 1.0))
}
