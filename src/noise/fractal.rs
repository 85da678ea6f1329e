//! Multi-octave composition of the seeded gradient noise.

use glam::Vec3;

use crate::noise::perlin::SeededNoise;

/// Octave stack for one fractal field.
///
/// Frequency doubles per octave while amplitude decays by `persistence`.
/// Callers keep their stacks as named constants so a field's character is
/// readable at the call site.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FractalLayer {
    /// Number of octaves summed.
    pub octaves: u32,
    /// Frequency of the first octave.
    pub frequency: f32,
    /// Amplitude decay per octave (0.4-0.6 typical).
    pub persistence: f32,
    /// Power-curve exponent applied by [`sample_normalized`] (1.0 = none).
    pub bias: f32,
}

impl FractalLayer {
    pub const fn new(octaves: u32, frequency: f32, persistence: f32, bias: f32) -> Self {
        Self {
            octaves,
            frequency,
            persistence,
            bias,
        }
    }

    /// The same stack with its base frequency multiplied by `factor`.
    pub const fn scaled(self, factor: f32) -> Self {
        Self {
            frequency: self.frequency * factor,
            ..self
        }
    }
}

/// Amplitude-normalized octave sum.
///
/// # Returns
/// A value in approximately [-1, 1]; exactly 0.0 for an empty stack.
pub fn sample(noise: &SeededNoise, layer: FractalLayer, pos: Vec3) -> f32 {
    let mut total = 0.0f32;
    let mut amplitude = 1.0f32;
    let mut frequency = layer.frequency;
    let mut amplitude_sum = 0.0f32;

    for _ in 0..layer.octaves {
        total += noise.sample(pos * frequency) * amplitude;
        amplitude_sum += amplitude;
        amplitude *= layer.persistence;
        frequency *= 2.0;
    }

    if amplitude_sum <= f32::EPSILON {
        return 0.0;
    }
    total / amplitude_sum
}

/// Octave sum remapped to [0, 1] and shaped by the layer's power curve.
///
/// The remapped value is clamped before `powf` so slight overshoot of the
/// [-1, 1] sample range can never leak a NaN into a field.
pub fn sample_normalized(noise: &SeededNoise, layer: FractalLayer, pos: Vec3) -> f32 {
    let v = (sample(noise, layer, pos) + 1.0) * 0.5;
    v.clamp(0.0, 1.0).powf(layer.bias)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_LAYER: FractalLayer = FractalLayer::new(4, 1.3, 0.5, 1.0);

    #[test]
    fn sampling_is_reproducible() {
        let noise = SeededNoise::new(12345);
        let pos = Vec3::new(0.5, 0.3, 0.7);
        assert_eq!(
            sample(&noise, TEST_LAYER, pos),
            sample(&noise, TEST_LAYER, pos),
        );
    }

    #[test]
    fn normalized_sum_stays_in_range() {
        let noise = SeededNoise::new(8);
        for i in 0..200 {
            let pos = Vec3::new(i as f32 * 0.41, i as f32 * -0.23, 1.7).normalize();
            let raw = sample(&noise, TEST_LAYER, pos * 3.0);
            assert!(raw.abs() <= 1.0 + 1e-4, "raw sample {raw} out of range");
            let norm = sample_normalized(&noise, TEST_LAYER, pos * 3.0);
            assert!((0.0..=1.0).contains(&norm), "normalized sample {norm} out of range");
        }
    }

    #[test]
    fn empty_stack_is_zero() {
        let noise = SeededNoise::new(1);
        let layer = FractalLayer::new(0, 1.0, 0.5, 1.0);
        assert_eq!(sample(&noise, layer, Vec3::splat(0.4)), 0.0);
    }

    #[test]
    fn octave_count_changes_the_field() {
        let noise = SeededNoise::new(77);
        let pos = Vec3::new(0.9, -0.2, 0.4);
        let one = sample(&noise, FractalLayer::new(1, 1.3, 0.5, 1.0), pos);
        let six = sample(&noise, FractalLayer::new(6, 1.3, 0.5, 1.0), pos);
        assert_ne!(one, six);
    }

    #[test]
    fn scaled_multiplies_base_frequency() {
        let layer = TEST_LAYER.scaled(2.5);
        assert!((layer.frequency - 1.3 * 2.5).abs() < 1e-6);
        assert_eq!(layer.octaves, TEST_LAYER.octaves);
    }

    #[test]
    fn bias_pushes_distribution_down() {
        let noise = SeededNoise::new(5);
        let flat = FractalLayer::new(3, 1.1, 0.5, 1.0);
        let biased = FractalLayer::new(3, 1.1, 0.5, 2.0);
        let mut flat_sum = 0.0;
        let mut biased_sum = 0.0;
        for i in 0..100 {
            let pos = Vec3::new(i as f32 * 0.17, 0.31, i as f32 * -0.09);
            flat_sum += sample_normalized(&noise, flat, pos);
            biased_sum += sample_normalized(&noise, biased, pos);
        }
        assert!(biased_sum < flat_sum, "squaring values in [0,1] must lower the mean");
    }
}
