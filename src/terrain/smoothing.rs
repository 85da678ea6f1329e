//! Distance-weighted relaxation of scalar fields on the sphere.

use glam::Vec3;

/// Neighbor samples the stride aims for per point; keeps one pass near
/// O(N) instead of O(N²).
const SAMPLE_TARGET: usize = 200;

/// Sampling stride for a field of `n` points; shared with the GPU smoothing
/// kernel so both executors visit the same neighbor subset.
pub fn sample_stride(n: usize) -> usize {
    (n / SAMPLE_TARGET).max(1)
}

/// Strided-sample smoothing over per-tile values.
///
/// Each iteration replaces every value with the weighted average of itself
/// (weight 1.0) and every stride-th other point within `radius`, weighted
/// `1 - dist/radius`. The stride is a fixed function of the point count, so
/// output is reproducible for a given mesh. Iterations compound.
#[derive(Debug, Clone, Copy)]
pub struct SpatialSmoother {
    pub radius: f32,
    pub iterations: u32,
}

impl SpatialSmoother {
    pub fn new(radius: f32, iterations: u32) -> Self {
        Self { radius, iterations }
    }

    /// Runs the configured number of passes.
    ///
    /// A non-positive radius or zero iterations returns the input unchanged.
    pub fn apply(&self, values: &[f32], positions: &[Vec3]) -> Vec<f32> {
        assert_eq!(values.len(), positions.len());
        if self.radius <= 0.0 || self.iterations == 0 || values.is_empty() {
            return values.to_vec();
        }

        let stride = sample_stride(values.len());
        let mut current = values.to_vec();

        for _ in 0..self.iterations {
            let mut next = vec![0.0f32; current.len()];
            for (i, slot) in next.iter_mut().enumerate() {
                let mut acc = current[i];
                let mut weight_sum = 1.0f32;
                for j in (0..current.len()).step_by(stride) {
                    if j == i {
                        continue;
                    }
                    let dist = positions[i].distance(positions[j]);
                    if dist < self.radius {
                        let w = 1.0 - dist / self.radius;
                        acc += current[j] * w;
                        weight_sum += w;
                    }
                }
                // weight_sum >= 1.0 always, so the division is safe.
                *slot = acc / weight_sum;
            }
            current = next;
        }
        current
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::TileMesh;

    fn variance(values: &[f32]) -> f32 {
        let mean = values.iter().sum::<f32>() / values.len() as f32;
        values.iter().map(|v| (v - mean) * (v - mean)).sum::<f32>() / values.len() as f32
    }

    #[test]
    fn zero_radius_is_a_no_op() {
        let positions = TileMesh::new(1.0, 1).unit_tile_centers();
        let values: Vec<f32> = (0..positions.len()).map(|i| i as f32 * 0.1).collect();
        let out = SpatialSmoother::new(0.0, 3).apply(&values, &positions);
        assert_eq!(out, values);
    }

    #[test]
    fn zero_iterations_is_a_no_op() {
        let positions = TileMesh::new(1.0, 1).unit_tile_centers();
        let values: Vec<f32> = (0..positions.len()).map(|i| (i % 5) as f32).collect();
        let out = SpatialSmoother::new(0.5, 0).apply(&values, &positions);
        assert_eq!(out, values);
    }

    #[test]
    fn smoothing_reduces_variance() {
        let positions = TileMesh::new(1.0, 2).unit_tile_centers();
        let values: Vec<f32> = (0..positions.len())
            .map(|i| if i % 2 == 0 { 1.0 } else { 0.0 })
            .collect();
        let out = SpatialSmoother::new(0.5, 1).apply(&values, &positions);
        assert!(variance(&out) < variance(&values));
    }

    #[test]
    fn constant_fields_stay_constant() {
        let positions = TileMesh::new(1.0, 1).unit_tile_centers();
        let values = vec![0.37f32; positions.len()];
        let out = SpatialSmoother::new(0.3, 2).apply(&values, &positions);
        for v in out {
            assert!((v - 0.37).abs() < 1e-5);
        }
    }

    #[test]
    fn passes_are_deterministic() {
        let positions = TileMesh::new(1.0, 2).unit_tile_centers();
        let values: Vec<f32> = (0..positions.len()).map(|i| (i as f32 * 0.61).sin()).collect();
        let smoother = SpatialSmoother::new(0.2, 3);
        let a = smoother.apply(&values, &positions);
        let b = smoother.apply(&values, &positions);
        assert_eq!(a, b);
    }

    #[test]
    fn empty_input_is_fine() {
        let out = SpatialSmoother::new(0.2, 3).apply(&[], &[]);
        assert!(out.is_empty());
    }
}
