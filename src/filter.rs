//! First-order low-pass filter for raw accelerometer and magnetometer vectors

use nalgebra::Vector3;

/// Default filter coefficient
pub const DEFAULT_SMOOTHING_FACTOR: f32 = 0.45;

/// Exponential smoother
///
/// The filter itself is stateless; the caller owns the smoothed value and
/// passes it back in on the next sample. `None` means no sample has been
/// seen yet, in which case the new sample seeds the state unchanged.
///
/// # Example
/// ```
/// use nalgebra::Vector3;
/// use orientation_engine::LowPassFilter;
///
/// let filter = LowPassFilter::default();
/// let mut state = None;
///
/// state = Some(filter.apply(Vector3::new(0.0, 0.0, 9.8), state));
/// state = Some(filter.apply(Vector3::new(0.0, 0.0, 0.0), state));
///
/// // 9.8 + 0.45 * (0.0 - 9.8)
/// assert!((state.unwrap().z - 5.39).abs() < 1e-4);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LowPassFilter {
    /// Weight of the new sample, `0 < alpha < 1`
    alpha: f32,
}

impl LowPassFilter {
    /// Creates a filter with the given coefficient
    ///
    /// The coefficient is clamped into `[0, 1]`; non-finite values fall back
    /// to [`DEFAULT_SMOOTHING_FACTOR`].
    pub fn new(alpha: f32) -> Self {
        let alpha = if alpha.is_finite() {
            alpha.clamp(0.0, 1.0)
        } else {
            DEFAULT_SMOOTHING_FACTOR
        };
        Self { alpha }
    }

    /// Smooths `sample` against the previous smoothed value.
    ///
    /// Returns the new smoothed value, which the caller stores as the next state:
    /// `(1 - alpha) * state + alpha * sample`, or `sample` when there is no
    /// state yet. The convex form keeps the result between its inputs, so it
    /// cannot overflow for finite inputs.
    pub fn apply(&self, sample: Vector3<f32>, state: Option<Vector3<f32>>) -> Vector3<f32> {
        match state {
            None => sample,
            Some(previous) => previous * (1.0 - self.alpha) + sample * self.alpha,
        }
    }

    /// Get the filter coefficient
    pub fn alpha(&self) -> f32 {
        self.alpha
    }
}

impl Default for LowPassFilter {
    fn default() -> Self {
        Self::new(DEFAULT_SMOOTHING_FACTOR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_passes_sample_through() {
        let filter = LowPassFilter::default();
        let samples = [
            Vector3::new(1.0, 2.0, 3.0),
            Vector3::new(-40.0, 0.5, 22.0),
            Vector3::zeros(),
        ];
        for sample in samples {
            assert_eq!(filter.apply(sample, None), sample);
        }
    }

    #[test]
    fn test_single_step() {
        let filter = LowPassFilter::default();
        let state = Vector3::new(0.0, 10.0, -10.0);
        let sample = Vector3::new(10.0, 10.0, 10.0);
        let result = filter.apply(sample, Some(state));
        let expected = Vector3::new(4.5, 10.0, -1.0);
        assert!((result - expected).norm() < 1e-5, "got {:?}", result);
    }

    #[test]
    fn test_converges_to_constant_input() {
        let filter = LowPassFilter::default();
        let target = Vector3::new(0.3, -9.7, 1.2);
        let mut state = Some(Vector3::new(5.0, 5.0, 5.0));

        let mut iterations = 0;
        while iterations < 50 {
            state = Some(filter.apply(target, state));
            iterations += 1;
        }

        let error = (state.unwrap() - target).amax();
        assert!(error < 1e-4, "error {} after {} iterations", error, iterations);
    }

    #[test]
    fn test_output_stays_between_state_and_sample() {
        let filter = LowPassFilter::new(0.2);
        let state = Vector3::new(-1.0, 0.0, 1.0);
        let sample = Vector3::new(1.0, 0.0, -1.0);
        let result = filter.apply(sample, Some(state));
        for i in 0..3 {
            let (lo, hi) = if state[i] < sample[i] {
                (state[i], sample[i])
            } else {
                (sample[i], state[i])
            };
            assert!(result[i] >= lo && result[i] <= hi);
        }
    }

    #[test]
    fn test_extreme_opposite_values_stay_finite() {
        let filter = LowPassFilter::default();
        let state = Vector3::new(-3e38, f32::MAX, 9.81);
        let sample = Vector3::new(3e38, -f32::MAX, 9.81);
        let result = filter.apply(sample, Some(state));
        assert!(result.iter().all(|c| c.is_finite()), "got {:?}", result);
        assert!((result.x - (-0.3e38)).abs() < 1e33, "got {}", result.x);
    }

    #[test]
    fn test_coefficient_sanitized() {
        assert_eq!(LowPassFilter::new(1.5).alpha(), 1.0);
        assert_eq!(LowPassFilter::new(-0.5).alpha(), 0.0);
        assert_eq!(LowPassFilter::new(f32::NAN).alpha(), DEFAULT_SMOOTHING_FACTOR);
    }
}
