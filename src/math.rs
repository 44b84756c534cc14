//! Angle helpers and nalgebra extensions for the orientation engine

use nalgebra::Vector3;

/// Mathematical constants
pub const DEG_TO_RAD: f32 = core::f32::consts::PI / 180.0;
pub const RAD_TO_DEG: f32 = 180.0 / core::f32::consts::PI;

/// Wraps an angle in degrees into `[0, 360)`.
///
/// Tiny negative inputs can round to exactly 360 after the shift; those are
/// folded back to 0 so the upper bound stays exclusive.
///
/// # Example
/// ```
/// use orientation_engine::normalize_azimuth;
///
/// assert_eq!(normalize_azimuth(-90.0), 270.0);
/// assert_eq!(normalize_azimuth(450.0), 90.0);
/// assert_eq!(normalize_azimuth(360.0), 0.0);
/// ```
pub fn normalize_azimuth(degrees: f32) -> f32 {
    let mut wrapped = degrees % 360.0;
    if wrapped < 0.0 {
        wrapped += 360.0;
    }
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}

/// Extension trait for Vector3 operations
pub trait Vector3Ext {
    /// True when every component is finite
    fn is_finite(&self) -> bool;

    /// True when twice the squared magnitude is still finite, so products
    /// and cross products of such vectors cannot overflow
    fn is_in_range(&self) -> bool;
}

impl Vector3Ext for Vector3<f32> {
    fn is_finite(&self) -> bool {
        self.iter().all(|c| c.is_finite())
    }

    fn is_in_range(&self) -> bool {
        (2.0 * self.norm_squared()).is_finite()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_azimuth_range() {
        let cases = [
            (0.0, 0.0),
            (-0.0, 0.0),
            (359.5, 359.5),
            (-180.0, 180.0),
            (720.0, 0.0),
            (-450.0, 270.0),
        ];
        for (input, expected) in cases {
            let result = normalize_azimuth(input);
            assert!(
                (result - expected).abs() < 1e-4,
                "normalize_azimuth({}) = {}, expected {}",
                input,
                result,
                expected
            );
        }
    }

    #[test]
    fn test_normalize_azimuth_tiny_negative() {
        let result = normalize_azimuth(-1e-8);
        assert!((0.0..360.0).contains(&result), "got {}", result);
    }

    #[test]
    fn test_vector_extensions() {
        let v = Vector3::new(3.0f32, 4.0, 0.0);
        assert!(v.is_finite());
        assert!(!Vector3::new(f32::NAN, 0.0, 0.0).is_finite());
        assert!(!Vector3::new(0.0, f32::NEG_INFINITY, 0.0).is_finite());
    }

    #[test]
    fn test_vector_range() {
        assert!(Vector3::new(1e18f32, -1e18, 9.81).is_in_range());
        assert!(!Vector3::new(-3e38f32, 0.0, 9.81).is_in_range());
        assert!(!Vector3::new(0.0f32, 2e19, 0.0).is_in_range());
    }

    #[test]
    fn test_degree_constants() {
        assert!((90.0 * DEG_TO_RAD - core::f32::consts::FRAC_PI_2).abs() < 1e-6);
        assert!((core::f32::consts::PI * RAD_TO_DEG - 180.0).abs() < 1e-4);
    }
}
