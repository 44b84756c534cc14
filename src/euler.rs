//! Azimuth/pitch/roll extraction from a (remapped) rotation matrix

use crate::math::{RAD_TO_DEG, normalize_azimuth};
use crate::rotation::RotationMatrix;
use crate::types::OrientationAngles;
use nalgebra::{ComplexField, RealField};

/// Converts a rotation matrix into azimuth, pitch and roll in degrees.
///
/// The same entries are used for every reference frame; the frame is already
/// part of the matrix after [`remap`](crate::remap).
///
/// - azimuth = atan2(R01, R11), wrapped into `[0, 360)`
/// - pitch = asin(-R21), with the argument clamped to `[-1, 1]`
/// - roll = atan2(-R20, R22)
///
/// # Example
/// ```
/// use nalgebra::Matrix3;
/// use orientation_engine::extract;
///
/// let angles = extract(&Matrix3::identity());
/// assert_eq!(angles.azimuth, 0.0);
/// assert_eq!(angles.pitch, 0.0);
/// assert_eq!(angles.roll, 0.0);
/// ```
pub fn extract(m: &RotationMatrix) -> OrientationAngles {
    let azimuth = RealField::atan2(m[(0, 1)], m[(1, 1)]);
    // Rounding can push a unit entry slightly past 1 near ±90° pitch
    let pitch = ComplexField::asin((-m[(2, 1)]).clamp(-1.0, 1.0));
    let roll = RealField::atan2(-m[(2, 0)], m[(2, 2)]);

    OrientationAngles {
        azimuth: normalize_azimuth(azimuth * RAD_TO_DEG),
        pitch: pitch * RAD_TO_DEG,
        roll: roll * RAD_TO_DEG,
    }
}
