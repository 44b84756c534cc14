//! Rotation matrix construction from raw sensor vectors
//!
//! Two independent sources are supported: a fused rotation vector, and a
//! gravity/magnetic-field pair. Both produce a matrix whose rows are the
//! world East, North and Up axes expressed in device coordinates.

use crate::error::{Degeneracy, Malformation, OrientationError, OrientationResult};
use crate::types::SensorKind;
use nalgebra::{ComplexField, Matrix3, Vector3, Vector4};

/// 3x3 rotation matrix, indexed `(row, column)`
pub type RotationMatrix = Matrix3<f32>;

/// Standard gravity in m/s²
pub const STANDARD_GRAVITY: f32 = 9.81;

/// Squared gravity magnitude below which the device is considered in free fall
pub const FREE_FALL_GRAVITY_SQUARED: f32 = 0.01 * STANDARD_GRAVITY * STANDARD_GRAVITY;

/// Minimum magnitude of `magnetic × gravity` for a usable horizontal reference
pub const MIN_HORIZONTAL_MAGNITUDE: f32 = 0.1;

/// Reads a rotation vector from raw sensor values.
///
/// Only the first four values are used; longer vectors are truncated. When
/// the scalar component is missing it is derived from the other three.
///
/// # Example
/// ```
/// use orientation_engine::rotation_vector_from_slice;
///
/// // Some sources append a heading accuracy as a fifth value
/// let v = rotation_vector_from_slice(&[0.0, 0.0, 0.0, 1.0, 0.25]).unwrap();
/// assert_eq!(v.w, 1.0);
///
/// // Three components: scalar part recovered
/// let v = rotation_vector_from_slice(&[0.0, 0.0, 0.6]).unwrap();
/// assert!((v.w - 0.8).abs() < 1e-6);
/// ```
pub fn rotation_vector_from_slice(values: &[f32]) -> OrientationResult<Vector4<f32>> {
    let sensor = SensorKind::RotationVector;
    let (x, y, z) = match values {
        [x, y, z, ..] => (*x, *y, *z),
        _ => {
            return Err(OrientationError::malformed(
                sensor,
                Malformation::TooShort {
                    expected: sensor.min_values(),
                    actual: values.len(),
                },
            ));
        }
    };

    let w = match values.get(3) {
        Some(w) => *w,
        None => {
            let w_squared = 1.0 - x * x - y * y - z * z;
            if w_squared > 0.0 { w_squared.sqrt() } else { 0.0 }
        }
    };

    let vector = Vector4::new(x, y, z, w);
    if !vector.iter().all(|c| c.is_finite()) {
        Err(OrientationError::malformed(sensor, Malformation::NonFinite))
    } else if !(2.0 * vector.norm_squared()).is_finite() {
        // Matrix entries are bounded by twice the squared magnitude
        Err(OrientationError::malformed(sensor, Malformation::OutOfRange))
    } else {
        Ok(vector)
    }
}

/// Builds a rotation matrix from a rotation vector `(x, y, z, w)`.
///
/// The vector is treated as a unit quaternion with scalar part `w`.
pub fn from_rotation_vector(v: &Vector4<f32>) -> RotationMatrix {
    let (q1, q2, q3, q0) = (v.x, v.y, v.z, v.w);

    let sq_q1 = 2.0 * q1 * q1;
    let sq_q2 = 2.0 * q2 * q2;
    let sq_q3 = 2.0 * q3 * q3;
    let q1_q2 = 2.0 * q1 * q2;
    let q3_q0 = 2.0 * q3 * q0;
    let q1_q3 = 2.0 * q1 * q3;
    let q2_q0 = 2.0 * q2 * q0;
    let q2_q3 = 2.0 * q2 * q3;
    let q1_q0 = 2.0 * q1 * q0;

    Matrix3::new(
        1.0 - sq_q2 - sq_q3,
        q1_q2 - q3_q0,
        q1_q3 + q2_q0,
        q1_q2 + q3_q0,
        1.0 - sq_q1 - sq_q3,
        q2_q3 - q1_q0,
        q1_q3 - q2_q0,
        q2_q3 + q1_q0,
        1.0 - sq_q1 - sq_q2,
    )
}

/// Builds a rotation matrix from gravity and magnetic field vectors.
///
/// The basis is constructed with cross products:
/// - East = magnetic × gravity, normalized
/// - North = gravity × East, normalized
/// - Up = gravity, normalized
///
/// Fails when gravity is too small (free fall), when the magnetic field is
/// nearly parallel to gravity (e.g. close to a magnetic pole), or when either
/// squared magnitude overflows.
///
/// # Example
/// ```
/// use nalgebra::Vector3;
/// use orientation_engine::{Degeneracy, OrientationError, from_gravity_and_magnetic};
///
/// let gravity = Vector3::new(0.0, 0.0, 9.81);  // lying flat
/// let magnetic = Vector3::new(0.0, 22.0, -40.0); // top edge pointing north
/// let m = from_gravity_and_magnetic(&gravity, &magnetic).unwrap();
/// assert!((m[(1, 1)] - 1.0).abs() < 1e-6);
///
/// let falling = from_gravity_and_magnetic(&Vector3::zeros(), &magnetic);
/// assert_eq!(falling, Err(OrientationError::DegenerateInput(Degeneracy::FreeFall)));
/// ```
pub fn from_gravity_and_magnetic(
    gravity: &Vector3<f32>,
    magnetic: &Vector3<f32>,
) -> OrientationResult<RotationMatrix> {
    let gravity_squared = gravity.norm_squared();
    let magnetic_squared = magnetic.norm_squared();
    if !(gravity_squared.is_finite() && magnetic_squared.is_finite()) {
        return Err(Degeneracy::Overflow.into());
    }
    if gravity_squared < FREE_FALL_GRAVITY_SQUARED {
        return Err(Degeneracy::FreeFall.into());
    }
    let gravity_magnitude = gravity_squared.sqrt();
    let magnetic_magnitude = magnetic_squared.sqrt();
    if magnetic_magnitude == 0.0 {
        return Err(Degeneracy::FieldParallelToGravity.into());
    }

    // Cross product of unit vectors, scaled back to sensor units for the threshold
    let up = gravity / gravity_magnitude;
    let east = (magnetic / magnetic_magnitude).cross(&up);
    let east_magnitude = east.norm();
    let horizontal_magnitude = east_magnitude * magnetic_magnitude * gravity_magnitude;
    if !(horizontal_magnitude >= MIN_HORIZONTAL_MAGNITUDE) {
        return Err(Degeneracy::FieldParallelToGravity.into());
    }
    let east = east / east_magnitude;
    let north = up.cross(&east);

    Ok(Matrix3::from_rows(&[
        east.transpose(),
        north.transpose(),
        up.transpose(),
    ]))
}
