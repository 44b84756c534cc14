//! Error types for the orientation engine
//!
//! Every error is scoped to the sample that caused it. The engine stays
//! usable and keeps its stream state from earlier samples.

use crate::types::SensorKind;
use thiserror::Error;

/// Result type for engine operations
pub type OrientationResult<T> = Result<T, OrientationError>;

/// Errors produced while processing a single sample
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum OrientationError {
    /// Gravity and magnetic field do not define an orientation
    #[error("degenerate input: {0}")]
    DegenerateInput(#[from] Degeneracy),

    /// Raw sample cannot be interpreted for its sensor kind
    #[error("malformed {sensor} sample: {problem}")]
    MalformedSample {
        sensor: SensorKind,
        problem: Malformation,
    },
}

/// Why a gravity/magnetic pair was rejected
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Degeneracy {
    /// Gravity magnitude is close to zero
    #[error("gravity vector too small, device is in free fall")]
    FreeFall,
    /// Cross product of magnetic field and gravity is close to zero
    #[error("magnetic field nearly parallel to gravity")]
    FieldParallelToGravity,
    /// Vector magnitudes are too large to square in single precision
    #[error("vector magnitude overflows")]
    Overflow,
}

/// What is wrong with a raw sample
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Malformation {
    /// Fewer values than the sensor kind needs
    #[error("expected at least {expected} values, got {actual}")]
    TooShort { expected: usize, actual: usize },
    /// A required value is NaN or infinite
    #[error("contains a non-finite value")]
    NonFinite,
    /// Values are finite but their squared magnitude overflows
    #[error("magnitude out of range")]
    OutOfRange,
}

impl OrientationError {
    pub(crate) fn malformed(sensor: SensorKind, problem: Malformation) -> Self {
        OrientationError::MalformedSample { sensor, problem }
    }

    /// True for errors caused by the geometry of otherwise valid input.
    pub fn is_degenerate(&self) -> bool {
        matches!(self, OrientationError::DegenerateInput(_))
    }
}
