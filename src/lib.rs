#![no_std]

//! Orientation Engine - device orientation from motion-sensor samples
//!
//! Converts noisy, asynchronous sensor samples into stable azimuth, pitch and
//! roll angles. Two independent inputs are supported: a fused rotation vector,
//! and a gravity (accelerometer) + magnetic field (magnetometer) pair. Angles
//! are reported for four screen reference frames plus an adaptive view that
//! picks the frame matching how the device is held, all corrected for the
//! current display rotation.
//!
//! # Features
//!
//! - Table-driven axis remapping for 4 display rotations × 4 reference frames
//! - Rotation matrices from rotation vectors or gravity/magnetic pairs
//! - Adaptive reference frame selection from pitch and roll
//! - Low-pass filtering of accelerometer and magnetometer samples
//! - Independent update throttling per output stream
//! - `#![no_std]` compatible, no allocation
//!
//! # Quick Start
//!
//! ```rust
//! use orientation_engine::{DisplayRotation, OrientationEngine, SensorKind};
//!
//! let mut engine = OrientationEngine::new();
//! let rotation = DisplayRotation::Rotation0;
//!
//! // Accelerometer (m/s²) and magnetometer (µT) samples, device lying flat
//! engine.on_sample(SensorKind::Accelerometer, &[0.0, 0.0, 9.81], rotation, 0).unwrap();
//! let outcome = engine
//!     .on_sample(SensorKind::Magnetometer, &[0.0, 22.0, -40.0], rotation, 10)
//!     .unwrap();
//!
//! if let Some(output) = outcome.output() {
//!     let views = output.views().unwrap();
//!     println!("heading: {:.1}°", views.adaptive.angles.azimuth);
//! }
//! ```

mod adaptive;
mod axes;
mod engine;
mod error;
mod euler;
mod filter;
mod math;
mod rotation;
mod throttle;
mod types;

pub use adaptive::{AdaptiveView, FrameThresholds, adaptive_view, select_frame};
pub use axes::{AxisCode, AxisPair, axis_pair_for, remap};
pub use engine::{
    EngineOutput, FrameViews, LegacyHeading, OrientationEngine, Reading, SampleCounters,
    SampleOutcome, StreamState,
};
pub use error::{Degeneracy, Malformation, OrientationError, OrientationResult};
pub use euler::extract;
pub use filter::{DEFAULT_SMOOTHING_FACTOR, LowPassFilter};
pub use math::{DEG_TO_RAD, RAD_TO_DEG, Vector3Ext, normalize_azimuth};
pub use rotation::{
    FREE_FALL_GRAVITY_SQUARED, MIN_HORIZONTAL_MAGNITUDE, RotationMatrix, STANDARD_GRAVITY,
    from_gravity_and_magnetic, from_rotation_vector, rotation_vector_from_slice,
};
pub use throttle::{DEFAULT_UPDATE_INTERVAL_MS, UpdateThrottle};
pub use types::*;
