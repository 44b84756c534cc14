//! Core types and conventions for the orientation engine

use crate::filter::DEFAULT_SMOOTHING_FACTOR;
use crate::throttle::DEFAULT_UPDATE_INTERVAL_MS;
use core::fmt;

/// Monotonic timestamp in milliseconds, as supplied by the host.
pub type Timestamp = u64;

/// Display rotation reported by the host
///
/// Describes how far the screen content is rotated from the device's natural
/// orientation. The engine reads it once per sample and never stores it.
///
/// # Example
/// ```
/// use orientation_engine::DisplayRotation;
///
/// assert_eq!(DisplayRotation::from_degrees(270), Some(DisplayRotation::Rotation270));
/// assert_eq!(DisplayRotation::from_degrees(45), None);
/// assert_eq!(DisplayRotation::Rotation90.degrees(), 90);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DisplayRotation {
    /// Natural orientation
    #[default]
    Rotation0,
    /// Rotated 90°
    Rotation90,
    /// Rotated 180°
    Rotation180,
    /// Rotated 270°
    Rotation270,
}

impl DisplayRotation {
    /// All four rotations in ascending order.
    pub const ALL: [DisplayRotation; 4] = [
        DisplayRotation::Rotation0,
        DisplayRotation::Rotation90,
        DisplayRotation::Rotation180,
        DisplayRotation::Rotation270,
    ];

    /// Rotation in whole degrees (0, 90, 180 or 270).
    pub const fn degrees(self) -> u16 {
        match self {
            DisplayRotation::Rotation0 => 0,
            DisplayRotation::Rotation90 => 90,
            DisplayRotation::Rotation180 => 180,
            DisplayRotation::Rotation270 => 270,
        }
    }

    /// Parses a rotation given in degrees. Only exact quarter turns are accepted.
    pub const fn from_degrees(degrees: u16) -> Option<Self> {
        match degrees {
            0 => Some(DisplayRotation::Rotation0),
            90 => Some(DisplayRotation::Rotation90),
            180 => Some(DisplayRotation::Rotation180),
            270 => Some(DisplayRotation::Rotation270),
            _ => None,
        }
    }

    /// Rotation from a count of clockwise quarter turns, wrapping modulo 4.
    pub const fn from_quarter_turns(turns: u8) -> Self {
        match turns % 4 {
            0 => DisplayRotation::Rotation0,
            1 => DisplayRotation::Rotation90,
            2 => DisplayRotation::Rotation180,
            _ => DisplayRotation::Rotation270,
        }
    }
}

/// Screen reference frame
///
/// Which physical face of the device is treated as facing the sky when
/// azimuth, pitch and roll are computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReferenceFrame {
    /// Screen held upright like a car's instrument panel
    InstrumentPanel,
    /// Screen parallel to the ground, facing up
    ParallelToGround,
    /// Screen upright but upside down, facing back
    UpsideDownBack,
    /// Screen parallel to the ground, facing down
    FaceDown,
}

impl ReferenceFrame {
    /// All four frames, in the order the engine reports them.
    pub const ALL: [ReferenceFrame; 4] = [
        ReferenceFrame::InstrumentPanel,
        ReferenceFrame::ParallelToGround,
        ReferenceFrame::UpsideDownBack,
        ReferenceFrame::FaceDown,
    ];
}

/// Raw sensor kinds the host can deliver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SensorKind {
    /// Fused rotation vector, 3 or more components `(x, y, z[, w, ...])`
    RotationVector,
    /// Deprecated orientation sensor, first component is the azimuth in degrees
    OrientationSensorLegacy,
    /// Accelerometer, used as the gravity estimate
    Accelerometer,
    /// Magnetometer
    Magnetometer,
}

impl SensorKind {
    /// Logical output stream this sensor feeds.
    pub const fn stream(self) -> StreamKind {
        match self {
            SensorKind::RotationVector => StreamKind::RotationVector,
            SensorKind::OrientationSensorLegacy => StreamKind::OrientationSensorLegacy,
            SensorKind::Accelerometer | SensorKind::Magnetometer => StreamKind::GravityMagnetic,
        }
    }

    /// Minimum number of values a sample of this kind must carry.
    pub const fn min_values(self) -> usize {
        match self {
            SensorKind::OrientationSensorLegacy => 1,
            SensorKind::RotationVector | SensorKind::Accelerometer | SensorKind::Magnetometer => 3,
        }
    }
}

impl fmt::Display for SensorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SensorKind::RotationVector => "rotation vector",
            SensorKind::OrientationSensorLegacy => "orientation sensor",
            SensorKind::Accelerometer => "accelerometer",
            SensorKind::Magnetometer => "magnetometer",
        };
        f.write_str(name)
    }
}

/// Logical output streams, each with its own throttle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StreamKind {
    /// Views computed from the rotation vector
    RotationVector,
    /// Raw and rotation-corrected azimuth from the legacy orientation sensor
    OrientationSensorLegacy,
    /// Views computed from smoothed accelerometer and magnetometer samples
    GravityMagnetic,
}

/// Azimuth, pitch and roll in degrees
///
/// Azimuth is always normalized into `[0, 360)`. Pitch lies in `[-90, 90]`
/// and roll in `(-180, 180]`, the natural ranges of the extraction formula.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct OrientationAngles {
    /// Heading in degrees, clockwise from magnetic north
    pub azimuth: f32,
    /// Pitch in degrees
    pub pitch: f32,
    /// Roll in degrees
    pub roll: f32,
}

/// Engine settings
///
/// # Example
/// ```
/// use orientation_engine::{EngineSettings, OrientationEngine};
///
/// let settings = EngineSettings {
///     smoothing_factor: 0.3,     // heavier smoothing
///     update_interval_ms: 250,   // four updates per second
///     ..Default::default()
/// };
/// let engine = OrientationEngine::with_settings(settings);
/// assert_eq!(engine.settings().update_interval_ms, 250);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineSettings {
    /// Low-pass filter coefficient applied to accelerometer and magnetometer
    /// samples, `0 < α < 1`. Higher values track new samples more closely.
    pub smoothing_factor: f32,
    /// Minimum interval between two emitted results of the same stream
    pub update_interval_ms: u64,
    /// Pitch magnitude in degrees beyond which the adaptive view switches to
    /// an upright frame
    pub pitch_threshold: f32,
    /// Roll magnitude in degrees beyond which the adaptive view switches to
    /// the face-down frame
    pub roll_threshold: f32,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            smoothing_factor: DEFAULT_SMOOTHING_FACTOR,
            update_interval_ms: DEFAULT_UPDATE_INTERVAL_MS,
            pitch_threshold: 45.0,
            roll_threshold: 90.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_rotation_degrees_round_trip() {
        for rotation in DisplayRotation::ALL {
            assert_eq!(DisplayRotation::from_degrees(rotation.degrees()), Some(rotation));
        }
        assert_eq!(DisplayRotation::from_degrees(360), None);
    }

    #[test]
    fn test_quarter_turns_wrap() {
        assert_eq!(DisplayRotation::from_quarter_turns(0), DisplayRotation::Rotation0);
        assert_eq!(DisplayRotation::from_quarter_turns(3), DisplayRotation::Rotation270);
        assert_eq!(DisplayRotation::from_quarter_turns(5), DisplayRotation::Rotation90);
    }

    #[test]
    fn test_sensor_streams() {
        assert_eq!(SensorKind::Accelerometer.stream(), StreamKind::GravityMagnetic);
        assert_eq!(SensorKind::Magnetometer.stream(), StreamKind::GravityMagnetic);
        assert_eq!(SensorKind::RotationVector.stream(), StreamKind::RotationVector);
        assert_eq!(SensorKind::OrientationSensorLegacy.min_values(), 1);
    }

    #[test]
    fn test_default_settings() {
        let settings = EngineSettings::default();
        assert_eq!(settings.smoothing_factor, 0.45);
        assert_eq!(settings.update_interval_ms, 500);
        assert_eq!(settings.pitch_threshold, 45.0);
        assert_eq!(settings.roll_threshold, 90.0);
    }
}
