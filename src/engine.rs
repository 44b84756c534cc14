//! Orientation engine: per-stream state, throttling and result assembly

use crate::adaptive::{AdaptiveView, FrameThresholds, adaptive_view};
use crate::axes::{axis_pair_for, remap};
use crate::error::{Malformation, OrientationError, OrientationResult};
use crate::euler::extract;
use crate::filter::LowPassFilter;
use crate::math::{Vector3Ext, normalize_azimuth};
use crate::rotation::{
    RotationMatrix, from_gravity_and_magnetic, from_rotation_vector, rotation_vector_from_slice,
};
use crate::throttle::UpdateThrottle;
use crate::types::{
    DisplayRotation, EngineSettings, OrientationAngles, ReferenceFrame, SensorKind, StreamKind,
    Timestamp,
};
use log::{debug, trace, warn};
use nalgebra::Vector3;

/// Angles for every view the host displays
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameViews {
    /// Screen upright, facing the user
    pub instrument_panel: OrientationAngles,
    /// Screen facing the sky; the pitch/roll of this view are the ones usually displayed
    pub parallel_to_ground: OrientationAngles,
    /// Screen upright and upside down
    pub upside_down_back: OrientationAngles,
    /// Screen facing the ground
    pub face_down: OrientationAngles,
    /// Frame chosen from the device's pitch and roll
    pub adaptive: AdaptiveView,
}

impl FrameViews {
    /// Computes all views for a device-frame rotation matrix.
    pub fn compute(
        matrix: &RotationMatrix,
        rotation: DisplayRotation,
        thresholds: FrameThresholds,
    ) -> Self {
        let view = |frame| extract(&remap(matrix, axis_pair_for(rotation, frame)));
        Self {
            instrument_panel: view(ReferenceFrame::InstrumentPanel),
            parallel_to_ground: view(ReferenceFrame::ParallelToGround),
            upside_down_back: view(ReferenceFrame::UpsideDownBack),
            face_down: view(ReferenceFrame::FaceDown),
            adaptive: adaptive_view(matrix, rotation, thresholds),
        }
    }

    /// Angles for a fixed reference frame
    pub fn frame(&self, frame: ReferenceFrame) -> OrientationAngles {
        match frame {
            ReferenceFrame::InstrumentPanel => self.instrument_panel,
            ReferenceFrame::ParallelToGround => self.parallel_to_ground,
            ReferenceFrame::UpsideDownBack => self.upside_down_back,
            ReferenceFrame::FaceDown => self.face_down,
        }
    }
}

/// Azimuth reported by the legacy orientation sensor
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LegacyHeading {
    /// Sensor azimuth wrapped into `[0, 360)`
    pub azimuth: f32,
    /// Azimuth corrected by the display rotation, wrapped into `[0, 360)`
    pub fixed_azimuth: f32,
}

/// Payload of an emitted result
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Reading {
    /// Rotation-vector or gravity/magnetic views
    Views(FrameViews),
    /// Legacy orientation sensor heading
    Heading(LegacyHeading),
}

/// Cumulative raw sample arrivals per sensor kind
///
/// Accelerometer and magnetometer are counted separately even though they
/// feed a single output stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SampleCounters {
    /// Rotation vector samples
    pub rotation_vector: u32,
    /// Legacy orientation sensor samples
    pub orientation: u32,
    /// Accelerometer samples
    pub accelerometer: u32,
    /// Magnetometer samples
    pub magnetometer: u32,
}

impl SampleCounters {
    /// Arrivals for one sensor kind
    pub fn arrivals(&self, sensor: SensorKind) -> u32 {
        match sensor {
            SensorKind::RotationVector => self.rotation_vector,
            SensorKind::OrientationSensorLegacy => self.orientation,
            SensorKind::Accelerometer => self.accelerometer,
            SensorKind::Magnetometer => self.magnetometer,
        }
    }

    fn record(&mut self, sensor: SensorKind) {
        let counter = match sensor {
            SensorKind::RotationVector => &mut self.rotation_vector,
            SensorKind::OrientationSensorLegacy => &mut self.orientation,
            SensorKind::Accelerometer => &mut self.accelerometer,
            SensorKind::Magnetometer => &mut self.magnetometer,
        };
        *counter = counter.saturating_add(1);
    }
}

/// Result emitted for one sample
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineOutput {
    /// Stream that produced the result
    pub stream: StreamKind,
    /// Display rotation the views were computed for
    pub rotation: DisplayRotation,
    /// Timestamp of the sample that produced the result
    pub timestamp: Timestamp,
    /// Views or legacy heading, depending on the stream
    pub reading: Reading,
    /// Counter snapshot, including the sample that produced this result
    pub counters: SampleCounters,
}

impl EngineOutput {
    /// Views, if this result came from a matrix-based stream
    pub fn views(&self) -> Option<&FrameViews> {
        match &self.reading {
            Reading::Views(views) => Some(views),
            Reading::Heading(_) => None,
        }
    }

    /// Heading, if this result came from the legacy orientation sensor
    pub fn heading(&self) -> Option<&LegacyHeading> {
        match &self.reading {
            Reading::Heading(heading) => Some(heading),
            Reading::Views(_) => None,
        }
    }
}

/// What happened to an accepted sample
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SampleOutcome {
    /// A new result is available
    Emitted(EngineOutput),
    /// Counted, but the stream's update interval has not elapsed
    Suppressed,
    /// Counted and filtered, but the partner sensor of the gravity/magnetic
    /// stream has not delivered a sample yet
    Pending,
}

impl SampleOutcome {
    /// The emitted result, if any
    pub fn output(self) -> Option<EngineOutput> {
        match self {
            SampleOutcome::Emitted(output) => Some(output),
            SampleOutcome::Suppressed | SampleOutcome::Pending => None,
        }
    }
}

/// Per-stream state
///
/// Created with the engine, mutated only by
/// [`OrientationEngine::on_sample`], and never shared between streams. The
/// smoothed vectors are only used by the gravity/magnetic stream and stay
/// `None` until their first sample arrives.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct StreamState {
    smoothed_gravity: Option<Vector3<f32>>,
    smoothed_magnetic: Option<Vector3<f32>>,
    next_allowed: Timestamp,
    sample_count: u32,
    emitted_count: u32,
}

impl StreamState {
    /// Smoothed accelerometer vector
    pub fn smoothed_gravity(&self) -> Option<Vector3<f32>> {
        self.smoothed_gravity
    }

    /// Smoothed magnetometer vector
    pub fn smoothed_magnetic(&self) -> Option<Vector3<f32>> {
        self.smoothed_magnetic
    }

    /// Earliest timestamp at which the stream may emit again
    pub fn next_allowed(&self) -> Timestamp {
        self.next_allowed
    }

    /// Raw samples that arrived on this stream
    pub fn sample_count(&self) -> u32 {
        self.sample_count
    }

    /// Results this stream has emitted
    pub fn emitted_count(&self) -> u32 {
        self.emitted_count
    }
}

/// Orientation estimation engine
///
/// Turns raw, asynchronous sensor samples into orientation angles for every
/// reference frame, corrected for the current display rotation. Each logical
/// stream is throttled independently, and accelerometer/magnetometer samples
/// are low-pass filtered before use.
///
/// The engine is synchronous and does no I/O. It is not meant to be shared
/// between threads without external serialization; `on_sample` takes
/// `&mut self`, so a shared instance needs a lock around it.
///
/// # Example
/// ```
/// use orientation_engine::{DisplayRotation, OrientationEngine, SampleOutcome, SensorKind};
///
/// let mut engine = OrientationEngine::new();
/// let rotation = DisplayRotation::Rotation0;
///
/// let outcome = engine
///     .on_sample(SensorKind::RotationVector, &[0.0, 0.0, 0.0, 1.0], rotation, 0)
///     .unwrap();
/// let output = outcome.output().unwrap();
/// let views = output.views().unwrap();
/// assert!(views.parallel_to_ground.azimuth.abs() < 1e-3);
///
/// // Within 500 ms the stream is throttled
/// let outcome = engine
///     .on_sample(SensorKind::RotationVector, &[0.0, 0.0, 0.0, 1.0], rotation, 100)
///     .unwrap();
/// assert_eq!(outcome, SampleOutcome::Suppressed);
/// assert_eq!(engine.counters().rotation_vector, 2);
/// ```
#[derive(Debug, Clone)]
pub struct OrientationEngine {
    settings: EngineSettings,
    filter: LowPassFilter,
    throttle: UpdateThrottle,
    thresholds: FrameThresholds,
    rotation_vector: StreamState,
    orientation: StreamState,
    gravity_magnetic: StreamState,
    counters: SampleCounters,
}

impl OrientationEngine {
    /// Create a new engine with default settings
    pub fn new() -> Self {
        Self::with_settings(EngineSettings::default())
    }

    /// Create a new engine with specified settings
    pub fn with_settings(settings: EngineSettings) -> Self {
        let mut engine = Self {
            settings,
            filter: LowPassFilter::default(),
            throttle: UpdateThrottle::default(),
            thresholds: FrameThresholds::default(),
            rotation_vector: StreamState::default(),
            orientation: StreamState::default(),
            gravity_magnetic: StreamState::default(),
            counters: SampleCounters::default(),
        };
        engine.process_settings();
        engine
    }

    /// Clear all stream state and counters, keeping the settings
    pub fn reset(&mut self) {
        self.rotation_vector = StreamState::default();
        self.orientation = StreamState::default();
        self.gravity_magnetic = StreamState::default();
        self.counters = SampleCounters::default();
    }

    /// Update engine settings
    ///
    /// Stream state is kept; a changed update interval applies from the
    /// next emitted result.
    pub fn set_settings(&mut self, settings: EngineSettings) {
        self.settings = settings;
        self.process_settings();
    }

    /// Get current engine settings
    pub fn settings(&self) -> EngineSettings {
        self.settings
    }

    /// Cumulative raw sample arrivals
    pub fn counters(&self) -> SampleCounters {
        self.counters
    }

    /// State of one logical stream
    pub fn stream_state(&self, stream: StreamKind) -> &StreamState {
        match stream {
            StreamKind::RotationVector => &self.rotation_vector,
            StreamKind::OrientationSensorLegacy => &self.orientation,
            StreamKind::GravityMagnetic => &self.gravity_magnetic,
        }
    }

    /// Process one raw sample.
    ///
    /// The arrival is always counted. Errors only affect this sample: stored
    /// filter and throttle state from earlier samples is left as it was.
    ///
    /// # Arguments
    /// * `sensor` - Sensor that produced the sample
    /// * `values` - Raw sample values
    /// * `rotation` - Current display rotation
    /// * `now` - Monotonic timestamp in milliseconds
    pub fn on_sample(
        &mut self,
        sensor: SensorKind,
        values: &[f32],
        rotation: DisplayRotation,
        now: Timestamp,
    ) -> OrientationResult<SampleOutcome> {
        self.counters.record(sensor);
        let state = self.stream_state_mut(sensor.stream());
        state.sample_count = state.sample_count.saturating_add(1);

        let result = match sensor {
            SensorKind::RotationVector => self.on_rotation_vector(values, rotation, now),
            SensorKind::OrientationSensorLegacy => self.on_orientation(values, rotation, now),
            SensorKind::Accelerometer | SensorKind::Magnetometer => {
                self.on_gravity_magnetic(sensor, values, rotation, now)
            }
        };

        if let Err(error) = &result {
            warn!("dropping {} sample at {}: {}", sensor, now, error);
        }
        result
    }

    fn on_rotation_vector(
        &mut self,
        values: &[f32],
        rotation: DisplayRotation,
        now: Timestamp,
    ) -> OrientationResult<SampleOutcome> {
        let stream = StreamKind::RotationVector;
        if !self.gate_open(stream, now) {
            return Ok(SampleOutcome::Suppressed);
        }

        let vector = rotation_vector_from_slice(values)?;
        let matrix = from_rotation_vector(&vector);
        let views = FrameViews::compute(&matrix, rotation, self.thresholds);
        Ok(self.emit(stream, rotation, now, Reading::Views(views)))
    }

    fn on_orientation(
        &mut self,
        values: &[f32],
        rotation: DisplayRotation,
        now: Timestamp,
    ) -> OrientationResult<SampleOutcome> {
        let stream = StreamKind::OrientationSensorLegacy;
        if !self.gate_open(stream, now) {
            return Ok(SampleOutcome::Suppressed);
        }

        let sensor = SensorKind::OrientationSensorLegacy;
        let azimuth = match values.first() {
            Some(azimuth) if azimuth.is_finite() => *azimuth,
            Some(_) => return Err(OrientationError::malformed(sensor, Malformation::NonFinite)),
            None => {
                return Err(OrientationError::malformed(
                    sensor,
                    Malformation::TooShort {
                        expected: sensor.min_values(),
                        actual: 0,
                    },
                ));
            }
        };

        let heading = LegacyHeading {
            azimuth: normalize_azimuth(azimuth),
            fixed_azimuth: normalize_azimuth(azimuth + f32::from(rotation.degrees())),
        };
        Ok(self.emit(stream, rotation, now, Reading::Heading(heading)))
    }

    fn on_gravity_magnetic(
        &mut self,
        sensor: SensorKind,
        values: &[f32],
        rotation: DisplayRotation,
        now: Timestamp,
    ) -> OrientationResult<SampleOutcome> {
        let stream = StreamKind::GravityMagnetic;
        let sample = read_vector3(sensor, values)?;

        let state = &self.gravity_magnetic;
        let (gravity, magnetic) = match sensor {
            SensorKind::Accelerometer => (
                Some(self.filter.apply(sample, state.smoothed_gravity)),
                state.smoothed_magnetic,
            ),
            _ => (
                state.smoothed_gravity,
                Some(self.filter.apply(sample, state.smoothed_magnetic)),
            ),
        };

        if !gravity.into_iter().chain(magnetic).all(|v| v.is_in_range()) {
            return Err(OrientationError::malformed(sensor, Malformation::OutOfRange));
        }

        let (Some(smoothed_gravity), Some(smoothed_magnetic)) = (gravity, magnetic) else {
            self.store_smoothed(gravity, magnetic);
            trace!("{} sample at {} waiting for its partner sensor", sensor, now);
            return Ok(SampleOutcome::Pending);
        };

        if !self.gate_open(stream, now) {
            self.store_smoothed(gravity, magnetic);
            return Ok(SampleOutcome::Suppressed);
        }

        // Smoothed state is only committed once the pair is usable
        let matrix = from_gravity_and_magnetic(&smoothed_gravity, &smoothed_magnetic)?;
        self.store_smoothed(gravity, magnetic);

        let views = FrameViews::compute(&matrix, rotation, self.thresholds);
        Ok(self.emit(stream, rotation, now, Reading::Views(views)))
    }

    fn store_smoothed(&mut self, gravity: Option<Vector3<f32>>, magnetic: Option<Vector3<f32>>) {
        self.gravity_magnetic.smoothed_gravity = gravity;
        self.gravity_magnetic.smoothed_magnetic = magnetic;
    }

    fn gate_open(&self, stream: StreamKind, now: Timestamp) -> bool {
        let next_allowed = self.stream_state(stream).next_allowed;
        let open = self.throttle.should_emit(now, next_allowed);
        if !open {
            trace!("{:?} suppressed at {}, next update at {}", stream, now, next_allowed);
        }
        open
    }

    fn emit(
        &mut self,
        stream: StreamKind,
        rotation: DisplayRotation,
        now: Timestamp,
        reading: Reading,
    ) -> SampleOutcome {
        let next_allowed = self.throttle.advance(now);
        let state = self.stream_state_mut(stream);
        state.next_allowed = next_allowed;
        state.emitted_count = state.emitted_count.saturating_add(1);

        debug!("{:?} emitted at {} ({:?})", stream, now, rotation);
        SampleOutcome::Emitted(EngineOutput {
            stream,
            rotation,
            timestamp: now,
            reading,
            counters: self.counters,
        })
    }

    fn stream_state_mut(&mut self, stream: StreamKind) -> &mut StreamState {
        match stream {
            StreamKind::RotationVector => &mut self.rotation_vector,
            StreamKind::OrientationSensorLegacy => &mut self.orientation,
            StreamKind::GravityMagnetic => &mut self.gravity_magnetic,
        }
    }

    fn process_settings(&mut self) {
        self.filter = LowPassFilter::new(self.settings.smoothing_factor);
        self.throttle = UpdateThrottle::new(self.settings.update_interval_ms);
        self.thresholds = FrameThresholds {
            pitch: self.settings.pitch_threshold,
            roll: self.settings.roll_threshold,
        };
    }
}

impl Default for OrientationEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// First three values of an accelerometer or magnetometer sample
fn read_vector3(sensor: SensorKind, values: &[f32]) -> OrientationResult<Vector3<f32>> {
    let [x, y, z, ..] = values else {
        return Err(OrientationError::malformed(
            sensor,
            Malformation::TooShort {
                expected: sensor.min_values(),
                actual: values.len(),
            },
        ));
    };

    let vector = Vector3::new(*x, *y, *z);
    if !vector.is_finite() {
        Err(OrientationError::malformed(sensor, Malformation::NonFinite))
    } else if !vector.is_in_range() {
        Err(OrientationError::malformed(sensor, Malformation::OutOfRange))
    } else {
        Ok(vector)
    }
}
