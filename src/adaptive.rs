//! Adaptive reference frame selection
//!
//! A compass reading is only meaningful in the frame that matches how the
//! device is held. The adaptive view first assumes the screen is parallel to
//! the ground, then switches frame based on the pitch and roll that
//! assumption produces.

use crate::axes::{axis_pair_for, remap};
use crate::euler::extract;
use crate::rotation::RotationMatrix;
use crate::types::{DisplayRotation, OrientationAngles, ReferenceFrame};

/// Pitch/roll thresholds, in degrees, for switching away from
/// [`ReferenceFrame::ParallelToGround`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameThresholds {
    /// Pitch beyond ±this selects an upright frame
    pub pitch: f32,
    /// Roll magnitude beyond this selects the face-down frame
    pub roll: f32,
}

impl Default for FrameThresholds {
    fn default() -> Self {
        Self {
            pitch: 45.0,
            roll: 90.0,
        }
    }
}

/// Result of the adaptive view
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdaptiveView {
    /// Frame the angles were computed in
    pub frame: ReferenceFrame,
    /// Final angles
    pub angles: OrientationAngles,
}

/// Picks a frame from a provisional ground-parallel estimate.
///
/// All comparisons are strict, so values exactly on a threshold keep
/// [`ReferenceFrame::ParallelToGround`].
///
/// # Example
/// ```
/// use orientation_engine::{FrameThresholds, ReferenceFrame, select_frame};
///
/// let thresholds = FrameThresholds::default();
/// assert_eq!(select_frame(-46.0, 0.0, thresholds), ReferenceFrame::InstrumentPanel);
/// assert_eq!(select_frame(-45.0, 0.0, thresholds), ReferenceFrame::ParallelToGround);
/// ```
pub fn select_frame(pitch: f32, roll: f32, thresholds: FrameThresholds) -> ReferenceFrame {
    if pitch < -thresholds.pitch {
        ReferenceFrame::InstrumentPanel
    } else if pitch > thresholds.pitch {
        ReferenceFrame::UpsideDownBack
    } else if roll.abs() > thresholds.roll {
        ReferenceFrame::FaceDown
    } else {
        ReferenceFrame::ParallelToGround
    }
}

/// Computes the adaptive view for a device-frame rotation matrix.
///
/// Runs the ground-parallel pass, selects a frame, and only remaps again if
/// the selection differs.
pub fn adaptive_view(
    matrix: &RotationMatrix,
    rotation: DisplayRotation,
    thresholds: FrameThresholds,
) -> AdaptiveView {
    let ground = ReferenceFrame::ParallelToGround;
    let provisional = extract(&remap(matrix, axis_pair_for(rotation, ground)));
    let frame = select_frame(provisional.pitch, provisional.roll, thresholds);

    if frame == ground {
        return AdaptiveView {
            frame,
            angles: provisional,
        };
    }

    log::debug!(
        "adaptive view switched to {:?} (pitch={:.1}, roll={:.1})",
        frame,
        provisional.pitch,
        provisional.roll
    );
    AdaptiveView {
        frame,
        angles: extract(&remap(matrix, axis_pair_for(rotation, frame))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rotation::from_rotation_vector;
    use nalgebra::{ComplexField, Vector4};

    fn about_x(degrees: f32) -> RotationMatrix {
        let half = degrees.to_radians() / 2.0;
        from_rotation_vector(&Vector4::new(half.sin(), 0.0, 0.0, half.cos()))
    }

    fn about_y(degrees: f32) -> RotationMatrix {
        let half = degrees.to_radians() / 2.0;
        from_rotation_vector(&Vector4::new(0.0, half.sin(), 0.0, half.cos()))
    }

    #[test]
    fn test_select_frame_boundaries() {
        let t = FrameThresholds::default();
        assert_eq!(select_frame(-46.0, 0.0, t), ReferenceFrame::InstrumentPanel);
        assert_eq!(select_frame(-45.0, 0.0, t), ReferenceFrame::ParallelToGround);
        assert_eq!(select_frame(46.0, 0.0, t), ReferenceFrame::UpsideDownBack);
        assert_eq!(select_frame(45.0, 0.0, t), ReferenceFrame::ParallelToGround);
        assert_eq!(select_frame(0.0, 91.0, t), ReferenceFrame::FaceDown);
        assert_eq!(select_frame(0.0, -91.0, t), ReferenceFrame::FaceDown);
        assert_eq!(select_frame(0.0, 90.0, t), ReferenceFrame::ParallelToGround);
        assert_eq!(select_frame(0.0, -90.0, t), ReferenceFrame::ParallelToGround);
    }

    #[test]
    fn test_pitch_takes_precedence_over_roll() {
        let t = FrameThresholds::default();
        assert_eq!(select_frame(-60.0, 170.0, t), ReferenceFrame::InstrumentPanel);
        assert_eq!(select_frame(60.0, -170.0, t), ReferenceFrame::UpsideDownBack);
    }

    #[test]
    fn test_custom_thresholds() {
        let t = FrameThresholds {
            pitch: 30.0,
            roll: 60.0,
        };
        assert_eq!(select_frame(-31.0, 0.0, t), ReferenceFrame::InstrumentPanel);
        assert_eq!(select_frame(0.0, 61.0, t), ReferenceFrame::FaceDown);
    }

    #[test]
    fn test_flat_device_keeps_ground_frame() {
        let view = adaptive_view(&about_x(0.0), DisplayRotation::Rotation0, FrameThresholds::default());
        assert_eq!(view.frame, ReferenceFrame::ParallelToGround);
    }

    #[test]
    fn test_upright_device_uses_instrument_panel() {
        // Top edge raised 80° towards the sky
        let matrix = about_x(80.0);
        let view = adaptive_view(&matrix, DisplayRotation::Rotation0, FrameThresholds::default());
        assert_eq!(view.frame, ReferenceFrame::InstrumentPanel);

        let direct = extract(&remap(
            &matrix,
            axis_pair_for(DisplayRotation::Rotation0, ReferenceFrame::InstrumentPanel),
        ));
        assert_eq!(view.angles, direct);
    }

    #[test]
    fn test_tipped_forward_uses_upside_down_back() {
        let view = adaptive_view(&about_x(-80.0), DisplayRotation::Rotation0, FrameThresholds::default());
        assert_eq!(view.frame, ReferenceFrame::UpsideDownBack);
    }

    #[test]
    fn test_face_down_device() {
        let view = adaptive_view(&about_y(180.0), DisplayRotation::Rotation0, FrameThresholds::default());
        assert_eq!(view.frame, ReferenceFrame::FaceDown);
        assert!(view.angles.roll.abs() < 1e-3, "roll {}", view.angles.roll);
    }
}
