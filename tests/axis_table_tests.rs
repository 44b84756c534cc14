use approx::assert_abs_diff_eq;
use nalgebra::{Matrix3, Vector4};
use orientation_engine::{
    AxisCode, AxisPair, DisplayRotation, ReferenceFrame, axis_pair_for, from_rotation_vector,
    remap,
};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64;

use AxisCode::*;
use DisplayRotation::*;
use ReferenceFrame::*;

/// Every cell of the display rotation × reference frame table
const TABLE: [(ReferenceFrame, DisplayRotation, AxisCode, AxisCode); 16] = [
    (InstrumentPanel, Rotation0, Px, Pz),
    (InstrumentPanel, Rotation90, Pz, Nx),
    (InstrumentPanel, Rotation180, Nx, Nz),
    (InstrumentPanel, Rotation270, Nz, Px),
    (ParallelToGround, Rotation0, Px, Py),
    (ParallelToGround, Rotation90, Py, Nx),
    (ParallelToGround, Rotation180, Nx, Ny),
    (ParallelToGround, Rotation270, Ny, Px),
    (UpsideDownBack, Rotation0, Px, Nz),
    (UpsideDownBack, Rotation90, Nz, Nx),
    (UpsideDownBack, Rotation180, Nx, Pz),
    (UpsideDownBack, Rotation270, Pz, Px),
    (FaceDown, Rotation0, Px, Ny),
    (FaceDown, Rotation90, Ny, Nx),
    (FaceDown, Rotation180, Nx, Py),
    (FaceDown, Rotation270, Py, Px),
];

fn random_rotation(rng: &mut Pcg64) -> Matrix3<f32> {
    let q = Vector4::new(
        rng.random_range(-1.0f32..1.0),
        rng.random_range(-1.0f32..1.0),
        rng.random_range(-1.0f32..1.0),
        rng.random_range(-1.0f32..1.0),
    );
    let q = q / q.norm();
    from_rotation_vector(&q)
}

#[test]
fn test_table_cells() {
    for (frame, rotation, x, y) in TABLE {
        let pair = axis_pair_for(rotation, frame);
        assert_eq!(
            (pair.x(), pair.y()),
            (x, y),
            "Wrong axes for {:?} at {:?}",
            frame,
            rotation
        );
    }
}

#[test]
fn test_table_pairs_are_right_handed() {
    for (frame, rotation, _, _) in TABLE {
        let pair = axis_pair_for(rotation, frame);
        let axes = pair.axes();

        let mut used = [false; 3];
        for code in axes {
            assert!(!used[code.index()], "{:?} uses an axis twice", pair);
            used[code.index()] = true;
        }

        let permutation = remap(&Matrix3::identity(), pair);
        assert_abs_diff_eq!(permutation.determinant(), 1.0, epsilon = 1e-6);
    }
}

#[test]
fn test_table_matches_valid_constructor() {
    for (frame, rotation, x, y) in TABLE {
        assert_eq!(AxisPair::new(x, y), Some(axis_pair_for(rotation, frame)));
    }
}

#[test]
fn test_rotating_display_rotates_ground_frame() {
    // Each quarter turn of the display is a quarter turn about the screen normal
    for (index, rotation) in DisplayRotation::ALL.iter().enumerate() {
        let pair = axis_pair_for(*rotation, ParallelToGround);
        assert_eq!(pair.z(), Pz, "{:?}", rotation);

        let mut expected = AxisPair::new(Px, Py).unwrap();
        for _ in 0..index {
            let [x, y, _] = expected.axes();
            let turn = |code: AxisCode| match code {
                Px => Py,
                Py => Nx,
                Nx => Ny,
                Ny => Px,
                other => other,
            };
            expected = AxisPair::new(turn(x), turn(y)).unwrap();
        }
        assert_eq!(pair, expected, "{:?}", rotation);
    }
}

#[test]
fn test_remap_preserves_orthonormality() {
    let mut rng = Pcg64::seed_from_u64(0x5eed);
    for _ in 0..200 {
        let m = random_rotation(&mut rng);
        for (frame, rotation, _, _) in TABLE {
            let remapped = remap(&m, axis_pair_for(rotation, frame));
            assert_abs_diff_eq!(remapped * remapped.transpose(), Matrix3::identity(), epsilon = 1e-4);
            assert_abs_diff_eq!(remapped.determinant(), 1.0, epsilon = 1e-4);
        }
    }
}

#[test]
fn test_remap_inverse_round_trip() {
    let mut rng = Pcg64::seed_from_u64(42);
    for _ in 0..200 {
        let m = random_rotation(&mut rng);
        for (frame, rotation, _, _) in TABLE {
            let pair = axis_pair_for(rotation, frame);
            let restored = remap(&remap(&m, pair), pair.inverse());
            assert_abs_diff_eq!(restored, m, epsilon = 1e-6);
        }
    }
}
