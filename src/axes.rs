//! Axis remapping for display rotations and screen reference frames
//!
//! A rotation matrix built from sensor data describes the device in its
//! natural orientation with the screen facing the sky. To report angles for a
//! rotated display, or for a device held upright, the matrix is re-expressed
//! with a signed permutation of its device axes. This module holds the fixed
//! table of those permutations and applies them.
//!
//! # Example
//! ```
//! use nalgebra::Matrix3;
//! use orientation_engine::{AxisCode, DisplayRotation, ReferenceFrame, axis_pair_for, remap};
//!
//! let pair = axis_pair_for(DisplayRotation::Rotation90, ReferenceFrame::ParallelToGround);
//! assert_eq!((pair.x(), pair.y()), (AxisCode::Py, AxisCode::Nx));
//!
//! let remapped = remap(&Matrix3::identity(), pair);
//! let restored = remap(&remapped, pair.inverse());
//! assert_eq!(restored, Matrix3::identity());
//! ```

use crate::rotation::RotationMatrix;
use crate::types::{DisplayRotation, ReferenceFrame};

/// Signed device axis
///
/// The naming convention uses:
/// - `P` = Positive (same direction)
/// - `N` = Negative (inverted direction)
/// - `x`, `y`, `z` = which device axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AxisCode {
    /// +X
    Px,
    /// +Y
    Py,
    /// +Z
    Pz,
    /// -X
    Nx,
    /// -Y
    Ny,
    /// -Z
    Nz,
}

impl AxisCode {
    /// All six signed axes.
    pub const ALL: [AxisCode; 6] = [
        AxisCode::Px,
        AxisCode::Py,
        AxisCode::Pz,
        AxisCode::Nx,
        AxisCode::Ny,
        AxisCode::Nz,
    ];

    /// Axis index, 0 for X, 1 for Y, 2 for Z
    pub const fn index(self) -> usize {
        match self {
            AxisCode::Px | AxisCode::Nx => 0,
            AxisCode::Py | AxisCode::Ny => 1,
            AxisCode::Pz | AxisCode::Nz => 2,
        }
    }

    /// True for the negated axes
    pub const fn is_negative(self) -> bool {
        matches!(self, AxisCode::Nx | AxisCode::Ny | AxisCode::Nz)
    }

    /// +1.0 or -1.0
    pub const fn sign(self) -> f32 {
        if self.is_negative() { -1.0 } else { 1.0 }
    }

    /// Builds a code from an axis index (0..=2) and a sign.
    pub const fn from_parts(index: usize, negative: bool) -> Option<Self> {
        match (index, negative) {
            (0, false) => Some(AxisCode::Px),
            (1, false) => Some(AxisCode::Py),
            (2, false) => Some(AxisCode::Pz),
            (0, true) => Some(AxisCode::Nx),
            (1, true) => Some(AxisCode::Ny),
            (2, true) => Some(AxisCode::Nz),
            _ => None,
        }
    }
}

/// World axes for the device X and Y axes
///
/// The Z axis is implied: it is the remaining device axis, with the sign that
/// keeps the remap a proper rotation rather than a reflection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AxisPair {
    x: AxisCode,
    y: AxisCode,
}

impl AxisPair {
    /// Creates a pair, or `None` when both codes name the same device axis.
    pub const fn new(x: AxisCode, y: AxisCode) -> Option<Self> {
        if x.index() == y.index() {
            None
        } else {
            Some(Self { x, y })
        }
    }

    /// World axis for the device X axis
    pub const fn x(self) -> AxisCode {
        self.x
    }

    /// World axis for the device Y axis
    pub const fn y(self) -> AxisCode {
        self.y
    }

    /// Implied world axis for the device Z axis
    ///
    /// Its sign is `sign(x) * sign(y)`, flipped once more when `(x, y, z)` is
    /// not a cyclic order of the axes.
    pub const fn z(self) -> AxisCode {
        let x = self.x.index();
        let y = self.y.index();
        let z = 3 - x - y;
        let cyclic = y == (x + 1) % 3;
        let negative = self.x.is_negative() ^ self.y.is_negative() ^ !cyclic;
        match AxisCode::from_parts(z, negative) {
            Some(code) => code,
            // x and y are distinct, so z is always in 0..=2
            None => AxisCode::Pz,
        }
    }

    /// Codes for device X, Y and Z, in that order.
    pub const fn axes(self) -> [AxisCode; 3] {
        [self.x, self.y, self.z()]
    }

    /// The pair whose remap undoes this one.
    pub fn inverse(self) -> Self {
        let axes = self.axes();
        let source_of = |target: usize| {
            let (source, code) = axes
                .iter()
                .enumerate()
                .find(|(_, code)| code.index() == target)
                .map(|(source, code)| (source, *code))
                .unwrap_or((target, AxisCode::Px));
            AxisCode::from_parts(source, code.is_negative()).unwrap_or(AxisCode::Px)
        };
        Self {
            x: source_of(0),
            y: source_of(1),
        }
    }

    const fn of(x: AxisCode, y: AxisCode) -> Self {
        Self { x, y }
    }
}

/// Axis pair for a display rotation and reference frame.
///
/// Total over all sixteen combinations.
pub const fn axis_pair_for(rotation: DisplayRotation, frame: ReferenceFrame) -> AxisPair {
    use AxisCode::*;
    use DisplayRotation::*;
    use ReferenceFrame::*;

    match (frame, rotation) {
        (InstrumentPanel, Rotation0) => AxisPair::of(Px, Pz),
        (InstrumentPanel, Rotation90) => AxisPair::of(Pz, Nx),
        (InstrumentPanel, Rotation180) => AxisPair::of(Nx, Nz),
        (InstrumentPanel, Rotation270) => AxisPair::of(Nz, Px),

        (ParallelToGround, Rotation0) => AxisPair::of(Px, Py),
        (ParallelToGround, Rotation90) => AxisPair::of(Py, Nx),
        (ParallelToGround, Rotation180) => AxisPair::of(Nx, Ny),
        (ParallelToGround, Rotation270) => AxisPair::of(Ny, Px),

        (UpsideDownBack, Rotation0) => AxisPair::of(Px, Nz),
        (UpsideDownBack, Rotation90) => AxisPair::of(Nz, Nx),
        (UpsideDownBack, Rotation180) => AxisPair::of(Nx, Pz),
        (UpsideDownBack, Rotation270) => AxisPair::of(Pz, Px),

        (FaceDown, Rotation0) => AxisPair::of(Px, Ny),
        (FaceDown, Rotation90) => AxisPair::of(Ny, Nx),
        (FaceDown, Rotation180) => AxisPair::of(Nx, Py),
        (FaceDown, Rotation270) => AxisPair::of(Py, Px),
    }
}

/// Re-expresses a rotation matrix in the coordinate system given by `pair`.
///
/// Column `i` of the input (device axis `i`) lands in the column named by the
/// i-th code of the pair, negated for negative codes. The result is a signed
/// permutation of the input, so it stays orthonormal.
pub fn remap(matrix: &RotationMatrix, pair: AxisPair) -> RotationMatrix {
    let mut remapped = RotationMatrix::zeros();
    for (source, code) in pair.axes().iter().enumerate() {
        let column = matrix.column(source) * code.sign();
        remapped.set_column(code.index(), &column);
    }
    remapped
}
