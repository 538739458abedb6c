//! Face-local UV coordinates in `[-1, 1]`.

use crate::CubeFace;

/// A point on a cube face, `u` and `v` in \[-1, 1\].
///
/// `(0, 0)` is the face center; `u = ±1` or `v = ±1` are the seams shared
/// with neighbouring faces.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FaceUv {
    /// Face the coordinate lies on.
    pub face: CubeFace,
    /// Coordinate along the face tangent.
    pub u: f64,
    /// Coordinate along the face bitangent.
    pub v: f64,
}

impl FaceUv {
    /// Construct a `FaceUv`, clamping `u` and `v` to \[-1, 1\].
    #[must_use]
    pub fn new(face: CubeFace, u: f64, v: f64) -> Self {
        Self {
            face,
            u: u.clamp(-1.0, 1.0),
            v: v.clamp(-1.0, 1.0),
        }
    }

    /// Construct without clamping. Caller guarantees `-1 <= u, v <= 1`.
    #[must_use]
    pub fn new_unchecked(face: CubeFace, u: f64, v: f64) -> Self {
        debug_assert!((-1.0..=1.0).contains(&u), "u out of range: {u}");
        debug_assert!((-1.0..=1.0).contains(&v), "v out of range: {v}");
        Self { face, u, v }
    }

    /// Whether the coordinate sits exactly on a face seam.
    #[must_use]
    pub fn on_seam(&self) -> bool {
        self.u.abs() >= 1.0 || self.v.abs() >= 1.0
    }
}
