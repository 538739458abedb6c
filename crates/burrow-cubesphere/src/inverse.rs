//! Cube-space inverse: which face a point falls onto, and where.

use glam::DVec3;

use crate::CubeFace;

/// The face whose axis dominates `p` (largest absolute component).
///
/// Ties resolve toward X, then Y, then Z; a non-negative component selects
/// the positive face. A zero vector maps to [`CubeFace::PosX`].
#[must_use]
pub fn dominant_face(p: DVec3) -> CubeFace {
    let ax = p.x.abs();
    let ay = p.y.abs();
    let az = p.z.abs();

    if ax >= ay && ax >= az {
        if p.x >= 0.0 {
            CubeFace::PosX
        } else {
            CubeFace::NegX
        }
    } else if ay >= az {
        if p.y >= 0.0 {
            CubeFace::PosY
        } else {
            CubeFace::NegY
        }
    } else if p.z >= 0.0 {
        CubeFace::PosZ
    } else {
        CubeFace::NegZ
    }
}

/// Re-express a cube-space point in the UV frame of its dominant face.
///
/// Returns `(PosX, 0, 0)` for the zero vector rather than dividing by zero.
#[must_use]
pub fn cube_point_to_face_uv(p: DVec3) -> (CubeFace, f64, f64) {
    let face = dominant_face(p);
    if p.dot(face.normal()).abs() < 1e-300 {
        return (face, 0.0, 0.0);
    }
    let (u, v) = face.cube_to_uv(p);
    (face, u, v)
}
