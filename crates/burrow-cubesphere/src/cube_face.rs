//! The six faces of the addressing cube and their UV frames.

use glam::DVec3;
use serde::{Deserialize, Serialize};

/// One side of the cube that is wrapped onto the sphere.
///
/// Each face carries a fixed frame: `u` grows along [`tangent`](Self::tangent),
/// `v` along [`bitangent`](Self::bitangent), and `tangent × bitangent` is the
/// outward [`normal`](Self::normal). Adjacent faces use different frames, which
/// is why stepping across a seam goes through the cube rather than through UV.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum CubeFace {
    /// +X face
    PosX = 0,
    /// −X face
    NegX = 1,
    /// +Y face
    PosY = 2,
    /// −Y face
    NegY = 3,
    /// +Z face
    PosZ = 4,
    /// −Z face
    NegZ = 5,
}

impl CubeFace {
    /// All six faces in discriminant order.
    pub const ALL: [CubeFace; 6] = [
        CubeFace::PosX,
        CubeFace::NegX,
        CubeFace::PosY,
        CubeFace::NegY,
        CubeFace::PosZ,
        CubeFace::NegZ,
    ];

    /// Outward unit normal.
    #[must_use]
    pub fn normal(self) -> DVec3 {
        match self {
            CubeFace::PosX => DVec3::X,
            CubeFace::NegX => DVec3::NEG_X,
            CubeFace::PosY => DVec3::Y,
            CubeFace::NegY => DVec3::NEG_Y,
            CubeFace::PosZ => DVec3::Z,
            CubeFace::NegZ => DVec3::NEG_Z,
        }
    }

    /// Direction of increasing `u`.
    #[must_use]
    pub fn tangent(self) -> DVec3 {
        match self {
            CubeFace::PosX => DVec3::NEG_Z,
            CubeFace::NegX => DVec3::Z,
            CubeFace::PosY | CubeFace::NegY | CubeFace::PosZ => DVec3::X,
            CubeFace::NegZ => DVec3::NEG_X,
        }
    }

    /// Direction of increasing `v`.
    #[must_use]
    pub fn bitangent(self) -> DVec3 {
        match self {
            CubeFace::PosY => DVec3::NEG_Z,
            CubeFace::NegY => DVec3::Z,
            CubeFace::PosX | CubeFace::NegX | CubeFace::PosZ | CubeFace::NegZ => DVec3::Y,
        }
    }

    /// Point on the `[-1, 1]` cube for face-local `(u, v)`.
    ///
    /// `u` and `v` are not clamped: stepping relies on evaluating points past
    /// the face edge to find the face they fall onto.
    #[inline]
    #[must_use]
    pub fn cube_point(self, u: f64, v: f64) -> DVec3 {
        self.normal() + u * self.tangent() + v * self.bitangent()
    }

    /// Face-local `(u, v)` of a cube-space point, by central projection onto
    /// this face's plane.
    ///
    /// Only meaningful when this face is the point's dominant face (see
    /// [`dominant_face`](crate::dominant_face)); the face-axis component must
    /// be non-zero.
    #[inline]
    #[must_use]
    pub fn cube_to_uv(self, p: DVec3) -> (f64, f64) {
        let inv = 1.0 / p.dot(self.normal()).abs();
        (p.dot(self.tangent()) * inv, p.dot(self.bitangent()) * inv)
    }

    /// Short label used in logs (`+X`, `-Z`, ...).
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            CubeFace::PosX => "+X",
            CubeFace::NegX => "-X",
            CubeFace::PosY => "+Y",
            CubeFace::NegY => "-Y",
            CubeFace::PosZ => "+Z",
            CubeFace::NegZ => "-Z",
        }
    }
}

impl std::fmt::Display for CubeFace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
