//! Discrete cell addresses on an N×N face grid.

use crate::{CubeFace, FaceUv};

/// A cell on the grid: face plus integer column `i` and row `j`.
///
/// Indices are expected in `[0, N-1]` for the owning grid's resolution `N`;
/// [`SphereGrid::cell_at`](crate::SphereGrid::cell_at) clamps raw indices.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellAddress {
    /// Face the cell belongs to.
    pub face: CubeFace,
    /// Column, increasing with `u`.
    pub i: u32,
    /// Row, increasing with `v`.
    pub j: u32,
}

impl CellAddress {
    /// Construct an address without range checks.
    #[must_use]
    pub const fn new(face: CubeFace, i: u32, j: u32) -> Self {
        Self { face, i, j }
    }

    /// UV of this cell's center for a grid of `resolution` cells per edge.
    #[must_use]
    pub fn center_uv(&self, resolution: u32) -> FaceUv {
        FaceUv::new_unchecked(
            self.face,
            uv_from_index(self.i, resolution),
            uv_from_index(self.j, resolution),
        )
    }
}

impl std::fmt::Display for CellAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}[{}, {}]", self.face, self.i, self.j)
    }
}

/// Cell-center coordinate in `[-1, 1]` for index `index` of `resolution`.
#[inline]
#[must_use]
pub fn uv_from_index(index: u32, resolution: u32) -> f64 {
    ((f64::from(index) + 0.5) / f64::from(resolution)) * 2.0 - 1.0
}

/// Index of the cell containing coordinate `coord`.
///
/// The result is not clamped and may fall outside `[0, resolution - 1]`.
#[inline]
#[must_use]
pub fn index_from_uv(coord: f64, resolution: u32) -> i64 {
    ((coord + 1.0) * 0.5 * f64::from(resolution)).floor() as i64
}

/// Clamp a raw index into `[0, resolution - 1]`.
#[inline]
#[must_use]
pub fn clamp_index(index: i64, resolution: u32) -> u32 {
    index.clamp(0, i64::from(resolution) - 1) as u32
}
