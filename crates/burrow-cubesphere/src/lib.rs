//! Cube-sphere grid addressing: faces, UV frames, projections, seam-safe UV
//! remapping, and discrete cell stepping across faces.

mod cell;
mod cube_face;
mod direction;
mod face_uv;
mod grid;
mod grid_lines;
mod inverse;
mod projection;
pub mod remap;

pub use cell::{CellAddress, clamp_index, index_from_uv, uv_from_index};
pub use cube_face::CubeFace;
pub use direction::FaceDirection;
pub use face_uv::FaceUv;
pub use grid::{CellFrame, GridSettings, MIN_RADIUS, MIN_RESOLUTION, SphereGrid};
pub use grid_lines::{GridLine, GridLineOptions, GridLines};
pub use inverse::{cube_point_to_face_uv, dominant_face};
pub use projection::{Projection, equiangular, gnomonic, slerp_unit, spherify, spherify_cube_point};
