//! The spherical grid: settings, projection pipeline, and cell stepping.

use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::cell::{clamp_index, index_from_uv, uv_from_index};
use crate::projection::{slerp_unit, spherify};
use crate::remap::{RemapParams, remap_uv};
use crate::{CellAddress, CubeFace, FaceDirection, Projection, cube_point_to_face_uv};

/// Smallest accepted sphere radius.
pub const MIN_RADIUS: f64 = 0.1;

/// Smallest accepted number of cells per face edge.
pub const MIN_RESOLUTION: u32 = 2;

/// Tunable parameters of a [`SphereGrid`].
///
/// Values read from config may be out of range; [`sanitized`](Self::sanitized)
/// brings them back before the grid uses them.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridSettings {
    /// Sphere radius in world units.
    pub radius: f64,
    /// Cells per face edge.
    pub resolution: u32,
    /// Cube-to-sphere formula.
    pub projection: Projection,
    /// Seam straightening, \[0, 1\].
    pub edge_tighten: f64,
    /// Corner squaring, \[0, 1\].
    pub corner_square: f64,
    /// Corner squaring falloff exponent, \[0.5, 4\].
    pub corner_power: f64,
    /// Blend fraction toward the Spherify direction, \[0, 1\].
    pub mix_to_spherify: f64,
    /// Corner uniformization, \[0, 1\].
    pub uniform_corners: f64,
}

impl Default for GridSettings {
    fn default() -> Self {
        Self {
            radius: 5.0,
            resolution: 64,
            projection: Projection::Equiangular,
            edge_tighten: 0.0,
            corner_square: 0.35,
            corner_power: 1.5,
            mix_to_spherify: 0.0,
            uniform_corners: 1.0,
        }
    }
}

impl GridSettings {
    /// Copy with every field clamped into its documented range.
    ///
    /// Non-finite values fall back to the default for that field.
    #[must_use]
    pub fn sanitized(self) -> Self {
        let d = Self::default();
        Self {
            radius: finite_or(self.radius, d.radius).max(MIN_RADIUS),
            resolution: self.resolution.max(MIN_RESOLUTION),
            projection: self.projection,
            edge_tighten: finite_or(self.edge_tighten, d.edge_tighten).clamp(0.0, 1.0),
            corner_square: finite_or(self.corner_square, d.corner_square).clamp(0.0, 1.0),
            corner_power: finite_or(self.corner_power, d.corner_power).clamp(0.5, 4.0),
            mix_to_spherify: finite_or(self.mix_to_spherify, d.mix_to_spherify).clamp(0.0, 1.0),
            uniform_corners: finite_or(self.uniform_corners, d.uniform_corners).clamp(0.0, 1.0),
        }
    }

    fn remap_params(&self) -> RemapParams {
        RemapParams {
            edge_tighten: self.edge_tighten,
            corner_square: self.corner_square,
            corner_power: self.corner_power,
            uniform_corners: self.uniform_corners,
            resolution: self.resolution,
        }
    }
}

fn finite_or(value: f64, fallback: f64) -> f64 {
    if value.is_finite() { value } else { fallback }
}

/// World-space placement of a cell: where it is, which way is up, and which
/// way along the surface is forward (toward increasing `j`).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CellFrame {
    pub position: DVec3,
    pub up: DVec3,
    pub forward: DVec3,
}

/// A cube-sphere grid of six `N × N` faces around `center`.
///
/// Settings only change through the setters, each of which bumps
/// [`revision`](Self::revision) when it actually changes a value. Consumers
/// that cache derived data (see [`GridLines`](crate::GridLines)) compare
/// revisions instead of subscribing to change events.
#[derive(Clone, Debug)]
pub struct SphereGrid {
    center: DVec3,
    settings: GridSettings,
    revision: u64,
}

impl Default for SphereGrid {
    fn default() -> Self {
        Self::new(DVec3::ZERO, GridSettings::default())
    }
}

impl SphereGrid {
    /// Create a grid; `settings` are sanitized first.
    #[must_use]
    pub fn new(center: DVec3, settings: GridSettings) -> Self {
        Self {
            center,
            settings: settings.sanitized(),
            revision: 0,
        }
    }

    pub fn center(&self) -> DVec3 {
        self.center
    }

    pub fn settings(&self) -> &GridSettings {
        &self.settings
    }

    pub fn radius(&self) -> f64 {
        self.settings.radius
    }

    pub fn resolution(&self) -> u32 {
        self.settings.resolution
    }

    /// Monotonic counter of effective configuration changes.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Unit direction for a face-local coordinate, with the full UV remap.
    ///
    /// `u` and `v` are clamped to \[-1, 1\] first.
    #[must_use]
    pub fn project_direction(&self, face: CubeFace, u: f64, v: f64) -> DVec3 {
        let u = u.clamp(-1.0, 1.0);
        let v = v.clamp(-1.0, 1.0);
        let params = self.settings.remap_params();
        let (ru, rv) = remap_uv(u, v, &params, |a, b| self.project_direction_raw(face, a, b));
        self.project_direction_raw(face, ru, rv)
    }

    /// Unit direction for a face-local coordinate without the UV remap.
    ///
    /// Still applies the configured projection and the Spherify blend.
    #[must_use]
    pub fn project_direction_raw(&self, face: CubeFace, u: f64, v: f64) -> DVec3 {
        let u = u.clamp(-1.0, 1.0);
        let v = v.clamp(-1.0, 1.0);
        let mut dir = self.settings.projection.direction(face, u, v);
        let mix = self.settings.mix_to_spherify;
        if mix > 0.0 {
            dir = slerp_unit(dir, spherify(face, u, v), mix);
        }
        dir.try_normalize().unwrap_or(face.normal())
    }

    /// Clamp raw indices into a valid address for this grid.
    #[must_use]
    pub fn cell_at(&self, face: CubeFace, i: i64, j: i64) -> CellAddress {
        let n = self.settings.resolution;
        CellAddress::new(face, clamp_index(i, n), clamp_index(j, n))
    }

    /// World position of a cell center on the sphere surface.
    #[must_use]
    pub fn cell_world_center(&self, cell: CellAddress) -> DVec3 {
        let n = self.settings.resolution;
        let uv = self.cell_at(cell.face, i64::from(cell.i), i64::from(cell.j)).center_uv(n);
        self.center + self.project_direction(uv.face, uv.u, uv.v) * self.settings.radius
    }

    /// Outward radial unit vector at `p`; `+Y` when `p` is the center.
    #[must_use]
    pub fn surface_normal(&self, p: DVec3) -> DVec3 {
        (p - self.center).try_normalize().unwrap_or(DVec3::Y)
    }

    /// Move `dx` columns and `dy` rows from `cell`.
    ///
    /// Steps that leave the face go through cube space: the offset point on
    /// the source face's extended plane is assigned to its dominant face and
    /// re-quantized there. Multi-cell steps are taken in one jump, not cell
    /// by cell.
    #[must_use]
    pub fn step(&self, cell: CellAddress, dx: i32, dy: i32) -> CellAddress {
        let n = self.settings.resolution;
        let cell = self.cell_at(cell.face, i64::from(cell.i), i64::from(cell.j));
        let du = 2.0 / f64::from(n);
        let u = uv_from_index(cell.i, n) + f64::from(dx) * du;
        let v = uv_from_index(cell.j, n) + f64::from(dy) * du;

        if (-1.0..=1.0).contains(&u) && (-1.0..=1.0).contains(&v) {
            return CellAddress::new(
                cell.face,
                clamp_index(index_from_uv(u, n), n),
                clamp_index(index_from_uv(v, n), n),
            );
        }

        let (face, nu, nv) = cube_point_to_face_uv(cell.face.cube_point(u, v));
        CellAddress::new(
            face,
            clamp_index(index_from_uv(nu, n), n),
            clamp_index(index_from_uv(nv, n), n),
        )
    }

    /// One step in a cardinal direction of the cell's own face frame.
    #[must_use]
    pub fn step_toward(&self, cell: CellAddress, dir: FaceDirection) -> CellAddress {
        let (dx, dy) = dir.delta();
        self.step(cell, dx, dy)
    }

    /// World point on grid line `index` of `face` at parameter `t` in \[0, 1\].
    ///
    /// A `vertical` line holds `u` constant and runs along `v`.
    #[must_use]
    pub fn edge_sample(&self, face: CubeFace, vertical: bool, index: i64, t: f64) -> DVec3 {
        let n = self.settings.resolution;
        let fixed = -1.0 + 2.0 * index.clamp(0, i64::from(n)) as f64 / f64::from(n);
        let along = -1.0 + 2.0 * t.clamp(0.0, 1.0);
        let (u, v) = if vertical { (fixed, along) } else { (along, fixed) };
        self.center + self.project_direction(face, u, v) * self.settings.radius
    }

    /// `segments + 1` evenly spaced samples along a grid line, with at least
    /// 8 segments.
    #[must_use]
    pub fn edge_polyline(&self, face: CubeFace, vertical: bool, index: i64, segments: u32) -> Vec<DVec3> {
        let segments = segments.max(8);
        (0..=segments)
            .map(|k| self.edge_sample(face, vertical, index, f64::from(k) / f64::from(segments)))
            .collect()
    }

    /// Placement frame of `cell`, with forward running along `+j`.
    #[must_use]
    pub fn cell_frame(&self, cell: CellAddress) -> CellFrame {
        let position = self.cell_world_center(cell);
        let up = self.surface_normal(position);
        let toward = self.cell_world_center(self.step(cell, 1, 0)) - position;
        let right = (toward - up * toward.dot(up))
            .try_normalize()
            .unwrap_or_else(|| up.any_orthonormal_vector());
        CellFrame {
            position,
            up,
            forward: up.cross(right).normalize(),
        }
    }

    pub fn set_center(&mut self, center: DVec3) -> bool {
        if center == self.center {
            return false;
        }
        self.center = center;
        self.revision += 1;
        true
    }

    pub fn set_radius(&mut self, radius: f64) -> bool {
        self.update(|s| s.radius = radius)
    }

    pub fn set_resolution(&mut self, resolution: u32) -> bool {
        self.update(|s| s.resolution = resolution)
    }

    pub fn set_projection(&mut self, projection: Projection) -> bool {
        self.update(|s| s.projection = projection)
    }

    pub fn set_edge_tighten(&mut self, value: f64) -> bool {
        self.update(|s| s.edge_tighten = value)
    }

    pub fn set_corner_square(&mut self, value: f64) -> bool {
        self.update(|s| s.corner_square = value)
    }

    pub fn set_corner_power(&mut self, value: f64) -> bool {
        self.update(|s| s.corner_power = value)
    }

    pub fn set_mix_to_spherify(&mut self, value: f64) -> bool {
        self.update(|s| s.mix_to_spherify = value)
    }

    pub fn set_uniform_corners(&mut self, value: f64) -> bool {
        self.update(|s| s.uniform_corners = value)
    }

    /// Replace all settings at once; bumps the revision at most once.
    pub fn apply_settings(&mut self, settings: GridSettings) -> bool {
        self.update(|s| *s = settings)
    }

    /// Apply `edit` to a copy, sanitize, and commit if anything changed.
    fn update(&mut self, edit: impl FnOnce(&mut GridSettings)) -> bool {
        let mut next = self.settings;
        edit(&mut next);
        let next = next.sanitized();
        if next == self.settings {
            return false;
        }
        self.settings = next;
        self.revision += 1;
        true
    }
}
