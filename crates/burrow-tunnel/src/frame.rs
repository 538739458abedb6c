//! Surface-aligned poses and the tangent-plane helpers used to build them.

use glam::DVec3;

const EPS: f64 = 1e-6;

/// Position plus an orthonormal `up`/`forward` pair.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pose {
    pub position: DVec3,
    pub up: DVec3,
    pub forward: DVec3,
}

impl Pose {
    /// Build a pose facing `desired` projected onto the plane of `up`.
    pub fn on_surface(position: DVec3, up: DVec3, desired: DVec3) -> Self {
        let up = up.try_normalize().unwrap_or(DVec3::Y);
        Self {
            position,
            up,
            forward: tangent_forward(desired, up),
        }
    }
}

/// Remove the component of `v` along unit normal `n`.
#[inline]
pub fn project_on_plane(v: DVec3, n: DVec3) -> DVec3 {
    v - n * v.dot(n)
}

/// Unit forward in the tangent plane of `up`.
///
/// Falls back to `up × X`, then `up × Y`, when `desired` is (nearly)
/// parallel to `up` or zero.
pub fn tangent_forward(desired: DVec3, up: DVec3) -> DVec3 {
    let projected = project_on_plane(desired, up);
    if projected.length_squared() >= EPS {
        return projected.normalize();
    }
    let fallback = up.cross(DVec3::X);
    if fallback.length_squared() >= EPS {
        return fallback.normalize();
    }
    up.cross(DVec3::Y).try_normalize().unwrap_or(DVec3::Z)
}
