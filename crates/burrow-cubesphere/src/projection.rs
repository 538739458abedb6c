//! Cube-to-sphere projection strategies.
//!
//! Three interchangeable formulas map a face-local `(u, v)` to a unit
//! direction:
//! - **Gnomonic**: the raw cube point, normalized. Cell area varies strongly
//!   toward the face edges.
//! - **Equiangular**: `tan(x · π/4)` warp before normalizing, giving near
//!   uniform angular cell size.
//! - **Spherify**: the analytic per-axis correction with the most uniform
//!   cell area; also the blend target of `mix_to_spherify`.

use std::f64::consts::FRAC_PI_4;

use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::CubeFace;

/// Selects the cube-to-sphere formula.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Projection {
    /// Normalized cube point.
    Gnomonic,
    /// Tangent-warped cube point.
    #[default]
    Equiangular,
    /// Analytic area-uniform mapping.
    Spherify,
}

impl Projection {
    /// Unit direction for `(face, u, v)` under this projection.
    #[inline]
    #[must_use]
    pub fn direction(self, face: CubeFace, u: f64, v: f64) -> DVec3 {
        match self {
            Projection::Gnomonic => gnomonic(face, u, v),
            Projection::Equiangular => equiangular(face, u, v),
            Projection::Spherify => spherify(face, u, v),
        }
    }
}

impl std::str::FromStr for Projection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "gnomonic" => Ok(Projection::Gnomonic),
            "equiangular" => Ok(Projection::Equiangular),
            "spherify" => Ok(Projection::Spherify),
            other => Err(format!("unknown projection '{other}'")),
        }
    }
}

/// Normalized cube point.
#[inline]
#[must_use]
pub fn gnomonic(face: CubeFace, u: f64, v: f64) -> DVec3 {
    face.cube_point(u, v).normalize()
}

/// Cube point after the equiangular `tan(x · π/4)` warp, normalized.
///
/// `tan(±π/4) = ±1`, so the warp is the identity on the seams.
#[inline]
#[must_use]
pub fn equiangular(face: CubeFace, u: f64, v: f64) -> DVec3 {
    let tu = (FRAC_PI_4 * u).tan();
    let tv = (FRAC_PI_4 * v).tan();
    face.cube_point(tu, tv).normalize()
}

/// Analytic spherify of the cube point:
///
/// ```text
/// sx = x * sqrt(1 - y²/2 - z²/2 + y²z²/3)
/// sy = y * sqrt(1 - z²/2 - x²/2 + z²x²/3)
/// sz = z * sqrt(1 - x²/2 - y²/2 + x²y²/3)
/// ```
#[inline]
#[must_use]
pub fn spherify(face: CubeFace, u: f64, v: f64) -> DVec3 {
    spherify_cube_point(face.cube_point(u, v)).normalize()
}

/// The spherify correction applied to an arbitrary cube-surface point.
#[inline]
#[must_use]
pub fn spherify_cube_point(c: DVec3) -> DVec3 {
    let x2 = c.x * c.x;
    let y2 = c.y * c.y;
    let z2 = c.z * c.z;

    DVec3::new(
        c.x * (1.0 - y2 / 2.0 - z2 / 2.0 + y2 * z2 / 3.0).max(0.0).sqrt(),
        c.y * (1.0 - z2 / 2.0 - x2 / 2.0 + z2 * x2 / 3.0).max(0.0).sqrt(),
        c.z * (1.0 - x2 / 2.0 - y2 / 2.0 + x2 * y2 / 3.0).max(0.0).sqrt(),
    )
}

/// Spherical interpolation between two unit vectors.
///
/// Falls back to a normalized lerp when the vectors are nearly parallel.
#[must_use]
pub fn slerp_unit(a: DVec3, b: DVec3, t: f64) -> DVec3 {
    let dot = a.dot(b).clamp(-1.0, 1.0);
    let theta = dot.acos();
    if theta < 1e-9 {
        return a.lerp(b, t).try_normalize().unwrap_or(a);
    }
    let sin_theta = theta.sin();
    if sin_theta.abs() < 1e-12 {
        // Antipodal: no unique great circle.
        return if t < 0.5 { a } else { b };
    }
    let wa = ((1.0 - t) * theta).sin() / sin_theta;
    let wb = (t * theta).sin() / sin_theta;
    a * wa + b * wb
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-10;

    const MODES: [Projection; 3] = [
        Projection::Gnomonic,
        Projection::Equiangular,
        Projection::Spherify,
    ];

    #[test]
    fn test_face_center_maps_to_normal() {
        for mode in MODES {
            for face in CubeFace::ALL {
                let d = mode.direction(face, 0.0, 0.0);
                assert!(
                    (d - face.normal()).length() < EPSILON,
                    "{mode:?}: center of {face:?} gave {d:?}"
                );
            }
        }
    }

    #[test]
    fn test_all_outputs_on_unit_sphere() {
        for mode in MODES {
            for face in CubeFace::ALL {
                for a in 0..=10 {
                    for b in 0..=10 {
                        let u = -1.0 + a as f64 * 0.2;
                        let v = -1.0 + b as f64 * 0.2;
                        let d = mode.direction(face, u, v);
                        assert!(
                            (d.length() - 1.0).abs() < EPSILON,
                            "{mode:?} {face:?} ({u}, {v}): length {}",
                            d.length()
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn test_corners_agree_across_modes() {
        // Every projection fixes the cube corners onto the same diagonal.
        for face in CubeFace::ALL {
            let expected = face.cube_point(1.0, 1.0).normalize();
            for mode in MODES {
                let d = mode.direction(face, 1.0, 1.0);
                assert!((d - expected).length() < 1e-9, "{mode:?} {face:?}");
            }
        }
    }

    #[test]
    fn test_equiangular_spacing_is_uniform_along_axis() {
        // Equal UV steps from the center subtend equal angles on the sphere.
        let face = CubeFace::PosZ;
        let a0 = equiangular(face, 0.0, 0.0);
        let a1 = equiangular(face, 0.25, 0.0);
        let a2 = equiangular(face, 0.5, 0.0);
        let first = a0.angle_between(a1);
        let second = a1.angle_between(a2);
        assert!((first - second).abs() < 1e-9);
        assert!((first - FRAC_PI_4 * 0.25).abs() < 1e-9);
    }

    #[test]
    fn test_gnomonic_compresses_toward_center() {
        let face = CubeFace::PosX;
        let inner = gnomonic(face, 0.0, 0.0).angle_between(gnomonic(face, 0.1, 0.0));
        let outer = gnomonic(face, 0.9, 0.0).angle_between(gnomonic(face, 1.0, 0.0));
        assert!(inner > outer);
    }

    #[test]
    fn test_slerp_endpoints_and_midpoint() {
        let a = DVec3::X;
        let b = DVec3::Y;
        assert!((slerp_unit(a, b, 0.0) - a).length() < EPSILON);
        assert!((slerp_unit(a, b, 1.0) - b).length() < EPSILON);
        let mid = slerp_unit(a, b, 0.5);
        assert!((mid.length() - 1.0).abs() < EPSILON);
        assert!((mid.angle_between(a) - mid.angle_between(b)).abs() < EPSILON);
    }

    #[test]
    fn test_slerp_identical_inputs() {
        let a = DVec3::new(0.3, 0.4, 0.5).normalize();
        assert!((slerp_unit(a, a, 0.7) - a).length() < EPSILON);
    }

    #[test]
    fn test_projection_from_str() {
        assert_eq!("Spherify".parse::<Projection>(), Ok(Projection::Spherify));
        assert_eq!("gnomonic".parse::<Projection>(), Ok(Projection::Gnomonic));
        assert!("mercator".parse::<Projection>().is_err());
    }

    #[test]
    fn test_default_projection_is_equiangular() {
        assert_eq!(Projection::default(), Projection::Equiangular);
    }
}
