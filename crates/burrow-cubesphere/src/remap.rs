//! UV remap applied before projection.
//!
//! Purely cosmetic, but grid lines and cell centers both go through it, so it
//! has to be reproduced exactly. Every stage fades out across the outermost
//! 5% of the face so that seams stay bit-for-bit the same on both sides.

use std::f64::consts::FRAC_PI_2;

use glam::DVec3;

/// Width of the band next to each seam over which corrections fade out.
pub const EDGE_BAND: f64 = 0.05;

/// Fixed-point iterations of the corner uniformization pass.
pub const UNIFORMIZE_ITERATIONS: usize = 3;

/// Spacing ratio tolerance at which uniformization stops early.
pub const UNIFORMIZE_TOLERANCE: f64 = 1e-3;

/// Spacing below which uniformization gives up (angle in radians).
pub const UNIFORMIZE_MIN_SPACING: f64 = 1e-6;

/// Tuning scalars of the remap, already clamped to their ranges.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RemapParams {
    /// Seam straightening strength, \[0, 1\].
    pub edge_tighten: f64,
    /// Corner squaring strength, \[0, 1\].
    pub corner_square: f64,
    /// How sharply corner squaring concentrates at the corner, \[0.5, 4\].
    pub corner_power: f64,
    /// Corner uniformization strength, \[0, 1\].
    pub uniform_corners: f64,
    /// Cells per face edge, used to size the spacing probe.
    pub resolution: u32,
}

/// 1 in the face interior, ramping linearly to 0 at `|x| = 1`.
#[inline]
#[must_use]
pub fn edge_mask_1d(x: f64) -> f64 {
    ((1.0 - x.abs()) / EDGE_BAND).clamp(0.0, 1.0)
}

/// Combined mask: zero as soon as either coordinate touches a seam.
#[inline]
#[must_use]
pub fn edge_mask(u: f64, v: f64) -> f64 {
    edge_mask_1d(u).min(edge_mask_1d(v))
}

/// Smoothstep followed by a quarter sine, mapped back to \[-1, 1\].
#[inline]
#[must_use]
pub fn tighten_curve(x: f64) -> f64 {
    let t = (x + 1.0) * 0.5;
    let t = t * t * (3.0 - 2.0 * t);
    (t * FRAC_PI_2).sin() * 2.0 - 1.0
}

/// Full remap pipeline.
///
/// `raw` evaluates the un-remapped projection; it is only called when the
/// uniformization pass is active.
#[must_use]
pub fn remap_uv<F>(u: f64, v: f64, params: &RemapParams, raw: F) -> (f64, f64)
where
    F: Fn(f64, f64) -> DVec3,
{
    let (mut u, mut v) = uniformize(u, v, params.uniform_corners, params.resolution, raw);

    let mask = edge_mask(u, v);

    if params.edge_tighten > 0.0 && mask > 0.0 {
        let k = params.edge_tighten * mask;
        u = lerp(u, tighten_curve(u), k);
        v = lerp(v, tighten_curve(v), k);
    }

    if params.corner_square > 0.0 && mask > 0.0 {
        let au = u.abs();
        let av = v.abs();
        let f = (au * av).powf(params.corner_power);
        let gamma = lerp(1.0, 0.6, params.corner_square * f * mask);
        u = u.signum() * au.powf(gamma);
        v = v.signum() * av.powf(gamma);
    }

    (u, v)
}

/// Anisotropic rescale of `(u, v)` that drives the angular cell spacing along
/// `u` and `v` toward each other, strongest near the corners.
///
/// Runs at most [`UNIFORMIZE_ITERATIONS`] fixed-point iterations and stops
/// early once the spacing ratio is within [`UNIFORMIZE_TOLERANCE`] of 1 or a
/// spacing underflows. Convergence beyond that is not guaranteed.
#[must_use]
pub fn uniformize<F>(u: f64, v: f64, strength: f64, resolution: u32, raw: F) -> (f64, f64)
where
    F: Fn(f64, f64) -> DVec3,
{
    let mut u = u.clamp(-1.0, 1.0);
    let mut v = v.clamp(-1.0, 1.0);

    let strength = strength.clamp(0.0, 1.0);
    if strength <= 0.0 {
        return (u, v);
    }

    let seam_mask = edge_mask(u, v);
    let probe = (1.5 / f64::from(resolution.max(2))).min(0.45);

    for _ in 0..UNIFORMIZE_ITERATIONS {
        let len_u = spacing(&raw, u, v, probe, 0.0);
        let len_v = spacing(&raw, u, v, 0.0, probe);
        if len_u <= UNIFORMIZE_MIN_SPACING || len_v <= UNIFORMIZE_MIN_SPACING {
            break;
        }

        let ratio = len_u / len_v;
        if (ratio - 1.0).abs() < UNIFORMIZE_TOLERANCE {
            break;
        }

        let corner = u.abs().max(v.abs());
        let weight = strength * corner * corner * seam_mask;
        if weight <= 0.0 {
            break;
        }

        let adjust = lerp(1.0, ratio.clamp(0.1, 10.0).sqrt(), weight);
        u = (u / adjust).clamp(-1.0, 1.0);
        v = (v * adjust).clamp(-1.0, 1.0);
    }

    (u, v)
}

/// Angle between raw directions at `uv - (du, dv)` and `uv + (du, dv)`.
fn spacing<F>(raw: &F, u: f64, v: f64, du: f64, dv: f64) -> f64
where
    F: Fn(f64, f64) -> DVec3,
{
    let d0 = raw((u - du).clamp(-1.0, 1.0), (v - dv).clamp(-1.0, 1.0));
    let d1 = raw((u + du).clamp(-1.0, 1.0), (v + dv).clamp(-1.0, 1.0));
    d0.dot(d1).clamp(-1.0, 1.0).acos()
}

#[inline]
fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}
