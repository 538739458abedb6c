//! Uniform Catmull-Rom segments and cubic Bezier curves.

use glam::DVec3;

/// Point on the Catmull-Rom segment between `p1` and `p2` at `t` in `[0, 1]`.
#[inline]
pub fn catmull_rom(p0: DVec3, p1: DVec3, p2: DVec3, p3: DVec3, t: f64) -> DVec3 {
    let t2 = t * t;
    let t3 = t2 * t;

    let c0 = -0.5 * t3 + t2 - 0.5 * t;
    let c1 = 1.5 * t3 - 2.5 * t2 + 1.0;
    let c2 = -1.5 * t3 + 2.0 * t2 + 0.5 * t;
    let c3 = 0.5 * t3 - 0.5 * t2;

    p0 * c0 + p1 * c1 + p2 * c2 + p3 * c3
}

/// Analytic `d/dt` of [`catmull_rom`].
#[inline]
pub fn catmull_rom_derivative(p0: DVec3, p1: DVec3, p2: DVec3, p3: DVec3, t: f64) -> DVec3 {
    let t2 = t * t;

    let c0 = -1.5 * t2 + 2.0 * t - 0.5;
    let c1 = 4.5 * t2 - 5.0 * t;
    let c2 = -4.5 * t2 + 4.0 * t + 0.5;
    let c3 = 1.5 * t2 - t;

    p0 * c0 + p1 * c1 + p2 * c2 + p3 * c3
}

/// Cubic Bezier curve through `p0` and `p3`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CubicBezier {
    pub p0: DVec3,
    pub p1: DVec3,
    pub p2: DVec3,
    pub p3: DVec3,
}

impl CubicBezier {
    pub fn new(p0: DVec3, p1: DVec3, p2: DVec3, p3: DVec3) -> Self {
        Self { p0, p1, p2, p3 }
    }

    /// Curve leaving `start` against its normal and arriving at `end` along
    /// its normal, with handles `depth` long.
    ///
    /// Used to dive under the surface between two endpoints that have no
    /// recorded path.
    pub fn between_normals(start: DVec3, start_normal: DVec3, end: DVec3, end_normal: DVec3, depth: f64) -> Self {
        let depth = depth.max(0.0);
        Self {
            p0: start,
            p1: start - start_normal * depth,
            p2: end - end_normal * depth,
            p3: end,
        }
    }

    pub fn point(&self, t: f64) -> DVec3 {
        let u = 1.0 - t;
        self.p0 * (u * u * u)
            + self.p1 * (3.0 * u * u * t)
            + self.p2 * (3.0 * u * t * t)
            + self.p3 * (t * t * t)
    }

    pub fn derivative(&self, t: f64) -> DVec3 {
        let u = 1.0 - t;
        (self.p1 - self.p0) * (3.0 * u * u)
            + (self.p2 - self.p1) * (6.0 * u * t)
            + (self.p3 - self.p2) * (3.0 * t * t)
    }

    /// Sum of chords over `samples` equal parameter steps (at least 1).
    pub fn approx_length(&self, samples: u32) -> f64 {
        let samples = samples.max(1);
        let mut prev = self.p0;
        let mut total = 0.0;
        for s in 1..=samples {
            let cur = self.point(f64::from(s) / f64::from(samples));
            total += prev.distance(cur);
            prev = cur;
        }
        total
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controls() -> [DVec3; 4] {
        [
            DVec3::new(-1.0, 0.0, 0.0),
            DVec3::new(0.0, 0.0, 0.0),
            DVec3::new(1.0, 2.0, 0.0),
            DVec3::new(3.0, 2.0, 1.0),
        ]
    }

    #[test]
    fn test_catmull_rom_interpolates_inner_points() {
        let [p0, p1, p2, p3] = controls();
        assert!((catmull_rom(p0, p1, p2, p3, 0.0) - p1).length() < 1e-12);
        assert!((catmull_rom(p0, p1, p2, p3, 1.0) - p2).length() < 1e-12);
    }

    #[test]
    fn test_catmull_rom_end_tangents() {
        let [p0, p1, p2, p3] = controls();
        let d0 = catmull_rom_derivative(p0, p1, p2, p3, 0.0);
        let d1 = catmull_rom_derivative(p0, p1, p2, p3, 1.0);
        assert!((d0 - (p2 - p0) * 0.5).length() < 1e-12);
        assert!((d1 - (p3 - p1) * 0.5).length() < 1e-12);
    }

    #[test]
    fn test_catmull_rom_derivative_matches_finite_difference() {
        let [p0, p1, p2, p3] = controls();
        let h = 1e-6;
        for &t in &[0.2, 0.5, 0.8] {
            let numeric = (catmull_rom(p0, p1, p2, p3, t + h) - catmull_rom(p0, p1, p2, p3, t - h)) / (2.0 * h);
            let analytic = catmull_rom_derivative(p0, p1, p2, p3, t);
            assert!((numeric - analytic).length() < 1e-6, "t={t}");
        }
    }

    #[test]
    fn test_bezier_endpoints_and_handles() {
        let b = CubicBezier::between_normals(DVec3::Y * 5.0, DVec3::Y, DVec3::X * 5.0, DVec3::X, 1.2);
        assert_eq!(b.point(0.0), DVec3::Y * 5.0);
        assert!((b.point(1.0) - DVec3::X * 5.0).length() < 1e-12);
        // Leaves downward, arrives outward.
        assert!(b.derivative(0.0).dot(DVec3::Y) < 0.0);
        assert!(b.derivative(1.0).dot(DVec3::X) > 0.0);
    }

    #[test]
    fn test_bezier_length_bounds() {
        let b = CubicBezier::between_normals(DVec3::ZERO, DVec3::Y, DVec3::X * 4.0, DVec3::Y, 1.0);
        let chord = b.p0.distance(b.p3);
        let coarse = b.approx_length(2);
        let fine = b.approx_length(64);
        assert!(chord <= coarse + 1e-12);
        assert!(coarse <= fine + 1e-12);
        // For a straight line the polygon is exact.
        let line = CubicBezier::new(DVec3::ZERO, DVec3::X, DVec3::X * 2.0, DVec3::X * 3.0);
        assert!((line.approx_length(24) - 3.0).abs() < 1e-12);
    }
}
