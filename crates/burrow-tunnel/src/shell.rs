//! The spherical shell tunnels are dug into.

use glam::DVec3;

/// A sphere with center and radius; depth is measured inward from its surface.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Shell {
    pub center: DVec3,
    pub radius: f64,
}

impl Shell {
    pub fn new(center: DVec3, radius: f64) -> Self {
        Self { center, radius }
    }

    /// Outward radial direction at `p`, `+Y` near the center.
    pub fn up_at(&self, p: DVec3) -> DVec3 {
        let d = p - self.center;
        if d.length_squared() > 1e-6 {
            d.normalize()
        } else {
            DVec3::Y
        }
    }

    /// Point below the surface under `p`, `depth` units deep.
    ///
    /// The resulting shell radius never drops below 0.01.
    pub fn point_on_shell(&self, p: DVec3, depth: f64) -> DVec3 {
        self.center + self.up_at(p) * (self.radius - depth.max(0.0)).max(0.01)
    }

    /// Tunnel axis point under `p`, with `depth` clamped to `[0, 0.95 r]`.
    pub fn centerline(&self, p: DVec3, depth: f64) -> DVec3 {
        let surface = self.point_on_shell(p, 0.0);
        let depth = depth.clamp(0.0, self.radius * 0.95);
        self.center + self.up_at(surface) * (self.radius - depth).max(0.01)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_up_at_fallback() {
        let shell = Shell::new(DVec3::ONE, 5.0);
        assert_eq!(shell.up_at(DVec3::ONE), DVec3::Y);
        assert!((shell.up_at(DVec3::new(1.0, 1.0, -3.0)) - DVec3::NEG_Z).length() < 1e-12);
    }

    #[test]
    fn test_point_on_shell_radius() {
        let shell = Shell::new(DVec3::ZERO, 5.0);
        let p = shell.point_on_shell(DVec3::new(0.0, 40.0, 0.0), 1.5);
        assert!((p - DVec3::new(0.0, 3.5, 0.0)).length() < 1e-12);
        // Negative depth counts as zero; huge depth stops at 0.01.
        assert!((shell.point_on_shell(DVec3::X, -2.0).length() - 5.0).abs() < 1e-12);
        assert!((shell.point_on_shell(DVec3::X, 100.0).length() - 0.01).abs() < 1e-12);
    }

    #[test]
    fn test_centerline_depth_is_clamped() {
        let shell = Shell::new(DVec3::ZERO, 10.0);
        let deep = shell.centerline(DVec3::Z * 3.0, 50.0);
        assert!((deep.length() - 0.5).abs() < 1e-9);
        let shallow = shell.centerline(DVec3::Z * 3.0, -1.0);
        assert!((shallow.length() - 10.0).abs() < 1e-9);
    }
}
