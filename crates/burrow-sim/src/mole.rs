//! The scenario's actor: walks the shell surface, digs, and rides tunnels.

use burrow_tunnel::{Pose, RailControl, Shell, tangent_forward};
use glam::{DQuat, DVec3};

#[derive(Clone, Debug)]
pub struct Mole {
    pub position: DVec3,
    pub heading: DVec3,
    pub depth: f64,
    on_rail: bool,
    rail_sessions: u32,
}

impl Mole {
    /// Stand on the surface above `position`, facing `heading`.
    pub fn on_surface(shell: &Shell, position: DVec3, heading: DVec3) -> Self {
        let up = shell.up_at(position);
        Self {
            position: shell.point_on_shell(position, 0.0),
            heading: tangent_forward(heading, up),
            depth: 0.0,
            on_rail: false,
            rail_sessions: 0,
        }
    }

    pub fn on_rail(&self) -> bool {
        self.on_rail
    }

    pub fn rail_sessions(&self) -> u32 {
        self.rail_sessions
    }

    /// Turn by `turn` radians about the local up, then move `distance` along
    /// the great circle at the current depth.
    pub fn advance(&mut self, shell: &Shell, distance: f64, turn: f64) {
        let up = shell.up_at(self.position);
        let heading = tangent_forward(DQuat::from_axis_angle(up, turn) * self.heading, up);

        let theta = distance / shell.radius.max(1e-6);
        let (sin, cos) = theta.sin_cos();
        let new_up = (up * cos + heading * sin).try_normalize().unwrap_or(up);

        self.heading = tangent_forward(heading * cos - up * sin, new_up);
        self.position = shell.center + new_up * (shell.radius - self.depth).max(0.01);
    }

    /// Take over a pose emitted by a traveller or spawn.
    pub fn place(&mut self, shell: &Shell, pose: Pose) {
        self.position = pose.position;
        self.heading = pose.forward;
        self.depth = (shell.radius - (pose.position - shell.center).length()).max(0.0);
    }
}

impl RailControl for Mole {
    fn begin_rail_control(&mut self) {
        self.on_rail = true;
        self.rail_sessions += 1;
    }

    fn end_rail_control(&mut self) {
        self.on_rail = false;
    }
}
