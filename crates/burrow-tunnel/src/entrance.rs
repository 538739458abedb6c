//! Tunnel endpoints and the network that owns them.

use std::sync::Arc;

use glam::DVec3;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{Easing, Pose, Shell, TunnelPath, tangent_forward};

/// Index of an endpoint inside its [`TunnelNetwork`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntranceId(pub u32);

impl std::fmt::Display for EntranceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Which transition spawned an endpoint.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EntranceKind {
    /// Spawned when the digger went under.
    Entry,
    /// Spawned when the digger came back up.
    Exit,
}

/// Per-endpoint traversal tuning.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EntranceSettings {
    /// How far above the far endpoint the traveller is released.
    pub exit_push: f64,
    /// Seconds during which the far endpoint refuses re-entry.
    pub reenter_block_time: f64,
    /// Ride the tunnel instead of teleporting.
    pub traverse_along_curve: bool,
    /// Handle length of the fallback curve.
    pub bezier_depth: f64,
    /// Travel speed in units per second.
    pub traverse_speed: f64,
    /// Easing of fallback-curve playback.
    pub easing: Easing,
}

impl Default for EntranceSettings {
    fn default() -> Self {
        Self {
            exit_push: 0.35,
            reenter_block_time: 0.25,
            traverse_along_curve: true,
            bezier_depth: 1.2,
            traverse_speed: 7.0,
            easing: Easing::EaseInOut,
        }
    }
}

/// Endpoint spawning rules used while digging.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DigSettings {
    /// Depth past which the digger counts as underground.
    pub underground_threshold: f64,
    /// Minimum distance between any two endpoints.
    pub entrance_min_spacing: f64,
    /// Height above the surface at which endpoints are placed.
    pub entrance_surface_offset: f64,
}

impl Default for DigSettings {
    fn default() -> Self {
        Self {
            underground_threshold: 0.05,
            entrance_min_spacing: 2.5,
            entrance_surface_offset: 0.02,
        }
    }
}

/// One mouth of a tunnel.
#[derive(Clone, Debug)]
pub struct Entrance {
    pub id: EntranceId,
    pub kind: EntranceKind,
    /// Placement on (slightly above) the surface.
    pub pose: Pose,
    /// Outward normal of the surface under the endpoint.
    pub surface_normal: DVec3,
    /// The endpoint at the other end, once paired.
    pub linked: Option<EntranceId>,
    /// Recorded path, shared with the linked endpoint.
    pub path: Option<Arc<TunnelPath>>,
    pub settings: EntranceSettings,
}

impl Entrance {
    pub fn position(&self) -> DVec3 {
        self.pose.position
    }

    pub fn forward(&self) -> DVec3 {
        self.pose.forward
    }

    /// Surface normal, or the pose's up if the normal is degenerate.
    pub fn up(&self) -> DVec3 {
        self.surface_normal.try_normalize().unwrap_or(self.pose.up)
    }

    /// Where a traveller arriving here is released.
    pub fn exit_point(&self) -> DVec3 {
        self.pose.position + self.up() * self.settings.exit_push
    }

    /// The path to ride from here if it is usable.
    pub fn valid_path(&self) -> Option<&Arc<TunnelPath>> {
        self.path.as_ref().filter(|p| p.is_valid())
    }
}

/// Every endpoint spawned so far, addressed by [`EntranceId`].
#[derive(Clone, Debug, Default)]
pub struct TunnelNetwork {
    entrances: Vec<Entrance>,
    dig: DigSettings,
    entrance_settings: EntranceSettings,
}

impl TunnelNetwork {
    pub fn new(dig: DigSettings, entrance_settings: EntranceSettings) -> Self {
        Self {
            entrances: Vec::new(),
            dig,
            entrance_settings,
        }
    }

    pub fn dig_settings(&self) -> &DigSettings {
        &self.dig
    }

    pub fn entrance_settings(&self) -> &EntranceSettings {
        &self.entrance_settings
    }

    pub fn get(&self, id: EntranceId) -> Option<&Entrance> {
        self.entrances.get(id.0 as usize)
    }

    pub fn get_mut(&mut self, id: EntranceId) -> Option<&mut Entrance> {
        self.entrances.get_mut(id.0 as usize)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entrance> {
        self.entrances.iter()
    }

    pub fn len(&self) -> usize {
        self.entrances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entrances.is_empty()
    }

    /// Place a new endpoint at the surface point above `position`.
    ///
    /// Returns `None` when another endpoint lies within
    /// `entrance_min_spacing` of that surface point.
    pub fn try_spawn(&mut self, kind: EntranceKind, shell: &Shell, position: DVec3, heading: DVec3) -> Option<EntranceId> {
        let on_shell = shell.point_on_shell(position, 0.0);
        let up = shell.up_at(on_shell);

        if let Some(near) = self
            .entrances
            .iter()
            .find(|e| e.position().distance(on_shell) < self.dig.entrance_min_spacing)
        {
            debug!("Skipping {kind:?} spawn: {} is too close", near.id);
            return None;
        }

        let id = EntranceId(self.entrances.len() as u32);
        let pose = Pose {
            position: on_shell + up * self.dig.entrance_surface_offset,
            up,
            forward: tangent_forward(heading, up),
        };
        debug!("Spawned {kind:?} {id} at {:?}", pose.position);
        self.entrances.push(Entrance {
            id,
            kind,
            pose,
            surface_normal: up,
            linked: None,
            path: None,
            settings: self.entrance_settings,
        });
        Some(id)
    }

    /// Pair two endpoints with each other. Returns false for unknown ids.
    pub fn link(&mut self, a: EntranceId, b: EntranceId) -> bool {
        if a == b || self.get(a).is_none() || self.get(b).is_none() {
            warn!("Refusing to link {a} with {b}");
            return false;
        }
        for (this, other) in [(a, b), (b, a)] {
            if let Some(e) = self.get_mut(this) {
                e.linked = Some(other);
            }
        }
        true
    }

    /// Share `path` between both endpoints.
    pub fn install_path(&mut self, a: EntranceId, b: EntranceId, path: Arc<TunnelPath>) {
        for id in [a, b] {
            if let Some(e) = self.get_mut(id) {
                e.path = Some(Arc::clone(&path));
            }
        }
    }

    /// Closest endpoint no farther than `radius` from `position`.
    pub fn nearest_within(&self, position: DVec3, radius: f64) -> Option<EntranceId> {
        self.entrances
            .iter()
            .map(|e| (e.id, e.position().distance(position)))
            .filter(|&(_, d)| d <= radius)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(id, _)| id)
    }
}
