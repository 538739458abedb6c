//! Records the tunnel centerline while the digger is underground.

use std::sync::Arc;

use glam::DVec3;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::{EntranceId, Shell, TunnelPath};

/// Minimum distance between a forced final point and the last stored one.
const FINAL_POINT_EPSILON: f64 = 0.01;

/// Sampling thresholds of the recorder.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecorderSettings {
    /// A new point must be farther than this from the last one.
    pub min_point_distance: f64,
    /// The heading must have turned by more than this many degrees.
    pub min_angle_deg: f64,
    /// Follow the digger's depth; otherwise use `fixed_center_depth`.
    pub use_actual_depth: bool,
    pub fixed_center_depth: f64,
}

impl Default for RecorderSettings {
    fn default() -> Self {
        Self {
            min_point_distance: 0.5,
            min_angle_deg: 10.0,
            use_actual_depth: true,
            fixed_center_depth: 0.6,
        }
    }
}

/// Buffer of an in-progress recording.
#[derive(Clone, Debug, PartialEq)]
pub struct RecordingSession {
    pub entry: EntranceId,
    pub points: Vec<DVec3>,
    pub last_heading: DVec3,
}

#[derive(Clone, Debug, Default, PartialEq)]
enum RecorderState {
    #[default]
    Idle,
    Recording(RecordingSession),
}

/// Why a recording produced no path.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DiscardReason {
    NotRecording,
    TooFewPoints,
    MissingExit,
}

/// Result of [`TunnelRecorder::end`].
#[derive(Clone, Debug, PartialEq)]
pub enum RecordingOutcome {
    Committed {
        entry: EntranceId,
        exit: EntranceId,
        path: Arc<TunnelPath>,
    },
    Discarded(DiscardReason),
}

impl RecordingOutcome {
    pub fn is_committed(&self) -> bool {
        matches!(self, RecordingOutcome::Committed { .. })
    }
}

/// Compresses the digger's trail into centerline points.
#[derive(Clone, Debug, Default)]
pub struct TunnelRecorder {
    settings: RecorderSettings,
    state: RecorderState,
}

impl TunnelRecorder {
    pub fn new(settings: RecorderSettings) -> Self {
        Self {
            settings,
            state: RecorderState::Idle,
        }
    }

    pub fn settings(&self) -> &RecorderSettings {
        &self.settings
    }

    pub fn is_recording(&self) -> bool {
        matches!(self.state, RecorderState::Recording(_))
    }

    pub fn session(&self) -> Option<&RecordingSession> {
        match &self.state {
            RecorderState::Recording(s) => Some(s),
            RecorderState::Idle => None,
        }
    }

    /// Start a session bound to `entry` and store its first point.
    ///
    /// An active session is dropped.
    pub fn begin(&mut self, entry: EntranceId, shell: &Shell, position: DVec3, depth: f64, heading: DVec3) {
        if let RecorderState::Recording(old) = &self.state {
            warn!("Recording from {} replaced by a new one at {entry}", old.entry);
        }
        let first = self.centerline(shell, position, depth);
        self.state = RecorderState::Recording(RecordingSession {
            entry,
            points: vec![first],
            last_heading: heading,
        });
        debug!("Recording started at {entry}");
    }

    /// Offer the current position; returns whether a point was stored.
    pub fn tick(&mut self, shell: &Shell, position: DVec3, depth: f64, heading: DVec3) -> bool {
        let center = self.centerline(shell, position, depth);
        let RecorderState::Recording(session) = &mut self.state else {
            return false;
        };

        let Some(&last) = session.points.last() else {
            session.points.push(center);
            session.last_heading = heading;
            return true;
        };

        let far_enough = last.distance(center) > self.settings.min_point_distance;
        let turned = heading_change_deg(session.last_heading, heading) > self.settings.min_angle_deg;
        if far_enough && turned {
            session.points.push(center);
            session.last_heading = heading;
            true
        } else {
            false
        }
    }

    /// Close the session and try to commit it as a path ending at `exit`.
    ///
    /// The session is cleared whatever the outcome.
    pub fn end(&mut self, exit: Option<EntranceId>, shell: &Shell, position: DVec3, depth: f64) -> RecordingOutcome {
        let center = self.centerline(shell, position, depth);
        let RecorderState::Recording(mut session) = std::mem::take(&mut self.state) else {
            warn!("Recording end without an active session");
            return RecordingOutcome::Discarded(DiscardReason::NotRecording);
        };

        let needs_final = session
            .points
            .last()
            .is_none_or(|last| last.distance(center) > FINAL_POINT_EPSILON);
        if needs_final {
            session.points.push(center);
        }

        if session.points.len() < 2 {
            warn!("Discarding recording from {}: too few points", session.entry);
            return RecordingOutcome::Discarded(DiscardReason::TooFewPoints);
        }
        let Some(exit) = exit else {
            warn!("Discarding recording from {}: no exit endpoint", session.entry);
            return RecordingOutcome::Discarded(DiscardReason::MissingExit);
        };

        let path = TunnelPath::from_points(session.points);
        info!(
            "Committed tunnel {} -> {exit} (len={:.2}, pts={})",
            session.entry,
            path.total_length(),
            path.len()
        );
        RecordingOutcome::Committed {
            entry: session.entry,
            exit,
            path: Arc::new(path),
        }
    }

    /// Drop an active session without committing.
    pub fn abort(&mut self) {
        if let RecorderState::Recording(s) = std::mem::take(&mut self.state) {
            debug!("Recording from {} aborted with {} points", s.entry, s.points.len());
        }
    }

    fn centerline(&self, shell: &Shell, position: DVec3, depth: f64) -> DVec3 {
        let depth = if self.settings.use_actual_depth {
            depth
        } else {
            self.settings.fixed_center_depth
        };
        shell.centerline(position, depth)
    }
}

/// Angle between two headings in degrees; 0 if either is degenerate.
fn heading_change_deg(a: DVec3, b: DVec3) -> f64 {
    match (a.try_normalize(), b.try_normalize()) {
        (Some(a), Some(b)) => a.dot(b).clamp(-1.0, 1.0).acos().to_degrees(),
        _ => 0.0,
    }
}
