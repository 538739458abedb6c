//! Turns surface crossings of the digger into endpoints and recordings.

use glam::DVec3;
use tracing::{debug, warn};

use crate::{
    DiscardReason, EntranceId, EntranceKind, RecorderSettings, RecordingOutcome, Shell, TunnelNetwork, TunnelRecorder,
};

/// Digger state for one tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DigSample {
    pub position: DVec3,
    /// Depth below the surface; positive is underground.
    pub depth: f64,
    pub heading: DVec3,
}

/// Something that happened on a tick.
#[derive(Clone, Debug, PartialEq)]
pub enum DigEvent {
    /// The digger went under. `entry` is `None` if the spawn was refused.
    Entered { entry: Option<EntranceId> },
    /// The digger came back up.
    Emerged {
        exit: Option<EntranceId>,
        outcome: RecordingOutcome,
    },
}

/// Watches depth transitions and drives the recorder.
#[derive(Clone, Debug)]
pub struct DigTracker {
    recorder: TunnelRecorder,
    was_underground: bool,
    pending_entry: Option<EntranceId>,
}

impl DigTracker {
    /// `start_depth` seeds the underground flag so that a digger that starts
    /// below the surface does not immediately spawn an entry.
    pub fn new(recorder: RecorderSettings, underground_threshold: f64, start_depth: f64) -> Self {
        Self {
            recorder: TunnelRecorder::new(recorder),
            was_underground: start_depth > underground_threshold,
            pending_entry: None,
        }
    }

    pub fn recorder(&self) -> &TunnelRecorder {
        &self.recorder
    }

    pub fn is_underground(&self) -> bool {
        self.was_underground
    }

    pub fn pending_entry(&self) -> Option<EntranceId> {
        self.pending_entry
    }

    pub fn tick(&mut self, network: &mut TunnelNetwork, shell: &Shell, sample: DigSample) -> Option<DigEvent> {
        let underground = sample.depth > network.dig_settings().underground_threshold;
        let was_underground = std::mem::replace(&mut self.was_underground, underground);

        if underground {
            if !was_underground {
                return Some(self.enter(network, shell, sample));
            }
            self.recorder.tick(shell, sample.position, sample.depth, sample.heading);
            return None;
        }

        if was_underground {
            return Some(self.emerge(network, shell, sample));
        }
        None
    }

    fn enter(&mut self, network: &mut TunnelNetwork, shell: &Shell, sample: DigSample) -> DigEvent {
        let entry = network.try_spawn(EntranceKind::Entry, shell, sample.position, sample.heading);
        match entry {
            Some(id) => {
                self.pending_entry = Some(id);
                self.recorder.begin(id, shell, sample.position, sample.depth, sample.heading);
            }
            None => debug!("Went underground without an entry; not recording"),
        }
        DigEvent::Entered { entry }
    }

    fn emerge(&mut self, network: &mut TunnelNetwork, shell: &Shell, sample: DigSample) -> DigEvent {
        let exit = network.try_spawn(EntranceKind::Exit, shell, sample.position, sample.heading);
        let entry = self.pending_entry.take();

        if let (Some(entry), Some(exit)) = (entry, exit) {
            network.link(entry, exit);
        }

        let outcome = if self.recorder.is_recording() {
            self.recorder.end(exit, shell, sample.position, sample.depth)
        } else {
            RecordingOutcome::Discarded(DiscardReason::NotRecording)
        };

        if let RecordingOutcome::Committed { entry, exit, path } = &outcome {
            network.install_path(*entry, *exit, path.clone());
        } else if exit.is_none() {
            warn!("Surfaced without an exit endpoint");
        }

        DigEvent::Emerged { exit, outcome }
    }
}
