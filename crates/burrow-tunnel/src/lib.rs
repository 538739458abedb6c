//! Tunnel recording and replay.
//!
//! While an actor digs, [`DigTracker`] spawns endpoints at surface crossings
//! and feeds a [`TunnelRecorder`], which commits a [`TunnelPath`] shared by
//! both ends. [`Traveller`] later rides an actor through it at constant
//! speed, or along a Bezier dive when no recording exists.

mod digger;
mod easing;
mod entrance;
mod frame;
mod path;
mod recorder;
mod shell;
pub mod spline;
mod traversal;

pub use digger::{DigEvent, DigSample, DigTracker};
pub use easing::Easing;
pub use entrance::{DigSettings, Entrance, EntranceId, EntranceKind, EntranceSettings, TunnelNetwork};
pub use frame::{Pose, project_on_plane, tangent_forward};
pub use path::{ArcLengthTable, PathSample, SEGMENT_SAMPLES, TunnelPath};
pub use recorder::{DiscardReason, RecorderSettings, RecordingOutcome, RecordingSession, TunnelRecorder};
pub use shell::Shell;
pub use spline::CubicBezier;
pub use traversal::{EnterOutcome, Journey, RailControl, ReenterLockout, Route, TravelStep, Traveller};
