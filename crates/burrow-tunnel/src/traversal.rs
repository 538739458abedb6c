//! Riding an actor through a tunnel between two linked endpoints.
//!
//! A journey either follows the recorded path at constant speed (arc-length
//! sampling) or, when no valid recording exists, a cubic Bezier dive between
//! the two endpoints played back parametrically with easing. Progress is
//! explicit state advanced by [`Traveller::tick`]; nothing blocks.

use std::sync::Arc;

use glam::DVec3;
use tracing::{debug, info, warn};

use crate::{CubicBezier, Easing, Entrance, EntranceId, Pose, Shell, TunnelNetwork, TunnelPath, tangent_forward};

/// Samples used to estimate the fallback curve's length.
const FALLBACK_LENGTH_SAMPLES: u32 = 24;

/// Hands the actor's transform to a traveller and back.
///
/// `begin_rail_control` is called once when a journey starts and
/// `end_rail_control` once when it finishes or is cancelled.
pub trait RailControl {
    fn begin_rail_control(&mut self);
    fn end_rail_control(&mut self);
}

/// An endpoint that refuses entry until a point in time.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ReenterLockout {
    pub entrance: EntranceId,
    pub until: f64,
}

/// How a started journey moves.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Route {
    /// Along the recorded path, from its first point if `forward`.
    Recorded { forward: bool },
    /// Along the Bezier fallback curve.
    Fallback,
}

/// Result of [`Traveller::enter`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum EnterOutcome {
    /// A journey is already in progress.
    Busy,
    UnknownEntrance,
    /// The endpoint has no (existing) partner.
    Unlinked,
    /// The endpoint was just exited through.
    LockedOut,
    /// Moved straight to the far endpoint.
    Teleported(Pose),
    Started { route: Route },
}

/// Pose emitted by one [`Traveller::tick`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TravelStep {
    pub pose: Pose,
    pub finished: bool,
}

#[derive(Clone, Debug)]
enum Motion {
    Recorded {
        path: Arc<TunnelPath>,
        distance: f64,
        sign: f64,
        speed: f64,
    },
    Fallback {
        curve: CubicBezier,
        t: f64,
        duration: f64,
        easing: Easing,
    },
}

/// An in-progress ride.
#[derive(Clone, Debug)]
pub struct Journey {
    pub from: EntranceId,
    pub to: EntranceId,
    motion: Motion,
    exit_pose: Pose,
    shell: Shell,
}

impl Journey {
    /// Distance along a recorded path, or the un-eased `t` of a fallback
    /// curve.
    pub fn progress(&self) -> f64 {
        match &self.motion {
            Motion::Recorded { distance, .. } => *distance,
            Motion::Fallback { t, .. } => *t,
        }
    }
}

#[derive(Clone, Debug, Default)]
enum TravellerState {
    #[default]
    Idle,
    Travelling(Journey),
}

/// State machine moving one actor between linked endpoints.
#[derive(Clone, Debug, Default)]
pub struct Traveller {
    state: TravellerState,
    lockout: Option<ReenterLockout>,
    pose: Option<Pose>,
}

impl Traveller {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_travelling(&self) -> bool {
        matches!(self.state, TravellerState::Travelling(_))
    }

    pub fn journey(&self) -> Option<&Journey> {
        match &self.state {
            TravellerState::Travelling(j) => Some(j),
            TravellerState::Idle => None,
        }
    }

    pub fn lockout(&self) -> Option<ReenterLockout> {
        self.lockout
    }

    /// Last pose emitted by a tick, teleport, or finish.
    pub fn pose(&self) -> Option<Pose> {
        self.pose
    }

    /// Try to enter the tunnel at `id` at time `now` (seconds).
    pub fn enter<R: RailControl>(
        &mut self,
        network: &TunnelNetwork,
        id: EntranceId,
        shell: &Shell,
        now: f64,
        actor_forward: DVec3,
        rail: &mut R,
    ) -> EnterOutcome {
        if self.is_travelling() {
            return EnterOutcome::Busy;
        }
        let Some(from) = network.get(id) else {
            return EnterOutcome::UnknownEntrance;
        };
        let Some(to) = from.linked.and_then(|l| network.get(l)) else {
            warn!("{id} is not linked to another endpoint");
            return EnterOutcome::Unlinked;
        };
        if self.lockout.is_some_and(|l| l.entrance == id && now < l.until) {
            debug!("{id} is locked against re-entry");
            return EnterOutcome::LockedOut;
        }

        self.lockout = Some(ReenterLockout {
            entrance: to.id,
            until: now + from.settings.reenter_block_time,
        });

        if !from.settings.traverse_along_curve {
            let position = to.exit_point();
            let pose = Pose::on_surface(position, shell.up_at(position), actor_forward);
            self.pose = Some(pose);
            info!("Teleported {id} -> {}", to.id);
            return EnterOutcome::Teleported(pose);
        }

        let (motion, route) = match from.valid_path().or_else(|| to.valid_path()) {
            Some(path) => recorded_motion(from, path),
            None => (fallback_motion(from, to), Route::Fallback),
        };

        rail.begin_rail_control();
        debug!("Journey {id} -> {} started ({route:?})", to.id);
        self.state = TravellerState::Travelling(Journey {
            from: id,
            to: to.id,
            motion,
            exit_pose: exit_pose(to, shell),
            shell: *shell,
        });
        EnterOutcome::Started { route }
    }

    /// Advance the journey by `dt` seconds. `None` while idle.
    pub fn tick<R: RailControl>(&mut self, dt: f64, rail: &mut R) -> Option<TravelStep> {
        let TravellerState::Travelling(journey) = &mut self.state else {
            return None;
        };

        let sampled = match &mut journey.motion {
            Motion::Recorded {
                path,
                distance,
                sign,
                speed,
            } => {
                *distance += *sign * *speed * dt;
                let total = path.total_length();
                let arrived = if *sign > 0.0 { *distance >= total } else { *distance <= 0.0 };
                if arrived {
                    None
                } else {
                    let s = path.sample_by_distance(*distance);
                    Some((s.position, s.tangent))
                }
            }
            Motion::Fallback {
                curve,
                t,
                duration,
                easing,
            } => {
                if *t >= 1.0 {
                    None
                } else {
                    let e = easing.apply(*t);
                    let sample = (curve.point(e), curve.derivative(e));
                    *t += dt / *duration;
                    Some(sample)
                }
            }
        };

        let step = match sampled {
            Some((position, tangent)) => TravelStep {
                pose: orient(&journey.shell, position, tangent),
                finished: false,
            },
            None => {
                let pose = journey.exit_pose;
                info!("Journey {} -> {} finished", journey.from, journey.to);
                self.state = TravellerState::Idle;
                rail.end_rail_control();
                TravelStep { pose, finished: true }
            }
        };
        self.pose = Some(step.pose);
        Some(step)
    }

    /// Abort the journey where it stands and hand control back.
    ///
    /// Returns the last emitted pose, or `None` if nothing was in progress.
    pub fn cancel<R: RailControl>(&mut self, rail: &mut R) -> Option<Pose> {
        let TravellerState::Travelling(journey) = std::mem::take(&mut self.state) else {
            return None;
        };
        info!("Journey {} -> {} cancelled", journey.from, journey.to);
        rail.end_rail_control();
        self.pose
    }
}

fn recorded_motion(from: &Entrance, path: &Arc<TunnelPath>) -> (Motion, Route) {
    let here = from.position();
    let d_first = path.first().map_or(f64::INFINITY, |p| here.distance(p));
    let d_last = path.last().map_or(f64::INFINITY, |p| here.distance(p));
    let forward = d_first <= d_last;
    let motion = Motion::Recorded {
        path: Arc::clone(path),
        distance: if forward { 0.0 } else { path.total_length() },
        sign: if forward { 1.0 } else { -1.0 },
        speed: from.settings.traverse_speed.max(0.01),
    };
    (motion, Route::Recorded { forward })
}

fn fallback_motion(from: &Entrance, to: &Entrance) -> Motion {
    let curve = CubicBezier::between_normals(
        from.position(),
        from.up(),
        to.exit_point(),
        to.up(),
        from.settings.bezier_depth,
    );
    let length = curve.approx_length(FALLBACK_LENGTH_SAMPLES);
    Motion::Fallback {
        curve,
        t: 0.0,
        duration: (length / from.settings.traverse_speed.max(0.01)).max(0.05),
        easing: from.settings.easing,
    }
}

fn exit_pose(to: &Entrance, shell: &Shell) -> Pose {
    let position = to.exit_point();
    let up = shell.up_at(position);
    Pose {
        position,
        up,
        forward: tangent_forward(to.forward(), up),
    }
}

fn orient(shell: &Shell, position: DVec3, tangent: DVec3) -> Pose {
    let up = shell.up_at(position);
    Pose {
        position,
        up,
        forward: tangent_forward(tangent, up),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DigSettings, EntranceKind, EntranceSettings};

    #[derive(Default)]
    struct TestRail {
        begins: u32,
        ends: u32,
    }

    impl RailControl for TestRail {
        fn begin_rail_control(&mut self) {
            self.begins += 1;
        }

        fn end_rail_control(&mut self) {
            self.ends += 1;
        }
    }

    fn shell() -> Shell {
        Shell::new(DVec3::ZERO, 10.0)
    }

    /// Quarter arc from +Y to +X at radius `r`.
    fn arc(r: f64, n: usize) -> Vec<DVec3> {
        (0..=n)
            .map(|k| {
                let a = std::f64::consts::FRAC_PI_2 * k as f64 / n as f64;
                DVec3::new(a.sin(), a.cos(), 0.0) * r
            })
            .collect()
    }

    /// Two linked endpoints at +Y and +X, optionally sharing a recorded path.
    fn network(settings: EntranceSettings, recorded: bool) -> (TunnelNetwork, EntranceId, EntranceId) {
        let mut net = TunnelNetwork::new(DigSettings::default(), settings);
        let s = shell();
        let a = net.try_spawn(EntranceKind::Entry, &s, DVec3::Y * 10.0, DVec3::X).expect("a");
        let b = net.try_spawn(EntranceKind::Exit, &s, DVec3::X * 10.0, DVec3::NEG_Y).expect("b");
        net.link(a, b);
        if recorded {
            net.install_path(a, b, Arc::new(TunnelPath::from_points(arc(9.0, 8))));
        }
        (net, a, b)
    }

    fn run_to_end(traveller: &mut Traveller, rail: &mut TestRail, dt: f64) -> Vec<TravelStep> {
        let mut steps = Vec::new();
        for _ in 0..10_000 {
            let step = traveller.tick(dt, rail).expect("travelling");
            steps.push(step);
            if step.finished {
                return steps;
            }
        }
        panic!("journey never finished");
    }

    #[test]
    fn test_recorded_forward_journey() {
        let (net, a, b) = network(EntranceSettings::default(), true);
        let mut t = Traveller::new();
        let mut rail = TestRail::default();
        let outcome = t.enter(&net, a, &shell(), 0.0, DVec3::X, &mut rail);
        assert_eq!(outcome, EnterOutcome::Started { route: Route::Recorded { forward: true } });
        assert_eq!(rail.begins, 1);

        let steps = run_to_end(&mut t, &mut rail, 1.0 / 60.0);
        let total = net.get(a).and_then(|e| e.path.as_ref()).map(|p| p.total_length()).expect("path");
        // About total / (speed * dt) ticks.
        let expected = (total / (7.0 / 60.0)).ceil() as usize;
        assert!(steps.len().abs_diff(expected) <= 1, "{} ticks, expected {expected}", steps.len());

        for s in &steps[..steps.len() - 1] {
            assert!((s.pose.position.length() - 9.0).abs() < 0.05);
            assert!(s.pose.up.dot(s.pose.forward).abs() < 1e-9);
            // Clockwise about +Z, from +Y toward +X.
            let along = s.pose.up.cross(DVec3::Z);
            assert!(s.pose.forward.dot(along) > 0.9, "forward {:?}", s.pose.forward);
        }

        let last = steps.last().expect("steps");
        let exit = net.get(b).expect("b");
        assert_eq!(last.pose.position, exit.exit_point());
        assert_eq!(rail.ends, 1);
        assert!(!t.is_travelling());
        assert_eq!(t.tick(0.1, &mut rail), None);
    }

    #[test]
    fn test_recorded_reverse_journey() {
        let (net, a, b) = network(EntranceSettings::default(), true);
        let mut t = Traveller::new();
        let mut rail = TestRail::default();
        let outcome = t.enter(&net, b, &shell(), 0.0, DVec3::X, &mut rail);
        assert_eq!(outcome, EnterOutcome::Started { route: Route::Recorded { forward: false } });
        let steps = run_to_end(&mut t, &mut rail, 0.05);
        assert!(steps[0].pose.position.x > steps[0].pose.position.y);
        assert_eq!(steps.last().map(|s| s.pose.position), net.get(a).map(Entrance::exit_point));
    }

    #[test]
    fn test_reentry_lockout() {
        let (net, a, b) = network(EntranceSettings::default(), true);
        let s = shell();
        let mut t = Traveller::new();
        let mut rail = TestRail::default();
        t.enter(&net, a, &s, 0.0, DVec3::X, &mut rail);
        assert_eq!(t.lockout(), Some(ReenterLockout { entrance: b, until: 0.25 }));
        assert_eq!(t.enter(&net, b, &s, 0.0, DVec3::X, &mut rail), EnterOutcome::Busy);
        run_to_end(&mut t, &mut rail, 1.0);

        assert_eq!(t.enter(&net, b, &s, 0.1, DVec3::X, &mut rail), EnterOutcome::LockedOut);
        assert_eq!(rail.begins, 1);
        let outcome = t.enter(&net, b, &s, 0.3, DVec3::X, &mut rail);
        assert!(matches!(outcome, EnterOutcome::Started { .. }));
    }

    #[test]
    fn test_fallback_curve_journey() {
        let (net, a, b) = network(EntranceSettings::default(), false);
        let mut t = Traveller::new();
        let mut rail = TestRail::default();
        assert_eq!(
            t.enter(&net, a, &shell(), 0.0, DVec3::X, &mut rail),
            EnterOutcome::Started { route: Route::Fallback }
        );
        let steps = run_to_end(&mut t, &mut rail, 1.0 / 30.0);

        let first = steps[0].pose.position;
        assert_eq!(first, net.get(a).map(Entrance::position).expect("a"));
        // The dive goes below the surface somewhere in the middle.
        let deepest = steps.iter().map(|s| s.pose.position.length()).fold(f64::INFINITY, f64::min);
        assert!(deepest < 10.0, "never went under: {deepest}");

        let exit = net.get(b).expect("b");
        let last = steps.last().expect("steps").pose;
        assert_eq!(last.position, exit.exit_point());
        assert!((last.forward - DVec3::NEG_Y).length() < 1e-9);
        assert_eq!((rail.begins, rail.ends), (1, 1));
    }

    #[test]
    fn test_teleport_when_not_riding_curves() {
        let settings = EntranceSettings {
            traverse_along_curve: false,
            ..Default::default()
        };
        let (net, a, b) = network(settings, true);
        let mut t = Traveller::new();
        let mut rail = TestRail::default();
        let EnterOutcome::Teleported(pose) = t.enter(&net, a, &shell(), 0.0, DVec3::new(1.0, 0.0, 1.0), &mut rail)
        else {
            panic!("expected teleport");
        };
        assert_eq!(pose.position, net.get(b).map(Entrance::exit_point).expect("b"));
        assert!((pose.forward - DVec3::Z).length() < 1e-9);
        assert_eq!(rail.begins, 0);
        assert!(!t.is_travelling());
        assert_eq!(t.lockout().map(|l| l.entrance), Some(b));
    }

    #[test]
    fn test_unknown_and_unlinked() {
        let mut net = TunnelNetwork::default();
        let lone = net.try_spawn(EntranceKind::Entry, &shell(), DVec3::Z * 10.0, DVec3::X).expect("lone");
        let mut t = Traveller::new();
        let mut rail = TestRail::default();
        assert_eq!(t.enter(&net, lone, &shell(), 0.0, DVec3::X, &mut rail), EnterOutcome::Unlinked);
        assert_eq!(
            t.enter(&net, EntranceId(42), &shell(), 0.0, DVec3::X, &mut rail),
            EnterOutcome::UnknownEntrance
        );
        assert_eq!(rail.begins, 0);
        assert!(t.lockout().is_none());
    }

    #[test]
    fn test_cancel_keeps_last_pose() {
        let (net, a, _) = network(EntranceSettings::default(), true);
        let mut t = Traveller::new();
        let mut rail = TestRail::default();
        t.enter(&net, a, &shell(), 0.0, DVec3::X, &mut rail);
        let mut last = None;
        for _ in 0..5 {
            last = t.tick(0.1, &mut rail).map(|s| s.pose);
        }
        let progress = t.journey().map(Journey::progress).expect("journey");
        assert!((progress - 3.5).abs() < 1e-9);
        assert_eq!(t.cancel(&mut rail), last);
        assert_eq!(rail.ends, 1);
        assert_eq!(t.cancel(&mut rail), None);
        assert_eq!(rail.ends, 1);
        assert_eq!(t.pose(), last);
    }
}
