//! Headless walk, dig, and ride session over one planet.

use burrow_config::Config;
use burrow_cubesphere::{CubeFace, FaceDirection, GridLineOptions, GridLines, SphereGrid};
use burrow_tunnel::{
    DigEvent, DigSample, DigTracker, EnterOutcome, EntranceId, EntranceKind, RecordingOutcome, Shell, Traveller,
    TunnelNetwork,
};
use glam::DVec3;
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256StarStar;
use tracing::{debug, info, warn};

use crate::mole::Mole;

/// How close the mole must stand to an endpoint to use it.
const INTERACT_RADIUS: f64 = 2.6;
const DIG_DEPTH: f64 = 0.8;
/// Surface speed while digging, units per second.
const DIG_SPEED: f64 = 3.0;
/// Ticks spent going down and coming back up.
const DIG_RAMP_TICKS: f64 = 10.0;
/// Largest heading change per dig tick, radians.
const HEADING_JITTER: f64 = 0.05;

/// What happened during a run.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ScenarioReport {
    /// Faces in the order the walk entered them.
    pub faces_visited: Vec<CubeFace>,
    pub grid_lines: usize,
    /// Entry and exit of the committed tunnel.
    pub tunnel: Option<(EntranceId, EntranceId)>,
    /// Every entry attempt, in order.
    pub rides: Vec<EnterOutcome>,
}

pub struct Scenario<'a> {
    config: &'a Config,
    grid: SphereGrid,
    shell: Shell,
    network: TunnelNetwork,
    traveller: Traveller,
    clock: f64,
    report: ScenarioReport,
}

impl<'a> Scenario<'a> {
    pub fn new(config: &'a Config) -> Self {
        let center = DVec3::from_array(config.planet.center);
        let grid = SphereGrid::new(center, config.grid);
        let shell = Shell::new(center, config.planet.radius);
        Self {
            config,
            grid,
            shell,
            network: TunnelNetwork::new(config.dig, config.entrance),
            traveller: Traveller::new(),
            clock: 0.0,
            report: ScenarioReport::default(),
        }
    }

    pub fn run(mut self) -> ScenarioReport {
        info!(
            radius = self.grid.radius(),
            resolution = self.grid.resolution(),
            projection = ?self.grid.settings().projection,
            "Starting scenario"
        );

        self.walk_grid();

        let mut rng = Xoshiro256StarStar::seed_from_u64(self.config.sim.seed);
        let mut mole = self.dig(&mut rng);

        match self.report.tunnel {
            Some((entry, exit)) => self.ride_tunnel(&mut mole, entry, exit),
            None => warn!("No tunnel was committed; skipping recorded rides"),
        }
        self.ride_fallback(&mut mole);

        info!(
            endpoints = self.network.len(),
            rides = self.report.rides.len(),
            sessions = mole.rail_sessions(),
            clock = self.clock,
            "Scenario finished"
        );
        self.report
    }

    fn walk_grid(&mut self) {
        let n = i64::from(self.grid.resolution());
        let mut cell = self.grid.cell_at(CubeFace::PosZ, n / 2, n / 2);
        self.report.faces_visited.push(cell.face);

        for step in 0..self.config.sim.walk_steps {
            let next = self.grid.step_toward(cell, FaceDirection::West);
            if next.face != cell.face {
                info!("Step {step}: crossed {} -> {} at {next}", cell.face, next.face);
                self.report.faces_visited.push(next.face);
            }
            let frame = self.grid.cell_frame(next);
            debug!("{next}: up={:.3?} forward={:.3?}", frame.up, frame.forward);
            cell = next;
        }

        let mut lines = GridLines::new(GridLineOptions::default());
        lines.refresh(&self.grid);
        let cached = !lines.refresh(&self.grid);
        self.report.grid_lines = lines.lines().len();

        let mut tightened = self.grid.clone();
        tightened.set_edge_tighten(0.5);
        let rebuilt = lines.refresh(&tightened);
        info!(
            lines = self.report.grid_lines,
            cached, rebuilt, "Grid lines built; edge tightening forces a rebuild"
        );
    }

    /// Dig along a jittered great circle from the +Z pole, going under and
    /// coming back up once.
    fn dig(&mut self, rng: &mut Xoshiro256StarStar) -> Mole {
        let sim = &self.config.sim;
        let start = self.shell.center + DVec3::Z * self.shell.radius;
        let mut mole = Mole::on_surface(&self.shell, start, DVec3::X);
        let mut tracker = DigTracker::new(
            self.config.recorder,
            self.network.dig_settings().underground_threshold,
            mole.depth,
        );

        let last = sim.dig_ticks + 1;
        for k in 0..=last {
            let ramp = f64::from(k.min(last - k)) / DIG_RAMP_TICKS;
            mole.depth = DIG_DEPTH * ramp.clamp(0.0, 1.0);
            mole.advance(&self.shell, DIG_SPEED * sim.dt, rng.gen_range(-HEADING_JITTER..=HEADING_JITTER));
            self.clock += sim.dt;

            let sample = DigSample {
                position: mole.position,
                depth: mole.depth,
                heading: mole.heading,
            };
            match tracker.tick(&mut self.network, &self.shell, sample) {
                Some(DigEvent::Entered { entry }) => info!("Dug in at tick {k} ({entry:?})"),
                Some(DigEvent::Emerged {
                    outcome: RecordingOutcome::Committed { entry, exit, path },
                    ..
                }) => {
                    info!(
                        "Tunnel {entry} -> {exit}: {} points, {:.2} long",
                        path.len(),
                        path.total_length()
                    );
                    self.report.tunnel = Some((entry, exit));
                }
                Some(DigEvent::Emerged { exit, outcome }) => warn!("Surfaced at {exit:?} without a tunnel: {outcome:?}"),
                None => {}
            }
        }
        mole
    }

    fn ride_tunnel(&mut self, mole: &mut Mole, entry: EntranceId, exit: EntranceId) {
        let Some(start) = self.network.get(entry).map(|e| e.pose) else {
            return;
        };
        mole.place(&self.shell, start);
        self.ride(mole);
        self.ride(mole);

        // Teleporting endpoints show the re-entry lockout.
        self.set_traverse_along_curve(&[entry, exit], false);
        self.ride(mole);
        self.ride(mole);
        self.clock += self.config.entrance.reenter_block_time + self.config.sim.dt;
        self.ride(mole);
        self.set_traverse_along_curve(&[entry, exit], true);
    }

    /// Link two unrecorded endpoints near the -Y pole and ride between them.
    fn ride_fallback(&mut self, mole: &mut Mole) {
        let r = self.shell.radius;
        let c = self.shell.center;
        let spots = [DVec3::new(0.0, -1.0, 0.6), DVec3::new(0.6, -1.0, 0.0)];
        let [Some(a), Some(b)] = spots.map(|d| {
            let p = c + d.normalize() * r;
            self.network.try_spawn(EntranceKind::Entry, &self.shell, p, DVec3::X)
        }) else {
            warn!("Could not place the unrecorded pair");
            return;
        };
        self.network.link(a, b);

        let Some(start) = self.network.get(a).map(|e| e.pose) else {
            return;
        };
        mole.place(&self.shell, start);
        self.ride(mole);
    }

    fn set_traverse_along_curve(&mut self, ids: &[EntranceId], value: bool) {
        for &id in ids {
            if let Some(e) = self.network.get_mut(id) {
                e.settings.traverse_along_curve = value;
            }
        }
    }

    /// Enter the endpoint within reach of the mole and play the journey out.
    fn ride(&mut self, mole: &mut Mole) -> EnterOutcome {
        let Some(id) = self.network.nearest_within(mole.position, INTERACT_RADIUS) else {
            warn!("No endpoint within reach of {:.3?}", mole.position);
            return EnterOutcome::UnknownEntrance;
        };

        let outcome = self
            .traveller
            .enter(&self.network, id, &self.shell, self.clock, mole.heading, mole);
        match outcome {
            EnterOutcome::Teleported(pose) => mole.place(&self.shell, pose),
            EnterOutcome::Started { route } => {
                let dt = self.config.sim.dt;
                let limit = self.config.sim.traversal_tick_limit;
                let mut ticks = 0;
                while self.traveller.is_travelling() {
                    if ticks >= limit {
                        warn!("Ride from {id} cut off after {ticks} ticks");
                        if let Some(pose) = self.traveller.cancel(mole) {
                            mole.place(&self.shell, pose);
                        }
                        break;
                    }
                    self.clock += dt;
                    if let Some(step) = self.traveller.tick(dt, mole) {
                        mole.place(&self.shell, step.pose);
                    }
                    ticks += 1;
                }
                info!(ticks, on_rail = mole.on_rail(), "Rode from {id} via {route:?}");
            }
            other => info!("Entering {id} at t={:.2}: {other:?}", self.clock),
        }
        self.report.rides.push(outcome);
        outcome
    }
}
