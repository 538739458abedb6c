//! Command-line argument parsing for Burrow.

use std::path::PathBuf;

use burrow_cubesphere::Projection;
use clap::Parser;

use crate::Config;

/// Burrow command-line arguments.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug, Default)]
#[command(name = "burrow-sim", about = "Cube-sphere grid and tunnel replay scenario")]
pub struct CliArgs {
    /// Cells per face edge.
    #[arg(long)]
    pub resolution: Option<u32>,

    /// Planet and grid radius.
    #[arg(long)]
    pub radius: Option<f64>,

    /// Projection (gnomonic, equiangular, spherify).
    #[arg(long)]
    pub projection: Option<Projection>,

    /// Seed for the dig scenario.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(n) = args.resolution {
            self.grid.resolution = n;
        }
        if let Some(r) = args.radius {
            self.grid.radius = r;
            self.planet.radius = r;
        }
        if let Some(p) = args.projection {
            self.grid.projection = p;
        }
        if let Some(seed) = args.seed {
            self.sim.seed = seed;
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
    }
}
