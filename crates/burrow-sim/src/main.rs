//! Headless Burrow session: walks the cube-sphere grid, digs one tunnel, and
//! rides it.
//!
//! Configuration is loaded from `config.ron` and can be overridden via CLI flags.
//! Run with `cargo run -p burrow-sim -- --seed 7 --log-level debug`.

mod mole;
mod scenario;

use std::path::PathBuf;

use burrow_config::{CliArgs, Config};
use clap::Parser;
use tracing::{error, info};

use crate::scenario::Scenario;

fn main() {
    let args = CliArgs::parse();

    let config_dir = args
        .config
        .clone()
        .or_else(Config::default_dir)
        .unwrap_or_else(|| PathBuf::from("."));

    // Logging is not up yet; report the failure once it is.
    let (mut config, load_error) = match Config::load_or_create(&config_dir) {
        Ok(config) => (config, None),
        Err(e) => (Config::default(), Some(e)),
    };
    config.apply_cli_overrides(&args);

    let log_dir = config_dir.join("logs");
    burrow_log::init_logging(Some(&log_dir), cfg!(debug_assertions), Some(&config));
    if let Some(e) = load_error {
        error!("Failed to load config from {}: {e}; using defaults", config_dir.display());
    }

    let report = Scenario::new(&config).run();
    info!(
        faces = report.faces_visited.len(),
        tunnel = ?report.tunnel,
        rides = report.rides.len(),
        "Done"
    );
}
