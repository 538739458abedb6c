//! Configuration for Burrow.
//!
//! Settings persist to disk as `config.ron`, every section falls back to its
//! defaults when missing, and a handful of values can be overridden on the
//! command line.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{CONFIG_FILE, Config, DebugConfig, PlanetConfig, SimConfig};
pub use error::ConfigError;
