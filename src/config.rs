//! Command-line and environment configuration

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(300);

/// Command-line arguments for jukebox-rs
#[derive(Parser, Debug, Clone)]
#[command(name = "jukebox-rs")]
#[command(about = "Voice channel audio queue controller (console harness)")]
#[command(version)]
pub struct Args {
    /// Seconds to stay connected while idle with an empty queue
    #[arg(long, default_value_t = 300, env = "JUKEBOX_IDLE_TIMEOUT_SECS")]
    pub idle_timeout_secs: u64,

    /// Directory for rolling log files
    #[arg(long, default_value = ".logs", env = "JUKEBOX_LOG_DIR")]
    pub log_dir: PathBuf,

    /// Length of every track played by the simulated transport
    #[arg(long, default_value_t = 30, env = "JUKEBOX_SIM_TRACK_SECS")]
    pub sim_track_secs: u64,

    /// Guild id the console session is registered under
    #[arg(long, default_value = "console", env = "JUKEBOX_GUILD")]
    pub guild: String,
}

/// Settings consumed by the controller
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ControllerConfig {
    /// How long an idle session keeps its voice connection
    pub idle_timeout: Duration,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            idle_timeout: DEFAULT_IDLE_TIMEOUT,
        }
    }
}

impl From<&Args> for ControllerConfig {
    fn from(args: &Args) -> Self {
        Self {
            idle_timeout: Duration::from_secs(args.idle_timeout_secs),
        }
    }
}
