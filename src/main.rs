use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;

use jukebox_rs::config::{Args, ControllerConfig};
use jukebox_rs::console::{self, ConsoleGateway, ConsoleResolver, ConsoleSurface, SimulatedTransport};
use jukebox_rs::logging;
use jukebox_rs::model::GuildId;
use jukebox_rs::{Collaborators, SessionRegistry};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    if let Err(e) = logging::init_logging(&args.log_dir) {
        eprintln!("Warning: Failed to initialize logging: {}", e);
    }

    tracing::info!("=== jukebox-rs starting ===");
    tracing::debug!(?args, "Configuration loaded");

    let surface = Arc::new(ConsoleSurface::new());
    let transport = Arc::new(SimulatedTransport::new(Duration::from_secs(args.sim_track_secs)));

    let registry = SessionRegistry::new(
        Collaborators {
            transport: transport.clone(),
            resolver: Arc::new(ConsoleResolver),
            surface: surface.clone(),
        },
        ControllerConfig::from(&args),
    );
    let mut gateway = ConsoleGateway::new(GuildId::new(args.guild.clone()));

    console::print_help();
    let result = console::run(&registry, &mut gateway, &surface, &transport).await;

    tracing::info!("Shutting down");
    registry.shutdown().await;

    if let Err(e) = &result {
        tracing::error!(error = %e, "Console loop failed");
    }
    result
}
