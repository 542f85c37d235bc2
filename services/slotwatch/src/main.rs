//! Slotwatch CLI
//!
//! Command-line interface for the signup slot availability service.

use std::path::PathBuf;

use clap::Parser;
use slotwatch::{load_config, Config};
use tracing::Level;

#[derive(Parser)]
#[command(name = "slotwatch")]
#[command(about = "Signup slot availability tracker for the Team Open dashboard")]
#[command(version)]
struct Args {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Dashboard port (overrides config file)
    #[arg(long)]
    port: Option<u16>,

    /// Log level
    #[arg(short, long, default_value = "info")]
    log_level: Level,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(args.log_level)
        .init();

    let mut config = if let Some(config_path) = &args.config {
        tracing::debug!("Loading configuration from {:?}", config_path);
        load_config(config_path)?
    } else {
        tracing::debug!("Using default configuration");
        Config::default()
    };

    if let Some(port) = args.port {
        config.dashboard.port = port;
    }

    tracing::info!("Starting slotwatch service");
    tracing::debug!(
        "Backend: {}, capacity: {}, dashboard port: {}",
        config.backend.base_url,
        config.event.capacity,
        config.dashboard.port
    );

    slotwatch::run(config).await?;

    Ok(())
}
