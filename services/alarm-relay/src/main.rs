//! Alarm relay CLI
//!
//! Command-line interface for the alarm-to-Telegram webhook relay.

use std::path::PathBuf;

use alarm_relay::{load_config, Config, RelayBuilder};
use clap::Parser;
use tracing::Level;

#[derive(Parser)]
#[command(name = "alarm-relay")]
#[command(about = "Relays device alarms to Telegram after tenant validation")]
#[command(version)]
struct Args {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Listen port (overrides config file)
    #[arg(short, long)]
    port: Option<u16>,

    /// Log level (defaults to the runtime mode's level)
    #[arg(short, long)]
    log_level: Option<Level>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(config_path) => load_config(config_path)?,
        None => Config::default(),
    };

    config.resolve_secrets()?;

    if let Some(port) = args.port {
        config.server.port = port;
    }

    tracing_subscriber::fmt()
        .with_max_level(args.log_level.unwrap_or(config.mode.default_log_level()))
        .init();

    tracing::debug!(
        "Parsed command line arguments: config={:?}, port={:?}, log_level={:?}",
        args.config,
        args.port,
        args.log_level
    );
    tracing::debug!("Effective configuration: {:?}", config);

    tracing::info!("Starting alarm relay in {:?} mode", config.mode);

    RelayBuilder::new(config).build()?.start().await?;

    Ok(())
}
