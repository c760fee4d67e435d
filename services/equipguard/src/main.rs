//! EquipGuard CLI
//!
//! Command-line interface for the telemetry poller and live dashboard.

use std::path::PathBuf;

use clap::Parser;
use equipguard::{load_config, Config, EquipGuardBuilder};
use tracing::Level;

#[derive(Parser)]
#[command(name = "equipguard")]
#[command(about = "Predictive maintenance telemetry console")]
#[command(version)]
struct Args {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Prediction endpoint URL (overrides config file)
    #[arg(long)]
    endpoint: Option<String>,

    /// Poll interval in milliseconds (overrides config file)
    #[arg(long)]
    interval_ms: Option<u64>,

    /// Dashboard port (overrides config file)
    #[arg(long)]
    dashboard_port: Option<u16>,

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

    tracing::debug!(
        "Parsed command line arguments: config={:?}, endpoint={:?}, interval_ms={:?}, dashboard_port={:?}, log_level={:?}",
        args.config,
        args.endpoint,
        args.interval_ms,
        args.dashboard_port,
        args.log_level
    );

    let mut config = if let Some(config_path) = &args.config {
        tracing::debug!("Loading configuration from {:?}", config_path);
        load_config(config_path)?
    } else {
        tracing::debug!("Using default configuration");
        Config::default()
    };

    if let Some(endpoint) = args.endpoint {
        config.predictor.endpoint = endpoint;
    }
    if let Some(interval_ms) = args.interval_ms {
        config.polling.interval_ms = interval_ms;
    }
    if let Some(dashboard_port) = args.dashboard_port {
        config.dashboard.port = dashboard_port;
    }

    tracing::info!("Starting equipguard");
    tracing::debug!(
        "Endpoint: {}, interval: {} ms, dashboard: {} (port {})",
        config.predictor.endpoint,
        config.polling.interval_ms,
        config.dashboard.enabled,
        config.dashboard.port
    );

    EquipGuardBuilder::new(config).build()?.start().await?;

    Ok(())
}
