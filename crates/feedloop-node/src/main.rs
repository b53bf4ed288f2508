//! # Feedloop Node
//!
//! Entry point: configuration, logging, runtime, Ctrl+C shutdown.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use feedloop_node::{NodeConfig, NodeRuntime};
use feedloop_telemetry::{init_logging, TelemetryConfig};

/// Feedloop core node
#[derive(Parser, Debug)]
#[command(name = "feedloop-node")]
#[command(about = "Runs the Feedloop admission, feedback and membership core")]
struct Args {
    /// TOML configuration file; FL_* environment variables override it
    #[arg(short, long, env = "FL_CONFIG")]
    config: Option<PathBuf>,

    /// Validate configuration and exit
    #[arg(long)]
    check: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let telemetry = TelemetryConfig::from_env();
    init_logging(&telemetry).context("Failed to initialize logging")?;

    let config = NodeConfig::load(args.config.as_deref()).context("Failed to load configuration")?;
    if args.check {
        info!("Configuration is valid");
        return Ok(());
    }

    let runtime = NodeRuntime::new(config);
    runtime.start().await;

    info!("Node is running. Press Ctrl+C to stop.");
    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for Ctrl+C")?;

    runtime.shutdown().await;
    Ok(())
}
