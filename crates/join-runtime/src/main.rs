//! # join-server
//!
//! Admits members to Data Unions on request. See `join_runtime` for the
//! startup sequence and `du_03_join_gateway` for the HTTP surface.

use anyhow::{Context, Result};
use du_telemetry::{init_telemetry, TelemetryConfig};
use join_runtime::{build_gateway, load_config};
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    init_telemetry(&TelemetryConfig::from_env()).context("Failed to initialize logging")?;

    info!("===========================================");
    info!("  Data Union Join Server v{}", env!("CARGO_PKG_VERSION"));
    info!("===========================================");

    let config = load_config()?;
    info!(
        addr = %config.http_addr(),
        join_path = %config.http.join_path,
        client = ?config.client.mode,
        chains = ?config.chains.keys().collect::<Vec<_>>(),
        "Configuration loaded"
    );

    let gateway = build_gateway(config)?;
    gateway.run(shutdown_signal()).await?;

    info!("Shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Received Ctrl-C, shutting down"),
        Err(e) => error!(error = %e, "Failed to listen for Ctrl-C, shutting down"),
    }
}
