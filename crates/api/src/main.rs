//! PC Diagnostics Server - Main Entry Point

use anyhow::Context;
use api::{init_logging, run_server, ServiceConfig};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServiceConfig::load().context("Failed to load configuration")?;
    config
        .validate()
        .map_err(anyhow::Error::msg)
        .context("Invalid configuration")?;

    init_logging(&config.logging)?;

    info!("=== PC Diagnostics v{} ===", env!("CARGO_PKG_VERSION"));
    info!(
        "Thresholds: ram>={}%, disk>={}%, temp>={}C",
        config.collector.high_ram_threshold,
        config.collector.disk_full_threshold,
        config.collector.high_temp_threshold
    );

    run_server(config).await?;

    Ok(())
}
