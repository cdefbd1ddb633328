//! Courier server entry point
//!
//! Run with:
//! ```bash
//! cargo run -p courier-server
//! ```
//!
//! Configuration is loaded from environment variables (see
//! `AppConfig::from_env`).

use courier_common::{init_tracing, AppConfig};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    init_tracing();

    if let Err(e) = run().await {
        error!(error = %e, "Server failed");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    info!("Starting courier server...");

    let config = AppConfig::from_env()?;
    info!(address = %config.server.address(), "Configuration loaded");

    courier_server::run(config).await?;

    Ok(())
}
