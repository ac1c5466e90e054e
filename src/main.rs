//! Web service host.
//!
//! ```text
//!     Client Request        ┌──────────────────────────────────────────────┐
//!     ──────────────────────┼─▶ AxumHost ──▶ /<service>/<router> mount     │
//!                           │                 │                            │
//!                           │                 ▼                            │
//!                           │   request store ─▶ request id ─▶ logger      │
//!                           │                 │                            │
//!                           │                 ▼                            │
//!     Client Response       │   controller middleware ─▶ controller        │
//!     ◀─────────────────────┼──────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;

use web_service_host::config::{load_config, HostConfig};
use web_service_host::lifecycle::startup;

#[derive(Parser, Debug)]
#[command(name = "web-service-host", version, about = "Serve the greeting web service")]
struct Cli {
    /// Path to a TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => HostConfig::default(),
    };

    startup::run(config).await?;
    Ok(())
}
