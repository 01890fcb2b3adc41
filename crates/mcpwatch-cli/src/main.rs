//! mcpwatch command-line interface
//!
//! ```bash
//! mcpwatch discover                       # probe local candidates
//! mcpwatch check https://localhost:8051   # one health probe
//! mcpwatch connect wss://mcp.example.com  # full handshake with retries
//! mcpwatch monitor https://localhost:8051 # watch until Ctrl-C
//! ```
//!
//! Set `RUST_LOG=debug` for per-attempt logging.

mod args;
mod commands;
mod console;
mod logging;
mod router;

use clap::Parser;

pub use args::{Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = mcpwatch_core::load_config(cli.config.as_deref())?;

    logging::init(&config.logging, cli.log_format.as_deref());

    router::route(cli, config).await
}
