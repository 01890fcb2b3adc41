//! CLI argument definitions using clap

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "mcpwatch")]
#[command(about = "Discover MCP servers and monitor their health")]
#[command(version)]
pub struct Cli {
    /// Configuration file (JSON, TOML or YAML)
    #[arg(long, global = true, env = "MCPWATCH_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log output format: pretty, json or compact
    #[arg(long, global = true, value_parser = ["pretty", "json", "compact"])]
    pub log_format: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Probe candidate endpoints for MCP servers
    Discover {
        /// Per-candidate timeout in seconds
        #[arg(long)]
        timeout: Option<u64>,

        /// Candidates probed at once
        #[arg(long)]
        concurrency: Option<usize>,

        /// Skip loopback candidates
        #[arg(long)]
        no_loopback: bool,

        /// Ports to try on loopback hosts
        #[arg(long, value_delimiter = ',')]
        ports: Option<Vec<u16>>,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Run a single health probe
    Check {
        url: String,

        #[arg(long)]
        json: bool,
    },

    /// Connect with retries and print the server description
    Connect {
        url: String,

        /// Number of attempts
        #[arg(long)]
        retries: Option<u32>,

        /// Per-attempt timeout in seconds
        #[arg(long)]
        timeout: Option<u64>,

        #[arg(long)]
        json: bool,
    },

    /// Monitor servers until interrupted
    Monitor {
        /// Server URLs to watch
        urls: Vec<String>,

        /// Also watch every server a discovery run finds
        #[arg(long)]
        discover: bool,

        /// Seconds between checks
        #[arg(long)]
        interval: Option<u64>,
    },
}
