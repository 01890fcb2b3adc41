//! `mcpwatch discover`

use super::connection_manager;
use crate::console;
use mcpwatch_core::{DiscoveryOptions, DiscoveryResult, DiscoveryService, WatchConfig};
use std::time::Duration;

pub struct DiscoverArgs {
    pub timeout: Option<u64>,
    pub concurrency: Option<usize>,
    pub no_loopback: bool,
    pub ports: Option<Vec<u16>>,
    pub json: bool,
}

impl DiscoverArgs {
    fn apply(&self, mut options: DiscoveryOptions) -> DiscoveryOptions {
        if let Some(secs) = self.timeout {
            options.timeout = Duration::from_secs(secs);
        }
        if let Some(concurrency) = self.concurrency {
            options.concurrency = concurrency;
        }
        if self.no_loopback {
            options.include_loopback = false;
        }
        if let Some(ports) = &self.ports {
            options.port_candidates = ports.clone();
        }
        options
    }
}

/// Run one discovery pass with the configured options
pub async fn discover(config: &WatchConfig, options: DiscoveryOptions) -> anyhow::Result<DiscoveryResult> {
    let service = DiscoveryService::new(connection_manager(config)?, config.discovery.clone());
    Ok(service.discover_servers(options).await?)
}

pub async fn run(config: &WatchConfig, args: DiscoverArgs) -> anyhow::Result<()> {
    let options = args.apply(DiscoveryOptions::from(&config.discovery));
    let result = discover(config, options).await?;

    if args.json {
        return console::print_json(&result);
    }

    console::header(&format!(
        "Discovered {} of {} candidates in {}ms",
        result.discovered.len(),
        result.total_tested,
        result.duration
    ));
    for server in &result.discovered {
        println!(
            "  {:<32} {:<24} {:<20} {}ms",
            server.url,
            server.server_info.name,
            server.category.to_string(),
            server.response_time
        );
    }
    if result.discovered.is_empty() {
        console::warn("No MCP servers found");
    }
    Ok(())
}
