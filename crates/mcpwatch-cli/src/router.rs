//! Command routing

use crate::args::{Cli, Commands};
use crate::commands;
use mcpwatch_core::WatchConfig;

pub async fn route(cli: Cli, config: WatchConfig) -> anyhow::Result<()> {
    match cli.command {
        Commands::Discover {
            timeout,
            concurrency,
            no_loopback,
            ports,
            json,
        } => {
            let args = commands::discover::DiscoverArgs {
                timeout,
                concurrency,
                no_loopback,
                ports,
                json,
            };
            commands::discover::run(&config, args).await
        }
        Commands::Check { url, json } => commands::check::run(&config, &url, json).await,
        Commands::Connect {
            url,
            retries,
            timeout,
            json,
        } => commands::connect::run(&config, &url, retries, timeout, json).await,
        Commands::Monitor {
            urls,
            discover,
            interval,
        } => commands::monitor::run(&config, urls, discover, interval).await,
    }
}
