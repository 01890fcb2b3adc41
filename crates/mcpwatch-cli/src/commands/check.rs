//! `mcpwatch check`

use super::connection_manager;
use crate::console;
use mcpwatch_core::{HealthStatus, WatchConfig};

pub async fn run(config: &WatchConfig, url: &str, json: bool) -> anyhow::Result<()> {
    let manager = connection_manager(config)?;
    let check = manager.health_check(url).await;

    if json {
        return console::print_json(&check);
    }

    println!(
        "{} {} ({}ms)",
        url,
        console::status(check.status),
        check.response_time
    );
    if let Some(error) = &check.error {
        console::error(error);
    }
    if check.status != HealthStatus::Healthy {
        std::process::exit(1);
    }
    Ok(())
}
