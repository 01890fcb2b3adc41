//! `mcpwatch connect`

use super::connection_manager;
use crate::console;
use mcpwatch_core::WatchConfig;
use std::time::Duration;

pub async fn run(
    config: &WatchConfig,
    url: &str,
    retries: Option<u32>,
    timeout: Option<u64>,
    json: bool,
) -> anyhow::Result<()> {
    let manager = connection_manager(config)?;
    let mut options = manager.default_options();
    if let Some(retries) = retries {
        options = options.with_retries(retries);
    }
    if let Some(secs) = timeout {
        options = options.with_timeout(Duration::from_secs(secs));
    }

    let result = manager.connect(url, options).await;
    if json {
        return console::print_json(&result);
    }

    match (&result.server_info, &result.error) {
        (Some(info), _) => {
            console::success(&format!(
                "{} {} ({}ms, {} attempt(s))",
                info.name,
                info.version,
                result.response_time.as_millis(),
                result.attempts
            ));
            println!("  id:        {}", info.id);
            if !info.tools.is_empty() {
                println!("  tools:     {}", info.tool_names().join(", "));
            }
            if !info.resources.is_empty() {
                println!("  resources: {}", info.resource_names().join(", "));
            }
            Ok(())
        }
        (None, error) => {
            console::error(error.as_deref().unwrap_or("connection failed"));
            std::process::exit(1);
        }
    }
}
