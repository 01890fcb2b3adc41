//! `mcpwatch monitor`

use super::connection_manager;
use super::discover::discover;
use crate::console;
use mcpwatch_core::mcp::server_name_from_url;
use mcpwatch_core::{DiscoveryOptions, HealthMonitor, WatchConfig};
use std::sync::Arc;
use std::time::Duration;

pub async fn run(
    config: &WatchConfig,
    urls: Vec<String>,
    with_discovery: bool,
    interval: Option<u64>,
) -> anyhow::Result<()> {
    let mut options = config.monitor.clone();
    if let Some(secs) = interval {
        options = options.with_interval(Duration::from_secs(secs));
    }

    let monitor = Arc::new(HealthMonitor::new(connection_manager(config)?, options.clone()));

    for url in &urls {
        monitor.add_server(url, url, &server_name_from_url(url), true);
    }
    if with_discovery {
        let report = discover(config, DiscoveryOptions::from(&config.discovery)).await?;
        for server in &report.discovered {
            monitor.add_server(&server.url, &server.url, &server.server_info.name, true);
        }
    }
    if monitor.servers().is_empty() {
        anyhow::bail!("nothing to monitor: pass server URLs or --discover");
    }

    monitor.start(options.clone())?;
    console::header(&format!(
        "Monitoring {} server(s) every {}s (Ctrl-C to stop)",
        monitor.servers().len(),
        options.interval.as_secs()
    ));

    let mut report = tokio::time::interval(options.interval);
    report.tick().await;
    // give the immediate first tick a chance to settle before the first report
    tokio::time::sleep(options.timeout.min(options.interval)).await;

    loop {
        print_summary(&monitor);
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            _ = report.tick() => {}
        }
    }

    monitor.stop();
    console::success("Monitoring stopped");
    Ok(())
}

fn print_summary(monitor: &HealthMonitor) {
    let summary = monitor.monitoring_summary();
    println!(
        "\n{} healthy, {} degraded, {} unhealthy, {} unknown; {} open alert(s)",
        summary.healthy_servers,
        summary.degraded_servers,
        summary.unhealthy_servers,
        summary.unknown_servers,
        summary.total_alerts
    );
    for server in monitor.servers() {
        let last = monitor
            .health_history(&server.id, Some(1))
            .first()
            .map(|c| format!("{}ms", c.response_time))
            .unwrap_or_else(|| "-".to_string());
        println!("  {:<40} {:<10} {}", server.name, console::status(server.status), last);
    }
    for alert in monitor.active_alerts() {
        console::warn(&format!("[{}] {}: {}", alert.severity, alert.server_id, alert.message));
    }
}
