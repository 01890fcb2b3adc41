//! Discovery → registration → monitoring, end to end against loopback servers

use async_trait::async_trait;
use mcpwatch_core::config::{DiscoveryConfig, SecurityConfig};
use mcpwatch_core::mcp::{McpCapabilities, McpTool};
use mcpwatch_core::{
    ConnectOptions, ConnectionManager, ConnectionResult, DiscoveryOptions, DiscoveryService,
    HealthCheck, HealthMonitor, HealthStatus, MetricsPeriod, MonitorOptions, Prober, ServerCategory,
    ServerInfo,
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("mcpwatch_core=debug")
        .with_test_writer()
        .try_init();
}

/// Minimal HTTP/1.1 server: `/health` answers 200, `/info` serves `info`
async fn spawn_mcp_server(info: serde_json::Value) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("http://127.0.0.1:{}", listener.local_addr().unwrap().port());
    let body = info.to_string();

    tokio::spawn(async move {
        while let Ok((mut stream, _)) = listener.accept().await {
            let body = body.clone();
            tokio::spawn(async move {
                let mut request = Vec::new();
                let mut buf = [0u8; 1024];
                while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                    match stream.read(&mut buf).await {
                        Ok(0) | Err(_) => return,
                        Ok(n) => request.extend_from_slice(&buf[..n]),
                    }
                }
                let head = String::from_utf8_lossy(&request).to_string();
                let path = head.split_whitespace().nth(1).unwrap_or("/").to_string();
                let (status, payload) = match path.as_str() {
                    "/health" => ("200 OK", r#"{"status":"ok"}"#.to_string()),
                    "/info" => ("200 OK", body),
                    _ => ("404 Not Found", String::new()),
                };
                let response = format!(
                    "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status,
                    payload.len(),
                    payload
                );
                let _ = stream.write_all(response.as_bytes()).await;
                let _ = stream.shutdown().await;
            });
        }
    });

    url
}

#[tokio::test]
async fn test_discovered_servers_are_monitored() {
    init_tracing();

    let docs = spawn_mcp_server(serde_json::json!({
        "id": "context7",
        "name": "Context7",
        "version": "1.2.0",
        "tools": ["resolve-library-id", "get-library-docs"]
    }))
    .await;
    let files = spawn_mcp_server(serde_json::json!({
        "name": "Local Files",
        "tools": [{"name": "read_file"}]
    }))
    .await;

    let security = SecurityConfig::default()
        .allow_insecure(docs.clone())
        .allow_insecure(files.clone());
    let manager = Arc::new(ConnectionManager::new(Default::default(), security).unwrap());

    let discovery = DiscoveryService::new(
        manager.clone(),
        DiscoveryConfig {
            known_endpoints: vec![docs.clone(), files.clone()],
            chunk_delay: Duration::from_millis(10),
            ..DiscoveryConfig::default()
        },
    );
    let report = discovery
        .discover_servers(DiscoveryOptions {
            timeout: Duration::from_secs(2),
            port_candidates: Vec::new(),
            ..DiscoveryOptions::default()
        })
        .await
        .unwrap();

    assert_eq!(report.total_tested, 2);
    assert_eq!(report.discovered.len(), 2);
    assert_eq!(report.discovered[0].server_info.id, "context7");
    assert_eq!(report.discovered[0].category, ServerCategory::Documentation);
    assert_eq!(report.discovered[1].category, ServerCategory::Filesystem);
    assert!(report.discovered[1].server_info.id.starts_with("http-"));

    let monitor = Arc::new(HealthMonitor::new(manager, MonitorOptions::default()));
    for server in &report.discovered {
        monitor.add_server(
            &server.server_info.id,
            &server.url,
            &server.server_info.name,
            true,
        );
    }

    let tick = monitor.run_tick().await;
    assert_eq!(tick.checked, 2);

    let summary = monitor.monitoring_summary();
    assert_eq!(summary.total_servers, 2);
    assert_eq!(summary.healthy_servers, 2);
    assert_eq!(summary.total_alerts, 0);

    let metrics = monitor
        .calculate_metrics("context7", MetricsPeriod::Hour)
        .unwrap();
    assert_eq!(metrics.uptime, 1.0);
    assert_eq!(metrics.total_checks, 1);
}

#[tokio::test]
async fn test_insecure_server_is_reported_not_probed() {
    let url = spawn_mcp_server(serde_json::json!({ "name": "Plain" })).await;
    let manager = ConnectionManager::new(Default::default(), SecurityConfig::default()).unwrap();

    let result = manager.connect(&url, ConnectOptions::default()).await;
    assert!(!result.success);
    assert_eq!(result.attempts, 0);

    let check = manager.health_check(&url).await;
    assert_eq!(check.status, HealthStatus::Unhealthy);
}

/// Scripted prober: each URL follows its own list of statuses, the last one repeating
struct ScriptedProber {
    scripts: Mutex<HashMap<String, Vec<HealthStatus>>>,
}

impl ScriptedProber {
    fn next_status(&self, url: &str) -> HealthStatus {
        let mut scripts = self.scripts.lock().unwrap();
        match scripts.get_mut(url) {
            Some(script) if script.len() > 1 => script.remove(0),
            Some(script) => script.first().copied().unwrap_or(HealthStatus::Healthy),
            None => HealthStatus::Healthy,
        }
    }
}

#[async_trait]
impl Prober for ScriptedProber {
    async fn connect(&self, url: &str, _options: ConnectOptions) -> ConnectionResult {
        ConnectionResult {
            success: true,
            server_info: Some(ServerInfo {
                id: url.to_string(),
                name: url.to_string(),
                version: "1.0.0".to_string(),
                capabilities: McpCapabilities::default(),
                tools: vec![McpTool::new("query")],
                resources: Vec::new(),
            }),
            error: None,
            response_time: Duration::from_millis(5),
            attempts: 1,
        }
    }

    async fn health_check(&self, url: &str) -> HealthCheck {
        match self.next_status(url) {
            HealthStatus::Healthy => HealthCheck::healthy(url, 20),
            status => HealthCheck::new(url, status, 20).with_error("connection refused"),
        }
    }
}

#[tokio::test(start_paused = true)]
async fn test_scheduler_raises_and_resolves_alerts() {
    let mut scripts = HashMap::new();
    scripts.insert(
        "https://flaky.example".to_string(),
        vec![
            HealthStatus::Unhealthy,
            HealthStatus::Unhealthy,
            HealthStatus::Unhealthy,
            HealthStatus::Unhealthy,
            HealthStatus::Healthy,
        ],
    );
    let prober = Arc::new(ScriptedProber {
        scripts: Mutex::new(scripts),
    });

    let monitor = Arc::new(HealthMonitor::new(prober, MonitorOptions::default()));
    monitor.add_server("flaky", "https://flaky.example", "Flaky", true);
    monitor.add_server("steady", "https://steady.example", "Steady", true);

    let options = MonitorOptions::default().with_interval(Duration::from_secs(60));
    monitor.start(options).unwrap();

    // ticks at 0s, 60s, 120s
    tokio::time::sleep(Duration::from_secs(121)).await;
    let alerts = monitor.active_alerts();
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].server_id, "flaky");
    assert_eq!(monitor.monitoring_summary().critical_alerts, 1);

    // 180s still failing, 240s healthy
    tokio::time::sleep(Duration::from_secs(120)).await;
    monitor.stop();

    assert!(monitor.active_alerts().is_empty());
    let history = monitor.health_history("flaky", None);
    assert_eq!(history.len(), 5);
    assert_eq!(history[0].status, HealthStatus::Healthy);
    assert_eq!(
        monitor.server_status("flaky").unwrap().status,
        HealthStatus::Healthy
    );

    let report = monitor.server_report("flaky", MetricsPeriod::Day).unwrap();
    assert_eq!(report.alerts.len(), 1);
    assert!(report.alerts[0].resolved);
    assert_eq!(report.metrics.unwrap().failed_checks, 4);
}
