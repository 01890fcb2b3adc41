//! Configuration model

use super::logging_config::LoggingConfig;
use super::timeouts;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Top-level mcpwatch configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WatchConfig {
    pub connection: ConnectionConfig,
    pub security: SecurityConfig,
    pub discovery: DiscoveryConfig,
    pub monitor: MonitorConfig,
    pub logging: LoggingConfig,
}

impl WatchConfig {
    /// Merge with another config (other takes precedence where it is non-empty)
    pub fn merge(&mut self, other: WatchConfig) {
        self.connection = other.connection;
        for url in other.security.allowed_insecure_urls {
            if !self.security.allowed_insecure_urls.contains(&url) {
                self.security.allowed_insecure_urls.push(url);
            }
        }
        self.discovery = other.discovery;
        self.monitor = other.monitor;
        self.logging.merge(other.logging);
    }
}

/// Settings for the connection manager
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectionConfig {
    /// Per-attempt timeout for `connect`
    #[serde(with = "humantime_serde")]
    pub timeout: Duration,
    /// Number of connection attempts
    pub retries: u32,
    /// Base delay between attempts, multiplied by the attempt number
    #[serde(with = "humantime_serde")]
    pub retry_delay: Duration,
    /// Timeout for the lightweight health probe
    #[serde(with = "humantime_serde")]
    pub health_check_timeout: Duration,
    /// User-Agent sent with HTTP probes
    pub user_agent: String,
    /// Skip TLS certificate verification (self-signed local servers)
    pub accept_invalid_certs: bool,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            timeout: timeouts::connection::attempt_timeout(),
            retries: timeouts::connection::RETRIES,
            retry_delay: timeouts::connection::retry_delay(),
            health_check_timeout: timeouts::connection::health_check_timeout(),
            user_agent: format!("mcpwatch/{}", env!("CARGO_PKG_VERSION")),
            accept_invalid_certs: false,
        }
    }
}

/// Secure-scheme policy
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Exact `http://` / `ws://` URLs that may bypass the secure-scheme gate
    pub allowed_insecure_urls: Vec<String>,
}

impl SecurityConfig {
    /// Check if an insecure URL was explicitly allowed
    pub fn is_insecure_url_allowed(&self, url: &str) -> bool {
        let url = url.trim_end_matches('/');
        self.allowed_insecure_urls
            .iter()
            .any(|allowed| allowed.trim_end_matches('/') == url)
    }

    /// Allow an insecure URL
    pub fn allow_insecure(mut self, url: impl Into<String>) -> Self {
        self.allowed_insecure_urls.push(url.into());
        self
    }
}

/// Settings for discovery scans
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscoveryConfig {
    /// Per-candidate probe timeout
    #[serde(with = "humantime_serde")]
    pub timeout: Duration,
    /// Probes in flight at once
    pub concurrency: usize,
    /// Probe loopback addresses
    pub include_loopback: bool,
    /// Ports tried on loopback hosts
    pub port_candidates: Vec<u16>,
    /// Pause between probe chunks
    #[serde(with = "humantime_serde")]
    pub chunk_delay: Duration,
    /// Endpoints expected to host known servers, probed first
    pub known_endpoints: Vec<String>,
}

/// Ports commonly used by local MCP servers
pub const DEFAULT_PORT_CANDIDATES: [u16; 10] =
    [8051, 8052, 8053, 8054, 8055, 3000, 3001, 8000, 8080, 8888];

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            timeout: timeouts::discovery::probe_timeout(),
            concurrency: timeouts::discovery::CONCURRENCY,
            include_loopback: true,
            port_candidates: DEFAULT_PORT_CANDIDATES.to_vec(),
            chunk_delay: timeouts::discovery::chunk_delay(),
            known_endpoints: (8051..=8055)
                .map(|port| format!("https://localhost:{}", port))
                .collect(),
        }
    }
}

/// Alert thresholds evaluated after every check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlertThresholds {
    /// Response time above which a response_time alert opens
    pub response_time_ms: u64,
    /// Non-healthy checks in a row that open a consecutive_failures alert
    pub consecutive_failures: usize,
}

impl Default for AlertThresholds {
    fn default() -> Self {
        Self {
            response_time_ms: timeouts::monitor::RESPONSE_TIME_ALERT_MILLIS,
            consecutive_failures: timeouts::monitor::CONSECUTIVE_FAILURES,
        }
    }
}

/// Settings for the health monitor scheduler
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// Time between scheduler ticks
    #[serde(with = "humantime_serde")]
    pub interval: Duration,
    /// Upper bound for one server check
    #[serde(with = "humantime_serde")]
    pub timeout: Duration,
    /// Days of history kept per server
    pub retention_days: u32,
    pub alert_thresholds: AlertThresholds,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            interval: timeouts::monitor::interval(),
            timeout: timeouts::monitor::check_timeout(),
            retention_days: timeouts::monitor::RETENTION_DAYS,
            alert_thresholds: AlertThresholds::default(),
        }
    }
}

impl MonitorConfig {
    /// Set scheduler interval
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Set per-check timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set history retention
    pub fn with_retention_days(mut self, days: u32) -> Self {
        self.retention_days = days;
        self
    }

    /// Set alert thresholds
    pub fn with_alert_thresholds(mut self, thresholds: AlertThresholds) -> Self {
        self.alert_thresholds = thresholds;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let config = WatchConfig::default();
        assert_eq!(config.connection.retries, 3);
        assert_eq!(config.discovery.concurrency, 3);
        assert_eq!(config.discovery.known_endpoints.len(), 5);
        assert_eq!(config.monitor.retention_days, 30);
        assert_eq!(config.monitor.alert_thresholds.response_time_ms, 5000);
        assert_eq!(config.monitor.alert_thresholds.consecutive_failures, 3);
        assert!(config.security.allowed_insecure_urls.is_empty());
    }

    #[test]
    fn test_insecure_allow_list_ignores_trailing_slash() {
        let security = SecurityConfig::default().allow_insecure("http://localhost:8051");
        assert!(security.is_insecure_url_allowed("http://localhost:8051/"));
        assert!(security.is_insecure_url_allowed("http://localhost:8051"));
        assert!(!security.is_insecure_url_allowed("http://localhost:8052"));
    }

    #[test]
    fn test_partial_deserialization_uses_defaults() {
        let config: WatchConfig = serde_json::from_str(
            r#"{ "monitor": { "interval": "1m", "retention_days": 7 } }"#,
        )
        .unwrap();
        assert_eq!(config.monitor.interval, Duration::from_secs(60));
        assert_eq!(config.monitor.retention_days, 7);
        assert_eq!(config.monitor.timeout, Duration::from_secs(10));
        assert_eq!(config.connection, ConnectionConfig::default());
    }

    #[test]
    fn test_merge_keeps_allow_list_entries() {
        let mut base = WatchConfig::default();
        base.security = SecurityConfig::default().allow_insecure("http://localhost:8051");
        let mut other = WatchConfig::default();
        other.security = SecurityConfig::default()
            .allow_insecure("http://localhost:8051")
            .allow_insecure("ws://localhost:8052");
        base.merge(other);
        assert_eq!(base.security.allowed_insecure_urls.len(), 2);
    }
}
