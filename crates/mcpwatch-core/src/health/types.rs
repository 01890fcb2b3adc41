//! Health monitoring records

use chrono::{DateTime, Duration as ChronoDuration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Status of a monitored server
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    /// Not checked yet
    #[default]
    Unknown,
    Healthy,
    Degraded,
    Unhealthy,
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        matches!(self, Self::Healthy)
    }
}

impl fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Unknown => "unknown",
            Self::Healthy => "healthy",
            Self::Degraded => "degraded",
            Self::Unhealthy => "unhealthy",
        };
        f.write_str(s)
    }
}

/// Timing breakdown of one check, in milliseconds
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthCheckDetails {
    pub connection_time: u64,
    pub tool_list_time: u64,
    pub resource_list_time: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory_usage: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpu_usage: Option<f64>,
}

/// Result of a single probe. Never mutated once recorded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthCheck {
    pub server_id: String,
    pub timestamp: DateTime<Utc>,
    pub status: HealthStatus,
    /// End-to-end probe time in milliseconds
    pub response_time: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub details: HealthCheckDetails,
}

impl HealthCheck {
    /// Check with an explicit status, stamped now
    pub fn new(server_id: impl Into<String>, status: HealthStatus, response_time: u64) -> Self {
        Self {
            server_id: server_id.into(),
            timestamp: Utc::now(),
            status,
            response_time,
            error: None,
            details: HealthCheckDetails {
                connection_time: response_time,
                ..Default::default()
            },
        }
    }

    pub fn healthy(server_id: impl Into<String>, response_time: u64) -> Self {
        Self::new(server_id, HealthStatus::Healthy, response_time)
    }

    pub fn unhealthy(server_id: impl Into<String>, response_time: u64, error: impl Into<String>) -> Self {
        Self::new(server_id, HealthStatus::Unhealthy, response_time).with_error(error)
    }

    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }
}

/// A server registered with the monitor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonitoredServer {
    pub id: String,
    pub url: String,
    pub name: String,
    pub enabled: bool,
    pub last_check: Option<DateTime<Utc>>,
    pub status: HealthStatus,
}

impl MonitoredServer {
    pub fn new(
        id: impl Into<String>,
        url: impl Into<String>,
        name: impl Into<String>,
        enabled: bool,
    ) -> Self {
        Self {
            id: id.into(),
            url: url.into(),
            name: name.into(),
            enabled,
            last_check: None,
            status: HealthStatus::Unknown,
        }
    }
}

/// Kind of threshold an alert tracks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertType {
    ResponseTime,
    ConsecutiveFailures,
}

impl AlertType {
    /// Short tag used in alert ids
    pub fn tag(&self) -> &'static str {
        match self {
            Self::ResponseTime => "rt",
            Self::ConsecutiveFailures => "cf",
        }
    }
}

impl fmt::Display for AlertType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ResponseTime => f.write_str("response_time"),
            Self::ConsecutiveFailures => f.write_str("consecutive_failures"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertSeverity {
    Warning,
    Critical,
}

impl fmt::Display for AlertSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Warning => f.write_str("warning"),
            Self::Critical => f.write_str("critical"),
        }
    }
}

/// Threshold violation for one server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthAlert {
    pub id: String,
    pub server_id: String,
    #[serde(rename = "type")]
    pub alert_type: AlertType,
    pub severity: AlertSeverity,
    pub message: String,
    pub triggered_at: DateTime<Utc>,
    pub resolved: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolved_at: Option<DateTime<Utc>>,
}

impl HealthAlert {
    pub fn open(
        server_id: impl Into<String>,
        alert_type: AlertType,
        severity: AlertSeverity,
        message: impl Into<String>,
        triggered_at: DateTime<Utc>,
    ) -> Self {
        let server_id = server_id.into();
        Self {
            id: format!("{}-{}-{}", server_id, alert_type.tag(), uuid::Uuid::new_v4()),
            server_id,
            alert_type,
            severity,
            message: message.into(),
            triggered_at,
            resolved: false,
            resolved_at: None,
        }
    }

    pub fn resolve(&mut self, at: DateTime<Utc>) {
        self.resolved = true;
        self.resolved_at = Some(at);
    }
}

/// Direction of a metric between the two halves of a window
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Improving,
    #[default]
    Stable,
    Degrading,
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Improving => f.write_str("improving"),
            Self::Stable => f.write_str("stable"),
            Self::Degrading => f.write_str("degrading"),
        }
    }
}

/// Window over which metrics are computed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MetricsPeriod {
    #[serde(rename = "1h")]
    Hour,
    #[serde(rename = "24h")]
    Day,
    #[serde(rename = "7d")]
    Week,
    #[serde(rename = "30d")]
    Month,
}

impl MetricsPeriod {
    pub fn duration(&self) -> ChronoDuration {
        match self {
            Self::Hour => ChronoDuration::hours(1),
            Self::Day => ChronoDuration::hours(24),
            Self::Week => ChronoDuration::days(7),
            Self::Month => ChronoDuration::days(30),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hour => "1h",
            Self::Day => "24h",
            Self::Week => "7d",
            Self::Month => "30d",
        }
    }
}

impl fmt::Display for MetricsPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MetricsPeriod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "1h" => Ok(Self::Hour),
            "24h" => Ok(Self::Day),
            "7d" => Ok(Self::Week),
            "30d" => Ok(Self::Month),
            other => Err(format!("unknown metrics period: {} (expected 1h, 24h, 7d or 30d)", other)),
        }
    }
}

/// Windowed metrics for one server, computed on demand
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthMetrics {
    pub server_id: String,
    pub period: MetricsPeriod,
    /// Healthy checks / total, 0..=1
    pub uptime: f64,
    /// Mean response time in whole milliseconds
    pub avg_response_time: u64,
    /// Non-healthy checks / total, 0..=1
    pub error_rate: f64,
    pub total_checks: usize,
    pub failed_checks: usize,
    pub last_check: DateTime<Utc>,
    pub uptime_trend: Trend,
    pub performance_trend: Trend,
}

/// Aggregate counts over all monitored servers
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonitoringSummary {
    pub total_servers: usize,
    /// Servers with `enabled` set
    pub active_servers: usize,
    pub healthy_servers: usize,
    pub degraded_servers: usize,
    pub unhealthy_servers: usize,
    pub unknown_servers: usize,
    /// Unresolved alerts
    pub total_alerts: usize,
    /// Unresolved critical alerts
    pub critical_alerts: usize,
}

/// Everything the API layer shows for one server
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerReport {
    pub server: MonitoredServer,
    pub recent_checks: Vec<HealthCheck>,
    pub metrics: Option<HealthMetrics>,
    pub alerts: Vec<HealthAlert>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_period_parsing() {
        assert_eq!("1h".parse::<MetricsPeriod>().unwrap(), MetricsPeriod::Hour);
        assert_eq!("30d".parse::<MetricsPeriod>().unwrap(), MetricsPeriod::Month);
        assert!("2w".parse::<MetricsPeriod>().is_err());
        assert_eq!(MetricsPeriod::Week.duration(), ChronoDuration::days(7));
    }

    #[test]
    fn test_alert_serialization() {
        let alert = HealthAlert::open(
            "ctx7",
            AlertType::ConsecutiveFailures,
            AlertSeverity::Critical,
            "3 consecutive failures detected",
            Utc::now(),
        );
        assert!(alert.id.starts_with("ctx7-cf-"));

        let json = serde_json::to_value(&alert).unwrap();
        assert_eq!(json["type"], "consecutive_failures");
        assert_eq!(json["severity"], "critical");
        assert_eq!(json["serverId"], "ctx7");
        assert!(json.get("resolvedAt").is_none());
    }

    #[test]
    fn test_unhealthy_check_carries_error() {
        let check = HealthCheck::unhealthy("a", 120, "refused");
        assert_eq!(check.status, HealthStatus::Unhealthy);
        assert_eq!(check.error.as_deref(), Some("refused"));
        assert_eq!(check.details.connection_time, 120);
        assert_eq!(serde_json::to_value(&check).unwrap()["status"], "unhealthy");
    }
}
