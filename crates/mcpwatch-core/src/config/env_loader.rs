//! Environment variable-based configuration overrides
//!
//! All variables use the `MCPWATCH_` prefix. Durations accept humantime
//! syntax (`30s`, `5m`, `250ms`).

use super::model::WatchConfig;
use crate::error::ConfigError;
use std::str::FromStr;
use std::time::Duration;

/// Apply overrides from the process environment
pub fn apply_env_overrides(config: &mut WatchConfig) -> Result<(), ConfigError> {
    apply_overrides_from(config, |key| std::env::var(key).ok())
}

/// Apply overrides from an arbitrary variable lookup
pub fn apply_overrides_from<F>(config: &mut WatchConfig, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(v) = lookup("MCPWATCH_CONNECT_TIMEOUT") {
        config.connection.timeout = parse_duration("MCPWATCH_CONNECT_TIMEOUT", &v)?;
    }
    if let Some(v) = lookup("MCPWATCH_RETRIES") {
        config.connection.retries = parse_value("MCPWATCH_RETRIES", &v)?;
    }
    if let Some(v) = lookup("MCPWATCH_RETRY_DELAY") {
        config.connection.retry_delay = parse_duration("MCPWATCH_RETRY_DELAY", &v)?;
    }
    if let Some(v) = lookup("MCPWATCH_HEALTH_CHECK_TIMEOUT") {
        config.connection.health_check_timeout =
            parse_duration("MCPWATCH_HEALTH_CHECK_TIMEOUT", &v)?;
    }
    if let Some(v) = lookup("MCPWATCH_ACCEPT_INVALID_CERTS") {
        config.connection.accept_invalid_certs =
            parse_value("MCPWATCH_ACCEPT_INVALID_CERTS", &v)?;
    }

    if let Some(v) = lookup("MCPWATCH_ALLOWED_INSECURE_URLS") {
        for url in v.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            if !config.security.is_insecure_url_allowed(url) {
                config.security.allowed_insecure_urls.push(url.to_string());
            }
        }
    }

    if let Some(v) = lookup("MCPWATCH_DISCOVERY_TIMEOUT") {
        config.discovery.timeout = parse_duration("MCPWATCH_DISCOVERY_TIMEOUT", &v)?;
    }
    if let Some(v) = lookup("MCPWATCH_DISCOVERY_CONCURRENCY") {
        config.discovery.concurrency = parse_value("MCPWATCH_DISCOVERY_CONCURRENCY", &v)?;
    }
    if let Some(v) = lookup("MCPWATCH_DISCOVERY_PORTS") {
        config.discovery.port_candidates = v
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|p| parse_value("MCPWATCH_DISCOVERY_PORTS", p))
            .collect::<Result<Vec<u16>, _>>()?;
    }

    if let Some(v) = lookup("MCPWATCH_MONITOR_INTERVAL") {
        config.monitor.interval = parse_duration("MCPWATCH_MONITOR_INTERVAL", &v)?;
    }
    if let Some(v) = lookup("MCPWATCH_MONITOR_TIMEOUT") {
        config.monitor.timeout = parse_duration("MCPWATCH_MONITOR_TIMEOUT", &v)?;
    }
    if let Some(v) = lookup("MCPWATCH_RETENTION_DAYS") {
        config.monitor.retention_days = parse_value("MCPWATCH_RETENTION_DAYS", &v)?;
    }

    if let Some(v) = lookup("MCPWATCH_LOG_LEVEL") {
        config.logging.level = v;
    }
    if let Some(v) = lookup("MCPWATCH_LOG_FORMAT") {
        config.logging.format = v;
    }

    Ok(())
}

fn parse_duration(key: &str, value: &str) -> Result<Duration, ConfigError> {
    humantime_serde::re::humantime::parse_duration(value.trim())
        .map_err(|e| ConfigError::parse(format!("Invalid {} value '{}': {}", key, value, e)))
}

fn parse_value<T: FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::parse(format!("Invalid {} value '{}'", key, value)))
}
