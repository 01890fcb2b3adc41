//! Connection manager
//!
//! Opens connections to single endpoints with retry and linear backoff,
//! and runs the lightweight probe used by the health monitor.

use super::endpoint::{ServerEndpoint, TransportKind, server_name_from_url};
use super::transport::{HttpTransport, ProbeTransport, WebSocketTransport, millis};
use super::types::ServerInfo;
use crate::config::{ConnectionConfig, SecurityConfig, WatchConfig};
use crate::error::{ConnectionError, UnifiedError};
use crate::health::HealthCheck;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, warn};

/// Options for a single `connect` call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectOptions {
    /// Per-attempt timeout
    #[serde(with = "humantime_serde")]
    pub timeout: Duration,
    /// Total number of attempts
    pub retries: u32,
    /// Base delay; attempt `n` is followed by `retry_delay * n`
    #[serde(with = "humantime_serde")]
    pub retry_delay: Duration,
}

impl Default for ConnectOptions {
    fn default() -> Self {
        Self::from(&ConnectionConfig::default())
    }
}

impl From<&ConnectionConfig> for ConnectOptions {
    fn from(config: &ConnectionConfig) -> Self {
        Self {
            timeout: config.timeout,
            retries: config.retries,
            retry_delay: config.retry_delay,
        }
    }
}

impl ConnectOptions {
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_retries(mut self, retries: u32) -> Self {
        self.retries = retries;
        self
    }

    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }
}

/// Outcome of `connect`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConnectionResult {
    pub success: bool,
    pub server_info: Option<ServerInfo>,
    pub error: Option<String>,
    /// Wall-clock time across all attempts and backoff pauses
    #[serde(serialize_with = "serialize_millis")]
    pub response_time: Duration,
    /// Attempts actually made; 0 when the endpoint was rejected up front
    pub attempts: u32,
}

impl ConnectionResult {
    fn succeeded(server_info: ServerInfo, response_time: Duration, attempts: u32) -> Self {
        Self {
            success: true,
            server_info: Some(server_info),
            error: None,
            response_time,
            attempts,
        }
    }

    fn failed(error: impl Into<String>, response_time: Duration, attempts: u32) -> Self {
        Self {
            success: false,
            server_info: None,
            error: Some(error.into()),
            response_time,
            attempts,
        }
    }
}

fn serialize_millis<S: serde::Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u64(millis(*duration))
}

/// Probing seam used by discovery and monitoring
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Prober: Send + Sync {
    /// Connect with retries and describe the server
    async fn connect(&self, url: &str, options: ConnectOptions) -> ConnectionResult;

    /// Single lightweight probe; never fails, unhealthy checks carry the error
    async fn health_check(&self, url: &str) -> HealthCheck;
}

/// Connection manager
pub struct ConnectionManager {
    config: ConnectionConfig,
    security: SecurityConfig,
    http: Arc<dyn ProbeTransport>,
    websocket: Arc<dyn ProbeTransport>,
}

impl ConnectionManager {
    /// Create a manager with the default HTTP and WebSocket transports
    pub fn new(config: ConnectionConfig, security: SecurityConfig) -> Result<Self, ConnectionError> {
        let http = Arc::new(HttpTransport::new(&config)?);
        Ok(Self::with_transports(
            config,
            security,
            http,
            Arc::new(WebSocketTransport::new()),
        ))
    }

    /// Create a manager from the full configuration
    pub fn from_config(config: &WatchConfig) -> Result<Self, ConnectionError> {
        Self::new(config.connection.clone(), config.security.clone())
    }

    /// Create a manager with explicit transports
    pub fn with_transports(
        config: ConnectionConfig,
        security: SecurityConfig,
        http: Arc<dyn ProbeTransport>,
        websocket: Arc<dyn ProbeTransport>,
    ) -> Self {
        Self {
            config,
            security,
            http,
            websocket,
        }
    }

    /// Options derived from the configuration
    pub fn default_options(&self) -> ConnectOptions {
        ConnectOptions::from(&self.config)
    }

    /// Parse the endpoint and apply the secure-scheme gate
    pub fn admit(&self, url: &str) -> Result<ServerEndpoint, ConnectionError> {
        let endpoint = ServerEndpoint::parse(url)?;
        if !endpoint.scheme().is_secure() && !self.security.is_insecure_url_allowed(url) {
            return Err(ConnectionError::security_policy(format!(
                "insecure protocol {}: is not allowed. Only HTTPS and WSS are allowed.",
                endpoint.scheme().as_str()
            ))
            .with_context(url));
        }
        Ok(endpoint)
    }

    fn transport_for(&self, endpoint: &ServerEndpoint) -> &dyn ProbeTransport {
        match endpoint.transport() {
            TransportKind::Http => self.http.as_ref(),
            TransportKind::WebSocket => self.websocket.as_ref(),
        }
    }

    /// Connect to `url`, retrying transient failures
    pub async fn connect(&self, url: &str, options: ConnectOptions) -> ConnectionResult {
        let started = Instant::now();

        if options.retries == 0 {
            let err = ConnectionError::config("retries must be at least 1").with_context(url);
            return ConnectionResult::failed(err.to_string(), started.elapsed(), 0);
        }

        let endpoint = match self.admit(url) {
            Ok(endpoint) => endpoint,
            Err(e) => {
                warn!(url = %url, error = %e, "endpoint rejected");
                return ConnectionResult::failed(e.to_string(), started.elapsed(), 0);
            }
        };
        let transport = self.transport_for(&endpoint);

        let mut attempts = 0;
        let mut last_error = None;
        while attempts < options.retries {
            attempts += 1;
            debug!(url = %url, attempt = attempts, "connection attempt");

            let outcome = transport.handshake(&endpoint, options.timeout).await;

            let err = match outcome {
                Ok(info) => {
                    let elapsed = started.elapsed();
                    debug!(url = %url, attempt = attempts, elapsed_ms = millis(elapsed), "connected");
                    return ConnectionResult::succeeded(info, elapsed, attempts);
                }
                Err(e) => e,
            };

            warn!(url = %url, attempt = attempts, error = %err, "connection attempt failed");
            let retryable = err.is_retryable();
            last_error = Some(err);

            if !retryable {
                break;
            }
            if attempts < options.retries {
                tokio::time::sleep(options.retry_delay * attempts).await;
            }
        }

        let message = last_error
            .map(|e| e.to_string())
            .unwrap_or_else(|| "Unknown error".to_string());
        ConnectionResult::failed(
            format!("Failed after {} attempts: {}", attempts, message),
            started.elapsed(),
            attempts,
        )
    }

    /// One immediate liveness probe with the short health-check timeout
    pub async fn health_check(&self, url: &str) -> HealthCheck {
        let started = Instant::now();
        let server_id = server_name_from_url(url);
        let timeout = self.config.health_check_timeout;

        let outcome = match self.admit(url) {
            Ok(endpoint) => tokio::time::timeout(timeout, self.transport_for(&endpoint).ping(&endpoint, timeout))
                .await
                .unwrap_or_else(|_| Err(ConnectionError::timeout(millis(timeout)))),
            Err(e) => Err(e),
        };

        let response_time = millis(started.elapsed());
        match outcome {
            Ok(()) => HealthCheck::healthy(server_id, response_time),
            Err(e) => {
                debug!(url = %url, error = %e, "health probe failed");
                HealthCheck::unhealthy(server_id, response_time, e.to_string())
            }
        }
    }
}

#[async_trait]
impl Prober for ConnectionManager {
    async fn connect(&self, url: &str, options: ConnectOptions) -> ConnectionResult {
        ConnectionManager::connect(self, url, options).await
    }

    async fn health_check(&self, url: &str) -> HealthCheck {
        ConnectionManager::health_check(self, url).await
    }
}
