//! mcpwatch core library
//!
//! Connectivity and health monitoring for MCP servers: a connection manager
//! with retry and a secure-scheme gate, a discovery service that probes
//! candidate endpoints with bounded concurrency, and a health monitor that
//! keeps per-server history, alerts and metrics.
//!
//! ## Example
//!
//! ```rust,ignore
//! use mcpwatch_core::{ConnectionManager, DiscoveryService, HealthMonitor, WatchConfig};
//! use std::sync::Arc;
//!
//! let config = WatchConfig::default();
//! let manager = Arc::new(ConnectionManager::from_config(&config)?);
//!
//! let discovery = DiscoveryService::new(manager.clone(), config.discovery.clone());
//! let report = discovery.discover_servers(discovery.default_options()).await?;
//!
//! let monitor = Arc::new(HealthMonitor::new(manager, config.monitor.clone()));
//! for server in &report.discovered {
//!     monitor.add_server(&server.server_info.id, &server.url, &server.server_info.name, true);
//! }
//! monitor.start(config.monitor.clone())?;
//! ```

pub mod config;
pub mod discovery;
pub mod error;
pub mod health;
pub mod mcp;
pub mod scheduler;

#[cfg(test)]
pub(crate) mod testing;

// Re-export commonly used types
pub use config::{WatchConfig, load_config};
pub use discovery::{
    DiscoveredServer, DiscoveryOptions, DiscoveryResult, DiscoveryService, ServerCategory,
};
pub use error::{
    ConfigError, ConnectionError, DiscoveryError, MonitorError, UnifiedError, WatchError,
    WatchResult,
};
pub use health::{
    HealthAlert, HealthCheck, HealthMetrics, HealthMonitor, HealthStatus, MetricsPeriod,
    MonitorOptions, MonitoredServer, MonitoringSummary,
};
pub use mcp::{ConnectOptions, ConnectionManager, ConnectionResult, Prober, ServerInfo};
pub use scheduler::TickerHandle;
