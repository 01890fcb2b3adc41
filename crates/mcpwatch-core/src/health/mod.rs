//! Health monitoring
//!
//! Scheduled checks of registered servers, bounded per-server history,
//! deduplicated alerts and windowed metrics.

pub mod alerts;
pub mod history;
pub mod metrics;
pub mod monitor;
pub mod types;


pub use alerts::{AlertBook, AlertEvent};
pub use history::HealthHistory;
pub use monitor::{HealthMonitor, MonitorOptions, REPORT_RECENT_CHECKS, TickSummary};
pub use types::{
    AlertSeverity, AlertType, HealthAlert, HealthCheck, HealthCheckDetails, HealthMetrics,
    HealthStatus, MetricsPeriod, MonitoredServer, MonitoringSummary, ServerReport, Trend,
};
