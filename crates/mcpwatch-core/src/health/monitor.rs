//! Health monitor
//!
//! Servers live in a concurrent map of per-server slots. Each slot has its
//! own lock and an in-flight flag, so checks of different servers never
//! contend and a tick skips a server whose previous check has not finished.

use super::alerts::{AlertBook, AlertEvent};
use super::history::HealthHistory;
use super::metrics;
use super::types::{
    AlertSeverity, HealthAlert, HealthCheck, HealthMetrics, HealthStatus, MetricsPeriod,
    MonitoredServer, MonitoringSummary, ServerReport,
};
use crate::config::MonitorConfig;
use crate::error::MonitorError;
use crate::mcp::Prober;
use crate::mcp::transport::millis;
use crate::scheduler::{TickerHandle, spawn_ticker};
use chrono::{Duration as ChronoDuration, Utc};
use dashmap::DashMap;
use futures::future::join_all;
use parking_lot::{Mutex, RwLock};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};
use tracing::{debug, error, info, warn};

/// Options accepted by [`HealthMonitor::start`]
pub type MonitorOptions = MonitorConfig;

/// Checks included in a [`ServerReport`]
pub const REPORT_RECENT_CHECKS: usize = 20;

/// Outcome of one scheduler tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickSummary {
    pub checked: usize,
    /// Enabled servers whose previous check was still running
    pub skipped: usize,
}

struct ServerState {
    server: MonitoredServer,
    history: HealthHistory,
    alerts: AlertBook,
}

struct ServerSlot {
    state: Mutex<ServerState>,
    in_flight: AtomicBool,
}

impl ServerSlot {
    fn new(server: MonitoredServer) -> Self {
        Self {
            state: Mutex::new(ServerState {
                server,
                history: HealthHistory::new(),
                alerts: AlertBook::new(),
            }),
            in_flight: AtomicBool::new(false),
        }
    }

    fn try_claim(&self) -> Option<InFlight<'_>> {
        if self.in_flight.swap(true, Ordering::AcqRel) {
            None
        } else {
            Some(InFlight(&self.in_flight))
        }
    }
}

/// Clears the in-flight flag when the check ends, however it ends
struct InFlight<'a>(&'a AtomicBool);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Continuous health monitor for registered servers
pub struct HealthMonitor {
    prober: Arc<dyn Prober>,
    servers: DashMap<String, Arc<ServerSlot>>,
    options: RwLock<MonitorOptions>,
    ticker: Mutex<Option<TickerHandle>>,
}

impl HealthMonitor {
    pub fn new(prober: Arc<dyn Prober>, options: MonitorOptions) -> Self {
        Self {
            prober,
            servers: DashMap::new(),
            options: RwLock::new(options),
            ticker: Mutex::new(None),
        }
    }

    pub fn options(&self) -> MonitorOptions {
        self.options.read().clone()
    }

    /// Register a server with empty history; replaces any previous registration
    pub fn add_server(&self, id: &str, url: &str, name: &str, enabled: bool) {
        let server = MonitoredServer::new(id, url, name, enabled);
        if self
            .servers
            .insert(id.to_string(), Arc::new(ServerSlot::new(server)))
            .is_some()
        {
            info!(server_id = %id, url = %url, "server re-registered, state reset");
        } else {
            info!(server_id = %id, url = %url, enabled, "server registered");
        }
    }

    /// Discard a server with its history and alerts
    pub fn remove_server(&self, id: &str) -> bool {
        let removed = self.servers.remove(id).is_some();
        if removed {
            info!(server_id = %id, "server removed");
        }
        removed
    }

    /// Start the global scheduler; a no-op if it is already running
    pub fn start(self: &Arc<Self>, options: MonitorOptions) -> Result<(), MonitorError> {
        validate(&options)?;

        let mut ticker = self.ticker.lock();
        if ticker.as_ref().is_some_and(|t| !t.is_stopped()) {
            info!("health monitor already running");
            return Ok(());
        }

        let interval = options.interval;
        *self.options.write() = options;

        let monitor: Weak<Self> = Arc::downgrade(self);
        *ticker = Some(spawn_ticker(interval, move || {
            let monitor = monitor.clone();
            async move {
                if let Some(monitor) = monitor.upgrade() {
                    tokio::spawn(async move {
                        monitor.run_tick().await;
                    });
                }
            }
        }));

        info!(
            interval_secs = interval.as_secs(),
            servers = self.servers.len(),
            "health monitor started"
        );
        Ok(())
    }

    /// Enable one server for future ticks
    pub fn start_server(&self, id: &str) -> Result<(), MonitorError> {
        self.set_enabled(id, true)
    }

    /// Stop the global scheduler; checks already running still get recorded
    pub fn stop(&self) {
        if let Some(ticker) = self.ticker.lock().take() {
            ticker.stop();
            info!("health monitor stopped");
        }
    }

    /// Exclude one server from future ticks
    pub fn stop_server(&self, id: &str) -> Result<(), MonitorError> {
        self.set_enabled(id, false)
    }

    fn set_enabled(&self, id: &str, enabled: bool) -> Result<(), MonitorError> {
        let slot = self.slot(id)?;
        slot.state.lock().server.enabled = enabled;
        debug!(server_id = %id, enabled, "server monitoring toggled");
        Ok(())
    }

    pub fn is_running(&self) -> bool {
        self.ticker.lock().as_ref().is_some_and(|t| !t.is_stopped())
    }

    fn slot(&self, id: &str) -> Result<Arc<ServerSlot>, MonitorError> {
        self.servers
            .get(id)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or_else(|| MonitorError::unknown_server(id))
    }

    /// Check every enabled server in parallel and wait for all of them
    pub async fn run_tick(&self) -> TickSummary {
        let slots: Vec<(String, Arc<ServerSlot>)> = self
            .servers
            .iter()
            .map(|entry| (entry.key().clone(), Arc::clone(entry.value())))
            .collect();

        let mut summary = TickSummary::default();
        let mut checks = Vec::new();
        for (id, slot) in &slots {
            let url = {
                let state = slot.state.lock();
                if !state.server.enabled {
                    continue;
                }
                state.server.url.clone()
            };

            let Some(claim) = slot.try_claim() else {
                debug!(server_id = %id, "previous check still running, skipping");
                summary.skipped += 1;
                continue;
            };

            summary.checked += 1;
            checks.push(async move {
                let _claim = claim;
                let check = self.probe(&url).await;
                self.apply(id, slot, check);
            });
        }

        join_all(checks).await;
        debug!(checked = summary.checked, skipped = summary.skipped, "tick finished");
        summary
    }

    /// Run one check right away, enabled or not
    pub async fn check_now(&self, id: &str) -> Result<HealthCheck, MonitorError> {
        let slot = self.slot(id)?;
        let url = slot.state.lock().server.url.clone();
        let check = self.probe(&url).await;
        Ok(self.apply(id, &slot, check))
    }

    /// Record an externally produced check through the same pipeline as
    /// scheduled checks
    pub fn record_check(&self, id: &str, check: HealthCheck) -> Result<HealthCheck, MonitorError> {
        let slot = self.slot(id)?;
        Ok(self.apply(id, &slot, check))
    }

    async fn probe(&self, url: &str) -> HealthCheck {
        let timeout = self.options.read().timeout;
        match tokio::time::timeout(timeout, self.prober.health_check(url)).await {
            Ok(check) => check,
            Err(_) => HealthCheck::unhealthy(
                url,
                millis(timeout),
                format!("Health check timeout after {}ms", millis(timeout)),
            ),
        }
    }

    fn apply(&self, id: &str, slot: &ServerSlot, mut check: HealthCheck) -> HealthCheck {
        let (retention_days, thresholds) = {
            let options = self.options.read();
            (options.retention_days, options.alert_thresholds)
        };
        check.server_id = id.to_string();
        let now = Utc::now();

        let events = {
            let mut state = slot.state.lock();
            let ServerState {
                server,
                history,
                alerts,
            } = &mut *state;

            let is_latest = history
                .latest()
                .is_none_or(|latest| latest.timestamp <= check.timestamp);

            history.push(check.clone());
            let pruned = history.prune(retention_days, now);
            if pruned > 0 {
                debug!(server_id = %id, pruned, "pruned expired checks");
            }
            alerts.prune_resolved(now - ChronoDuration::days(i64::from(retention_days)));

            if is_latest {
                server.status = check.status;
                server.last_check = Some(check.timestamp);
                alerts.evaluate(&check, history, thresholds)
            } else {
                debug!(server_id = %id, "older check added to history, status unchanged");
                Vec::new()
            }
        };

        debug!(
            server_id = %id,
            status = %check.status,
            response_time_ms = check.response_time,
            "check recorded"
        );
        for event in events {
            log_alert_event(&event);
        }
        check
    }

    /// Metrics for one server; `None` if unknown or without checks in the window
    pub fn calculate_metrics(&self, id: &str, period: MetricsPeriod) -> Option<HealthMetrics> {
        let slot = self.slot(id).ok()?;
        let state = slot.state.lock();
        metrics::calculate(id, &state.history, period, Utc::now())
    }

    /// Unresolved alerts of all servers, newest first
    pub fn active_alerts(&self) -> Vec<HealthAlert> {
        let mut alerts: Vec<HealthAlert> = self
            .servers
            .iter()
            .flat_map(|entry| {
                let state = entry.value().state.lock();
                state.alerts.open().cloned().collect::<Vec<_>>()
            })
            .collect();
        alerts.sort_by(|a, b| b.triggered_at.cmp(&a.triggered_at));
        alerts
    }

    /// Recorded checks, newest first
    pub fn health_history(&self, id: &str, limit: Option<usize>) -> Vec<HealthCheck> {
        match self.slot(id) {
            Ok(slot) => {
                let state = slot.state.lock();
                state.history.recent(limit)
            }
            Err(_) => Vec::new(),
        }
    }

    pub fn server_status(&self, id: &str) -> Option<MonitoredServer> {
        let slot = self.slot(id).ok()?;
        let server = slot.state.lock().server.clone();
        Some(server)
    }

    /// All registered servers, ordered by id
    pub fn servers(&self) -> Vec<MonitoredServer> {
        let mut servers: Vec<MonitoredServer> = self
            .servers
            .iter()
            .map(|entry| entry.value().state.lock().server.clone())
            .collect();
        servers.sort_by(|a, b| a.id.cmp(&b.id));
        servers
    }

    pub fn monitoring_summary(&self) -> MonitoringSummary {
        let mut summary = MonitoringSummary::default();
        for entry in self.servers.iter() {
            let state = entry.value().state.lock();
            summary.total_servers += 1;
            if state.server.enabled {
                summary.active_servers += 1;
            }
            match state.server.status {
                HealthStatus::Healthy => summary.healthy_servers += 1,
                HealthStatus::Degraded => summary.degraded_servers += 1,
                HealthStatus::Unhealthy => summary.unhealthy_servers += 1,
                HealthStatus::Unknown => summary.unknown_servers += 1,
            }
            for alert in state.alerts.open() {
                summary.total_alerts += 1;
                if alert.severity == AlertSeverity::Critical {
                    summary.critical_alerts += 1;
                }
            }
        }
        summary
    }

    /// Server record, recent checks, metrics and every alert (newest first)
    pub fn server_report(&self, id: &str, period: MetricsPeriod) -> Option<ServerReport> {
        let slot = self.slot(id).ok()?;
        let state = slot.state.lock();

        let mut alerts = state.alerts.all().to_vec();
        alerts.sort_by(|a, b| b.triggered_at.cmp(&a.triggered_at));

        let report = ServerReport {
            server: state.server.clone(),
            recent_checks: state.history.recent(Some(REPORT_RECENT_CHECKS)),
            metrics: metrics::calculate(id, &state.history, period, Utc::now()),
            alerts,
        };
        Some(report)
    }
}

impl Drop for HealthMonitor {
    fn drop(&mut self) {
        if let Some(ticker) = self.ticker.get_mut().take() {
            ticker.stop();
        }
    }
}

fn validate(options: &MonitorOptions) -> Result<(), MonitorError> {
    if options.interval.is_zero() {
        return Err(MonitorError::invalid_config("interval must be greater than zero"));
    }
    if options.timeout.is_zero() {
        return Err(MonitorError::invalid_config("timeout must be greater than zero"));
    }
    if options.retention_days == 0 {
        return Err(MonitorError::invalid_config("retention_days must be at least 1"));
    }
    if options.alert_thresholds.consecutive_failures == 0 {
        return Err(MonitorError::invalid_config(
            "alert_thresholds.consecutive_failures must be at least 1",
        ));
    }
    Ok(())
}

fn log_alert_event(event: &AlertEvent) {
    match event {
        AlertEvent::Opened(alert) if alert.severity == AlertSeverity::Critical => error!(
            server_id = %alert.server_id,
            alert_type = %alert.alert_type,
            alert_id = %alert.id,
            "{}",
            alert.message
        ),
        AlertEvent::Opened(alert) => warn!(
            server_id = %alert.server_id,
            alert_type = %alert.alert_type,
            alert_id = %alert.id,
            "{}",
            alert.message
        ),
        AlertEvent::Resolved(alert) => info!(
            server_id = %alert.server_id,
            alert_type = %alert.alert_type,
            alert_id = %alert.id,
            "alert resolved"
        ),
    }
}
