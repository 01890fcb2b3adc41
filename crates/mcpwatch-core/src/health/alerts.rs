//! Alert evaluation
//!
//! At most one unresolved alert per (server, type) exists at any time.
//! Evaluating the same state twice is a no-op the second time.

use super::history::HealthHistory;
use super::types::{AlertSeverity, AlertType, HealthAlert, HealthCheck};
use crate::config::AlertThresholds;
use chrono::{DateTime, Utc};

/// Change produced by one evaluation
#[derive(Debug, Clone, PartialEq)]
pub enum AlertEvent {
    Opened(HealthAlert),
    Resolved(HealthAlert),
}

/// Alerts of one server, open and resolved
#[derive(Debug, Clone, Default)]
pub struct AlertBook {
    alerts: Vec<HealthAlert>,
}

impl AlertBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn all(&self) -> &[HealthAlert] {
        &self.alerts
    }

    pub fn open(&self) -> impl Iterator<Item = &HealthAlert> {
        self.alerts.iter().filter(|a| !a.resolved)
    }

    pub fn is_open(&self, alert_type: AlertType) -> bool {
        self.open().any(|a| a.alert_type == alert_type)
    }

    fn raise(&mut self, alert: HealthAlert) -> Option<AlertEvent> {
        if self.is_open(alert.alert_type) {
            return None;
        }
        self.alerts.push(alert.clone());
        Some(AlertEvent::Opened(alert))
    }

    fn resolve(&mut self, alert_type: AlertType, at: DateTime<Utc>) -> Option<AlertEvent> {
        let alert = self
            .alerts
            .iter_mut()
            .find(|a| !a.resolved && a.alert_type == alert_type)?;
        alert.resolve(at);
        Some(AlertEvent::Resolved(alert.clone()))
    }

    /// Forget resolved alerts that closed before `cutoff`
    pub fn prune_resolved(&mut self, cutoff: DateTime<Utc>) {
        self.alerts
            .retain(|a| !a.resolved || a.resolved_at.is_none_or(|at| at >= cutoff));
    }

    /// Apply both threshold rules for `check`, the latest entry of `history`.
    /// Alerts open and resolve at the check's timestamp.
    pub fn evaluate(
        &mut self,
        check: &HealthCheck,
        history: &HealthHistory,
        thresholds: AlertThresholds,
    ) -> Vec<AlertEvent> {
        let mut events = Vec::new();
        let server_id = check.server_id.as_str();

        if check.response_time > thresholds.response_time_ms {
            let severity = if check.response_time > thresholds.response_time_ms.saturating_mul(2) {
                AlertSeverity::Critical
            } else {
                AlertSeverity::Warning
            };
            let message = format!(
                "High response time: {}ms (threshold: {}ms)",
                check.response_time, thresholds.response_time_ms
            );
            events.extend(self.raise(HealthAlert::open(
                server_id,
                AlertType::ResponseTime,
                severity,
                message,
                check.timestamp,
            )));
        } else {
            events.extend(self.resolve(AlertType::ResponseTime, check.timestamp));
        }

        let window = thresholds.consecutive_failures;
        let failing = window > 0
            && history.len() >= window
            && history.tail(window).all(|c| !c.status.is_healthy());
        if failing {
            events.extend(self.raise(HealthAlert::open(
                server_id,
                AlertType::ConsecutiveFailures,
                AlertSeverity::Critical,
                format!("{} consecutive failures detected", window),
                check.timestamp,
            )));
        } else if check.status.is_healthy() {
            events.extend(self.resolve(AlertType::ConsecutiveFailures, check.timestamp));
        }

        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::health::types::HealthStatus;

    fn thresholds() -> AlertThresholds {
        AlertThresholds {
            response_time_ms: 5000,
            consecutive_failures: 3,
        }
    }

    fn record(history: &mut HealthHistory, check: HealthCheck) -> HealthCheck {
        history.push(check.clone());
        check
    }

    #[test]
    fn test_consecutive_failures_alert_is_idempotent() {
        let mut history = HealthHistory::new();
        let mut book = AlertBook::new();

        let mut last = None;
        for _ in 0..3 {
            last = Some(record(&mut history, HealthCheck::unhealthy("s", 100, "refused")));
        }
        let last = last.unwrap();

        let first = book.evaluate(&last, &history, thresholds());
        let second = book.evaluate(&last, &history, thresholds());

        assert_eq!(first.len(), 1);
        assert!(second.is_empty());
        let open: Vec<_> = book.open().collect();
        assert_eq!(open.len(), 1);
        assert_eq!(open[0].alert_type, AlertType::ConsecutiveFailures);
        assert_eq!(open[0].severity, AlertSeverity::Critical);
        assert_eq!(open[0].message, "3 consecutive failures detected");
    }

    #[test]
    fn test_fewer_failures_than_threshold_do_not_alert() {
        let mut history = HealthHistory::new();
        let mut book = AlertBook::new();
        record(&mut history, HealthCheck::healthy("s", 100));
        record(&mut history, HealthCheck::unhealthy("s", 100, "x"));
        let last = record(
            &mut history,
            HealthCheck::new("s", HealthStatus::Degraded, 100),
        );

        assert!(book.evaluate(&last, &history, thresholds()).is_empty());
    }

    #[test]
    fn test_degraded_counts_as_failure() {
        let mut history = HealthHistory::new();
        let mut book = AlertBook::new();
        let mut last = None;
        for _ in 0..3 {
            last = Some(record(
                &mut history,
                HealthCheck::new("s", HealthStatus::Degraded, 100),
            ));
        }

        let events = book.evaluate(&last.unwrap(), &history, thresholds());
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn test_response_time_alert_resolves() {
        let mut history = HealthHistory::new();
        let mut book = AlertBook::new();

        let slow = record(&mut history, HealthCheck::healthy("s", 7000));
        let events = book.evaluate(&slow, &history, thresholds());
        match &events[..] {
            [AlertEvent::Opened(alert)] => {
                assert_eq!(alert.severity, AlertSeverity::Warning);
                assert_eq!(alert.message, "High response time: 7000ms (threshold: 5000ms)");
                assert!(alert.id.starts_with("s-rt-"));
            }
            other => panic!("unexpected events: {:?}", other),
        }

        let fast = record(&mut history, HealthCheck::healthy("s", 200));
        let events = book.evaluate(&fast, &history, thresholds());
        assert!(matches!(&events[..], [AlertEvent::Resolved(_)]));

        let alert = &book.all()[0];
        assert!(alert.resolved);
        assert_eq!(alert.triggered_at, slow.timestamp);
        assert_eq!(alert.resolved_at, Some(fast.timestamp));
        assert_eq!(book.open().count(), 0);
    }

    #[test]
    fn test_response_time_over_double_threshold_is_critical() {
        let mut history = HealthHistory::new();
        let mut book = AlertBook::new();
        let slow = record(&mut history, HealthCheck::healthy("s", 10_001));

        book.evaluate(&slow, &history, thresholds());
        assert_eq!(book.all()[0].severity, AlertSeverity::Critical);
    }

    #[test]
    fn test_healthy_check_resolves_failure_alert() {
        let mut history = HealthHistory::new();
        let mut book = AlertBook::new();
        let mut last = None;
        for _ in 0..3 {
            last = Some(record(&mut history, HealthCheck::unhealthy("s", 10, "x")));
        }
        book.evaluate(&last.unwrap(), &history, thresholds());

        let ok = record(&mut history, HealthCheck::healthy("s", 10));
        let events = book.evaluate(&ok, &history, thresholds());

        assert_eq!(events.len(), 1);
        assert_eq!(book.open().count(), 0);
        assert!(!book.is_open(AlertType::ConsecutiveFailures));
    }

    #[test]
    fn test_new_alert_after_resolution() {
        let mut history = HealthHistory::new();
        let mut book = AlertBook::new();

        let slow = record(&mut history, HealthCheck::healthy("s", 6000));
        book.evaluate(&slow, &history, thresholds());
        let fast = record(&mut history, HealthCheck::healthy("s", 10));
        book.evaluate(&fast, &history, thresholds());
        let slow = record(&mut history, HealthCheck::healthy("s", 6000));
        book.evaluate(&slow, &history, thresholds());

        assert_eq!(book.all().len(), 2);
        assert_eq!(book.open().count(), 1);
    }
}
