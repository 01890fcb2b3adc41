//! Per-server check history bounded by age

use super::types::HealthCheck;
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use std::collections::VecDeque;

/// Checks for one server, oldest first
#[derive(Debug, Clone, Default)]
pub struct HealthHistory {
    checks: VecDeque<HealthCheck>,
}

impl HealthHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.checks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.checks.is_empty()
    }

    pub fn latest(&self) -> Option<&HealthCheck> {
        self.checks.back()
    }

    /// Append a check, keeping the sequence ordered by timestamp
    pub fn push(&mut self, check: HealthCheck) {
        let position = self
            .checks
            .iter()
            .rposition(|c| c.timestamp <= check.timestamp)
            .map_or(0, |i| i + 1);
        self.checks.insert(position, check);
    }

    /// Drop every check older than `now - retention_days`; returns how many went
    pub fn prune(&mut self, retention_days: u32, now: DateTime<Utc>) -> usize {
        let cutoff = now - ChronoDuration::days(i64::from(retention_days));
        let before = self.checks.len();
        while self.checks.front().is_some_and(|c| c.timestamp < cutoff) {
            self.checks.pop_front();
        }
        before - self.checks.len()
    }

    pub fn push_and_prune(&mut self, check: HealthCheck, retention_days: u32) -> usize {
        self.push(check);
        self.prune(retention_days, Utc::now())
    }

    /// Most recent `limit` checks, newest first
    pub fn recent(&self, limit: Option<usize>) -> Vec<HealthCheck> {
        let limit = limit.unwrap_or(self.checks.len());
        self.checks.iter().rev().take(limit).cloned().collect()
    }

    /// The last `n` checks, oldest first
    pub fn tail(&self, n: usize) -> impl Iterator<Item = &HealthCheck> {
        self.checks.iter().skip(self.checks.len().saturating_sub(n))
    }

    /// Checks at or after `cutoff`, oldest first
    pub fn since(&self, cutoff: DateTime<Utc>) -> Vec<&HealthCheck> {
        self.checks.iter().filter(|c| c.timestamp >= cutoff).collect()
    }
}
