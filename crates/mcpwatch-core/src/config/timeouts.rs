//! Centralized timeout configuration
//!
//! Default timing values for connection, discovery and monitoring.
//! All of them can be overridden via configuration.

use std::time::Duration;

/// Defaults for single-endpoint connections
pub mod connection {
    use super::*;

    /// Per-attempt timeout for `connect` (30 seconds)
    pub const ATTEMPT_MILLIS: u64 = 30_000;

    /// Base delay between connection attempts (1 second)
    pub const RETRY_DELAY_MILLIS: u64 = 1_000;

    /// Timeout for the lightweight health probe (5 seconds)
    pub const HEALTH_CHECK_MILLIS: u64 = 5_000;

    /// Number of connection attempts
    pub const RETRIES: u32 = 3;

    pub fn attempt_timeout() -> Duration {
        Duration::from_millis(ATTEMPT_MILLIS)
    }

    pub fn retry_delay() -> Duration {
        Duration::from_millis(RETRY_DELAY_MILLIS)
    }

    pub fn health_check_timeout() -> Duration {
        Duration::from_millis(HEALTH_CHECK_MILLIS)
    }
}

/// Defaults for discovery scans
pub mod discovery {
    use super::*;

    /// Per-candidate probe timeout (10 seconds)
    pub const PROBE_MILLIS: u64 = 10_000;

    /// Pause between probe chunks (100 milliseconds)
    pub const CHUNK_DELAY_MILLIS: u64 = 100;

    /// Probes in flight at once
    pub const CONCURRENCY: usize = 3;

    pub fn probe_timeout() -> Duration {
        Duration::from_millis(PROBE_MILLIS)
    }

    pub fn chunk_delay() -> Duration {
        Duration::from_millis(CHUNK_DELAY_MILLIS)
    }
}

/// Defaults for the health monitor
pub mod monitor {
    use super::*;

    /// Scheduler interval (5 minutes)
    pub const INTERVAL_SECS: u64 = 300;

    /// Upper bound for one server check (10 seconds)
    pub const CHECK_MILLIS: u64 = 10_000;

    /// Days of history kept per server
    pub const RETENTION_DAYS: u32 = 30;

    /// Response time that raises an alert (5 seconds)
    pub const RESPONSE_TIME_ALERT_MILLIS: u64 = 5_000;

    /// Failed checks in a row that raise an alert
    pub const CONSECUTIVE_FAILURES: usize = 3;

    pub fn interval() -> Duration {
        Duration::from_secs(INTERVAL_SECS)
    }

    pub fn check_timeout() -> Duration {
        Duration::from_millis(CHECK_MILLIS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        assert_eq!(connection::attempt_timeout(), Duration::from_secs(30));
        assert_eq!(connection::health_check_timeout(), Duration::from_secs(5));
        assert_eq!(discovery::chunk_delay(), Duration::from_millis(100));
        assert_eq!(monitor::interval(), Duration::from_secs(300));
    }
}
