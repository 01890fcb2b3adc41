//! Windowed uptime/latency metrics and trend classification

use super::history::HealthHistory;
use super::types::{HealthCheck, HealthMetrics, MetricsPeriod, Trend};
use chrono::{DateTime, Utc};

/// Fewer samples than this always yield a stable trend
pub const MIN_TREND_SAMPLES: usize = 10;

/// Uptime change (absolute) needed to leave `stable`
pub const UPTIME_TREND_THRESHOLD: f64 = 0.10;

/// Response time change (relative) needed to leave `stable`
pub const PERFORMANCE_TREND_THRESHOLD: f64 = 0.20;

/// Metrics over the checks within `period` of `now`; `None` if there are none
pub fn calculate(
    server_id: &str,
    history: &HealthHistory,
    period: MetricsPeriod,
    now: DateTime<Utc>,
) -> Option<HealthMetrics> {
    let checks = history.since(now - period.duration());
    let last_check = checks.last()?.timestamp;

    let total = checks.len();
    let healthy = checks.iter().filter(|c| c.status.is_healthy()).count();
    let failed = total - healthy;

    let (uptime_trend, performance_trend) = trends(&checks);

    Some(HealthMetrics {
        server_id: server_id.to_string(),
        period,
        uptime: healthy as f64 / total as f64,
        avg_response_time: average_response_time(&checks).round() as u64,
        error_rate: failed as f64 / total as f64,
        total_checks: total,
        failed_checks: failed,
        last_check,
        uptime_trend,
        performance_trend,
    })
}

fn uptime(checks: &[&HealthCheck]) -> f64 {
    if checks.is_empty() {
        return 0.0;
    }
    checks.iter().filter(|c| c.status.is_healthy()).count() as f64 / checks.len() as f64
}

fn average_response_time(checks: &[&HealthCheck]) -> f64 {
    if checks.is_empty() {
        return 0.0;
    }
    checks.iter().map(|c| c.response_time as f64).sum::<f64>() / checks.len() as f64
}

/// Compare the two halves of the window, split at the midpoint index
fn trends(checks: &[&HealthCheck]) -> (Trend, Trend) {
    if checks.len() < MIN_TREND_SAMPLES {
        return (Trend::Stable, Trend::Stable);
    }

    let (first, second) = checks.split_at(checks.len() / 2);

    let uptime_delta = uptime(second) - uptime(first);
    let uptime_trend = if uptime_delta > UPTIME_TREND_THRESHOLD {
        Trend::Improving
    } else if uptime_delta < -UPTIME_TREND_THRESHOLD {
        Trend::Degrading
    } else {
        Trend::Stable
    };

    let first_avg = average_response_time(first);
    let second_avg = average_response_time(second);
    let performance_trend = if first_avg == 0.0 {
        if second_avg > 0.0 {
            Trend::Degrading
        } else {
            Trend::Stable
        }
    } else {
        let change = (second_avg - first_avg) / first_avg;
        if change > PERFORMANCE_TREND_THRESHOLD {
            Trend::Degrading
        } else if change < -PERFORMANCE_TREND_THRESHOLD {
            Trend::Improving
        } else {
            Trend::Stable
        }
    };

    (uptime_trend, performance_trend)
}
