//! Discovery service

use super::candidates::build_candidates;
use super::classifier::classify;
use super::types::{DiscoveredServer, DiscoveryOptions, DiscoveryResult, FailedDiscovery};
use crate::config::DiscoveryConfig;
use crate::error::DiscoveryError;
use crate::mcp::transport::millis;
use crate::mcp::{ConnectOptions, Prober};
use crate::scheduler::{TickerHandle, spawn_ticker};
use chrono::Utc;
use futures::future::join_all;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, info, warn};

enum ProbeOutcome {
    Discovered(DiscoveredServer),
    Failed(FailedDiscovery),
}

/// Finds MCP servers by probing candidate endpoints
pub struct DiscoveryService {
    prober: Arc<dyn Prober>,
    config: DiscoveryConfig,
}

impl DiscoveryService {
    pub fn new(prober: Arc<dyn Prober>, config: DiscoveryConfig) -> Self {
        Self { prober, config }
    }

    pub fn config(&self) -> &DiscoveryConfig {
        &self.config
    }

    /// Options derived from the configuration
    pub fn default_options(&self) -> DiscoveryOptions {
        DiscoveryOptions::from(&self.config)
    }

    /// Candidate URLs a run with `options` would probe, in order
    pub fn candidates(&self, options: &DiscoveryOptions) -> Vec<String> {
        build_candidates(&self.config.known_endpoints, options)
    }

    /// Probe every candidate, `options.concurrency` at a time
    ///
    /// Individual probe failures land in `failed`; only unusable options are errors.
    pub async fn discover_servers(
        &self,
        options: DiscoveryOptions,
    ) -> Result<DiscoveryResult, DiscoveryError> {
        validate(&options)?;

        let started = Instant::now();
        let candidates = self.candidates(&options);
        info!(
            candidates = candidates.len(),
            concurrency = options.concurrency,
            "starting MCP server discovery"
        );

        let connect_options = ConnectOptions {
            timeout: options.timeout,
            retries: 1,
            retry_delay: Duration::ZERO,
        };

        let mut result = DiscoveryResult {
            total_tested: candidates.len(),
            ..Default::default()
        };

        for (index, chunk) in candidates.chunks(options.concurrency).enumerate() {
            if index > 0 && !self.config.chunk_delay.is_zero() {
                tokio::time::sleep(self.config.chunk_delay).await;
            }

            let outcomes = join_all(chunk.iter().map(|url| self.probe(url, connect_options))).await;
            for outcome in outcomes {
                match outcome {
                    ProbeOutcome::Discovered(server) => result.discovered.push(server),
                    ProbeOutcome::Failed(failure) => result.failed.push(failure),
                }
            }
        }

        result.duration = millis(started.elapsed());
        info!(
            discovered = result.discovered.len(),
            failed = result.failed.len(),
            elapsed_ms = result.duration,
            "discovery finished"
        );
        Ok(result)
    }

    async fn probe(&self, url: &str, options: ConnectOptions) -> ProbeOutcome {
        let outcome = self.prober.connect(url, options).await;
        let response_time = millis(outcome.response_time);

        match outcome.server_info {
            Some(server_info) if outcome.success => {
                let category = classify(&server_info);
                debug!(url = %url, name = %server_info.name, category = %category, "server discovered");
                ProbeOutcome::Discovered(DiscoveredServer {
                    url: url.to_string(),
                    server_info,
                    response_time,
                    discovered_at: Utc::now(),
                    category,
                })
            }
            _ => {
                let error = outcome
                    .error
                    .unwrap_or_else(|| "Unknown error".to_string());
                debug!(url = %url, error = %error, "no server at candidate");
                ProbeOutcome::Failed(FailedDiscovery {
                    url: url.to_string(),
                    error,
                    response_time,
                })
            }
        }
    }

    /// Run discovery every `interval`, passing each report that found at
    /// least one server to `sink`. Scan errors are logged and skipped.
    pub fn start_continuous<F>(
        self: &Arc<Self>,
        interval: Duration,
        options: DiscoveryOptions,
        sink: F,
    ) -> Result<TickerHandle, DiscoveryError>
    where
        F: Fn(DiscoveryResult) + Send + Sync + 'static,
    {
        if interval.is_zero() {
            return Err(DiscoveryError::invalid_options(
                "interval must be greater than zero",
            ));
        }
        validate(&options)?;

        let service = Arc::clone(self);
        let sink = Arc::new(sink);
        info!(interval_secs = interval.as_secs(), "continuous discovery started");

        Ok(spawn_ticker(interval, move || {
            let service = Arc::clone(&service);
            let sink = Arc::clone(&sink);
            let options = options.clone();
            async move {
                match service.discover_servers(options).await {
                    Ok(result) if !result.discovered.is_empty() => sink(result),
                    Ok(_) => debug!("continuous discovery found no servers"),
                    Err(e) => warn!(error = %e, "continuous discovery failed"),
                }
            }
        }))
    }
}

fn validate(options: &DiscoveryOptions) -> Result<(), DiscoveryError> {
    if options.concurrency == 0 {
        return Err(DiscoveryError::invalid_options(
            "concurrency must be at least 1",
        ));
    }
    if options.timeout.is_zero() {
        return Err(DiscoveryError::invalid_options(
            "timeout must be greater than zero",
        ));
    }
    Ok(())
}
