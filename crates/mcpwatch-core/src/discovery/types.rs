//! Discovery records

use crate::config::DiscoveryConfig;
use crate::health::HealthStatus;
use crate::mcp::ServerInfo;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Closed set of server categories, in classification priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ServerCategory {
    Documentation,
    CodeAnalysis,
    ProjectManagement,
    Filesystem,
    Database,
    Web,
    Ai,
    Other,
}

impl ServerCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Documentation => "documentation",
            Self::CodeAnalysis => "code-analysis",
            Self::ProjectManagement => "project-management",
            Self::Filesystem => "filesystem",
            Self::Database => "database",
            Self::Web => "web",
            Self::Ai => "ai",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for ServerCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Options for one discovery run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscoveryOptions {
    /// Per-candidate timeout
    #[serde(with = "humantime_serde")]
    pub timeout: Duration,
    /// Candidates probed at once
    pub concurrency: usize,
    pub include_loopback: bool,
    pub port_candidates: Vec<u16>,
}

impl Default for DiscoveryOptions {
    fn default() -> Self {
        Self::from(&DiscoveryConfig::default())
    }
}

impl From<&DiscoveryConfig> for DiscoveryOptions {
    fn from(config: &DiscoveryConfig) -> Self {
        Self {
            timeout: config.timeout,
            concurrency: config.concurrency,
            include_loopback: config.include_loopback,
            port_candidates: config.port_candidates.clone(),
        }
    }
}

/// A server that answered a discovery probe
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscoveredServer {
    pub url: String,
    pub server_info: ServerInfo,
    /// Milliseconds
    pub response_time: u64,
    pub discovered_at: DateTime<Utc>,
    pub category: ServerCategory,
}

/// Catalogue draft for a discovered server, ready for persistence
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogueEntry {
    pub id: String,
    pub name: String,
    pub description: String,
    pub version: String,
    pub url: String,
    pub category: ServerCategory,
    pub tags: Vec<String>,
    pub tools: Vec<String>,
    pub resources: Vec<String>,
    pub health_status: HealthStatus,
    pub verified: bool,
}

impl DiscoveredServer {
    pub fn to_catalogue_entry(&self) -> CatalogueEntry {
        let info = &self.server_info;
        CatalogueEntry {
            id: info.id.clone(),
            name: info.name.clone(),
            description: format!("Auto-discovered MCP server: {}", info.name),
            version: info.version.clone(),
            url: self.url.clone(),
            category: self.category,
            tags: vec![self.category.to_string(), "auto-discovered".to_string()],
            tools: info.tool_names(),
            resources: info.resource_names(),
            health_status: HealthStatus::Healthy,
            verified: false,
        }
    }
}

/// A candidate that did not answer
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FailedDiscovery {
    pub url: String,
    pub error: String,
    /// Milliseconds
    pub response_time: u64,
}

/// Report of one discovery run
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscoveryResult {
    pub discovered: Vec<DiscoveredServer>,
    pub failed: Vec<FailedDiscovery>,
    /// Wall-clock milliseconds for the whole run
    pub duration: u64,
    pub total_tested: usize,
}
