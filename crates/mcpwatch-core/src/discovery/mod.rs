//! MCP server discovery
//!
//! Probes a candidate address space with bounded concurrency and classifies
//! every server that answers.

mod candidates;
mod classifier;
mod service;
mod types;

pub use candidates::{LOOPBACK_IP_PORTS, build_candidates};
pub use classifier::{CATEGORY_KEYWORDS, CategoryKeywords, classify};
pub use service::DiscoveryService;
pub use types::{
    CatalogueEntry, DiscoveredServer, DiscoveryOptions, DiscoveryResult, FailedDiscovery,
    ServerCategory,
};
