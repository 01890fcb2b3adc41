//! HTTP transport
//!
//! Liveness is `GET <url>/health`; server info is read from the first
//! well-known info path that answers with a JSON document.

use super::{ProbeTransport, millis};
use crate::config::ConnectionConfig;
use crate::error::ConnectionError;
use crate::mcp::endpoint::ServerEndpoint;
use crate::mcp::types::{InfoDocument, McpCapabilities, ServerInfo};
use async_trait::async_trait;
use reqwest::{Client, Response};
use std::time::Duration;
use tracing::debug;

/// Paths tried in order when looking for a server info document
pub const INFO_PATHS: [&str; 4] = ["/info", "/server-info", "/mcp/info", "/"];

/// Liveness path
pub const HEALTH_PATH: &str = "/health";

/// Version reported when a server does not declare one
pub const DEFAULT_SERVER_VERSION: &str = "1.0.0";

/// HTTP transport backed by a shared reqwest client
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Create a new HTTP transport
    pub fn new(config: &ConnectionConfig) -> Result<Self, ConnectionError> {
        let mut header_map = reqwest::header::HeaderMap::new();
        header_map.insert(
            reqwest::header::ACCEPT,
            reqwest::header::HeaderValue::from_static("application/json"),
        );

        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .default_headers(header_map)
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .build()
            .map_err(|e| ConnectionError::config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client })
    }

    async fn get(&self, url: &str, timeout: Duration) -> Result<Response, ConnectionError> {
        let response = self
            .client
            .get(url)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| ConnectionError::from_reqwest(&e, millis(timeout)).with_context(url))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ConnectionError::http(
                status.as_u16(),
                status.canonical_reason().unwrap_or("error"),
            )
            .with_context(url));
        }

        Ok(response)
    }

    /// Read server info from the first info path that answers,
    /// falling back to a minimal description of the endpoint
    async fn discover_server_info(&self, endpoint: &ServerEndpoint, timeout: Duration) -> ServerInfo {
        let per_path = timeout / INFO_PATHS.len() as u32;

        for path in INFO_PATHS {
            let url = endpoint.join(path);
            let document = match self.get(&url, per_path).await {
                Ok(response) => response.json::<InfoDocument>().await,
                Err(e) => {
                    debug!(url = %url, error = %e, "info path unavailable");
                    continue;
                }
            };

            match document {
                Ok(document) => return server_info_from_document(endpoint, document),
                Err(e) => debug!(url = %url, error = %e, "info path returned no usable document"),
            }
        }

        fallback_server_info(endpoint)
    }
}

#[async_trait]
impl ProbeTransport for HttpTransport {
    async fn handshake(
        &self,
        endpoint: &ServerEndpoint,
        timeout: Duration,
    ) -> Result<ServerInfo, ConnectionError> {
        self.get(&endpoint.join(HEALTH_PATH), timeout).await?;
        Ok(self.discover_server_info(endpoint, timeout).await)
    }

    async fn ping(
        &self,
        endpoint: &ServerEndpoint,
        timeout: Duration,
    ) -> Result<(), ConnectionError> {
        self.get(&endpoint.join(HEALTH_PATH), timeout).await.map(|_| ())
    }
}

/// Build server info from an info document, filling the gaps from the endpoint
pub fn server_info_from_document(endpoint: &ServerEndpoint, document: InfoDocument) -> ServerInfo {
    ServerInfo {
        id: document
            .id
            .unwrap_or_else(|| format!("http-{}", uuid::Uuid::new_v4())),
        name: document.name.unwrap_or_else(|| endpoint.fallback_name()),
        version: document
            .version
            .unwrap_or_else(|| DEFAULT_SERVER_VERSION.to_string()),
        capabilities: document.capabilities.unwrap_or_default(),
        tools: document.tools.into_iter().map(Into::into).collect(),
        resources: document.resources.into_iter().map(Into::into).collect(),
    }
}

/// Minimal server info derived from the endpoint alone
pub fn fallback_server_info(endpoint: &ServerEndpoint) -> ServerInfo {
    ServerInfo {
        id: format!("http-{}", uuid::Uuid::new_v4()),
        name: endpoint.fallback_name(),
        version: DEFAULT_SERVER_VERSION.to_string(),
        capabilities: McpCapabilities::default(),
        tools: Vec::new(),
        resources: Vec::new(),
    }
}
