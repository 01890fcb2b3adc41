//! Probe transports
//!
//! ## Available Transports
//!
//! - **HTTP**: request/response probing of `https://` endpoints
//! - **WebSocket**: one-shot `initialize` exchange over `wss://` endpoints

pub mod http;
pub mod websocket;

pub use http::HttpTransport;
pub use websocket::WebSocketTransport;

use super::endpoint::ServerEndpoint;
use super::types::ServerInfo;
use crate::error::ConnectionError;
use async_trait::async_trait;
use std::time::Duration;

/// Transport used by the connection manager to talk to one endpoint
#[async_trait]
pub trait ProbeTransport: Send + Sync {
    /// Establish contact and describe the server
    ///
    /// Implementations enforce `timeout` themselves: it bounds the liveness
    /// step, while follow-up lookups may use their own shorter budgets.
    async fn handshake(
        &self,
        endpoint: &ServerEndpoint,
        timeout: Duration,
    ) -> Result<ServerInfo, ConnectionError>;

    /// Cheapest request that proves the server is alive
    async fn ping(&self, endpoint: &ServerEndpoint, timeout: Duration)
    -> Result<(), ConnectionError>;
}

/// Milliseconds in a duration, saturating
pub(crate) fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
