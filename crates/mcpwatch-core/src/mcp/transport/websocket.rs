//! WebSocket transport
//!
//! Opens a socket, sends one JSON-RPC `initialize` request and waits for
//! the response carrying the same id, then closes the socket.

use super::{ProbeTransport, millis};
use crate::error::ConnectionError;
use crate::mcp::endpoint::ServerEndpoint;
use crate::mcp::protocol::{INITIALIZE_REQUEST_ID, McpRequest, McpResponse, RequestId, methods};
use crate::mcp::types::{InitializeParams, InitializeResult, ServerInfo};
use async_trait::async_trait;
use futures::{SinkExt, StreamExt};
use std::time::Duration;
use tokio_tungstenite::tungstenite::Message;
use tracing::debug;

use super::http::DEFAULT_SERVER_VERSION;

/// Name reported when the initialize response omits one
pub const DEFAULT_WEBSOCKET_SERVER_NAME: &str = "WebSocket MCP Server";

/// WebSocket transport
#[derive(Debug, Clone, Default)]
pub struct WebSocketTransport;

impl WebSocketTransport {
    pub fn new() -> Self {
        Self
    }

    async fn initialize(&self, endpoint: &ServerEndpoint) -> Result<InitializeResult, ConnectionError> {
        let (mut socket, _) = tokio_tungstenite::connect_async(endpoint.url().as_str())
            .await
            .map_err(|e| {
                ConnectionError::transport(format!("WebSocket connection error: {}", e))
                    .with_context(endpoint.to_string())
            })?;

        let request = McpRequest::new(INITIALIZE_REQUEST_ID, methods::INITIALIZE)
            .with_params(serde_json::to_value(InitializeParams::default()).map_err(|e| {
                ConnectionError::protocol(format!("Failed to encode initialize: {}", e))
            })?);
        let payload = serde_json::to_string(&request)
            .map_err(|e| ConnectionError::protocol(format!("Failed to encode initialize: {}", e)))?;

        socket
            .send(Message::Text(payload))
            .await
            .map_err(|e| ConnectionError::transport(format!("WebSocket send failed: {}", e)))?;

        let outcome = loop {
            let text = match socket.next().await {
                Some(Ok(Message::Text(text))) => text,
                Some(Ok(Message::Binary(bytes))) => match String::from_utf8(bytes) {
                    Ok(text) => text,
                    Err(_) => break Err(ConnectionError::protocol("Invalid WebSocket response")),
                },
                Some(Ok(Message::Close(_))) | None => {
                    break Err(ConnectionError::transport(
                        "WebSocket closed before initialize response",
                    ));
                }
                Some(Ok(_)) => continue,
                Some(Err(e)) => {
                    break Err(ConnectionError::transport(format!("WebSocket error: {}", e)));
                }
            };

            match parse_initialize_reply(&text) {
                Ok(Some(result)) => break Ok(result),
                Ok(None) => {
                    debug!(endpoint = %endpoint, "ignoring uncorrelated WebSocket message");
                    continue;
                }
                Err(e) => break Err(e),
            }
        };

        if let Err(e) = socket.close(None).await {
            debug!(endpoint = %endpoint, error = %e, "WebSocket close failed");
        }

        outcome
    }
}

#[async_trait]
impl ProbeTransport for WebSocketTransport {
    async fn handshake(
        &self,
        endpoint: &ServerEndpoint,
        timeout: Duration,
    ) -> Result<ServerInfo, ConnectionError> {
        let result = tokio::time::timeout(timeout, self.initialize(endpoint))
            .await
            .map_err(|_| ConnectionError::timeout(millis(timeout)).with_context("WebSocket connection timeout"))??;

        let server_info = result.server_info.unwrap_or_default();
        Ok(ServerInfo {
            id: format!("ws-{}", uuid::Uuid::new_v4()),
            name: server_info
                .name
                .unwrap_or_else(|| DEFAULT_WEBSOCKET_SERVER_NAME.to_string()),
            version: server_info
                .version
                .unwrap_or_else(|| DEFAULT_SERVER_VERSION.to_string()),
            capabilities: result.capabilities,
            tools: Vec::new(),
            resources: Vec::new(),
        })
    }

    async fn ping(
        &self,
        endpoint: &ServerEndpoint,
        timeout: Duration,
    ) -> Result<(), ConnectionError> {
        self.handshake(endpoint, timeout).await.map(|_| ())
    }
}

/// Interpret one text frame received while waiting for the initialize reply.
///
/// Returns `Ok(None)` for notifications, server requests and replies to other ids.
pub fn parse_initialize_reply(text: &str) -> Result<Option<InitializeResult>, ConnectionError> {
    let value: serde_json::Value = serde_json::from_str(text)
        .map_err(|_| ConnectionError::protocol("Invalid WebSocket response"))?;

    let Ok(response) = serde_json::from_value::<McpResponse>(value) else {
        return Ok(None);
    };
    if response.id != RequestId::Number(INITIALIZE_REQUEST_ID) || !response.is_reply() {
        return Ok(None);
    }

    let result = response
        .into_result()
        .map_err(|e| ConnectionError::protocol(format!("initialize rejected: {}", e)))?;
    serde_json::from_value(result)
        .map(Some)
        .map_err(|e| ConnectionError::protocol(format!("Malformed initialize result: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::StubWsServer;

    #[test]
    fn test_parse_reply_success() {
        let result = parse_initialize_reply(
            r#"{"jsonrpc":"2.0","id":1,"result":{"protocolVersion":"2024-11-05","capabilities":{"tools":{}},"serverInfo":{"name":"Serena","version":"0.3.0"}}}"#,
        )
        .unwrap()
        .unwrap();

        assert_eq!(result.server_info.unwrap().name.as_deref(), Some("Serena"));
        assert!(result.capabilities.tools.is_some());
    }

    #[test]
    fn test_parse_reply_ignores_notifications_and_other_ids() {
        assert!(
            parse_initialize_reply(r#"{"jsonrpc":"2.0","method":"notifications/message"}"#)
                .unwrap()
                .is_none()
        );
        assert!(
            parse_initialize_reply(r#"{"jsonrpc":"2.0","id":7,"result":{}}"#)
                .unwrap()
                .is_none()
        );
    }

    #[test]
    fn test_parse_reply_error_member_is_protocol_error() {
        let err = parse_initialize_reply(
            r#"{"jsonrpc":"2.0","id":1,"error":{"code":-32602,"message":"bad version"}}"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConnectionError::Protocol { .. }));
    }

    #[test]
    fn test_parse_reply_garbage_is_protocol_error() {
        let err = parse_initialize_reply("not json").unwrap_err();
        assert!(matches!(err, ConnectionError::Protocol { .. }));
    }

    #[tokio::test]
    async fn test_handshake_against_stub_server() {
        let server = StubWsServer::start(vec![
            r#"{"jsonrpc":"2.0","method":"notifications/message","params":{}}"#.to_string(),
            r#"{"jsonrpc":"2.0","id":1,"result":{"capabilities":{},"serverInfo":{"name":"Jules"}}}"#
                .to_string(),
        ])
        .await;

        let endpoint = ServerEndpoint::parse(&server.url()).unwrap();
        let info = WebSocketTransport::new()
            .handshake(&endpoint, Duration::from_secs(2))
            .await
            .unwrap();

        assert_eq!(info.name, "Jules");
        assert_eq!(info.version, "1.0.0");
        assert!(info.id.starts_with("ws-"));
        assert_eq!(server.received().await.len(), 1);
    }

    #[tokio::test]
    async fn test_handshake_times_out_without_reply() {
        let server = StubWsServer::start(Vec::new()).await;

        let endpoint = ServerEndpoint::parse(&server.url()).unwrap();
        let err = WebSocketTransport::new()
            .handshake(&endpoint, Duration::from_millis(200))
            .await
            .unwrap_err();

        assert!(matches!(err, ConnectionError::Timeout { .. }));
    }
}
