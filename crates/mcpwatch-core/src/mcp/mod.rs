//! MCP connectivity
//!
//! Endpoint parsing, the JSON-RPC subset used by the handshake, the
//! HTTP/WebSocket probe transports and the connection manager built on them.

pub mod connection;
pub mod endpoint;
pub mod protocol;
pub mod transport;
pub mod types;

pub use connection::{ConnectOptions, ConnectionManager, ConnectionResult, Prober};
pub use endpoint::{Scheme, ServerEndpoint, TransportKind, server_name_from_url};
pub use protocol::{MCP_PROTOCOL_VERSION, McpRequest, McpResponse, McpRpcError, RequestId};
pub use transport::{HttpTransport, ProbeTransport, WebSocketTransport};
pub use types::{
    InfoDocument, McpCapabilities, McpResource, McpTool, PromptCapabilities,
    ResourceCapabilities, ServerInfo, ToolCapabilities,
};

#[cfg(test)]
pub use connection::MockProber;
