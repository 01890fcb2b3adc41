//! Server endpoint addressing

use crate::error::ConnectionError;
use serde::{Deserialize, Serialize};
use std::fmt;
use url::Url;

/// URL scheme of an endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scheme {
    Https,
    Wss,
    Http,
    Ws,
}

impl Scheme {
    fn parse(scheme: &str) -> Option<Self> {
        match scheme {
            "https" => Some(Self::Https),
            "wss" => Some(Self::Wss),
            "http" => Some(Self::Http),
            "ws" => Some(Self::Ws),
            _ => None,
        }
    }

    /// TLS-protected variant
    pub fn is_secure(&self) -> bool {
        matches!(self, Self::Https | Self::Wss)
    }

    /// Which transport carries this scheme
    pub fn transport(&self) -> TransportKind {
        match self {
            Self::Https | Self::Http => TransportKind::Http,
            Self::Wss | Self::Ws => TransportKind::WebSocket,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Https => "https",
            Self::Wss => "wss",
            Self::Http => "http",
            Self::Ws => "ws",
        }
    }
}

/// Transport family of an endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportKind {
    /// Request/response over HTTP(S)
    Http,
    /// Persistent socket over WS(S)
    WebSocket,
}

/// Scheme + host + port identifying a server
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ServerEndpoint {
    url: Url,
    scheme: Scheme,
}

impl ServerEndpoint {
    /// Parse an endpoint URL
    ///
    /// Insecure `http`/`ws` endpoints parse successfully; whether they may be
    /// contacted is decided by the connection manager's security gate.
    pub fn parse(input: &str) -> Result<Self, ConnectionError> {
        let url = Url::parse(input.trim()).map_err(|e| {
            ConnectionError::invalid_endpoint(format!("{}: {}", input, e))
        })?;

        let scheme = Scheme::parse(url.scheme())
            .ok_or_else(|| ConnectionError::unsupported_scheme(format!("{}:", url.scheme())))?;

        if url.host_str().is_none_or(str::is_empty) {
            return Err(ConnectionError::invalid_endpoint(format!(
                "{}: missing host",
                input
            )));
        }

        Ok(Self { url, scheme })
    }

    pub fn scheme(&self) -> Scheme {
        self.scheme
    }

    pub fn transport(&self) -> TransportKind {
        self.scheme.transport()
    }

    pub fn host(&self) -> &str {
        self.url.host_str().unwrap_or_default()
    }

    /// Explicit port, or the scheme's default
    pub fn port(&self) -> u16 {
        self.url.port_or_known_default().unwrap_or(match self.scheme {
            Scheme::Https | Scheme::Wss => 443,
            Scheme::Http | Scheme::Ws => 80,
        })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// URL without a trailing slash, suitable for joining paths
    pub fn base(&self) -> &str {
        self.url.as_str().trim_end_matches('/')
    }

    /// Join a path such as `/health` onto the endpoint
    pub fn join(&self, path: &str) -> String {
        if path == "/" {
            format!("{}/", self.base())
        } else {
            format!("{}{}", self.base(), path)
        }
    }

    pub fn is_loopback(&self) -> bool {
        matches!(self.host(), "localhost" | "127.0.0.1" | "[::1]" | "::1")
    }

    /// Display name used when a server does not describe itself
    pub fn fallback_name(&self) -> String {
        if self.is_loopback() {
            format!("MCP Server :{}", self.port())
        } else {
            self.host()
                .strip_prefix("www.")
                .unwrap_or(self.host())
                .to_string()
        }
    }
}

impl fmt::Display for ServerEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.base())
    }
}

/// Display name for a raw URL, falling back when it does not parse
pub fn server_name_from_url(url: &str) -> String {
    ServerEndpoint::parse(url)
        .map(|endpoint| endpoint.fallback_name())
        .unwrap_or_else(|_| "Unknown MCP Server".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_secure_endpoints() {
        let https = ServerEndpoint::parse("https://localhost:8051").unwrap();
        assert_eq!(https.scheme(), Scheme::Https);
        assert_eq!(https.transport(), TransportKind::Http);
        assert_eq!(https.port(), 8051);
        assert_eq!(https.join("/health"), "https://localhost:8051/health");

        let wss = ServerEndpoint::parse("wss://mcp.example.com/socket").unwrap();
        assert_eq!(wss.transport(), TransportKind::WebSocket);
        assert_eq!(wss.port(), 443);
        assert_eq!(wss.base(), "wss://mcp.example.com/socket");
    }

    #[test]
    fn test_parse_insecure_is_not_an_error() {
        let http = ServerEndpoint::parse("http://localhost:3000").unwrap();
        assert!(!http.scheme().is_secure());
    }

    #[test]
    fn test_parse_rejects_unknown_scheme() {
        let err = ServerEndpoint::parse("ftp://localhost:21").unwrap_err();
        assert!(matches!(err, ConnectionError::UnsupportedScheme { .. }));
    }

    #[test]
    fn test_parse_rejects_malformed() {
        let err = ServerEndpoint::parse("not a url").unwrap_err();
        assert!(matches!(err, ConnectionError::InvalidEndpoint { .. }));
    }

    #[test]
    fn test_fallback_name() {
        assert_eq!(
            server_name_from_url("https://localhost:8052"),
            "MCP Server :8052"
        );
        assert_eq!(server_name_from_url("https://127.0.0.1"), "MCP Server :443");
        assert_eq!(
            server_name_from_url("https://www.example.com/mcp"),
            "example.com"
        );
        assert_eq!(server_name_from_url("::"), "Unknown MCP Server");
    }

    #[test]
    fn test_join_root() {
        let endpoint = ServerEndpoint::parse("https://example.com/").unwrap();
        assert_eq!(endpoint.join("/"), "https://example.com/");
        assert_eq!(endpoint.join("/info"), "https://example.com/info");
    }
}
