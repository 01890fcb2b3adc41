//! Error types for mcpwatch
//!
//! Connection failures are normally folded into a failed
//! [`ConnectionResult`](crate::mcp::ConnectionResult) or an unhealthy
//! [`HealthCheck`](crate::health::HealthCheck); these enums carry the cause.

use thiserror::Error;

/// Result type alias for mcpwatch operations
pub type WatchResult<T> = Result<T, WatchError>;

/// Unified error trait implemented by every mcpwatch error enum.
///
/// - error_code(): stable code for programmatic handling
/// - message(): human-readable message
/// - context(): optional extra context
/// - is_retryable(): whether another connection attempt may succeed
pub trait UnifiedError: std::error::Error + Send + Sync {
    /// Get the error code for programmatic handling
    fn error_code(&self) -> &str;

    /// Get the human-readable error message
    fn message(&self) -> &str;

    /// Get optional context about the error
    fn context(&self) -> Option<&str> {
        None
    }

    /// Check if this error is retryable
    fn is_retryable(&self) -> bool {
        false
    }
}

/// Errors raised while connecting to or probing a single endpoint
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConnectionError {
    /// Scheme is an insecure variant of a supported transport
    #[error("Security policy violation: {message}")]
    SecurityPolicy {
        message: String,
        context: Option<String>,
    },

    /// Scheme is not supported at all
    #[error("Unsupported protocol: {scheme}. Only HTTPS and WSS are allowed.")]
    UnsupportedScheme {
        scheme: String,
        context: Option<String>,
    },

    /// Endpoint could not be parsed
    #[error("Invalid endpoint: {message}")]
    InvalidEndpoint {
        message: String,
        context: Option<String>,
    },

    /// Attempt did not finish in time
    #[error("Connection timeout after {millis}ms")]
    Timeout {
        millis: u64,
        context: Option<String>,
    },

    /// Refused, reset, DNS failure, TLS failure
    #[error("Transport error: {message}")]
    Transport {
        message: String,
        context: Option<String>,
    },

    /// Non-success HTTP status
    #[error("HTTP {status}: {message}")]
    Http {
        status: u16,
        message: String,
        context: Option<String>,
    },

    /// Malformed handshake or info response
    #[error("Protocol error: {message}")]
    Protocol {
        message: String,
        context: Option<String>,
    },

    /// Invalid connection options
    #[error("Invalid configuration: {message}")]
    Config {
        message: String,
        context: Option<String>,
    },
}

impl ConnectionError {
    /// Create a new SecurityPolicy error
    pub fn security_policy(message: impl Into<String>) -> Self {
        Self::SecurityPolicy {
            message: message.into(),
            context: None,
        }
    }

    /// Create a new UnsupportedScheme error
    pub fn unsupported_scheme(scheme: impl Into<String>) -> Self {
        Self::UnsupportedScheme {
            scheme: scheme.into(),
            context: None,
        }
    }

    /// Create a new InvalidEndpoint error
    pub fn invalid_endpoint(message: impl Into<String>) -> Self {
        Self::InvalidEndpoint {
            message: message.into(),
            context: None,
        }
    }

    /// Create a new Timeout error
    pub fn timeout(millis: u64) -> Self {
        Self::Timeout {
            millis,
            context: None,
        }
    }

    /// Create a new Transport error
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
            context: None,
        }
    }

    /// Create a new Http error
    pub fn http(status: u16, message: impl Into<String>) -> Self {
        Self::Http {
            status,
            message: message.into(),
            context: None,
        }
    }

    /// Create a new Protocol error
    pub fn protocol(message: impl Into<String>) -> Self {
        Self::Protocol {
            message: message.into(),
            context: None,
        }
    }

    /// Create a new Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            context: None,
        }
    }

    /// Add context to any connection error
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        let ctx = Some(context.into());
        match &mut self {
            Self::SecurityPolicy { context: c, .. } => *c = ctx,
            Self::UnsupportedScheme { context: c, .. } => *c = ctx,
            Self::InvalidEndpoint { context: c, .. } => *c = ctx,
            Self::Timeout { context: c, .. } => *c = ctx,
            Self::Transport { context: c, .. } => *c = ctx,
            Self::Http { context: c, .. } => *c = ctx,
            Self::Protocol { context: c, .. } => *c = ctx,
            Self::Config { context: c, .. } => *c = ctx,
        }
        self
    }

    /// Map a reqwest failure onto the taxonomy
    pub(crate) fn from_reqwest(err: &reqwest::Error, timeout_ms: u64) -> Self {
        if err.is_timeout() {
            Self::timeout(timeout_ms)
        } else if let Some(status) = err.status() {
            Self::http(status.as_u16(), status.canonical_reason().unwrap_or("error"))
        } else if err.is_decode() {
            Self::protocol(err.to_string())
        } else {
            Self::transport(err.to_string())
        }
    }
}

impl UnifiedError for ConnectionError {
    fn error_code(&self) -> &str {
        match self {
            Self::SecurityPolicy { .. } => "MCPWATCH_SECURITY_POLICY",
            Self::UnsupportedScheme { .. } => "MCPWATCH_UNSUPPORTED_SCHEME",
            Self::InvalidEndpoint { .. } => "MCPWATCH_INVALID_ENDPOINT",
            Self::Timeout { .. } => "MCPWATCH_TIMEOUT",
            Self::Transport { .. } => "MCPWATCH_TRANSPORT",
            Self::Http { .. } => "MCPWATCH_HTTP",
            Self::Protocol { .. } => "MCPWATCH_PROTOCOL",
            Self::Config { .. } => "MCPWATCH_CONFIG",
        }
    }

    fn message(&self) -> &str {
        match self {
            Self::SecurityPolicy { message, .. } => message,
            Self::UnsupportedScheme { scheme, .. } => scheme,
            Self::InvalidEndpoint { message, .. } => message,
            Self::Timeout { .. } => "Connection timeout",
            Self::Transport { message, .. } => message,
            Self::Http { message, .. } => message,
            Self::Protocol { message, .. } => message,
            Self::Config { message, .. } => message,
        }
    }

    fn context(&self) -> Option<&str> {
        match self {
            Self::SecurityPolicy { context, .. } => context.as_deref(),
            Self::UnsupportedScheme { context, .. } => context.as_deref(),
            Self::InvalidEndpoint { context, .. } => context.as_deref(),
            Self::Timeout { context, .. } => context.as_deref(),
            Self::Transport { context, .. } => context.as_deref(),
            Self::Http { context, .. } => context.as_deref(),
            Self::Protocol { context, .. } => context.as_deref(),
            Self::Config { context, .. } => context.as_deref(),
        }
    }

    fn is_retryable(&self) -> bool {
        match self {
            Self::Timeout { .. } | Self::Transport { .. } | Self::Protocol { .. } => true,
            Self::Http { status, .. } => *status >= 500 || *status == 429,
            Self::SecurityPolicy { .. }
            | Self::UnsupportedScheme { .. }
            | Self::InvalidEndpoint { .. }
            | Self::Config { .. } => false,
        }
    }
}

/// Errors raised by the discovery service
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DiscoveryError {
    /// Discovery options are unusable
    #[error("Invalid discovery options: {message}")]
    InvalidOptions { message: String },
}

impl DiscoveryError {
    pub fn invalid_options(message: impl Into<String>) -> Self {
        Self::InvalidOptions {
            message: message.into(),
        }
    }
}

impl UnifiedError for DiscoveryError {
    fn error_code(&self) -> &str {
        "MCPWATCH_DISCOVERY_OPTIONS"
    }

    fn message(&self) -> &str {
        match self {
            Self::InvalidOptions { message } => message,
        }
    }
}

/// Errors raised by the health monitor
#[derive(Debug, Error, Clone, PartialEq)]
pub enum MonitorError {
    /// No server registered under this id
    #[error("Server not monitored: {server_id}")]
    UnknownServer { server_id: String },

    /// Monitor options are unusable
    #[error("Invalid monitor configuration: {message}")]
    InvalidConfig { message: String },
}

impl MonitorError {
    pub fn unknown_server(server_id: impl Into<String>) -> Self {
        Self::UnknownServer {
            server_id: server_id.into(),
        }
    }

    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }
}

impl UnifiedError for MonitorError {
    fn error_code(&self) -> &str {
        match self {
            Self::UnknownServer { .. } => "MCPWATCH_UNKNOWN_SERVER",
            Self::InvalidConfig { .. } => "MCPWATCH_MONITOR_CONFIG",
        }
    }

    fn message(&self) -> &str {
        match self {
            Self::UnknownServer { server_id } => server_id,
            Self::InvalidConfig { message } => message,
        }
    }
}

/// Errors raised while loading configuration
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    /// File could not be read
    #[error("Failed to read config file: {message}")]
    Read {
        message: String,
        context: Option<String>,
    },

    /// File or variable could not be parsed
    #[error("Failed to parse config: {message}")]
    Parse {
        message: String,
        context: Option<String>,
    },
}

impl ConfigError {
    pub fn read_with_context(message: impl Into<String>, context: impl Into<String>) -> Self {
        Self::Read {
            message: message.into(),
            context: Some(context.into()),
        }
    }

    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
            context: None,
        }
    }

    pub fn parse_with_context(message: impl Into<String>, context: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
            context: Some(context.into()),
        }
    }
}

impl UnifiedError for ConfigError {
    fn error_code(&self) -> &str {
        match self {
            Self::Read { .. } => "MCPWATCH_CONFIG_READ",
            Self::Parse { .. } => "MCPWATCH_CONFIG_PARSE",
        }
    }

    fn message(&self) -> &str {
        match self {
            Self::Read { message, .. } | Self::Parse { message, .. } => message,
        }
    }

    fn context(&self) -> Option<&str> {
        match self {
            Self::Read { context, .. } | Self::Parse { context, .. } => context.as_deref(),
        }
    }
}

/// Umbrella error for callers that mix subsystems
#[derive(Debug, Error)]
pub enum WatchError {
    #[error(transparent)]
    Connection(#[from] ConnectionError),

    #[error(transparent)]
    Discovery(#[from] DiscoveryError),

    #[error(transparent)]
    Monitor(#[from] MonitorError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
