//! MCP type definitions

use serde::{Deserialize, Serialize};

/// Server capabilities
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct McpCapabilities {
    /// Tool capabilities
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tools: Option<ToolCapabilities>,
    /// Resource capabilities
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resources: Option<ResourceCapabilities>,
    /// Prompt capabilities
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompts: Option<PromptCapabilities>,
    /// Logging capabilities
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logging: Option<LoggingCapabilities>,
}

/// Tool capabilities
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolCapabilities {
    /// Whether the server supports tool listing changes
    #[serde(default)]
    pub list_changed: bool,
}

/// Resource capabilities
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceCapabilities {
    /// Whether resources can be subscribed to
    #[serde(default)]
    pub subscribe: bool,
    /// Whether resource list changes are notified
    #[serde(default)]
    pub list_changed: bool,
}

/// Prompt capabilities
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptCapabilities {
    /// Whether prompt list changes are notified
    #[serde(default)]
    pub list_changed: bool,
}

/// Logging capabilities
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoggingCapabilities {
    #[serde(default)]
    pub level: Option<String>,
}

/// MCP tool summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct McpTool {
    /// Tool name
    pub name: String,
    /// Tool description
    #[serde(default)]
    pub description: Option<String>,
}

impl McpTool {
    /// Create a new MCP tool
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
        }
    }

    /// Set description
    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = Some(desc.into());
        self
    }
}

/// MCP resource summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct McpResource {
    /// Resource URI
    pub uri: String,
    /// Resource name
    pub name: String,
    /// Resource description
    #[serde(default)]
    pub description: Option<String>,
    /// MIME type
    #[serde(default)]
    pub mime_type: Option<String>,
}

impl McpResource {
    /// Create a new resource
    pub fn new(uri: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            name: name.into(),
            description: None,
            mime_type: None,
        }
    }
}

/// Information about a server, produced by a successful handshake
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerInfo {
    pub id: String,
    pub name: String,
    pub version: String,
    pub capabilities: McpCapabilities,
    pub tools: Vec<McpTool>,
    pub resources: Vec<McpResource>,
}

impl ServerInfo {
    /// Names of the declared tools
    pub fn tool_names(&self) -> Vec<String> {
        self.tools.iter().map(|t| t.name.clone()).collect()
    }

    /// Names of the declared resources
    pub fn resource_names(&self) -> Vec<String> {
        self.resources.iter().map(|r| r.name.clone()).collect()
    }
}

/// Info document served by HTTP servers at one of the well-known paths.
///
/// Every field is optional; `tools` and `resources` accept either bare
/// names or full objects.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InfoDocument {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub capabilities: Option<McpCapabilities>,
    #[serde(default)]
    pub tools: Vec<ToolEntry>,
    #[serde(default)]
    pub resources: Vec<ResourceEntry>,
}

/// Tool listed in an info document
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ToolEntry {
    Name(String),
    Tool(McpTool),
}

impl From<ToolEntry> for McpTool {
    fn from(entry: ToolEntry) -> Self {
        match entry {
            ToolEntry::Name(name) => McpTool::new(name),
            ToolEntry::Tool(tool) => tool,
        }
    }
}

/// Resource listed in an info document
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ResourceEntry {
    Name(String),
    Resource(McpResource),
}

impl From<ResourceEntry> for McpResource {
    fn from(entry: ResourceEntry) -> Self {
        match entry {
            ResourceEntry::Name(name) => McpResource::new(name.clone(), name),
            ResourceEntry::Resource(resource) => resource,
        }
    }
}

/// Initialize request parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitializeParams {
    /// Protocol version
    pub protocol_version: String,
    /// Client capabilities (none are advertised by a probe)
    pub capabilities: serde_json::Map<String, serde_json::Value>,
    /// Client info
    pub client_info: Implementation,
}

impl Default for InitializeParams {
    fn default() -> Self {
        Self {
            protocol_version: super::protocol::MCP_PROTOCOL_VERSION.to_string(),
            capabilities: serde_json::Map::new(),
            client_info: Implementation::default(),
        }
    }
}

/// Name and version of an MCP implementation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Implementation {
    pub name: String,
    pub version: String,
}

impl Default for Implementation {
    fn default() -> Self {
        Self {
            name: "mcpwatch".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Initialize response
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitializeResult {
    #[serde(default)]
    pub protocol_version: Option<String>,
    #[serde(default)]
    pub capabilities: McpCapabilities,
    #[serde(default)]
    pub server_info: Option<PartialImplementation>,
}

/// Server info inside an initialize response; either field may be missing
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PartialImplementation {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
}
