//! Keyword classifier for discovered servers
//!
//! Best effort: the first category whose keywords match the server name or
//! one of its tool names wins.

use super::types::ServerCategory;
use crate::mcp::ServerInfo;

/// Keywords for one category, matched as lower-case substrings
#[derive(Debug, Clone, Copy)]
pub struct CategoryKeywords {
    pub category: ServerCategory,
    pub name: &'static [&'static str],
    pub tools: &'static [&'static str],
}

/// Categories in priority order
pub const CATEGORY_KEYWORDS: [CategoryKeywords; 7] = [
    CategoryKeywords {
        category: ServerCategory::Documentation,
        name: &["context7", "documentation", "docs"],
        tools: &["library", "documentation"],
    },
    CategoryKeywords {
        category: ServerCategory::CodeAnalysis,
        name: &["serena", "code", "analysis"],
        tools: &["symbol", "refactor"],
    },
    CategoryKeywords {
        category: ServerCategory::ProjectManagement,
        name: &["archon", "project", "task"],
        tools: &["project", "task", "rag"],
    },
    CategoryKeywords {
        category: ServerCategory::Filesystem,
        name: &["file", "filesystem"],
        tools: &["file", "read", "write"],
    },
    CategoryKeywords {
        category: ServerCategory::Database,
        name: &["database", "db", "sql"],
        tools: &["query", "database"],
    },
    CategoryKeywords {
        category: ServerCategory::Web,
        name: &["web", "http", "api"],
        tools: &["fetch", "request"],
    },
    CategoryKeywords {
        category: ServerCategory::Ai,
        name: &["ai", "llm", "claude", "openai"],
        tools: &["generate", "completion"],
    },
];

impl CategoryKeywords {
    fn matches(&self, name: &str, tools: &[String]) -> bool {
        self.name.iter().any(|k| name.contains(k))
            || tools
                .iter()
                .any(|tool| self.tools.iter().any(|k| tool.contains(k)))
    }
}

/// Category of a server from its name and tool names
pub fn classify(info: &ServerInfo) -> ServerCategory {
    let name = info.name.to_lowercase();
    let tools: Vec<String> = info.tools.iter().map(|t| t.name.to_lowercase()).collect();

    CATEGORY_KEYWORDS
        .iter()
        .find(|entry| entry.matches(&name, &tools))
        .map_or(ServerCategory::Other, |entry| entry.category)
}
