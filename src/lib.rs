//! mcpwatch
//!
//! Discovery and continuous health monitoring for MCP servers. This crate
//! re-exports [`mcpwatch_core`]; the `mcpwatch` binary lives in
//! `crates/mcpwatch-cli`.

pub use mcpwatch_core::*;
