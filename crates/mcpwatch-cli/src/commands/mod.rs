//! Command implementations

pub mod check;
pub mod connect;
pub mod discover;
pub mod monitor;

use mcpwatch_core::{ConnectionManager, WatchConfig};
use std::sync::Arc;

/// Connection manager shared by every command
pub fn connection_manager(config: &WatchConfig) -> anyhow::Result<Arc<ConnectionManager>> {
    Ok(Arc::new(ConnectionManager::from_config(config)?))
}
