//! Configuration for mcpwatch
//!
//! Layering: defaults, then a config file (JSON/TOML/YAML), then
//! `MCPWATCH_*` environment variables.

pub mod env_loader;
pub mod file_loader;
pub mod logging_config;
pub mod model;
pub mod timeouts;

pub use env_loader::{apply_env_overrides, apply_overrides_from};
pub use file_loader::{load_from_file, load_from_standard_paths, standard_config_paths};
pub use logging_config::LoggingConfig;
pub use model::{
    AlertThresholds, ConnectionConfig, DEFAULT_PORT_CANDIDATES, DiscoveryConfig, MonitorConfig,
    SecurityConfig, WatchConfig,
};

use crate::error::ConfigError;
use std::path::Path;

/// Load configuration: explicit file (or the standard paths), then env overrides
pub fn load_config(path: Option<&Path>) -> Result<WatchConfig, ConfigError> {
    let mut config = match path {
        Some(path) => load_from_file(path)?,
        None => load_from_standard_paths()?,
    };
    apply_env_overrides(&mut config)?;
    Ok(config)
}
