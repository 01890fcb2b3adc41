//! File-based configuration loading

use super::model::WatchConfig;
use crate::error::ConfigError;
use std::fs;
use std::path::{Path, PathBuf};

/// Load configuration from a file
///
/// Supports JSON, TOML, and YAML formats based on file extension.
/// Returns default config if file doesn't exist.
pub fn load_from_file(path: &Path) -> Result<WatchConfig, ConfigError> {
    if !path.exists() {
        return Ok(WatchConfig::default());
    }

    let content = fs::read_to_string(path).map_err(|e| {
        ConfigError::read_with_context(
            e.to_string(),
            format!("Reading configuration from '{}'", path.display()),
        )
    })?;

    let config: WatchConfig = match path.extension().and_then(|s| s.to_str()) {
        Some("toml") => toml::from_str(&content).map_err(|e| {
            ConfigError::parse_with_context(
                format!("TOML: {}", e),
                format!("Deserializing TOML configuration from '{}'", path.display()),
            )
        })?,
        Some("yaml") | Some("yml") => serde_yaml::from_str(&content).map_err(|e| {
            ConfigError::parse_with_context(
                format!("YAML: {}", e),
                format!("Deserializing YAML configuration from '{}'", path.display()),
            )
        })?,
        _ => serde_json::from_str(&content).map_err(|e| {
            ConfigError::parse_with_context(
                format!("JSON: {}", e),
                format!("Deserializing JSON configuration from '{}'", path.display()),
            )
        })?,
    };

    Ok(config)
}

/// Standard configuration locations, most specific first
pub fn standard_config_paths() -> Vec<PathBuf> {
    let mut paths = vec![
        PathBuf::from("mcpwatch.toml"),
        PathBuf::from(".mcpwatch.toml"),
    ];

    if let Some(home) = dirs::home_dir() {
        paths.push(home.join(".config/mcpwatch/config.toml"));
    }

    if let Some(config_dir) = dirs::config_dir() {
        let path = config_dir.join("mcpwatch/config.toml");
        if !paths.contains(&path) {
            paths.push(path);
        }
    }

    paths
}

/// Merge every standard config file that exists, user-level files first so
/// project-local ones win
pub fn load_from_standard_paths() -> Result<WatchConfig, ConfigError> {
    let mut config = WatchConfig::default();
    for path in standard_config_paths().iter().rev().filter(|p| p.exists()) {
        config.merge(load_from_file(path)?);
    }
    Ok(config)
}
