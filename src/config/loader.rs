//! Configuration file discovery and loading.
//!
//! This module handles finding and loading configuration files from
//! the system, user and explicit locations in priority order.

use crate::config::merger::merge_configs;
use crate::config::schema::KioskConfig;
use crate::config::validator::validate;
use crate::error::{KioskError, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// System-wide config location.
pub const SYSTEM_CONFIG: &str = "/etc/kiosk-setup/config.yml";

/// Paths to configuration files in priority order (later overrides earlier).
///
/// Merge order:
/// 1. System config (`/etc/kiosk-setup/config.yml`)
/// 2. User config (`$XDG_CONFIG_HOME/kiosk-setup/config.yml`)
/// 3. Explicit `--config` file
#[derive(Debug, Clone, Default)]
pub struct ConfigPaths {
    /// System config, if present
    pub system: Option<PathBuf>,

    /// User config, if present
    pub user: Option<PathBuf>,

    /// Explicit config file (must exist)
    pub explicit: Option<PathBuf>,
}

impl ConfigPaths {
    /// Discover config files on this machine.
    pub fn discover(explicit: Option<&Path>) -> Self {
        let user = dirs::config_dir().map(|d| d.join("kiosk-setup").join("config.yml"));
        Self::from_locations(Path::new(SYSTEM_CONFIG), user.as_deref(), explicit)
    }

    /// Build config paths from explicit candidate locations.
    ///
    /// Optional layers are kept only if they exist; the explicit file is kept
    /// regardless so that loading can report it missing.
    pub fn from_locations(system: &Path, user: Option<&Path>, explicit: Option<&Path>) -> Self {
        Self {
            system: existing(system),
            user: user.and_then(existing),
            explicit: explicit.map(Path::to_path_buf),
        }
    }

    /// Returns all config paths in merge order.
    pub fn all(&self) -> Vec<&PathBuf> {
        [&self.system, &self.user, &self.explicit]
            .into_iter()
            .flatten()
            .collect()
    }
}

fn existing(path: &Path) -> Option<PathBuf> {
    if path.is_file() {
        Some(path.to_path_buf())
    } else {
        None
    }
}

/// Load a config file as raw YAML Value (for merging).
///
/// An empty file parses to an empty mapping.
pub fn load_config_value(path: &Path) -> Result<serde_yaml::Value> {
    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            KioskError::ConfigNotFound {
                path: path.to_path_buf(),
            }
        } else {
            KioskError::Io(e)
        }
    })?;

    let value: serde_yaml::Value =
        serde_yaml::from_str(&content).map_err(|e| KioskError::ConfigParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    if value.is_null() {
        Ok(serde_yaml::Value::Mapping(Default::default()))
    } else {
        Ok(value)
    }
}

/// Parse YAML content into a validated [`KioskConfig`].
pub fn parse_config(content: &str, source_path: &Path) -> Result<KioskConfig> {
    let config: KioskConfig =
        serde_yaml::from_str(content).map_err(|e| KioskError::ConfigParseError {
            path: source_path.to_path_buf(),
            message: e.to_string(),
        })?;
    validate(&config)?;
    Ok(config)
}

/// Load, merge and validate all discovered config layers.
///
/// With no config files at all, the built-in defaults are returned.
pub fn load_config(paths: &ConfigPaths) -> Result<KioskConfig> {
    let mut configs = Vec::new();
    for path in paths.all() {
        tracing::debug!("Loading config layer {}", path.display());
        configs.push(load_config_value(path)?);
    }

    let merged = merge_configs(&configs);
    let config: KioskConfig =
        serde_yaml::from_value(merged).map_err(|e| KioskError::ConfigParseError {
            path: paths
                .all()
                .last()
                .map(|p| p.to_path_buf())
                .unwrap_or_else(|| PathBuf::from(SYSTEM_CONFIG)),
            message: format!("Failed to parse merged config: {}", e),
        })?;

    validate(&config)?;
    Ok(config)
}
