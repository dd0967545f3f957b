//! Configuration loading, parsing, and validation.
//!
//! This module handles all aspects of configuration:
//! - Schema definitions in [`schema`]
//! - File discovery and loading in [`loader`]
//! - Deep merging in [`merger`]
//! - Validation in [`validator`]
//! - Payload template rendering in [`interpolation`]
//!
//! # Example
//!
//! ```
//! use kiosk_setup::config::{load_config, ConfigPaths};
//! use tempfile::TempDir;
//! use std::fs;
//!
//! let temp = TempDir::new().unwrap();
//! let file = temp.path().join("config.yml");
//! fs::write(&file, "display:\n  output: HDMI-A-2\n").unwrap();
//!
//! let paths = ConfigPaths::from_locations(&temp.path().join("none.yml"), None, Some(&file));
//! let config = load_config(&paths).unwrap();
//! assert_eq!(config.display.output, "HDMI-A-2");
//! ```
//!
//! # Configuration File Locations
//!
//! Configuration is discovered and merged in this order:
//! 1. System config (`/etc/kiosk-setup/config.yml`)
//! 2. User config (`~/.config/kiosk-setup/config.yml`)
//! 3. Explicit `--config` file

pub mod interpolation;
pub mod loader;
pub mod merger;
pub mod schema;
pub mod validator;

pub use schema::{
    BrowserConfig, CommandsConfig, DisplayConfig, KioskConfig, KioskDefaults, OutputMode,
    PackagesConfig, PathsConfig, Settings,
};

pub use loader::{load_config, load_config_value, parse_config, ConfigPaths, SYSTEM_CONFIG};

pub use merger::{deep_merge, merge_configs, merge_into};

pub use validator::{validate, validation_errors};

pub use interpolation::{parse_interpolation, render, Segment, TemplateVars};
