//! Config command implementation.
//!
//! The `kiosk-setup config` command shows the merged configuration.

use crate::cli::args::ConfigArgs;
use crate::config::ConfigPaths;
use crate::error::{KioskError, Result};
use crate::ui::UserInterface;

use super::dispatcher::{load_for, Command, CommandResult};

/// The config command implementation.
pub struct ConfigCommand {
    config_paths: ConfigPaths,
    args: ConfigArgs,
}

impl ConfigCommand {
    /// Create a new config command.
    pub fn new(config_paths: ConfigPaths, args: ConfigArgs) -> Self {
        Self { config_paths, args }
    }

    /// Get the command arguments.
    pub fn args(&self) -> &ConfigArgs {
        &self.args
    }
}

impl Command for ConfigCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let config = load_for(&self.config_paths, ui)?;

        if self.args.json {
            let json =
                serde_json::to_string_pretty(&config).map_err(|e| KioskError::Other(e.into()))?;
            ui.message(&json);
        } else {
            // Show config file path(s)
            let layers = self.config_paths.all();
            if layers.is_empty() {
                ui.message("# built-in defaults");
            }
            for path in layers {
                ui.message(&format!("# {}", path.display()));
            }
            let yaml = serde_yaml::to_string(&config).map_err(|e| KioskError::Other(e.into()))?;
            ui.message(&yaml);
        }

        Ok(CommandResult::success())
    }
}
