//! Command dispatching.
//!
//! This module provides the core command infrastructure:
//! - [`Command`] trait for implementing commands
//! - [`CommandResult`] for uniform result reporting
//! - [`CommandDispatcher`] for routing CLI subcommands

use crate::cli::args::{Cli, Commands, RunArgs};
use crate::config::{load_config, ConfigPaths, KioskConfig};
use crate::error::Result;
use crate::ui::{OutputMode, UserInterface};

/// Trait for command implementations.
///
/// Each CLI subcommand implements this trait to provide its execution logic.
pub trait Command {
    /// Execute the command.
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult>;
}

/// Result of command execution.
#[derive(Debug)]
pub struct CommandResult {
    /// Whether the command succeeded.
    pub success: bool,

    /// Exit code to use (0 for success, non-zero for failure).
    pub exit_code: i32,
}

impl CommandResult {
    /// Create a successful result.
    pub fn success() -> Self {
        Self {
            success: true,
            exit_code: 0,
        }
    }

    /// Create a failure result.
    pub fn failure(exit_code: i32) -> Self {
        Self {
            success: false,
            exit_code,
        }
    }
}

/// Load the layered configuration and apply its output mode.
///
/// The config's `default_output` only applies when no CLI flag changed the
/// mode away from normal.
pub fn load_for(paths: &ConfigPaths, ui: &mut dyn UserInterface) -> Result<KioskConfig> {
    let config = load_config(paths)?;
    if ui.output_mode() == OutputMode::Normal {
        ui.set_output_mode(config.settings.default_output);
    }
    Ok(config)
}

/// Dispatches CLI commands to their implementations.
pub struct CommandDispatcher {
    config_paths: ConfigPaths,
}

impl CommandDispatcher {
    /// Create a dispatcher reading configuration from `config_paths`.
    pub fn new(config_paths: ConfigPaths) -> Self {
        Self { config_paths }
    }

    pub fn config_paths(&self) -> &ConfigPaths {
        &self.config_paths
    }

    /// Dispatch and execute a command.
    pub fn dispatch(&self, cli: &Cli, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let paths = self.config_paths.clone();
        match &cli.command {
            Some(Commands::Run(args)) => super::run::RunCommand::new(paths, args.clone()).execute(ui),
            Some(Commands::List(args)) => super::list::ListCommand::new(args.clone()).execute(ui),
            Some(Commands::Probe(args)) => {
                super::probe::ProbeCommand::new(paths, args.clone()).execute(ui)
            }
            Some(Commands::Config(args)) => {
                super::config::ConfigCommand::new(paths, args.clone()).execute(ui)
            }
            Some(Commands::Completions(args)) => {
                super::completions::CompletionsCommand::new(args.clone()).execute(ui)
            }
            None => super::run::RunCommand::new(paths, RunArgs::default()).execute(ui),
        }
    }
}
