//! List command implementation.
//!
//! The `kiosk-setup list` command shows the step catalog in run order.

use serde::Serialize;

use crate::cli::args::ListArgs;
use crate::error::{KioskError, Result};
use crate::steps::catalog;
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};

/// One catalog entry as shown by `list --json`.
#[derive(Debug, Serialize)]
pub struct StepListing {
    pub id: &'static str,
    pub title: &'static str,
    pub question: &'static str,
    pub default: bool,
}

/// The whole catalog, in run order.
pub fn listings() -> Vec<StepListing> {
    catalog()
        .iter()
        .map(|s| StepListing {
            id: s.id(),
            title: s.title(),
            question: s.question(),
            default: s.default_answer(),
        })
        .collect()
}

/// The list command implementation.
pub struct ListCommand {
    args: ListArgs,
}

impl ListCommand {
    /// Create a new list command.
    pub fn new(args: ListArgs) -> Self {
        Self { args }
    }
}

impl Command for ListCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let steps = listings();

        if self.args.json {
            let json =
                serde_json::to_string_pretty(&steps).map_err(|e| KioskError::Other(e.into()))?;
            ui.message(&json);
            return Ok(CommandResult::success());
        }

        ui.show_header("Provisioning steps");
        let width = steps.iter().map(|s| s.id.len()).max().unwrap_or(0);
        for (i, step) in steps.iter().enumerate() {
            let default = if step.default { "Y/n" } else { "y/N" };
            ui.message(&format!(
                "{:>2}. {:<width$}  [{}]  {}",
                i + 1,
                step.id,
                default,
                step.title,
                width = width
            ));
        }
        Ok(CommandResult::success())
    }
}
