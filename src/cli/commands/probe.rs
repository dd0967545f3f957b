//! Probe command implementation.
//!
//! The `kiosk-setup probe` command runs every capability probe read-only and
//! shows what a run would resolve on this machine.

use crate::cli::args::ProbeArgs;
use crate::config::ConfigPaths;
use crate::environment::EnvironmentFacts;
use crate::error::{KioskError, Result};
use crate::probe::{probe_all, AptCache, CapabilityReport, ExternalDecoder};
use crate::ui::UserInterface;

use super::dispatcher::{load_for, Command, CommandResult};

/// The probe command implementation.
pub struct ProbeCommand {
    config_paths: ConfigPaths,
    args: ProbeArgs,
}

impl ProbeCommand {
    /// Create a new probe command.
    pub fn new(config_paths: ConfigPaths, args: ProbeArgs) -> Self {
        Self { config_paths, args }
    }
}

/// Human-readable lines for a probe report.
pub fn describe(report: &CapabilityReport) -> Vec<String> {
    let binary = report
        .browser_binary
        .clone()
        .map(|p| p.display().to_string());
    let modes = report.display_modes.clone().map(|m| m.join(", "));
    vec![
        format!("Browser package:  {}", report.browser_package),
        format!("Browser binary:   {}", binary),
        format!("Display modes:    {}", modes),
    ]
}

impl Command for ProbeCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let config = load_for(&self.config_paths, ui)?;
        let facts = EnvironmentFacts::gather();
        let index = AptCache::new(config.commands.package_query.clone());
        let decoder = ExternalDecoder::new(config.commands.edid_decode.clone());

        let report = probe_all(&config, &facts, &index, &decoder);

        if self.args.json {
            let json =
                serde_json::to_string_pretty(&report).map_err(|e| KioskError::Other(e.into()))?;
            ui.message(&json);
        } else {
            for line in describe(&report) {
                ui.message(&line);
            }
            for warning in report.warnings() {
                ui.warning(warning);
            }
        }
        Ok(CommandResult::success())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::probe::Resolved;
    use std::path::PathBuf;

    #[test]
    fn describe_marks_fallbacks() {
        let report = CapabilityReport {
            browser_package: Resolved::found("chromium".to_string()),
            browser_binary: Resolved::Fallback {
                value: PathBuf::from("/usr/bin/chromium"),
                reason: "not found".to_string(),
            },
            display_modes: Resolved::found(vec![
                "1920x1080@60.00".to_string(),
                "1280x720@59.94".to_string(),
            ]),
        };

        let lines = describe(&report);
        assert_eq!(lines[0], "Browser package:  chromium");
        assert_eq!(lines[1], "Browser binary:   /usr/bin/chromium (fallback)");
        assert_eq!(lines[2], "Display modes:    1920x1080@60.00, 1280x720@59.94");
    }
}
