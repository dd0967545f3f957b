//! [`SystemRunner`] implementations backed by shell commands.

use super::{SystemRunner, SystemTask};
use crate::config::CommandsConfig;
use crate::error::Result;
use crate::shell::{execute, shell_quote, CommandOptions};

/// Runs tasks through the command lines in [`CommandsConfig`].
#[derive(Debug, Clone)]
pub struct ShellRunner {
    commands: CommandsConfig,
    elevate: Vec<String>,
}

impl ShellRunner {
    pub fn new(commands: CommandsConfig, elevate: Vec<String>) -> Self {
        Self { commands, elevate }
    }

    /// The full command line a task runs.
    pub fn command_for(&self, task: &SystemTask) -> String {
        let c = &self.commands;
        let base = match task {
            SystemTask::UpdateIndex => c.update_index.clone(),
            SystemTask::Upgrade => c.upgrade.clone(),
            SystemTask::Install(packages) => {
                let quoted: Vec<String> = packages.iter().map(|p| shell_quote(p)).collect();
                format!("{} {}", c.install, quoted.join(" "))
            }
            SystemTask::Autoremove => c.autoremove.clone(),
            SystemTask::CleanCache => c.clean.clone(),
            SystemTask::EnableService(unit) => format!("{} {}", c.enable_service, shell_quote(unit)),
            SystemTask::SetDefaultTarget(target) => {
                format!("{} {}", c.set_default_target, shell_quote(target))
            }
            SystemTask::SetDisplayMode { output, mode } => format!(
                "{} --output {} --mode {}Hz",
                c.set_mode,
                shell_quote(output),
                shell_quote(mode)
            ),
            SystemTask::Reboot => c.reboot.clone(),
        };

        if task.is_privileged() && !self.elevate.is_empty() {
            let prefix: Vec<String> = self.elevate.iter().map(|p| shell_quote(p)).collect();
            format!("{} {}", prefix.join(" "), base)
        } else {
            base
        }
    }
}

impl SystemRunner for ShellRunner {
    fn run(&self, task: &SystemTask) -> Result<()> {
        let command = self.command_for(task);
        let result = execute(&command, &CommandOptions::default())?;
        if !result.success {
            for line in result.stderr_tail(5) {
                tracing::warn!("{}", line);
            }
        }
        tracing::debug!("{} finished in {:?}", command, result.duration);
        result.into_checked(&command).map(|_| ())
    }
}

/// Logs the command each task would run, without running it.
#[derive(Debug, Clone)]
pub struct DryRunSystem {
    inner: ShellRunner,
}

impl DryRunSystem {
    pub fn new(inner: ShellRunner) -> Self {
        Self { inner }
    }
}

impl SystemRunner for DryRunSystem {
    fn run(&self, task: &SystemTask) -> Result<()> {
        tracing::info!("[dry-run] would run: {}", self.inner.command_for(task));
        Ok(())
    }
}
