//! System commands the provisioning steps need.
//!
//! Steps describe what they need as a [`SystemTask`]; a [`SystemRunner`]
//! turns that into a blocking call. Progress display is layered on by the
//! presentation code, never by the runner itself.

pub mod recording;
pub mod shell_runner;

use std::fmt;

use crate::error::Result;

pub use recording::RecordingRunner;
pub use shell_runner::{DryRunSystem, ShellRunner};

/// An opaque system operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SystemTask {
    UpdateIndex,
    Upgrade,
    Install(Vec<String>),
    Autoremove,
    CleanCache,
    EnableService(String),
    SetDefaultTarget(String),
    /// Apply a display mode to a running compositor session.
    SetDisplayMode { output: String, mode: String },
    Reboot,
}

impl SystemTask {
    /// Whether the task is slow enough to deserve a progress indicator.
    pub fn is_long_running(&self) -> bool {
        matches!(
            self,
            Self::UpdateIndex | Self::Upgrade | Self::Install(_) | Self::Autoremove
        )
    }

    /// Whether the task needs the privilege-escalation prefix.
    pub fn is_privileged(&self) -> bool {
        !matches!(self, Self::SetDisplayMode { .. })
    }
}

impl fmt::Display for SystemTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UpdateIndex => write!(f, "Updating package index"),
            Self::Upgrade => write!(f, "Upgrading installed packages"),
            Self::Install(packages) => write!(f, "Installing {}", packages.join(", ")),
            Self::Autoremove => write!(f, "Removing unused packages"),
            Self::CleanCache => write!(f, "Cleaning package cache"),
            Self::EnableService(unit) => write!(f, "Enabling {}", unit),
            Self::SetDefaultTarget(target) => write!(f, "Setting default target to {}", target),
            Self::SetDisplayMode { output, mode } => write!(f, "Setting {} to {}", output, mode),
            Self::Reboot => write!(f, "Rebooting"),
        }
    }
}

/// Executes system tasks, blocking until each completes.
pub trait SystemRunner {
    fn run(&self, task: &SystemTask) -> Result<()>;
}

impl<T: SystemRunner + ?Sized> SystemRunner for Box<T> {
    fn run(&self, task: &SystemTask) -> Result<()> {
        (**self).run(task)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn install_is_long_running() {
        assert!(SystemTask::Install(vec!["labwc".into()]).is_long_running());
        assert!(!SystemTask::EnableService("greetd".into()).is_long_running());
    }

    #[test]
    fn display_mode_runs_unprivileged() {
        let task = SystemTask::SetDisplayMode {
            output: "HDMI-A-1".into(),
            mode: "1920x1080@60".into(),
        };
        assert!(!task.is_privileged());
        assert!(SystemTask::Reboot.is_privileged());
    }

    #[test]
    fn display_names_packages() {
        let task = SystemTask::Install(vec!["labwc".into(), "seatd".into()]);
        assert_eq!(task.to_string(), "Installing labwc, seatd");
    }
}
