//! Read-only facts about the invoking environment.
//!
//! Facts are gathered once at process start and passed explicitly into the
//! probes and the directive applier, so nothing queries the environment
//! mid-run.
//!
//! # Example
//!
//! ```
//! use kiosk_setup::environment::EnvironmentFacts;
//! use std::path::PathBuf;
//!
//! let facts = EnvironmentFacts::new("pi", PathBuf::from("/home/pi"));
//! assert_eq!(facts.home_path(".config/labwc/autostart"),
//!            PathBuf::from("/home/pi/.config/labwc/autostart"));
//! ```

use std::path::{Path, PathBuf};

use crate::directive::WriteScope;
use crate::error::{KioskError, Result};
use crate::shell::{in_wayland_session, is_elevated};

/// Snapshot of the environment a provisioning run executes in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvironmentFacts {
    /// Login name of the invoking user.
    pub user: String,
    /// Home directory of the invoking user.
    pub home: PathBuf,
    /// Whether the process runs with superuser privileges.
    pub elevated: bool,
    /// Whether a Wayland compositor session is reachable.
    pub wayland_session: bool,
    /// Directories from `PATH`, in lookup order.
    pub path_entries: Vec<PathBuf>,
}

impl EnvironmentFacts {
    /// Build facts for an unprivileged user outside any compositor session.
    pub fn new(user: &str, home: PathBuf) -> Self {
        Self {
            user: user.to_string(),
            home,
            elevated: false,
            wayland_session: false,
            path_entries: Vec::new(),
        }
    }

    /// Gather facts from the real process environment.
    pub fn gather() -> Self {
        Self::gather_with_env(|key: &str| std::env::var(key))
    }

    /// Gather facts with a custom env var lookup function.
    ///
    /// This allows testing without modifying actual environment variables.
    pub fn gather_with_env<F>(env_fn: F) -> Self
    where
        F: Fn(&str) -> std::result::Result<String, std::env::VarError>,
    {
        let user = env_fn("USER")
            .or_else(|_| env_fn("LOGNAME"))
            .unwrap_or_else(|_| "pi".to_string());
        let home = env_fn("HOME")
            .map(PathBuf::from)
            .ok()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("/home").join(&user));
        let path_entries = env_fn("PATH")
            .map(|p| std::env::split_paths(&p).collect())
            .unwrap_or_default();

        let facts = Self {
            user,
            home,
            elevated: is_elevated(),
            wayland_session: in_wayland_session(),
            path_entries,
        };
        tracing::debug!(
            "Environment: user={} home={} elevated={} wayland={}",
            facts.user,
            facts.home.display(),
            facts.elevated,
            facts.wayland_session
        );
        facts
    }

    /// Set the `PATH` entries used for binary lookups.
    pub fn with_path_entries(mut self, entries: Vec<PathBuf>) -> Self {
        self.path_entries = entries;
        self
    }

    /// Resolve a path relative to the user's home directory.
    ///
    /// Absolute paths are returned unchanged.
    pub fn home_path(&self, relative: impl AsRef<Path>) -> PathBuf {
        self.home.join(relative)
    }

    /// Whether `path` lies inside the invoking user's home directory.
    pub fn is_user_owned(&self, path: &Path) -> bool {
        path.starts_with(&self.home)
    }

    /// Write scope for `path`: plain writes inside the home directory,
    /// privileged writes everywhere else.
    pub fn write_scope(&self, path: &Path) -> WriteScope {
        if self.is_user_owned(path) {
            WriteScope::User
        } else {
            WriteScope::System
        }
    }

    /// Abort if the process runs as the superuser.
    ///
    /// Provisioning writes per-user compositor files and configures autologin
    /// for the invoking user, so running as root would target the wrong account.
    pub fn ensure_not_root(&self) -> Result<()> {
        if self.elevated {
            Err(KioskError::RunningAsRoot)
        } else {
            Ok(())
        }
    }
}
