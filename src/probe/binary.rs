//! Executable path resolution.

use std::path::{Path, PathBuf};

use super::capability::Resolved;

/// Check if a path has execute permission bits set.
#[cfg(unix)]
pub fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|m| m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
pub fn is_executable(_path: &Path) -> bool {
    true
}

/// Resolve a command name by iterating over `PATH` entries.
///
/// Returns the first match that exists and is executable.
pub fn resolve_tool_path(tool: &str, path_entries: &[PathBuf]) -> Option<PathBuf> {
    path_entries
        .iter()
        .map(|dir| dir.join(tool))
        .find(|candidate| candidate.is_file() && is_executable(candidate))
}

/// Where to look for a binary, in preference order.
#[derive(Debug, Clone)]
pub struct BinaryCandidates<'a> {
    /// Command names tried against `PATH`.
    pub commands: &'a [String],
    /// Absolute paths tried when `PATH` has none of the commands.
    pub paths: &'a [PathBuf],
    /// Best guess when nothing is found.
    pub default: &'a Path,
}

/// Locate a binary: `PATH` lookup of every command name, then fixed
/// absolute paths, then the default with a warning.
pub fn probe_binary(candidates: &BinaryCandidates<'_>, path_entries: &[PathBuf]) -> Resolved<PathBuf> {
    for command in candidates.commands {
        if let Some(found) = resolve_tool_path(command, path_entries) {
            tracing::debug!("Found {} on PATH at {}", command, found.display());
            return Resolved::found(found);
        }
    }

    if let Some(found) = candidates
        .paths
        .iter()
        .find(|p| p.is_file() && is_executable(p))
    {
        tracing::debug!("Found binary at fixed path {}", found.display());
        return Resolved::found(found.clone());
    }

    Resolved::Fallback {
        value: candidates.default.to_path_buf(),
        reason: format!(
            "none of [{}] found on PATH or at known locations; assuming {}",
            candidates.commands.join(", "),
            candidates.default.display()
        ),
    }
}
