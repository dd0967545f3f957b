//! Platform and session detection.

/// Variables set by common CI services.
const CI_VARS: &[&str] = &[
    "CI",
    "GITHUB_ACTIONS",
    "GITLAB_CI",
    "CIRCLECI",
    "TRAVIS",
    "JENKINS_URL",
];

/// Whether the process runs under a CI service.
///
/// `main` forces non-interactive mode when this is true.
pub fn is_ci() -> bool {
    CI_VARS.iter().any(|var| std::env::var_os(var).is_some())
}

/// Whether the effective user is root.
pub fn is_elevated() -> bool {
    #[cfg(unix)]
    {
        // SAFETY: geteuid() is a simple syscall that returns the effective user ID
        unsafe { libc::geteuid() == 0 }
    }

    #[cfg(not(unix))]
    {
        false
    }
}

/// Check if a Wayland compositor session is reachable from this process.
pub fn in_wayland_session() -> bool {
    std::env::var_os("WAYLAND_DISPLAY").is_some_and(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ci_vars_are_distinct() {
        let mut vars = CI_VARS.to_vec();
        vars.sort_unstable();
        vars.dedup();
        assert_eq!(vars.len(), CI_VARS.len());
    }

    #[cfg(unix)]
    #[test]
    fn is_elevated_matches_effective_uid() {
        let euid = unsafe { libc::geteuid() };
        assert_eq!(is_elevated(), euid == 0);
    }

    #[test]
    fn wayland_session_probe_does_not_panic() {
        let _ = in_wayland_session();
    }
}
